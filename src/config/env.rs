//! Environment overrides (`TMUX_BRIDGE_*`).

use crate::error::ConfigError;

use super::Config;

pub(super) const ENV_TMUX_BIN: &str = "TMUX_BRIDGE_TMUX_BIN";
pub(super) const ENV_SOCKET_NAME: &str = "TMUX_BRIDGE_SOCKET_NAME";
pub(super) const ENV_TIMEOUT_SECS: &str = "TMUX_BRIDGE_TIMEOUT_SECS";
pub(super) const ENV_POLL_INTERVAL_SECS: &str = "TMUX_BRIDGE_POLL_INTERVAL_SECS";
pub(super) const ENV_PROMPT_PATTERN: &str = "TMUX_BRIDGE_PROMPT_PATTERN";

pub(super) fn apply_runtime_env_overrides<FEnv>(
    config: &mut Config,
    env_lookup: &FEnv,
) -> Result<(), ConfigError>
where
    FEnv: Fn(&str) -> Option<String>,
{
    if let Some(bin) = non_blank(env_lookup, ENV_TMUX_BIN) {
        config.tmux.binary = bin;
    }
    if let Some(name) = non_blank(env_lookup, ENV_SOCKET_NAME) {
        config.tmux.socket_name = Some(name);
    }
    if let Some(raw) = non_blank(env_lookup, ENV_TIMEOUT_SECS) {
        config.execution.timeout_secs = parse_secs(ENV_TIMEOUT_SECS, &raw)?;
    }
    if let Some(raw) = non_blank(env_lookup, ENV_POLL_INTERVAL_SECS) {
        config.execution.poll_interval_secs = parse_secs(ENV_POLL_INTERVAL_SECS, &raw)?;
    }
    if let Some(pattern) = env_lookup(ENV_PROMPT_PATTERN).filter(|p| !p.is_empty()) {
        config.execution.prompt_pattern = pattern;
    }
    Ok(())
}

fn non_blank<FEnv>(env_lookup: &FEnv, name: &str) -> Option<String>
where
    FEnv: Fn(&str) -> Option<String>,
{
    env_lookup(name)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_secs(name: &str, raw: &str) -> Result<f64, ConfigError> {
    raw.parse::<f64>().map_err(|_| {
        ConfigError::Invalid(format!(
            "invalid {name} value `{raw}`: expected seconds, e.g. 30 or 0.5"
        ))
    })
}
