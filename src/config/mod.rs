//! Configuration loading from TOML files and environment variables.
//!
//! Config is loaded in this order of precedence (highest wins):
//! 1. CLI flags (applied by the binary after loading)
//! 2. Environment variables (`TMUX_BRIDGE_*`)
//! 3. TOML file specified via --config CLI flag
//! 4. ./tmux-bridge.toml in the current directory
//! 5. $XDG_CONFIG_HOME/tmux-bridge/config.toml (or
//!    ~/.config/tmux-bridge/config.toml)
//! 6. Built-in defaults

use std::path::{Path, PathBuf};
use std::time::Duration;

use regex::Regex;

use crate::error::ConfigError;

mod defaults;
mod env;
mod sources;
mod types;

use env::apply_runtime_env_overrides;
use sources::read_config_text_with_sources;
pub use sources::config_root_dir;
pub use types::{
    Config, ConfigDiagnostics, DisplayConfig, ExecutionConfig, LoadedConfig, TmuxConfig,
};

/// Load configuration from disk and environment.
///
/// `path_override` is an explicit config file path (from --config flag).
pub fn load_config(path_override: Option<&str>) -> Result<Config, ConfigError> {
    Ok(load_config_with_diagnostics(path_override)?.config)
}

/// Load configuration and return non-fatal diagnostics.
pub fn load_config_with_diagnostics(
    path_override: Option<&str>,
) -> Result<LoadedConfig, ConfigError> {
    load_config_with_diagnostics_from_sources(
        path_override,
        |path| std::fs::read_to_string(path),
        |name| std::env::var(name).ok(),
        config_root_dir,
    )
}

fn load_config_with_diagnostics_from_sources<FRead, FEnv, FRoot>(
    path_override: Option<&str>,
    read_file: FRead,
    env_lookup: FEnv,
    config_root: FRoot,
) -> Result<LoadedConfig, ConfigError>
where
    FRead: Fn(&Path) -> Result<String, std::io::Error>,
    FEnv: Fn(&str) -> Option<String>,
    FRoot: Fn() -> Option<PathBuf>,
{
    let (config_text, source) =
        read_config_text_with_sources(path_override, &read_file, &config_root)?;
    let mut config: Config = toml::from_str(&config_text)?;
    apply_runtime_env_overrides(&mut config, &env_lookup)?;
    config.validate()?;

    let diagnostics = config.diagnostics();

    Ok(LoadedConfig {
        config,
        diagnostics,
        source: source.path(),
    })
}

impl Config {
    /// Non-fatal problems with the current values.
    pub fn diagnostics(&self) -> ConfigDiagnostics {
        let mut diagnostics = ConfigDiagnostics::default();
        if let (Some(path), Some(name)) = (&self.tmux.socket_path, &self.tmux.socket_name) {
            diagnostics.warnings.push(format!(
                "both tmux.socket_path (`{path}`) and tmux.socket_name (`{name}`) are set; using socket_path"
            ));
        }
        diagnostics
    }

    /// Select the tmux server by socket name, dropping any configured
    /// socket path, which would otherwise take precedence.
    pub fn override_socket_name(&mut self, name: impl Into<String>) {
        self.tmux.socket_name = Some(name.into());
        self.tmux.socket_path = None;
    }

    /// Reject values no execution could run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tmux.binary.trim().is_empty() {
            return Err(ConfigError::Invalid("tmux.binary cannot be empty".into()));
        }
        secs_to_duration("tmux.process_timeout_secs", self.tmux.process_timeout_secs)?;
        let timeout = secs_to_duration("execution.timeout_secs", self.execution.timeout_secs)?;
        let interval = secs_to_duration(
            "execution.poll_interval_secs",
            self.execution.poll_interval_secs,
        )?;
        if interval > timeout {
            return Err(ConfigError::Invalid(format!(
                "execution.poll_interval_secs ({}) must not exceed execution.timeout_secs ({})",
                self.execution.poll_interval_secs, self.execution.timeout_secs
            )));
        }
        self.prompt_regex()?;
        Ok(())
    }

    pub fn timeout(&self) -> Result<Duration, ConfigError> {
        secs_to_duration("execution.timeout_secs", self.execution.timeout_secs)
    }

    pub fn poll_interval(&self) -> Result<Duration, ConfigError> {
        secs_to_duration(
            "execution.poll_interval_secs",
            self.execution.poll_interval_secs,
        )
    }

    pub fn process_timeout(&self) -> Result<Duration, ConfigError> {
        secs_to_duration("tmux.process_timeout_secs", self.tmux.process_timeout_secs)
    }

    /// Compiled `execution.prompt_pattern`.
    pub fn prompt_regex(&self) -> Result<Regex, ConfigError> {
        compile_prompt_pattern(&self.execution.prompt_pattern)
    }
}

/// Compile a prompt pattern, naming the pattern in the error.
pub fn compile_prompt_pattern(pattern: &str) -> Result<Regex, ConfigError> {
    Regex::new(pattern).map_err(|e| {
        ConfigError::Invalid(format!("invalid prompt pattern `{pattern}`: {e}"))
    })
}

/// Positive, finite seconds as a `Duration`.
pub fn secs_to_duration(field: &str, secs: f64) -> Result<Duration, ConfigError> {
    if !secs.is_finite() || secs <= 0.0 {
        return Err(ConfigError::Invalid(format!(
            "{field} must be a positive number of seconds, got {secs}"
        )));
    }
    Duration::try_from_secs_f64(secs)
        .map_err(|e| ConfigError::Invalid(format!("{field} is out of range ({secs}): {e}")))
}
