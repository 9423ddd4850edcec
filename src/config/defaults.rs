//! Default configuration constants.

/// tmux binary looked up on `PATH`.
pub(super) const DEFAULT_TMUX_BIN: &str = "tmux";
/// Per-invocation limit for one tmux client process.
pub(super) const DEFAULT_PROCESS_TIMEOUT_SECS: f64 = 10.0;
/// Completion wait budget for one command.
pub(super) const DEFAULT_TIMEOUT_SECS: f64 = 30.0;
/// Delay between pane captures while waiting.
pub(super) const DEFAULT_POLL_INTERVAL_SECS: f64 = 0.3;
/// Prompt-shaped line ending: `$`, `#` or `>` followed by one space.
pub(super) const DEFAULT_PROMPT_PATTERN: &str = r"[\$#>] $";

/// Local config file name, looked up in the working directory.
pub(super) const LOCAL_CONFIG_FILE: &str = "tmux-bridge.toml";
/// Global config directory and file under the config root.
pub(super) const GLOBAL_CONFIG_DIR: &str = "tmux-bridge";
pub(super) const GLOBAL_CONFIG_FILE: &str = "config.toml";
