//! Configuration data model.
//!
//! Struct/enum definitions plus default values. Loading, precedence and
//! validation live in `config::mod`.

use serde::{Deserialize, Serialize};

use super::defaults::{
    DEFAULT_POLL_INTERVAL_SECS, DEFAULT_PROCESS_TIMEOUT_SECS, DEFAULT_PROMPT_PATTERN,
    DEFAULT_TIMEOUT_SECS, DEFAULT_TMUX_BIN,
};

/// Top-level runtime configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub tmux: TmuxConfig,
    pub execution: ExecutionConfig,
    pub display: DisplayConfig,
}

/// How the tmux client is invoked.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct TmuxConfig {
    /// Binary name or path.
    #[serde(alias = "bin")]
    pub binary: String,
    /// `-L` server socket name.
    pub socket_name: Option<String>,
    /// `-S` server socket path; wins over `socket_name`.
    pub socket_path: Option<String>,
    /// Kill a tmux client process that runs longer than this.
    pub process_timeout_secs: f64,
}

impl Default for TmuxConfig {
    fn default() -> Self {
        Self {
            binary: DEFAULT_TMUX_BIN.to_string(),
            socket_name: None,
            socket_path: None,
            process_timeout_secs: DEFAULT_PROCESS_TIMEOUT_SECS,
        }
    }
}

/// Defaults for `execute_and_wait`.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ExecutionConfig {
    pub timeout_secs: f64,
    pub poll_interval_secs: f64,
    /// Regex matched against the last non-empty pane line.
    pub prompt_pattern: String,
    /// Marker-based completion detection; `false` falls back to the prompt.
    pub use_markers: bool,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
            prompt_pattern: DEFAULT_PROMPT_PATTERN.to_string(),
            use_markers: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct DisplayConfig {
    /// Styled stderr messages.
    pub color: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self { color: true }
    }
}

/// Non-fatal findings collected while loading config.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigDiagnostics {
    pub warnings: Vec<String>,
}

/// Loaded config plus diagnostics and the file it came from, if any.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: Config,
    pub diagnostics: ConfigDiagnostics,
    pub source: Option<std::path::PathBuf>,
}
