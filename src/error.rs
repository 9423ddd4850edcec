//! Unified error types for the bridge.

use std::fmt;
use std::time::Duration;

use crate::tmux::process::format_duration;

// ---------------------------------------------------------------------------
// TransportError
// ---------------------------------------------------------------------------

/// Failure of one tmux process invocation.
///
/// Covers a missing binary, spawn/IO failures, the per-invocation process
/// timeout and nonzero exits. The transport never retries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportError {
    /// Rendered command line that failed (`tmux capture-pane -p ...`).
    pub command: String,
    /// Process exit status, when the process ran to completion.
    pub exit_code: Option<i32>,
    /// Diagnostic text from the process (usually stderr).
    pub diagnostic: String,
}

impl TransportError {
    pub fn new(
        command: impl Into<String>,
        exit_code: Option<i32>,
        diagnostic: impl Into<String>,
    ) -> Self {
        Self {
            command: command.into(),
            exit_code,
            diagnostic: diagnostic.into(),
        }
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.exit_code {
            Some(code) => write!(
                f,
                "tmux command failed (rc={code}): {}: {}",
                self.command, self.diagnostic
            ),
            None => write!(f, "tmux command failed: {}: {}", self.command, self.diagnostic),
        }
    }
}

impl std::error::Error for TransportError {}

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Errors when loading configuration or validating a request.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Toml(toml::de::Error),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "io: {e}"),
            Self::Toml(e) => write!(f, "toml: {e}"),
            Self::Invalid(msg) => write!(f, "invalid config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        Self::Toml(e)
    }
}

// ---------------------------------------------------------------------------
// BridgeError
// ---------------------------------------------------------------------------

/// Which wait of the completion protocol ran out of time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitPhase {
    /// Waiting for the start marker to be echoed; the command was never sent.
    StartMarker,
    /// Waiting for the end marker after the command was sent.
    EndMarker,
    /// Waiting for the shell prompt to reappear.
    Prompt,
}

impl fmt::Display for WaitPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StartMarker => write!(f, "start marker"),
            Self::EndMarker => write!(f, "end marker"),
            Self::Prompt => write!(f, "shell prompt"),
        }
    }
}

/// Top-level error type returned by every caller-facing operation.
///
/// Variants stay distinct because callers recover differently: a timeout may
/// warrant inspecting the pane, a missing session needs a human, a transport
/// failure usually means a broken environment.
#[derive(Debug)]
pub enum BridgeError {
    /// The target's session is not among the listed tmux sessions.
    SessionNotFound {
        target: String,
        available: Vec<String>,
    },
    /// Neither completion condition was observed within the budget.
    ///
    /// Keystrokes sent before the timeout stay sent; the command may still be
    /// running in the pane.
    CommandTimeout {
        command: String,
        timeout: Duration,
        phase: WaitPhase,
    },
    Transport(TransportError),
    Config(ConfigError),
}

impl BridgeError {
    /// Process exit code used by the command-line front end.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::CommandTimeout { .. } => 2,
            Self::SessionNotFound { .. } => 3,
            Self::Transport(_) | Self::Config(_) => 1,
        }
    }
}

impl fmt::Display for BridgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SessionNotFound { target, available } => {
                if available.is_empty() {
                    write!(f, "tmux session '{target}' does not exist (no sessions running)")
                } else {
                    write!(
                        f,
                        "tmux session '{target}' does not exist. Available sessions: {}",
                        available.join(", ")
                    )
                }
            }
            Self::CommandTimeout {
                command,
                timeout,
                phase,
            } => write!(
                f,
                "{phase} not detected within {}: {command:?}",
                format_duration(*timeout)
            ),
            Self::Transport(e) => write!(f, "transport: {e}"),
            Self::Config(e) => write!(f, "config: {e}"),
        }
    }
}

impl std::error::Error for BridgeError {}

impl From<TransportError> for BridgeError {
    fn from(e: TransportError) -> Self {
        Self::Transport(e)
    }
}

impl From<ConfigError> for BridgeError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}
