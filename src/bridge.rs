//! Caller-facing facade binding a pane transport to resolved settings.
//!
//! Every operation that touches a pane validates its target against the
//! session list first; a missing session fails before any keystroke.

use regex::Regex;
use std::time::Duration;
use tracing::debug;

use crate::config::{compile_prompt_pattern, Config};
use crate::error::{BridgeError, ConfigError};
use crate::tmux::capture;
use crate::tmux::run::{self, CompletionStrategy, ExecutionRequest};
use crate::tmux::sessions;
use crate::tmux::transport::{PaneTransport, TmuxTransport};
use crate::tmux::types::{ControlKey, Keystroke, SessionTarget};

/// Defaults applied when an execution does not override them.
#[derive(Clone, Debug)]
pub struct BridgeSettings {
    pub timeout: Duration,
    pub poll_interval: Duration,
    pub prompt: Regex,
    pub use_markers: bool,
}

impl BridgeSettings {
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        Ok(Self {
            timeout: config.timeout()?,
            poll_interval: config.poll_interval()?,
            prompt: config.prompt_regex()?,
            use_markers: config.execution.use_markers,
        })
    }
}

impl Default for BridgeSettings {
    fn default() -> Self {
        Self::from_config(&Config::default()).expect("built-in config defaults are valid")
    }
}

/// Per-call overrides for [`TmuxBridge::execute_and_wait`].
#[derive(Clone, Debug, Default)]
pub struct ExecuteOptions {
    pub timeout: Option<Duration>,
    pub poll_interval: Option<Duration>,
    pub use_markers: Option<bool>,
    /// Prompt regex source for the prompt strategy.
    pub prompt_pattern: Option<String>,
}

/// Drives existing tmux sessions through one transport.
pub struct TmuxBridge<T: PaneTransport = TmuxTransport> {
    transport: T,
    settings: BridgeSettings,
}

impl TmuxBridge<TmuxTransport> {
    /// Real tmux transport plus settings, both from `config`.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let mut transport = TmuxTransport::new(config.tmux.binary.clone())
            .with_process_timeout(config.process_timeout()?);
        if let Some(path) = &config.tmux.socket_path {
            transport = transport.with_socket_path(path.clone());
        }
        if let Some(name) = &config.tmux.socket_name {
            transport = transport.with_socket_name(name.clone());
        }
        Ok(Self::new(transport, BridgeSettings::from_config(config)?))
    }
}

impl<T: PaneTransport> TmuxBridge<T> {
    pub fn new(transport: T, settings: BridgeSettings) -> Self {
        Self {
            transport,
            settings,
        }
    }

    pub fn settings(&self) -> &BridgeSettings {
        &self.settings
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Type `text` into the target pane, optionally pressing Enter.
    ///
    /// Text is sent literally; key names inside it are not interpreted.
    pub async fn send_keys(
        &self,
        target: &str,
        text: &str,
        press_enter: bool,
    ) -> Result<(), BridgeError> {
        let target = self.checked_target(target).await?;
        let keys = match (text.is_empty(), press_enter) {
            (true, false) => return Ok(()),
            (true, true) => Keystroke::Key(ControlKey::Enter),
            (false, true) => Keystroke::Line(text.to_string()),
            (false, false) => Keystroke::Literal(text.to_string()),
        };
        self.transport.send_keys(&target, &keys).await?;
        Ok(())
    }

    /// Press one named key (`C-c`, `Escape`, ...).
    pub async fn send_control_key(&self, target: &str, key: ControlKey) -> Result<(), BridgeError> {
        let target = self.checked_target(target).await?;
        debug!(target = %target, key = %key, "sending control key");
        self.transport
            .send_keys(&target, &Keystroke::Key(key))
            .await?;
        Ok(())
    }

    /// Sanitized pane text, optionally only the last `line_count` lines.
    pub async fn read_buffer(
        &self,
        target: &str,
        line_count: Option<usize>,
        include_history: bool,
    ) -> Result<String, BridgeError> {
        let target = self.checked_target(target).await?;
        let snapshot =
            capture::read_buffer(&self.transport, &target, line_count, include_history).await?;
        Ok(snapshot.text)
    }

    /// Run `command` in the target pane and return its output.
    ///
    /// On timeout the keystrokes stay sent and the command may still be
    /// running; `read_buffer` shows its state.
    pub async fn execute_and_wait(
        &self,
        target: &str,
        command: &str,
        options: &ExecuteOptions,
    ) -> Result<String, BridgeError> {
        let strategy = if options.use_markers.unwrap_or(self.settings.use_markers) {
            CompletionStrategy::Markers
        } else {
            CompletionStrategy::PromptPattern
        };
        let request = ExecutionRequest::new(
            command,
            options.timeout.unwrap_or(self.settings.timeout),
            options.poll_interval.unwrap_or(self.settings.poll_interval),
            strategy,
        )?;
        let override_prompt = match &options.prompt_pattern {
            Some(pattern) => Some(compile_prompt_pattern(pattern)?),
            None => None,
        };
        let prompt = override_prompt.as_ref().unwrap_or(&self.settings.prompt);

        let target = SessionTarget::new(target)?;
        run::execute_and_wait(&self.transport, &target, &request, prompt).await
    }

    pub async fn list_sessions(&self) -> Result<Vec<String>, BridgeError> {
        Ok(sessions::list_sessions(&self.transport).await?)
    }

    pub async fn session_exists(&self, name: &str) -> Result<bool, BridgeError> {
        Ok(sessions::session_exists(&self.transport, name).await?)
    }

    async fn checked_target(&self, raw: &str) -> Result<SessionTarget, BridgeError> {
        let target = SessionTarget::new(raw)?;
        sessions::ensure_target(&self.transport, &target).await?;
        Ok(target)
    }
}
