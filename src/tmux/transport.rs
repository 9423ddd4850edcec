//! Pane transport: the primitive tmux operations every other module builds on.
//!
//! The transport is a dumb conduit. It performs no retries and does not
//! interpret pane content; every failure is a [`TransportError`].

use async_trait::async_trait;
use tokio::time::Duration;
use tracing::debug;

use crate::error::TransportError;

use super::process::{ensure_success, render_command_line, run_process};
use super::types::{CaptureRange, Keystroke, SessionTarget};

/// Primitive operations against a tmux server.
///
/// Only `send_keys` mutates a pane. Implementations must be cheap to call
/// repeatedly; the completion protocol captures once per poll.
#[async_trait]
pub trait PaneTransport: Send + Sync {
    /// Inject one keystroke (literal text, a line, or a named key).
    async fn send_keys(&self, target: &SessionTarget, keys: &Keystroke)
        -> Result<(), TransportError>;

    /// Capture raw pane text, optionally including scrollback history.
    async fn capture_pane(
        &self,
        target: &SessionTarget,
        range: CaptureRange,
    ) -> Result<String, TransportError>;

    /// Session names in the order tmux reports them.
    async fn list_sessions(&self) -> Result<Vec<String>, TransportError>;

    /// Dedicated existence check (`tmux has-session`).
    async fn has_session(&self, target: &SessionTarget) -> Result<bool, TransportError>;
}

/// Real transport invoking the `tmux` binary once per operation.
#[derive(Clone, Debug)]
pub struct TmuxTransport {
    tmux_bin: String,
    socket_path: Option<String>,
    socket_name: Option<String>,
    process_timeout: Duration,
}

/// Default upper bound for one tmux process invocation.
pub const DEFAULT_PROCESS_TIMEOUT: Duration = Duration::from_secs(10);

impl TmuxTransport {
    pub fn new(tmux_bin: impl Into<String>) -> Self {
        Self {
            tmux_bin: tmux_bin.into(),
            socket_path: None,
            socket_name: None,
            process_timeout: DEFAULT_PROCESS_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_socket_path(mut self, path: impl Into<String>) -> Self {
        self.socket_path = Some(path.into());
        self
    }

    #[must_use]
    pub fn with_socket_name(mut self, name: impl Into<String>) -> Self {
        self.socket_name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_process_timeout(mut self, limit: Duration) -> Self {
        self.process_timeout = limit;
        self
    }

    /// Full argv (after the binary) for one tmux subcommand.
    fn argv(&self, args: Vec<String>) -> Vec<String> {
        let mut argv = Vec::with_capacity(args.len() + 2);
        // Socket path takes precedence over socket name.
        if let Some(path) = &self.socket_path {
            argv.push("-S".to_string());
            argv.push(path.clone());
        } else if let Some(name) = &self.socket_name {
            argv.push("-L".to_string());
            argv.push(name.clone());
        }
        argv.extend(args);
        argv
    }

    async fn run(&self, args: Vec<String>) -> Result<String, TransportError> {
        let argv = self.argv(args);
        let rendered = render_command_line(&self.tmux_bin, &argv);
        debug!(command = %rendered, "running tmux");
        let output = run_process(&self.tmux_bin, &argv, self.process_timeout).await?;
        ensure_success(output, &rendered).map(|out| out.stdout)
    }
}

impl Default for TmuxTransport {
    fn default() -> Self {
        Self::new("tmux")
    }
}

#[async_trait]
impl PaneTransport for TmuxTransport {
    async fn send_keys(
        &self,
        target: &SessionTarget,
        keys: &Keystroke,
    ) -> Result<(), TransportError> {
        self.run(build_send_keys_args(target, keys)).await.map(|_| ())
    }

    async fn capture_pane(
        &self,
        target: &SessionTarget,
        range: CaptureRange,
    ) -> Result<String, TransportError> {
        self.run(build_capture_pane_args(target, range)).await
    }

    async fn list_sessions(&self) -> Result<Vec<String>, TransportError> {
        let args = vec![
            "list-sessions".to_string(),
            "-F".to_string(),
            "#{session_name}".to_string(),
        ];
        match self.run(args).await {
            Ok(stdout) => Ok(parse_session_list(&stdout)),
            Err(err) if reports_no_sessions(&err) => Ok(Vec::new()),
            Err(err) => Err(err),
        }
    }

    async fn has_session(&self, target: &SessionTarget) -> Result<bool, TransportError> {
        let args = vec![
            "has-session".to_string(),
            "-t".to_string(),
            target.as_str().to_string(),
        ];
        match self.run(args).await {
            Ok(_) => Ok(true),
            // has-session exits 1 for unknown targets and for a missing server.
            Err(err) if err.exit_code == Some(1) => Ok(false),
            Err(err) => Err(err),
        }
    }
}

/// Build `tmux send-keys` arguments for one keystroke.
pub(crate) fn build_send_keys_args(target: &SessionTarget, keys: &Keystroke) -> Vec<String> {
    let target = target.as_str().to_string();
    match keys {
        Keystroke::Literal(text) => vec![
            "send-keys".into(),
            "-t".into(),
            target,
            "-l".into(),
            text.clone(),
        ],
        // `;` as its own argv entry is tmux's command separator, so the text
        // and its Enter arrive from one client invocation.
        Keystroke::Line(text) => vec![
            "send-keys".into(),
            "-t".into(),
            target.clone(),
            "-l".into(),
            text.clone(),
            ";".into(),
            "send-keys".into(),
            "-t".into(),
            target,
            "Enter".into(),
        ],
        Keystroke::Key(key) => vec!["send-keys".into(), "-t".into(), target, key.tmux_name()],
    }
}

/// Build `tmux capture-pane` arguments.
///
/// `-J` joins wrapped lines and keeps trailing spaces, which prompt matching
/// relies on (`$ ` at the end of a line).
pub(crate) fn build_capture_pane_args(target: &SessionTarget, range: CaptureRange) -> Vec<String> {
    let mut args = vec!["capture-pane".to_string(), "-p".to_string(), "-J".to_string()];
    if range == CaptureRange::WithHistory {
        args.push("-S".to_string());
        args.push("-".to_string());
    }
    args.push("-t".to_string());
    args.push(target.as_str().to_string());
    args
}

pub(crate) fn parse_session_list(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Whether a `list-sessions` failure is tmux's way of saying "zero sessions".
pub(crate) fn reports_no_sessions(err: &TransportError) -> bool {
    if err.exit_code.is_none() {
        return false;
    }
    let lower = err.diagnostic.to_ascii_lowercase();
    lower.contains("no server running")
        || lower.contains("no sessions")
        || lower.contains("error connecting to")
}
