//! Command execution in a live pane: marker/prompt completion detection and
//! output extraction.
//!
//! The shell gives no completion signal, so every strategy injects keystrokes
//! and then polls full pane captures until the rendered text proves the
//! command finished. Keystrokes already sent stay sent when a wait times out;
//! the command may keep running in the pane after the caller gives up.

use regex::Regex;
use tokio::time::{Duration, Instant};
use tracing::debug;

use crate::error::{BridgeError, ConfigError, WaitPhase};

use super::capture::{capture_snapshot, PaneSnapshot};
use super::markers::MarkerPair;
use super::poll::{poll_until, PollTiming};
use super::sessions::ensure_target;
use super::transport::PaneTransport;
use super::types::{CaptureRange, Keystroke, SessionTarget};

/// How completion of a command is detected.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum CompletionStrategy {
    /// Echo unique start/end tokens around the command (reliable).
    #[default]
    Markers,
    /// Wait for the shell prompt to reappear (degraded fallback).
    PromptPattern,
}

/// One validated execution request. Immutable for the whole execution.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ExecutionRequest {
    command: String,
    timing: PollTiming,
    strategy: CompletionStrategy,
}

impl ExecutionRequest {
    pub fn new(
        command: impl Into<String>,
        timeout: Duration,
        poll_interval: Duration,
        strategy: CompletionStrategy,
    ) -> Result<Self, ConfigError> {
        let command = command.into();
        if command.trim().is_empty() {
            return Err(ConfigError::Invalid("command cannot be empty".into()));
        }
        validate_timing(timeout, poll_interval)?;
        Ok(Self {
            command,
            timing: PollTiming {
                interval: poll_interval,
                timeout,
            },
            strategy,
        })
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn timeout(&self) -> Duration {
        self.timing.timeout
    }

    pub fn poll_interval(&self) -> Duration {
        self.timing.interval
    }

    pub fn strategy(&self) -> CompletionStrategy {
        self.strategy
    }

    fn timed_out(&self, phase: WaitPhase) -> BridgeError {
        BridgeError::CommandTimeout {
            command: self.command.clone(),
            timeout: self.timing.timeout,
            phase,
        }
    }
}

/// Interval and timeout must both be positive, with interval <= timeout.
pub(crate) fn validate_timing(
    timeout: Duration,
    poll_interval: Duration,
) -> Result<(), ConfigError> {
    if timeout.is_zero() {
        return Err(ConfigError::Invalid("timeout must be greater than zero".into()));
    }
    if poll_interval.is_zero() {
        return Err(ConfigError::Invalid(
            "poll interval must be greater than zero".into(),
        ));
    }
    if poll_interval > timeout {
        return Err(ConfigError::Invalid(format!(
            "poll interval ({}ms) must not exceed timeout ({}ms)",
            poll_interval.as_millis(),
            timeout.as_millis()
        )));
    }
    Ok(())
}

/// Run `request` in `target` and return the command's output.
///
/// The target is validated first; a missing session fails before any
/// keystroke is sent. `prompt` is only consulted by the prompt strategy.
pub async fn execute_and_wait(
    transport: &dyn PaneTransport,
    target: &SessionTarget,
    request: &ExecutionRequest,
    prompt: &Regex,
) -> Result<String, BridgeError> {
    ensure_target(transport, target).await?;
    match request.strategy {
        CompletionStrategy::Markers => {
            let markers = MarkerPair::generate(&request.command);
            run_with_markers(transport, target, request, &markers).await
        }
        CompletionStrategy::PromptPattern => {
            run_with_prompt(transport, target, request, prompt).await
        }
    }
}

/// Marker strategy: confirm the start token, then send the command chained
/// with the end-token echo and wait for both tokens in order.
pub(crate) async fn run_with_markers(
    transport: &dyn PaneTransport,
    target: &SessionTarget,
    request: &ExecutionRequest,
    markers: &MarkerPair,
) -> Result<String, BridgeError> {
    debug!(target = %target, start = markers.start(), "sending start marker");
    let confirm_started = Instant::now();
    transport
        .send_keys(target, &Keystroke::Line(markers.start_echo()))
        .await?;
    let confirmed = poll_until(
        || capture_snapshot(transport, target, CaptureRange::WithHistory),
        |snapshot: &PaneSnapshot| snapshot.text.contains(markers.start()).then_some(()),
        request.timing,
        confirm_started,
    )
    .await?;
    if confirmed.is_none() {
        debug!(target = %target, "start marker never appeared; command not sent");
        return Err(request.timed_out(WaitPhase::StartMarker));
    }

    debug!(target = %target, command = %request.command, "sending command");
    let started = Instant::now();
    transport
        .send_keys(target, &Keystroke::Line(markers.wrap_command(&request.command)))
        .await?;
    let output = poll_until(
        || capture_snapshot(transport, target, CaptureRange::WithHistory),
        |snapshot: &PaneSnapshot| extract_marker_output(&snapshot.text, markers),
        request.timing,
        started,
    )
    .await?;

    output.ok_or_else(|| request.timed_out(WaitPhase::EndMarker))
}

/// Prompt strategy: send the command and wait for a prompt-shaped last line
/// below the echoed command.
pub(crate) async fn run_with_prompt(
    transport: &dyn PaneTransport,
    target: &SessionTarget,
    request: &ExecutionRequest,
    prompt: &Regex,
) -> Result<String, BridgeError> {
    let baseline = capture_snapshot(transport, target, CaptureRange::WithHistory).await?;
    debug!(target = %target, command = %request.command, "sending command (prompt detection)");
    let started = Instant::now();
    transport
        .send_keys(target, &Keystroke::Line(request.command.clone()))
        .await?;
    let output = poll_until(
        || capture_snapshot(transport, target, CaptureRange::WithHistory),
        |snapshot: &PaneSnapshot| {
            extract_prompt_output(&snapshot.text, &baseline.text, &request.command, prompt)
        },
        request.timing,
        started,
    )
    .await?;

    output.ok_or_else(|| request.timed_out(WaitPhase::Prompt))
}

/// Output between the last start token and the following end token, or
/// `None` while the end token has not been rendered yet.
///
/// A token that appears inside the command's own output ends extraction
/// early; tokens are random per execution, so only output that reproduces
/// them verbatim is affected.
pub(crate) fn extract_marker_output(text: &str, markers: &MarkerPair) -> Option<String> {
    let start_idx = text.rfind(markers.start())?;
    let after_start = &text[start_idx + markers.start().len()..];
    let end_idx = after_start.find(markers.end())?;
    let between = &after_start[..end_idx];

    // The rest of the start-marker line is not output.
    let body = match between.find('\n') {
        Some(newline) => &between[newline + 1..],
        None => return Some(String::new()),
    };

    let mut lines: Vec<&str> = body.split('\n').collect();
    // Final segment is whatever shares a line with the end token: output that
    // lacked a trailing newline, otherwise empty.
    if lines.last().is_some_and(|tail| tail.trim().is_empty()) {
        lines.pop();
    }
    // The typed command line always carries the split-quoted end echo.
    if lines
        .first()
        .is_some_and(|first| first.contains(&markers.end_echo()))
    {
        lines.remove(0);
    }
    while lines.last().is_some_and(|line| line.trim().is_empty()) {
        lines.pop();
    }
    Some(lines.join("\n"))
}

/// Output between the echoed command line and a trailing prompt line, or
/// `None` while no prompt is visible below the command.
pub(crate) fn extract_prompt_output(
    text: &str,
    baseline: &str,
    command: &str,
    prompt: &Regex,
) -> Option<String> {
    let lines: Vec<&str> = text.lines().collect();
    let prompt_idx = last_non_empty_line(&lines)?;
    if !prompt.is_match(lines[prompt_idx]) {
        return None;
    }

    // The command is typed onto the baseline's last prompt line; anything
    // earlier belongs to previous commands.
    let baseline_lines: Vec<&str> = baseline.lines().collect();
    let floor = last_non_empty_line(&baseline_lines).unwrap_or(0);
    if floor >= prompt_idx {
        return None;
    }

    // First match from the floor: output lines may also end with the
    // command text.
    let trimmed_command = command.trim();
    let echo_idx = lines[floor..prompt_idx]
        .iter()
        .position(|line| line.trim_end().ends_with(trimmed_command))
        .map_or(floor, |offset| floor + offset);

    let mut output: Vec<&str> = lines[echo_idx + 1..prompt_idx].to_vec();
    while output.last().is_some_and(|line| line.trim().is_empty()) {
        output.pop();
    }
    Some(output.join("\n"))
}

fn last_non_empty_line(lines: &[&str]) -> Option<usize> {
    lines.iter().rposition(|line| !line.trim().is_empty())
}
