//! Buffer reader: sanitized, read-only pane snapshots.

use tokio::time::Instant;

use crate::error::TransportError;

use super::sanitize::strip;
use super::transport::PaneTransport;
use super::types::{CaptureRange, SessionTarget};

/// Sanitized pane content at one point in time.
#[derive(Clone, Debug)]
pub struct PaneSnapshot {
    pub text: String,
    pub range: CaptureRange,
    pub captured_at: Instant,
}

/// Capture one pane and strip escape sequences.
pub async fn capture_snapshot(
    transport: &dyn PaneTransport,
    target: &SessionTarget,
    range: CaptureRange,
) -> Result<PaneSnapshot, TransportError> {
    let raw = transport.capture_pane(target, range).await?;
    Ok(PaneSnapshot {
        text: strip(&raw),
        range,
        captured_at: Instant::now(),
    })
}

/// Read the pane, optionally keeping only its last `line_count` lines.
///
/// Session validation is the caller's job; this never mutates the pane.
pub async fn read_buffer(
    transport: &dyn PaneTransport,
    target: &SessionTarget,
    line_count: Option<usize>,
    include_history: bool,
) -> Result<PaneSnapshot, TransportError> {
    let range = if include_history {
        CaptureRange::WithHistory
    } else {
        CaptureRange::Visible
    };
    let mut snapshot = capture_snapshot(transport, target, range).await?;
    if let Some(count) = line_count {
        snapshot.text = last_lines(&snapshot.text, count);
    }
    Ok(snapshot)
}

/// Last `count` lines of `text`, joined with `\n`, order preserved.
pub fn last_lines(text: &str, count: usize) -> String {
    let lines: Vec<&str> = text.lines().collect();
    let start = lines.len().saturating_sub(count);
    lines[start..].join("\n")
}
