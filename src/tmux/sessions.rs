//! Session directory: listing and existence checks over tmux sessions.

use tracing::debug;

use crate::error::{BridgeError, TransportError};

use super::transport::PaneTransport;
use super::types::SessionTarget;

/// Session names in the order tmux reports them (creation order, not sorted).
pub async fn list_sessions(transport: &dyn PaneTransport) -> Result<Vec<String>, TransportError> {
    transport.list_sessions().await
}

/// Whether `name` is one of the listed sessions.
pub async fn session_exists(
    transport: &dyn PaneTransport,
    name: &str,
) -> Result<bool, TransportError> {
    let sessions = transport.list_sessions().await?;
    Ok(sessions.iter().any(|session| session == name))
}

/// Fail with `SessionNotFound` unless the target's session is listed.
///
/// Runs before any keystroke is injected, and never mutates a pane to check.
pub async fn ensure_target(
    transport: &dyn PaneTransport,
    target: &SessionTarget,
) -> Result<(), BridgeError> {
    let sessions = transport.list_sessions().await?;
    if sessions.iter().any(|session| session == target.session_name()) {
        return Ok(());
    }
    debug!(target = %target, available = ?sessions, "tmux session not found");
    Err(BridgeError::SessionNotFound {
        target: target.to_string(),
        available: sessions,
    })
}
