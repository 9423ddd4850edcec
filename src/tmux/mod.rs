//! Tmux pane transport, session queries and command completion detection.

pub mod capture;
pub mod markers;
pub mod poll;
pub(crate) mod process;
pub mod run;
pub mod sanitize;
pub mod sessions;
pub mod transport;
pub mod types;

pub use capture::{read_buffer, PaneSnapshot};
pub use run::{execute_and_wait, CompletionStrategy, ExecutionRequest};
pub use sessions::{ensure_target, list_sessions, session_exists};
pub use transport::{PaneTransport, TmuxTransport};
pub use types::{CaptureRange, ControlKey, Keystroke, SessionTarget};
