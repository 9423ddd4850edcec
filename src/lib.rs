//! tmux-bridge: drive existing tmux sessions programmatically.
//!
//! Send keystrokes, read pane buffers, and run shell commands in a live pane
//! while detecting when they finish. Completion is detected with unique
//! start/end markers echoed around the command, or by waiting for the shell
//! prompt as a fallback.
//!
//! # Quick start
//!
//! ```no_run
//! use tmux_bridge::bridge::{ExecuteOptions, TmuxBridge};
//! use tmux_bridge::config::load_config;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config(None)?;
//! let bridge = TmuxBridge::from_config(&config)?;
//! let output = bridge
//!     .execute_and_wait("dev", "git status --short", &ExecuteOptions::default())
//!     .await?;
//! println!("{output}");
//! # Ok(())
//! # }
//! ```

pub mod bridge;
pub mod build_info;
pub mod config;
pub mod error;
pub mod render;
#[cfg(test)]
pub mod testsupport;
pub mod tmux;
