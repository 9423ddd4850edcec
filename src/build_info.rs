//! Compile-time build metadata for `--version`.

/// Semver package version from `Cargo.toml`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// VCS commit hash captured at build time.
pub const GIT_COMMIT: &str = env!("TMUX_BRIDGE_BUILD_GIT_HASH");

/// Build timestamp captured at compile time.
pub const BUILD_TIMESTAMP: &str = env!("TMUX_BRIDGE_BUILD_TIMESTAMP");

/// Long `--version` text: version, commit and build time.
pub const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    "\ncommit: ",
    env!("TMUX_BRIDGE_BUILD_GIT_HASH"),
    "\nbuilt: ",
    env!("TMUX_BRIDGE_BUILD_TIMESTAMP")
);

/// One-line summary used in debug logs.
pub fn version_line() -> String {
    format!("tmux-bridge {VERSION} ({GIT_COMMIT}, built {BUILD_TIMESTAMP})")
}
