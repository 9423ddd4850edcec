//! Per-execution marker tokens that bound one command's output in the pane.

use crate::error::ConfigError;

use super::process::shell_quote;

const START_PREFIX: &str = "__TMUX_BRIDGE_START_";
const END_PREFIX: &str = "__TMUX_BRIDGE_END_";
const SUFFIX: &str = "__";

/// Start/end tokens for exactly one execution. Never reused.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MarkerPair {
    start: String,
    end: String,
}

impl MarkerPair {
    /// Fresh pair derived from a random 128-bit id.
    ///
    /// Regenerated until neither token occurs in `command`.
    pub fn generate(command: &str) -> Self {
        loop {
            let id = format!("{:032x}", rand::random::<u128>());
            let pair = Self {
                start: format!("{START_PREFIX}{id}{SUFFIX}"),
                end: format!("{END_PREFIX}{id}{SUFFIX}"),
            };
            if !command.contains(&pair.start) && !command.contains(&pair.end) {
                return pair;
            }
        }
    }

    /// Pair from caller-chosen tokens; they must be non-empty and distinct.
    pub fn from_tokens(
        start: impl Into<String>,
        end: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let start = start.into();
        let end = end.into();
        if start.is_empty() || end.is_empty() {
            return Err(ConfigError::Invalid("marker tokens cannot be empty".into()));
        }
        if start == end || start.contains(&end) || end.contains(&start) {
            return Err(ConfigError::Invalid(format!(
                "marker tokens must be distinct: {start:?} / {end:?}"
            )));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> &str {
        &self.start
    }

    pub fn end(&self) -> &str {
        &self.end
    }

    /// Shell line that prints the start token.
    pub fn start_echo(&self) -> String {
        echo_split(&self.start)
    }

    /// Shell fragment that prints the end token; also identifies the echoed
    /// command line during extraction.
    pub fn end_echo(&self) -> String {
        echo_split(&self.end)
    }

    /// The command chained with the end-marker echo so the marker prints only
    /// after the command returns, whatever its exit status.
    pub fn wrap_command(&self, command: &str) -> String {
        let trimmed = command.trim_end();
        let separator = if trimmed.ends_with(';') || trimmed.ends_with('&') {
            " "
        } else {
            "; "
        };
        format!("{trimmed}{separator}{}", self.end_echo())
    }
}

/// `echo 'AB''CD'` for token `ABCD`: the shell prints the token, but the typed
/// line never contains it contiguously, so only real output matches.
fn echo_split(token: &str) -> String {
    let mut mid = token.len() / 2;
    while mid > 0 && !token.is_char_boundary(mid) {
        mid -= 1;
    }
    let (head, tail) = token.split_at(mid);
    format!("echo {}{}", shell_quote(head), shell_quote(tail))
}
