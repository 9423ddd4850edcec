//! Shared tmux data structures: targets, keystrokes and capture ranges.

use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// A tmux destination: `session`, `session:window` or `session:window.pane`.
///
/// Only non-emptiness is enforced here; whether the target resolves is
/// answered by the session directory.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct SessionTarget(String);

impl SessionTarget {
    pub fn new(raw: impl Into<String>) -> Result<Self, ConfigError> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ConfigError::Invalid(
                "tmux session target cannot be empty".into(),
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Full target string as passed to `tmux -t`.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Session portion of the target (text before the first `:`).
    pub fn session_name(&self) -> &str {
        self.0.split(':').next().unwrap_or(&self.0)
    }
}

impl fmt::Display for SessionTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for SessionTarget {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Named (non-literal) key understood by `tmux send-keys`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ControlKey {
    Enter,
    Escape,
    Tab,
    Backspace,
    Space,
    Up,
    Down,
    Left,
    Right,
    /// `Ctrl` chord with a lowercase ASCII letter (`C-c`, `C-z`, ...).
    Ctrl(char),
}

impl ControlKey {
    /// Key name as tmux expects it on the `send-keys` command line.
    pub fn tmux_name(&self) -> String {
        match self {
            Self::Enter => "Enter".into(),
            Self::Escape => "Escape".into(),
            Self::Tab => "Tab".into(),
            Self::Backspace => "BSpace".into(),
            Self::Space => "Space".into(),
            Self::Up => "Up".into(),
            Self::Down => "Down".into(),
            Self::Left => "Left".into(),
            Self::Right => "Right".into(),
            Self::Ctrl(c) => format!("C-{c}"),
        }
    }

    /// Parse the `--ctrl KEY` shorthand: a letter (`C`, `z`) or `[` for Escape.
    pub fn from_ctrl_shorthand(raw: &str) -> Result<Self, ConfigError> {
        let trimmed = raw.trim();
        let mut chars = trimmed.chars();
        match (chars.next(), chars.next()) {
            (Some('['), None) => Ok(Self::Escape),
            (Some(c), None) if c.is_ascii_alphabetic() => Ok(Self::Ctrl(c.to_ascii_lowercase())),
            _ => Err(ConfigError::Invalid(format!("unknown ctrl key: {raw:?}"))),
        }
    }
}

impl fmt::Display for ControlKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tmux_name())
    }
}

impl FromStr for ControlKey {
    type Err = ConfigError;

    /// Parse a tmux key name (`Enter`, `Escape`, `C-c`, ...), case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        let key = match lower.as_str() {
            "enter" => Self::Enter,
            "escape" | "esc" => Self::Escape,
            "tab" => Self::Tab,
            "bspace" | "backspace" => Self::Backspace,
            "space" => Self::Space,
            "up" => Self::Up,
            "down" => Self::Down,
            "left" => Self::Left,
            "right" => Self::Right,
            other => {
                let letter = other
                    .strip_prefix("c-")
                    .filter(|rest| rest.len() == 1)
                    .and_then(|rest| rest.chars().next())
                    .filter(char::is_ascii_alphabetic);
                match letter {
                    Some(c) => Self::Ctrl(c),
                    None => {
                        return Err(ConfigError::Invalid(format!("unknown tmux key name: {s:?}")))
                    }
                }
            }
        };
        Ok(key)
    }
}

/// One keystroke injection against a pane.
///
/// Literal text and named keys are separate variants so text such as `Enter`
/// or `C-c` is never reinterpreted as a key name.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Keystroke {
    /// Type the text verbatim (`send-keys -l`).
    Literal(String),
    /// Type the text verbatim, then press Enter, in a single tmux invocation.
    Line(String),
    /// Press one named key.
    Key(ControlKey),
}

/// How much of the pane a capture should return.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum CaptureRange {
    /// Only the visible pane.
    #[default]
    Visible,
    /// Full scrollback history plus the visible pane.
    WithHistory,
}
