//! Stderr status renderer for the CLI.
//!
//! stdout carries only command output and listings; every diagnostic goes to
//! stderr through this renderer.

use crossterm::style::{Color, StyledContent, Stylize};

const LABEL_WARNING: &str = "warning:";
const LABEL_ERROR: &str = "error:";
const LABEL_TIMEOUT: &str = "timeout:";
const LABEL_HINT: &str = "hint:";

const COLOR_WARNING: Color = Color::Yellow;
const COLOR_ERROR: Color = Color::Red;
const COLOR_TIMEOUT: Color = Color::Magenta;
const COLOR_HINT: Color = Color::DarkGrey;

/// Terminal renderer with optional ANSI styling.
#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    color: bool,
}

impl Renderer {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    pub fn warn(&self, msg: &str) {
        eprintln!("{}", self.line(LABEL_WARNING, COLOR_WARNING, msg));
    }

    pub fn error(&self, msg: &str) {
        eprintln!("{}", self.line(LABEL_ERROR, COLOR_ERROR, msg));
    }

    /// A command-timeout report; the pane may still be running it.
    pub fn timeout(&self, msg: &str) {
        eprintln!("{}", self.line(LABEL_TIMEOUT, COLOR_TIMEOUT, msg));
    }

    pub fn hint(&self, msg: &str) {
        eprintln!("{}", self.line(LABEL_HINT, COLOR_HINT, msg));
    }

    fn line(&self, label: &str, color: Color, msg: &str) -> String {
        if self.color {
            format!("{} {msg}", styled_label(label, color))
        } else {
            format!("{label} {msg}")
        }
    }
}

fn styled_label(label: &str, color: Color) -> StyledContent<&str> {
    label.with(color).bold()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_lines_have_no_escape_sequences() {
        let r = Renderer::new(false);
        assert_eq!(
            r.line(LABEL_ERROR, COLOR_ERROR, "tmux is not installed"),
            "error: tmux is not installed"
        );
    }

    #[test]
    fn colored_lines_style_only_the_label() {
        let r = Renderer::new(true);
        let line = r.line(LABEL_WARNING, COLOR_WARNING, "both sockets set");
        assert!(line.contains("warning:"));
        assert!(line.ends_with(" both sockets set"));
    }
}
