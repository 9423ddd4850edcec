//! Terminal escape-sequence stripping for captured pane text.

use regex::Regex;
use std::sync::OnceLock;

fn escape_sequence_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?x)
            \x1b
            (?:
                \[ [0-9;?<=>!]* [\x20-\x2f]* [\x40-\x7e]   # CSI
              | \] [^\x07\x1b]* (?:\x07|\x1b\\)            # OSC, BEL or ST terminated
              | [()*+] [A-Za-z0-9]                         # charset selection
              | [=>]                                       # keypad mode
              | \x23 [0-9]                                 # DEC line attributes
              | [78DEHMNOPZc]                              # single-byte controls
            )",
        )
        .expect("escape sequence pattern is valid")
    })
}

/// Remove ANSI/VT escape sequences, returning plain text.
///
/// Printable characters, newlines and their order are kept. Bare ESC bytes
/// left over from truncated sequences, BEL and carriage returns are dropped,
/// so the result never contains ESC and `strip(strip(x)) == strip(x)`.
pub fn strip(raw: &str) -> String {
    let without_sequences = escape_sequence_re().replace_all(raw, "");
    without_sequences
        .chars()
        .filter(|c| !matches!(c, '\x1b' | '\x07' | '\r'))
        .collect()
}
