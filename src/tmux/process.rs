//! Process execution helpers for tmux invocations.

use std::process::Stdio;
use tokio::process::Command;
use tokio::time::{timeout, Duration};

use crate::error::TransportError;

/// Structured output of one finished process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ProcessOutput {
    pub(crate) exit_code: i32,
    pub(crate) stdout: String,
    pub(crate) stderr: String,
}

/// Spawn `program args...`, wait up to `limit`, and collect its output.
///
/// A missing binary, IO failure or elapsed limit becomes a `TransportError`
/// without an exit code. Nonzero exits are returned as-is; see
/// [`ensure_success`].
pub(crate) async fn run_process(
    program: &str,
    args: &[String],
    limit: Duration,
) -> Result<ProcessOutput, TransportError> {
    let rendered = render_command_line(program, args);
    let mut cmd = Command::new(program);
    // The caller's future may be dropped on timeout; never leak the child.
    cmd.kill_on_drop(true);
    cmd.args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    let child = cmd.spawn().map_err(|e| {
        let diagnostic = if e.kind() == std::io::ErrorKind::NotFound {
            format!("{program} is not installed or not in PATH")
        } else {
            format!("{program}: {e}")
        };
        TransportError::new(rendered.clone(), None, diagnostic)
    })?;

    let output = match timeout(limit, child.wait_with_output()).await {
        Ok(result) => result.map_err(|e| {
            TransportError::new(rendered.clone(), None, format!("{program}: {e}"))
        })?,
        Err(_) => {
            return Err(TransportError::new(
                rendered,
                None,
                format!("process timed out after {}", format_duration(limit)),
            ))
        }
    };

    Ok(ProcessOutput {
        exit_code: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    })
}

/// Convert a nonzero exit status into a contextual transport error.
pub(crate) fn ensure_success(
    output: ProcessOutput,
    command: &str,
) -> Result<ProcessOutput, TransportError> {
    if output.exit_code == 0 {
        return Ok(output);
    }

    let mut details = if output.stderr.trim().is_empty() {
        output.stdout.trim().to_string()
    } else {
        output.stderr.trim().to_string()
    };
    if details.is_empty() {
        details = format!("command exited with {}", output.exit_code);
    }

    Err(TransportError::new(command, Some(output.exit_code), details))
}

/// Render a program invocation for diagnostics (`tmux send-keys -t 'dev' ...`).
pub(crate) fn render_command_line(program: &str, args: &[String]) -> String {
    let mut line = program.to_string();
    for arg in args {
        line.push(' ');
        if !arg.is_empty()
            && arg
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || "-_./:%#{}=@,".contains(c))
        {
            line.push_str(arg);
        } else {
            line.push_str(&shell_quote(arg));
        }
    }
    line
}

/// Human-oriented duration formatting used in error messages.
pub(crate) fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    let millis = duration.subsec_millis();
    if secs == 0 {
        return format!("{millis}ms");
    }
    if millis == 0 {
        if secs % 3600 == 0 {
            return format!("{}h", secs / 3600);
        }
        if secs % 60 == 0 {
            return format!("{}m", secs / 60);
        }
        return format!("{secs}s");
    }
    format!("{secs}.{millis:03}s")
}

/// Shell-safe single-quote escaping.
pub(crate) fn shell_quote(s: &str) -> String {
    if s.is_empty() {
        "''".into()
    } else {
        format!("'{}'", s.replace('\'', "'\\''"))
    }
}
