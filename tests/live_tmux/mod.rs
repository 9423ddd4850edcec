//! Harness for the on-demand live tmux tests.
//!
//! Each harness owns a private tmux server (`tmux -L <socket>`) running one
//! detached session with a plain `sh` and a `$ ` prompt, and kills that server
//! on drop.

use std::process::Command;
use std::thread;
use std::time::{Duration, Instant};

pub type HarnessResult<T> = Result<T, String>;

pub struct TmuxHarness {
    pub socket_name: String,
    pub session_name: String,
}

impl TmuxHarness {
    /// Start a private server with one session and wait for its prompt.
    pub fn start(label: &str) -> HarnessResult<Self> {
        command_exists("tmux")?;
        let pid = std::process::id();
        let harness = Self {
            socket_name: format!("tmux-bridge-test-{label}-{pid}"),
            session_name: format!("bridge-{label}"),
        };
        harness.tmux([
            "new-session",
            "-d",
            "-s",
            harness.session_name.as_str(),
            "-x",
            "200",
            "-y",
            "50",
            "env PS1='$ ' sh",
        ])?;
        harness.wait_for_contains("$ ", Duration::from_secs(5))?;
        Ok(harness)
    }

    /// Plain capture straight from tmux, bypassing the crate under test.
    pub fn capture(&self) -> HarnessResult<String> {
        self.tmux(["capture-pane", "-p", "-J", "-t", self.session_name.as_str()])
    }

    pub fn wait_for_contains(&self, needle: &str, timeout: Duration) -> HarnessResult<String> {
        let deadline = Instant::now() + timeout;
        let mut latest = String::new();
        while Instant::now() < deadline {
            latest = self.capture()?;
            if latest.contains(needle) {
                return Ok(latest);
            }
            thread::sleep(Duration::from_millis(100));
        }
        Err(format!(
            "timed out waiting for pane to contain `{needle}` after {timeout:?}; latest:\n{latest}"
        ))
    }

    fn tmux<I, S>(&self, args: I) -> HarnessResult<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut collected = vec!["-L".to_string(), self.socket_name.clone()];
        collected.extend(args.into_iter().map(|value| value.as_ref().to_string()));
        let output = Command::new("tmux")
            .args(&collected)
            .output()
            .map_err(|e| format!("failed to run tmux {collected:?}: {e}"))?;
        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).to_string())
        } else {
            Err(format!(
                "tmux {collected:?} failed: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            ))
        }
    }
}

impl Drop for TmuxHarness {
    fn drop(&mut self) {
        let _ = self.tmux(["kill-server"]);
    }
}

fn command_exists(name: &str) -> HarnessResult<()> {
    let output = Command::new("sh")
        .arg("-c")
        .arg(format!("command -v {name} >/dev/null 2>&1"))
        .output()
        .map_err(|e| format!("failed running command lookup for `{name}`: {e}"))?;
    if output.status.success() {
        Ok(())
    } else {
        Err(format!("required command `{name}` not found in PATH"))
    }
}
