//! Shared test fixtures: a scripted pane transport and temp dirs.
//!
//! `ScriptedTransport` stands in for a tmux server. It either replays queued
//! captures (the last one repeats once the queue drains) or renders a tiny
//! fake shell that echoes typed lines and prints scripted output.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::TransportError;
use crate::tmux::transport::PaneTransport;
use crate::tmux::types::{CaptureRange, ControlKey, Keystroke, SessionTarget};

static TEST_DIR_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Temporary directory fixture with best-effort cleanup.
#[derive(Debug)]
pub struct TestTempDir {
    path: PathBuf,
}

impl TestTempDir {
    pub fn new(prefix: &str) -> Self {
        let suffix = TEST_DIR_COUNTER.fetch_add(1, Ordering::Relaxed);
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis();
        let dir = std::env::temp_dir().join(format!("tmux-bridge-{prefix}-{millis}-{suffix}"));
        fs::create_dir_all(&dir).expect("failed to create temporary fixture directory");
        Self { path: dir }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write UTF-8 text to a child path, creating parent directories as needed.
    pub fn write_text(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.path.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("failed to create parent directories for fixture");
        }
        fs::write(&path, content).expect("failed to write fixture file");
        path
    }
}

impl Drop for TestTempDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

#[derive(Default)]
struct ScriptState {
    sessions: Vec<String>,
    captures: VecDeque<String>,
    shell: Option<FakeShell>,
    capture_error: Option<String>,
    listing_error: Option<String>,
    sends: Vec<(SessionTarget, Keystroke)>,
    capture_ranges: Vec<CaptureRange>,
}

/// Minimal line-oriented shell: echoes each typed line, runs `echo` and
/// scripted commands split on `; `, then redraws the prompt.
struct FakeShell {
    prompt: String,
    screen: String,
    responses: HashMap<String, String>,
}

impl FakeShell {
    fn new(prompt: &str) -> Self {
        Self {
            prompt: prompt.to_string(),
            screen: prompt.to_string(),
            responses: HashMap::new(),
        }
    }

    fn type_text(&mut self, text: &str) {
        self.screen.push_str(text);
    }

    fn press_enter(&mut self) {
        let line = self
            .screen
            .rsplit('\n')
            .next()
            .and_then(|last| last.strip_prefix(self.prompt.as_str()))
            .unwrap_or("")
            .to_string();
        self.screen.push('\n');
        for segment in line.split("; ") {
            let segment = segment.trim();
            if segment.is_empty() {
                continue;
            }
            let output = match segment.strip_prefix("echo ") {
                Some(args) => format!("{}\n", args.replace('\'', "")),
                None => self.responses.get(segment).cloned().unwrap_or_default(),
            };
            self.screen.push_str(&output);
        }
        self.screen.push_str(&self.prompt);
    }
}

/// In-memory [`PaneTransport`] for unit tests.
#[derive(Default)]
pub struct ScriptedTransport {
    state: Mutex<ScriptState>,
}

impl ScriptedTransport {
    pub fn with_sessions(sessions: &[&str]) -> Self {
        let transport = Self::default();
        transport.lock().sessions = sessions.iter().map(|s| s.to_string()).collect();
        transport
    }

    /// Transport whose pane renders a fake shell with the given prompt.
    pub fn with_fake_shell(sessions: &[&str], prompt: &str) -> Self {
        let transport = Self::with_sessions(sessions);
        transport.lock().shell = Some(FakeShell::new(prompt));
        transport
    }

    /// Scripted output the fake shell prints for `command`.
    pub fn respond(&self, command: &str, output: &str) {
        if let Some(shell) = self.lock().shell.as_mut() {
            shell.responses.insert(command.to_string(), output.to_string());
        }
    }

    pub fn push_capture(&self, text: &str) {
        self.lock().captures.push_back(text.to_string());
    }

    pub fn fail_captures_with(&self, diagnostic: &str) {
        self.lock().capture_error = Some(diagnostic.to_string());
    }

    pub fn fail_listing_with(&self, diagnostic: &str) {
        self.lock().listing_error = Some(diagnostic.to_string());
    }

    pub fn send_count(&self) -> usize {
        self.lock().sends.len()
    }

    pub fn sent_keys(&self) -> Vec<Keystroke> {
        self.lock().sends.iter().map(|(_, keys)| keys.clone()).collect()
    }

    pub fn sent_targets(&self) -> Vec<String> {
        self.lock()
            .sends
            .iter()
            .map(|(target, _)| target.to_string())
            .collect()
    }

    pub fn capture_ranges(&self) -> Vec<CaptureRange> {
        self.lock().capture_ranges.clone()
    }

    pub fn capture_count(&self) -> usize {
        self.lock().capture_ranges.len()
    }

    fn lock(&self) -> MutexGuard<'_, ScriptState> {
        self.state.lock().expect("scripted transport state poisoned")
    }
}

#[async_trait]
impl PaneTransport for ScriptedTransport {
    async fn send_keys(
        &self,
        target: &SessionTarget,
        keys: &Keystroke,
    ) -> Result<(), TransportError> {
        let mut state = self.lock();
        state.sends.push((target.clone(), keys.clone()));
        if let Some(shell) = state.shell.as_mut() {
            match keys {
                Keystroke::Literal(text) => shell.type_text(text),
                Keystroke::Line(text) => {
                    shell.type_text(text);
                    shell.press_enter();
                }
                Keystroke::Key(ControlKey::Enter) => shell.press_enter(),
                Keystroke::Key(_) => {}
            }
        }
        Ok(())
    }

    async fn capture_pane(
        &self,
        _target: &SessionTarget,
        range: CaptureRange,
    ) -> Result<String, TransportError> {
        let mut state = self.lock();
        state.capture_ranges.push(range);
        if let Some(diagnostic) = &state.capture_error {
            return Err(TransportError::new(
                "tmux capture-pane",
                Some(1),
                diagnostic.clone(),
            ));
        }
        if let Some(shell) = &state.shell {
            return Ok(shell.screen.clone());
        }
        if state.captures.len() > 1 {
            return Ok(state.captures.pop_front().unwrap_or_default());
        }
        Ok(state.captures.front().cloned().unwrap_or_default())
    }

    async fn list_sessions(&self) -> Result<Vec<String>, TransportError> {
        let state = self.lock();
        if let Some(diagnostic) = &state.listing_error {
            return Err(TransportError::new(
                "tmux list-sessions",
                Some(1),
                diagnostic.clone(),
            ));
        }
        Ok(state.sessions.clone())
    }

    async fn has_session(&self, target: &SessionTarget) -> Result<bool, TransportError> {
        let state = self.lock();
        Ok(state.sessions.iter().any(|s| s == target.session_name()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn queued_captures_replay_in_order_and_last_repeats() {
        let transport = ScriptedTransport::with_sessions(&["dev"]);
        transport.push_capture("one");
        transport.push_capture("two");
        let target = SessionTarget::new("dev").unwrap();
        for expected in ["one", "two", "two"] {
            let text = transport
                .capture_pane(&target, CaptureRange::Visible)
                .await
                .unwrap();
            assert_eq!(text, expected);
        }
    }

    #[tokio::test]
    async fn fake_shell_echoes_lines_and_runs_scripted_commands() {
        let transport = ScriptedTransport::with_fake_shell(&["dev"], "$ ");
        transport.respond("whoami", "dev\n");
        let target = SessionTarget::new("dev").unwrap();
        transport
            .send_keys(&target, &Keystroke::Line("whoami; echo 'A''B'".into()))
            .await
            .unwrap();
        let screen = transport
            .capture_pane(&target, CaptureRange::WithHistory)
            .await
            .unwrap();
        assert_eq!(screen, "$ whoami; echo 'A''B'\ndev\nAB\n$ ");
    }

    #[test]
    fn temp_dir_fixture_writes_files() {
        let fixture = TestTempDir::new("fixture");
        let file = fixture.write_text("nested/file.txt", "hello");
        assert_eq!(fs::read_to_string(file).unwrap(), "hello");
    }
}
