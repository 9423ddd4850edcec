//! On-demand tests against a real tmux server.
//!
//! Ignored by default because they need `tmux` on PATH. Run with
//! `cargo test --test live_tmux_regression -- --ignored`.

mod live_tmux;

use std::time::Duration;

use live_tmux::TmuxHarness;
use tmux_bridge::bridge::{BridgeSettings, ExecuteOptions, TmuxBridge};
use tmux_bridge::error::{BridgeError, WaitPhase};
use tmux_bridge::tmux::{ControlKey, PaneTransport, SessionTarget, TmuxTransport};

fn bridge_for(harness: &TmuxHarness) -> TmuxBridge {
    let transport = TmuxTransport::default().with_socket_name(harness.socket_name.clone());
    let settings = BridgeSettings {
        timeout: Duration::from_secs(10),
        poll_interval: Duration::from_millis(100),
        ..BridgeSettings::default()
    };
    TmuxBridge::new(transport, settings)
}

#[tokio::test]
#[ignore = "requires tmux"]
async fn marker_run_returns_exact_command_output() {
    let harness = TmuxHarness::start("markers").expect("harness");
    let bridge = bridge_for(&harness);

    let output = bridge
        .execute_and_wait(
            &harness.session_name,
            "printf 'alpha\\nbeta\\n'",
            &ExecuteOptions::default(),
        )
        .await
        .expect("run");
    assert_eq!(output, "alpha\nbeta");

    // A failing command still completes; its stderr lands in the pane.
    let output = bridge
        .execute_and_wait(
            &harness.session_name,
            "ls /definitely-not-here 2>&1",
            &ExecuteOptions::default(),
        )
        .await
        .expect("run failing command");
    assert!(output.contains("definitely-not-here"), "got: {output}");
}

#[tokio::test]
#[ignore = "requires tmux"]
async fn prompt_fallback_returns_output() {
    let harness = TmuxHarness::start("prompt").expect("harness");
    let bridge = bridge_for(&harness);
    let options = ExecuteOptions {
        use_markers: Some(false),
        ..ExecuteOptions::default()
    };

    let output = bridge
        .execute_and_wait(&harness.session_name, "echo hi", &options)
        .await
        .expect("run");
    assert_eq!(output, "hi");
}

#[tokio::test]
#[ignore = "requires tmux"]
async fn slow_command_times_out_and_keeps_running() {
    let harness = TmuxHarness::start("timeout").expect("harness");
    let bridge = bridge_for(&harness);
    let options = ExecuteOptions {
        timeout: Some(Duration::from_secs(1)),
        ..ExecuteOptions::default()
    };

    let err = bridge
        .execute_and_wait(&harness.session_name, "sleep 30", &options)
        .await
        .unwrap_err();
    match err {
        BridgeError::CommandTimeout { phase, .. } => assert_eq!(phase, WaitPhase::EndMarker),
        other => panic!("expected timeout, got {other}"),
    }

    bridge
        .send_control_key(&harness.session_name, ControlKey::Ctrl('c'))
        .await
        .expect("interrupt");
}

#[tokio::test]
#[ignore = "requires tmux"]
async fn send_then_read_shows_typed_text() {
    let harness = TmuxHarness::start("send").expect("harness");
    let bridge = bridge_for(&harness);

    bridge
        .send_keys(&harness.session_name, "echo typed-by-bridge", true)
        .await
        .expect("send");
    harness
        .wait_for_contains("\ntyped-by-bridge", Duration::from_secs(5))
        .expect("echo output");

    let tail = bridge
        .read_buffer(&harness.session_name, Some(50), false)
        .await
        .expect("read");
    assert!(tail.contains("typed-by-bridge"), "got: {tail}");
}

#[tokio::test]
#[ignore = "requires tmux"]
async fn session_queries_match_the_server() {
    let harness = TmuxHarness::start("sessions").expect("harness");
    let bridge = bridge_for(&harness);

    let sessions = bridge.list_sessions().await.expect("list");
    assert_eq!(sessions, vec![harness.session_name.clone()]);
    assert!(bridge.session_exists(&harness.session_name).await.expect("exists"));
    assert!(!bridge.session_exists("nosuchsession").await.expect("exists"));

    let present = SessionTarget::new(harness.session_name.clone()).expect("target");
    assert!(bridge.transport().has_session(&present).await.expect("has-session"));
    let missing = SessionTarget::new("nosuchsession").expect("target");
    assert!(!bridge.transport().has_session(&missing).await.expect("has-session"));

    let err = bridge
        .execute_and_wait("nosuchsession", "ls", &ExecuteOptions::default())
        .await
        .unwrap_err();
    assert_eq!(err.exit_code(), 3);
}
