//! CLI entry point for tmux-bridge.
//!
//! Exit codes: 0 success, 1 transport/config error, 2 command timeout,
//! 3 session not found.

mod cli;

use clap::Parser;
use serde_json::json;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use tmux_bridge::bridge::{ExecuteOptions, TmuxBridge};
use tmux_bridge::build_info;
use tmux_bridge::config::{load_config_with_diagnostics, secs_to_duration};
use tmux_bridge::error::{BridgeError, ConfigError};
use tmux_bridge::render::Renderer;
use tmux_bridge::tmux::ControlKey;

/// Log filter directive variable; defaults to `warn`.
const LOG_ENV: &str = "TMUX_BRIDGE_LOG";

const EXIT_OK: i32 = 0;
const EXIT_FAILURE: i32 = 1;
const EXIT_NOT_FOUND: i32 = 3;

#[tokio::main]
async fn main() {
    init_tracing();
    let args = cli::Args::parse();
    let code = run(args).await;
    std::process::exit(code);
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(args: cli::Args) -> i32 {
    let loaded = match load_config_with_diagnostics(args.config.as_deref()) {
        Ok(loaded) => loaded,
        Err(e) => {
            Renderer::new(!args.no_color).error(&e.to_string());
            return EXIT_FAILURE;
        }
    };
    debug!(
        version = %build_info::version_line(),
        source = ?loaded.source,
        "configuration loaded"
    );

    let mut config = loaded.config;
    if args.no_color {
        config.display.color = false;
    }
    if let Some(name) = &args.socket_name {
        config.override_socket_name(name.clone());
    }
    let renderer = Renderer::new(config.display.color);
    // Re-checked after CLI overrides; `-L` settles the socket conflict.
    for warning in &config.diagnostics().warnings {
        renderer.warn(warning);
    }

    let bridge = match TmuxBridge::from_config(&config) {
        Ok(bridge) => bridge,
        Err(e) => {
            renderer.error(&e.to_string());
            return EXIT_FAILURE;
        }
    };

    match dispatch(&bridge, args.command, &renderer).await {
        Ok(code) => code,
        Err(err) => {
            report(&renderer, &err);
            err.exit_code()
        }
    }
}

async fn dispatch(
    bridge: &TmuxBridge,
    command: cli::Command,
    renderer: &Renderer,
) -> Result<i32, BridgeError> {
    match command {
        cli::Command::Run(opts) => {
            let options = ExecuteOptions {
                timeout: opts
                    .timeout
                    .map(|secs| secs_to_duration("--timeout", secs))
                    .transpose()?,
                poll_interval: opts
                    .poll_interval
                    .map(|secs| secs_to_duration("--poll-interval", secs))
                    .transpose()?,
                use_markers: opts.no_markers.then_some(false),
                prompt_pattern: opts.prompt_pattern.clone(),
            };
            let output = bridge
                .execute_and_wait(&opts.session, &opts.command, &options)
                .await?;
            if opts.json {
                let body = json!({
                    "session": opts.session,
                    "command": opts.command,
                    "output": output,
                });
                println!("{body}");
            } else if !output.is_empty() {
                println!("{output}");
            }
            Ok(EXIT_OK)
        }
        cli::Command::Send(opts) => {
            if let Some(raw) = &opts.ctrl {
                bridge
                    .send_control_key(&opts.session, parse_ctrl_key(raw)?)
                    .await?;
            }
            if let Some(text) = &opts.text {
                bridge.send_keys(&opts.session, text, !opts.no_enter).await?;
            }
            Ok(EXIT_OK)
        }
        cli::Command::Read(opts) => {
            let text = bridge
                .read_buffer(&opts.session, opts.lines, opts.history)
                .await?;
            println!("{}", text.trim_end_matches('\n'));
            Ok(EXIT_OK)
        }
        cli::Command::List(opts) => {
            let sessions = bridge.list_sessions().await?;
            if sessions.is_empty() {
                renderer.error("no tmux sessions running");
                renderer.hint("start one with `tmux new -s NAME`");
                return Ok(EXIT_FAILURE);
            }
            if opts.json {
                println!("{}", json!(sessions));
            } else {
                for name in &sessions {
                    println!("{name}");
                }
            }
            Ok(EXIT_OK)
        }
        cli::Command::Exists(opts) => {
            if bridge.session_exists(&opts.session).await? {
                Ok(EXIT_OK)
            } else {
                Ok(EXIT_NOT_FOUND)
            }
        }
    }
}

/// `--ctrl` value: one-letter shorthand (`C`, `[`) or a tmux key name.
fn parse_ctrl_key(raw: &str) -> Result<ControlKey, ConfigError> {
    ControlKey::from_ctrl_shorthand(raw).or_else(|_| raw.parse())
}

fn report(renderer: &Renderer, err: &BridgeError) {
    match err {
        BridgeError::CommandTimeout { .. } => {
            renderer.timeout(&err.to_string());
            renderer.hint("the command may still be running; inspect it with `tmux-bridge read SESSION`");
        }
        BridgeError::SessionNotFound { .. } => {
            renderer.error(&err.to_string());
            renderer.hint("see `tmux-bridge list` for running sessions");
        }
        BridgeError::Transport(_) | BridgeError::Config(_) => renderer.error(&err.to_string()),
    }
}
