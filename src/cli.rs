//! CLI argument parsing via clap.

use clap::{Args as ClapArgs, Parser, Subcommand};

use tmux_bridge::build_info;

/// Drive existing tmux sessions: send keys, read panes, run commands.
#[derive(Debug, Parser)]
#[command(name = "tmux-bridge", version, long_version = build_info::LONG_VERSION)]
pub struct Args {
    /// Path to config file (default: ./tmux-bridge.toml or
    /// ~/.config/tmux-bridge/config.toml).
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<String>,

    /// tmux server socket name (`tmux -L`).
    #[arg(short = 'L', long = "socket-name", global = true)]
    pub socket_name: Option<String>,

    /// Disable color output.
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run a command in a session and print its output.
    Run(RunOpts),
    /// Type text and/or a control key into a session.
    Send(SendOpts),
    /// Print the pane contents of a session.
    Read(ReadOpts),
    /// List running tmux sessions.
    List(ListOpts),
    /// Exit 0 if the session exists, 3 otherwise.
    Exists(ExistsOpts),
}

#[derive(Debug, ClapArgs)]
pub struct RunOpts {
    /// Target session (`session`, `session:window` or `session:window.pane`).
    pub session: String,

    /// Shell command to run.
    pub command: String,

    /// Seconds to wait for completion.
    #[arg(short = 't', long)]
    pub timeout: Option<f64>,

    /// Seconds between pane captures.
    #[arg(long = "poll-interval")]
    pub poll_interval: Option<f64>,

    /// Detect completion from the shell prompt instead of markers.
    #[arg(long = "no-markers")]
    pub no_markers: bool,

    /// Prompt regex used with --no-markers.
    #[arg(long = "prompt-pattern")]
    pub prompt_pattern: Option<String>,

    /// Print a JSON object instead of raw output.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, ClapArgs)]
#[command(group(
    clap::ArgGroup::new("input").required(true).multiple(true).args(["text", "ctrl"])
))]
pub struct SendOpts {
    pub session: String,

    /// Literal text to type.
    pub text: Option<String>,

    /// Type the text without pressing Enter.
    #[arg(long = "no-enter")]
    pub no_enter: bool,

    /// Control key sent before any text: a letter for Ctrl+letter (`C` is
    /// C-c), `[` for Escape, or a key name such as `Tab` or `C-d`.
    #[arg(long)]
    pub ctrl: Option<String>,
}

#[derive(Debug, ClapArgs)]
pub struct ReadOpts {
    pub session: String,

    /// Only print the last N lines.
    #[arg(short = 'n', long)]
    pub lines: Option<usize>,

    /// Include scrollback history.
    #[arg(long)]
    pub history: bool,
}

#[derive(Debug, ClapArgs)]
pub struct ListOpts {
    /// Print a JSON array.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, ClapArgs)]
pub struct ExistsOpts {
    pub session: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_parses_flags() {
        let args = Args::parse_from([
            "tmux-bridge",
            "run",
            "dev",
            "make test",
            "--timeout",
            "60",
            "--poll-interval",
            "0.5",
            "--no-markers",
            "--json",
        ]);
        match args.command {
            Command::Run(opts) => {
                assert_eq!(opts.session, "dev");
                assert_eq!(opts.command, "make test");
                assert_eq!(opts.timeout, Some(60.0));
                assert_eq!(opts.poll_interval, Some(0.5));
                assert!(opts.no_markers);
                assert!(opts.json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn send_requires_text_or_ctrl() {
        assert!(Args::try_parse_from(["tmux-bridge", "send", "dev"]).is_err());
        let args = Args::try_parse_from(["tmux-bridge", "send", "dev", "--ctrl", "C"]).unwrap();
        match args.command {
            Command::Send(opts) => {
                assert_eq!(opts.ctrl.as_deref(), Some("C"));
                assert!(opts.text.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn global_flags_work_after_subcommand() {
        let args = Args::parse_from(["tmux-bridge", "list", "--json", "--no-color", "-L", "ci"]);
        assert!(args.no_color);
        assert_eq!(args.socket_name.as_deref(), Some("ci"));
        assert!(matches!(args.command, Command::List(ListOpts { json: true })));
    }

    #[test]
    fn read_parses_line_count() {
        let args = Args::parse_from(["tmux-bridge", "read", "dev:1", "-n", "20", "--history"]);
        match args.command {
            Command::Read(opts) => {
                assert_eq!(opts.session, "dev:1");
                assert_eq!(opts.lines, Some(20));
                assert!(opts.history);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
