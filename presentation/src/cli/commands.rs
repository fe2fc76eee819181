//! CLI command definitions

use clap::{Args, Parser, Subcommand};
use poker_domain::{AgreementMode, OutputFormat};
use std::path::PathBuf;

/// CLI arguments for planning-poker
#[derive(Parser, Debug)]
#[command(name = "planning-poker")]
#[command(author, version, about = "Planning poker sessions over HTTP")]
#[command(long_about = r#"
Planning Poker hosts estimation sessions: a team joins a session by its
six-digit code, votes on each story with a card from the deck, and the
session closes stories according to its agreement mode.

Commands:
  serve      Run the HTTP server
  simulate   Run scripted participants through a whole session
  deck       Print the card deck

Configuration files are loaded from (in priority order):
1. POKER_* environment variables (POKER_SERVER__BIND, ...)
2. --config <path>     Explicit config file
3. ./poker.toml        Project-level config
4. ~/.config/planning-poker/config.toml   Global config

Example:
  planning-poker serve --bind 0.0.0.0:8080
  planning-poker simulate --participants 5 --mode average
  planning-poker simulate --server http://127.0.0.1:8080 --stories backlog.json
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP server
    Serve(ServeArgs),
    /// Run scripted participants through one session and print the results
    Simulate(SimulateArgs),
    /// Print the card deck
    Deck {
        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Address to listen on (overrides [server].bind)
    #[arg(short, long, value_name = "ADDR")]
    pub bind: Option<String>,
}

#[derive(Args, Debug)]
pub struct SimulateArgs {
    /// Number of simulated participants
    #[arg(short, long, default_value_t = 3, value_parser = clap::value_parser!(u16).range(1..=50))]
    pub participants: u16,

    /// JSON story list (array of stories, array of titles, or keyed object)
    #[arg(short, long, value_name = "FILE")]
    pub stories: Option<PathBuf>,

    /// Session title
    #[arg(short, long, default_value = "Simulated sprint")]
    pub title: String,

    /// Agreement mode (defaults to [session].default_mode)
    #[arg(short, long)]
    pub mode: Option<AgreementMode>,

    /// Run against a remote server instead of in-process
    #[arg(long, value_name = "URL")]
    pub server: Option<String>,

    /// Poll interval in milliseconds (overrides [polling].interval_ms)
    #[arg(long, value_name = "MS", value_parser = clap::value_parser!(u64).range(1..))]
    pub interval_ms: Option<u64>,

    /// Give up after this many polls per participant
    #[arg(long, default_value_t = 1000)]
    pub max_polls: usize,

    /// Output format: text or json
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_simulate() {
        let cli = Cli::parse_from([
            "planning-poker",
            "-vv",
            "simulate",
            "--participants",
            "4",
            "--mode",
            "average",
            "--format",
            "json",
        ]);

        assert_eq!(cli.verbose, 2);
        let Some(Command::Simulate(args)) = cli.command else {
            panic!("expected simulate");
        };
        assert_eq!(args.participants, 4);
        assert_eq!(args.mode, Some(AgreementMode::Average));
        assert_eq!(args.format, OutputFormat::Json);
        assert!(args.server.is_none());
    }

    #[test]
    fn test_parse_serve_with_global_config() {
        let cli = Cli::parse_from(["planning-poker", "serve", "--bind", "0.0.0.0:9000", "--no-config"]);

        assert!(cli.no_config);
        let Some(Command::Serve(args)) = cli.command else {
            panic!("expected serve");
        };
        assert_eq!(args.bind.as_deref(), Some("0.0.0.0:9000"));
    }

    #[test]
    fn test_rejects_unknown_mode_and_zero_participants() {
        assert!(Cli::try_parse_from(["planning-poker", "simulate", "--mode", "vibes"]).is_err());
        assert!(Cli::try_parse_from(["planning-poker", "simulate", "-p", "0"]).is_err());
    }

    #[test]
    fn test_rejects_zero_interval() {
        assert!(
            Cli::try_parse_from(["planning-poker", "simulate", "--interval-ms", "0"]).is_err()
        );
        assert!(Cli::try_parse_from(["planning-poker", "simulate", "--interval-ms", "1"]).is_ok());
    }
}
