//! CLI command definitions for the `parley` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod chats;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Chat session proxy in front of the Gemini API.
#[derive(Parser)]
#[command(name = "parley", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for debug, -vv for trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Data directory holding config.toml, history.json and model_config.txt.
    #[arg(long, global = true, env = "PARLEY_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server.
    Serve {
        /// Address to bind (defaults to [server] host in config.toml).
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (defaults to [server] port in config.toml).
        #[arg(long, short)]
        port: Option<u16>,

        /// Export tracing spans to stdout via OpenTelemetry.
        #[arg(long)]
        otel: bool,
    },

    /// List stored chats, most recent first.
    #[command(alias = "ls")]
    List,

    /// Show the history of a stored chat.
    Show {
        /// Session id of the chat.
        session_id: String,
    },

    /// Delete stored chats from the history file.
    ///
    /// Offline only: stop `parley serve` first, or its shutdown save will
    /// restore the deleted chats. Use the HTTP delete_chats endpoint while
    /// the server is running.
    #[command(alias = "rm")]
    Delete {
        /// Session ids to delete.
        #[arg(required = true)]
        session_ids: Vec<String>,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

impl Cli {
    /// Default log filter for the chosen verbosity. `RUST_LOG` takes precedence.
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 if self.quiet => "error",
            0 => "info",
            1 => "info,parley_core=debug,parley_infra=debug,parley_api=debug",
            _ => "trace",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_serve_flags() {
        let cli = Cli::parse_from(["parley", "serve", "--port", "8080", "--otel", "-v"]);
        match cli.command {
            Commands::Serve { host, port, otel } => {
                assert!(host.is_none());
                assert_eq!(port, Some(8080));
                assert!(otel);
            }
            _ => panic!("expected serve"),
        }
        assert_eq!(cli.verbose, 1);
    }

    #[test]
    fn test_delete_requires_ids() {
        assert!(Cli::try_parse_from(["parley", "delete"]).is_err());
        let cli = Cli::try_parse_from(["parley", "rm", "a", "b"]).unwrap();
        assert!(matches!(cli.command, Commands::Delete { session_ids } if session_ids.len() == 2));
    }

    #[test]
    fn test_delete_help_warns_it_is_offline_only() {
        let cmd = Cli::command();
        let delete = cmd.find_subcommand("delete").unwrap();
        let help = delete.get_long_about().unwrap().to_string();
        assert!(help.contains("Offline only"));
        assert!(help.contains("parley serve"));
    }

    #[test]
    fn test_log_filter_levels() {
        let quiet = Cli::parse_from(["parley", "--quiet", "list"]);
        assert_eq!(quiet.log_filter(), "error");
        let trace = Cli::parse_from(["parley", "-vv", "list"]);
        assert_eq!(trace.log_filter(), "trace");
    }
}
