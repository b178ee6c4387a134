//! Command-line interface for evault.
//!
//! This module provides the CLI structure for the `evault` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    BrowseCommand, ConfigCommand, ExportCommand, ImportCommand, ListCommand, OpenCommand,
    OutputFormat, SearchCommand, StatusCommand,
};

/// evault - Browse and search legal-case documents
///
/// Loads a collection of case records once from the configured document
/// database and lets you search them by case name, lawyer or judge.
#[derive(Debug, Parser)]
#[command(name = "evault")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show every document in the collection
    List(ListCommand),

    /// Show documents matching a query
    Search(SearchCommand),

    /// Search interactively, one query per line
    Browse(BrowseCommand),

    /// Open the document of a case
    Open(OpenCommand),

    /// Write the document grid as an HTML page
    Export(ExportCommand),

    /// Load documents from a JSON file into the local database
    Import(ImportCommand),

    /// Show source and load status
    Status(StatusCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn cli(verbose: u8, quiet: bool) -> Cli {
        Cli {
            config: None,
            verbose,
            quiet,
            command: Command::Status(StatusCommand { json: false }),
        }
    }

    #[test]
    fn test_cli_name() {
        assert_eq!(Cli::command().get_name(), "evault");
    }

    #[test]
    fn test_cli_verify() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbosity() {
        use crate::logging::Verbosity;

        assert_eq!(cli(0, true).verbosity(), Verbosity::Quiet);
        assert_eq!(cli(3, true).verbosity(), Verbosity::Quiet);
        assert_eq!(cli(0, false).verbosity(), Verbosity::Normal);
        assert_eq!(cli(1, false).verbosity(), Verbosity::Verbose);
        assert_eq!(cli(2, false).verbosity(), Verbosity::Trace);
    }

    #[test]
    fn test_parse_list() {
        let cli = Cli::try_parse_from(["evault", "list", "-f", "table"]).unwrap();
        match cli.command {
            Command::List(cmd) => assert_eq!(cmd.format, OutputFormat::Table),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_search() {
        let cli = Cli::try_parse_from(["evault", "search", "smith v", "-l", "3"]).unwrap();
        match cli.command {
            Command::Search(cmd) => {
                assert_eq!(cmd.query, "smith v");
                assert_eq!(cmd.limit, Some(3));
                assert_eq!(cmd.format, OutputFormat::Plain);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_search_requires_query() {
        assert!(Cli::try_parse_from(["evault", "search"]).is_err());
    }

    #[test]
    fn test_parse_open() {
        let cli = Cli::try_parse_from(["evault", "open", "C-101", "--print"]).unwrap();
        match cli.command {
            Command::Open(cmd) => {
                assert_eq!(cmd.case_id, "C-101");
                assert!(cmd.print);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_export() {
        let cli =
            Cli::try_parse_from(["evault", "export", "-o", "out.html", "--query", "roe"]).unwrap();
        match cli.command {
            Command::Export(cmd) => {
                assert_eq!(cmd.output, PathBuf::from("out.html"));
                assert_eq!(cmd.query.as_deref(), Some("roe"));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_export_requires_output() {
        assert!(Cli::try_parse_from(["evault", "export"]).is_err());
    }

    #[test]
    fn test_parse_import() {
        let cli = Cli::try_parse_from([
            "evault",
            "import",
            "cases.json",
            "--collection",
            "archive",
            "--replace",
        ])
        .unwrap();
        match cli.command {
            Command::Import(cmd) => {
                assert_eq!(cmd.file, PathBuf::from("cases.json"));
                assert_eq!(cmd.collection.as_deref(), Some("archive"));
                assert!(cmd.replace);
            }
            other => panic!("unexpected command {other:?}"),
        }
        assert!(Cli::try_parse_from(["evault", "import"]).is_err());
    }

    #[test]
    fn test_parse_config_validate() {
        let cli = Cli::try_parse_from(["evault", "config", "validate", "-f", "x.toml"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Config(ConfigCommand::Validate { file: Some(_) })
        ));
    }

    #[test]
    fn test_parse_global_flags() {
        let cli = Cli::try_parse_from(["evault", "-c", "/custom/config.toml", "-vv", "status"])
            .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/custom/config.toml")));
        assert_eq!(cli.verbose, 2);

        let cli = Cli::try_parse_from(["evault", "browse", "-q"]).unwrap();
        assert!(cli.quiet);
        assert!(matches!(cli.command, Command::Browse(_)));
    }
}
