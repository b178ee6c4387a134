//! CLI command definitions.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

/// List command arguments.
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

/// Search command arguments.
#[derive(Debug, Args)]
pub struct SearchCommand {
    /// Text matched against case name, lawyer and judge
    pub query: String,

    /// Maximum number of results
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

/// Browse command arguments.
#[derive(Debug, Args)]
pub struct BrowseCommand {
    /// Output format for each result
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

/// Open command arguments.
#[derive(Debug, Args)]
pub struct OpenCommand {
    /// Case id of the record whose document to open
    pub case_id: String,

    /// Print the document link instead of opening it
    #[arg(long)]
    pub print: bool,
}

/// Export command arguments.
#[derive(Debug, Args)]
pub struct ExportCommand {
    /// File to write the HTML page to
    #[arg(short, long, value_name = "FILE")]
    pub output: PathBuf,

    /// Only export records matching this query
    #[arg(long)]
    pub query: Option<String>,
}

/// Import command arguments.
#[derive(Debug, Args)]
pub struct ImportCommand {
    /// JSON file holding an array of documents, or an object of id to document
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Collection to import into (defaults to the configured one)
    #[arg(long)]
    pub collection: Option<String>,

    /// Remove the collection's existing documents first
    #[arg(long)]
    pub replace: bool,
}

/// Status command arguments.
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Output format for commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain text cards
    #[default]
    Plain,
    /// Formatted table
    Table,
    /// JSON output
    Json,
    /// Standalone HTML page
    Html,
}

impl From<OutputFormat> for crate::render::OutputFormat {
    fn from(arg: OutputFormat) -> Self {
        match arg {
            OutputFormat::Plain => Self::Plain,
            OutputFormat::Table => Self::Table,
            OutputFormat::Json => Self::Json,
            OutputFormat::Html => Self::Html,
        }
    }
}
