//! CLI parse: clap types for frameflow. No behavior; definitions only.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Frameflow CLI - flow text across chains of linked pages
#[derive(Parser)]
#[command(name = "frameflow")]
#[command(about = "Flow content across automatically linked page chains")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace root directory
    #[arg(long, default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output is "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Flow each line of a text file onto a new frameset
    Flow {
        /// Input text file; one item per line, blank lines add spacing
        input: PathBuf,
        /// Name of the frameset to create
        #[arg(long)]
        frameset: String,
        /// Title of the first page (defaults to the frameset name)
        #[arg(long)]
        title: Option<String>,
        /// Directory of the frameset below the store root
        #[arg(long)]
        path: Option<PathBuf>,
        /// Wrap into further columns before spawning a page
        #[arg(long)]
        multi_column: bool,
        /// Replace an existing frameset of the same name
        #[arg(long)]
        recreate: bool,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Show a stored chain by following Next links from page 1
    Chain {
        frameset: String,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Show a stored page's title and items
    Show {
        /// Page name, e.g. notes3
        page: String,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Print the effective configuration as TOML
    Config,
}

impl Commands {
    /// Stable command name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Commands::Flow { .. } => "flow",
            Commands::Chain { .. } => "chain",
            Commands::Show { .. } => "show",
            Commands::Config => "config",
        }
    }
}
