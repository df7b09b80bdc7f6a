//! CLI parse: clap types for dirmirror. No behavior; definitions only.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// dirmirror CLI - lazily-loaded directory mirror
#[derive(Parser)]
#[command(name = "dirmirror")]
#[command(about = "Lazily-loaded directory tree mirror kept in sync by change events")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Directory to mirror (default: config `root`, then the current directory)
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Disable logging entirely
    #[arg(long, default_value = "false")]
    pub quiet: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file, file+stderr)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output includes "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load one directory and print it in mirror order
    List {
        /// Directory key relative to the root
        #[arg(default_value = ".")]
        dir: String,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Apply a JSON-lines change-event log and print the resulting mirror
    Replay {
        /// Event log, one JSON change event per line
        events: PathBuf,
        /// Directories to expand before replaying (repeatable)
        #[arg(long = "expand")]
        expand: Vec<String>,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Mirror the root live from filesystem notifications
    Watch {
        /// Directories to expand before watching (repeatable)
        #[arg(long = "expand")]
        expand: Vec<String>,
    },
    /// Print the effective configuration as TOML
    Config,
}
