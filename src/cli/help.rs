//! Command-name contract for logging and routing.

use crate::cli::parse::Commands;

/// Stable command name recorded with each run (e.g. "list", "replay").
pub fn command_name(command: &Commands) -> &'static str {
    match command {
        Commands::List { .. } => "list",
        Commands::Replay { .. } => "replay",
        Commands::Watch { .. } => "watch",
        Commands::Config => "config",
    }
}
