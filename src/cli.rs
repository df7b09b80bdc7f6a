//! CLI domain: parse, route, help, output, and presentation only.
//! No domain orchestration; a single route table dispatches to the mirror.

mod help;
mod output;
mod parse;
mod presentation;
mod route;

pub use help::command_name;
pub use output::map_error;
pub use parse::{Cli, Commands};
pub use presentation::{
    format_listing_json, format_listing_text, format_mirror_json, format_mirror_text,
};
pub use route::RunContext;
