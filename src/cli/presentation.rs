//! Mirror presentation: listings as comfy-table text or JSON.

use crate::error::ApiError;
use crate::tree::cache::DirectoryCache;
use crate::tree::entry::{Entry, EntryKind};
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;
use serde_json::json;

fn heading(dir: &str, count: usize) -> String {
    format!("{} ({} entries)", dir.bold().cyan(), count)
}

fn listing_table(entries: &[Entry]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Name", "Type", "Category", "Updated"]);
    for entry in entries {
        let (name, category) = match entry.kind {
            EntryKind::Dir => (format!("{}/", entry.name), "-".to_string()),
            EntryKind::File => (entry.file_name(), entry.category.to_string()),
        };
        table.add_row(vec![
            name,
            entry.kind.to_string(),
            category,
            entry.updated_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        ]);
    }
    table
}

/// One directory as a heading and table.
pub fn format_listing_text(dir: &str, entries: &[Entry]) -> String {
    if entries.is_empty() {
        return format!("{}\n  (empty)", heading(dir, 0));
    }
    format!("{}\n{}", heading(dir, entries.len()), listing_table(entries))
}

pub fn format_listing_json(dir: &str, entries: &[Entry]) -> Result<String, ApiError> {
    let out = json!({ "dir": dir, "entries": entries, "total": entries.len() });
    serde_json::to_string_pretty(&out)
        .map_err(|e| ApiError::ConfigError(format!("Failed to render listing: {}", e)))
}

/// Every loaded directory, then notices and pending focus requests.
pub fn format_mirror_text(cache: &DirectoryCache, notices: &[String], focus: &[String]) -> String {
    let mut sections: Vec<String> = cache
        .loaded_dirs()
        .into_iter()
        .map(|dir| format_listing_text(dir, cache.get_directory(dir).unwrap_or(&[])))
        .collect();

    if !notices.is_empty() {
        let mut section = format!("{}", "Notices".bold().yellow());
        for notice in notices {
            section.push_str(&format!("\n  {}", notice));
        }
        sections.push(section);
    }
    if !focus.is_empty() {
        sections.push(format!("{} {}", "Focus:".bold(), focus.join(", ")));
    }
    sections.join("\n\n")
}

pub fn format_mirror_json(
    cache: &DirectoryCache,
    notices: &[String],
    focus: &[String],
) -> Result<String, ApiError> {
    let directories: serde_json::Map<String, serde_json::Value> = cache
        .loaded_dirs()
        .into_iter()
        .map(|dir| {
            let entries = cache.get_directory(dir).unwrap_or(&[]);
            (dir.to_string(), json!(entries))
        })
        .collect();
    let out = json!({ "directories": directories, "notices": notices, "focus": focus });
    serde_json::to_string_pretty(&out)
        .map_err(|e| ApiError::ConfigError(format!("Failed to render mirror: {}", e)))
}
