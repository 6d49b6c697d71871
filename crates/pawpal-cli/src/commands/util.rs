//! Shared utilities for CLI commands.

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use pawpal_core::{Owner, Pet, Task};
use pawpal_db::Database;

use crate::Config;

/// Formats accepted by `--due`.
const DUE_INPUT_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S"];

/// Parse a `--due` value such as `2026-02-15T08:00`.
pub fn parse_due_time(s: &str) -> Result<NaiveDateTime> {
    let trimmed = s.trim();
    DUE_INPUT_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
        .with_context(|| format!("Invalid due time: {s}. Use YYYY-MM-DDTHH:MM (e.g., 2026-02-15T08:00)"))
}

/// Human-readable due time, `-` when unscheduled.
pub fn format_due(due: Option<NaiveDateTime>) -> String {
    due.map_or_else(|| "-".to_string(), |due| due.format("%Y-%m-%d %H:%M").to_string())
}

/// Loads the stored owner, falling back to the configured owner name.
pub fn load_owner(db: &Database, config: &Config) -> Result<Owner> {
    db.load_owner(&config.owner_name)
        .context("failed to load stored pets and tasks")
}

pub fn save_owner(db: &mut Database, owner: &Owner) -> Result<()> {
    db.save_owner(owner).context("failed to save pets and tasks")
}

/// Finds a pet by exact name.
pub fn find_pet<'a>(owner: &'a Owner, name: &str) -> Result<&'a Pet> {
    owner
        .pet_by_name(name)
        .with_context(|| format!("no pet named '{name}'"))
}

/// The name of the pet owning `task`, for display.
pub fn pet_label<'a>(owner: &'a Owner, task: &Task) -> &'a str {
    owner.pet_name(task.pet_id()).unwrap_or("?")
}

/// Truncates by characters, not bytes, to avoid panics on multi-byte UTF-8.
pub fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() > width {
        format!("{}...", value.chars().take(width.saturating_sub(3)).collect::<String>())
    } else {
        value.to_string()
    }
}
