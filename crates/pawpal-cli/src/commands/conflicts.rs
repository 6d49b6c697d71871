//! Conflicts command: lists overlapping pending tasks.

use std::io::Write;

use anyhow::{Context, Result};
use pawpal_core::{Conflict, ConflictKind, Owner, Task, detect_all_conflicts};
use pawpal_db::Database;
use serde::Serialize;

use super::util::{load_owner, pet_label};
use crate::Config;

#[derive(Debug, Serialize)]
struct ConflictEntry {
    #[serde(flatten)]
    conflict: Conflict,
    message: String,
}

pub fn run<W: Write>(writer: &mut W, db: &Database, config: &Config, json: bool) -> Result<()> {
    let owner = load_owner(db, config)?;
    let mut conflicts = detect_all_conflicts(owner.tasks());
    // Same-pet conflicts first, start order kept within each kind.
    conflicts.sort_by_key(|conflict| conflict.kind == ConflictKind::CrossPet);

    let entries: Vec<ConflictEntry> = conflicts
        .into_iter()
        .map(|conflict| ConflictEntry {
            message: describe(&owner, &conflict),
            conflict,
        })
        .collect();

    if json {
        serde_json::to_writer_pretty(&mut *writer, &entries)
            .context("failed to serialize conflicts")?;
        writeln!(writer)?;
        return Ok(());
    }

    writeln!(writer, "CONFLICTS")?;
    writeln!(writer)?;
    if entries.is_empty() {
        writeln!(writer, "No conflicts detected.")?;
        return Ok(());
    }
    for entry in &entries {
        writeln!(writer, "{}", entry.message)?;
    }
    writeln!(writer)?;
    writeln!(writer, "Found {} conflict(s).", entries.len())?;
    Ok(())
}

fn describe(owner: &Owner, conflict: &Conflict) -> String {
    let label = match conflict.kind {
        ConflictKind::SamePet => "SAME PET",
        ConflictKind::CrossPet => "DIFFERENT PETS",
    };
    format!(
        "[{label}] {} overlaps {}",
        task_summary(owner, owner.task(conflict.task_a)),
        task_summary(owner, owner.task(conflict.task_b))
    )
}

fn task_summary(owner: &Owner, task: Option<&Task>) -> String {
    let Some(task) = task else {
        return "(missing task)".to_string();
    };
    let window = task.window().map_or_else(String::new, |window| {
        let end = if window.end.date() == window.start.date() {
            window.end.format("%H:%M")
        } else {
            window.end.format("%Y-%m-%d %H:%M")
        };
        format!(" ({}-{end})", window.start.format("%Y-%m-%d %H:%M"))
    });
    format!("{}: {}{window}", pet_label(owner, task), task.description())
}
