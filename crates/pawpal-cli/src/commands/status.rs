//! Status command for showing what the store holds.

use std::io::Write;

use anyhow::Result;
use pawpal_db::Database;

use super::util::load_owner;
use crate::Config;

pub fn run<W: Write>(writer: &mut W, db: &Database, config: &Config) -> Result<()> {
    let owner = load_owner(db, config)?;
    let total = owner.task_count();
    let pending = owner.tasks().filter(|task| !task.is_completed()).count();

    writeln!(writer, "PawPal status")?;
    writeln!(writer, "Database: {}", config.database_path.display())?;
    writeln!(writer, "Owner: {}", owner.name())?;
    writeln!(writer, "Pets: {}", owner.pets().count())?;
    writeln!(
        writer,
        "Tasks: {total} ({pending} pending, {} completed)",
        total - pending
    )?;
    writeln!(writer, "Next task id: {}", owner.next_task_id())?;
    Ok(())
}
