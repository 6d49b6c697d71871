//! Import command for replacing the stored state with an `OwnerState` document.

use std::io::{Read, Write};

use anyhow::{Context, Result};
use pawpal_core::{Owner, OwnerState};
use pawpal_db::Database;

use super::util::save_owner;

pub fn run<R: Read, W: Write>(reader: R, writer: &mut W, db: &mut Database) -> Result<()> {
    let owner = parse_owner(reader)?;
    save_owner(db, &owner)?;

    writeln!(
        writer,
        "Imported {} pet(s) and {} task(s) for {}.",
        owner.pets().count(),
        owner.task_count(),
        owner.name()
    )?;
    Ok(())
}

fn parse_owner<R: Read>(reader: R) -> Result<Owner> {
    let state: OwnerState = serde_json::from_reader(reader).context("invalid owner JSON")?;
    Owner::from_state(state).context("invalid owner state")
}
