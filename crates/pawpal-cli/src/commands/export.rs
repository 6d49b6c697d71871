//! Implementation of the `pawpal export` command.
//!
//! Writes the stored owner, pets and tasks as a pretty-printed `OwnerState`
//! JSON document. The output is accepted as-is by `pawpal import`.

use std::io::Write;

use anyhow::{Context, Result};
use pawpal_db::Database;

use super::util::load_owner;
use crate::Config;

pub fn run<W: Write>(writer: &mut W, db: &Database, config: &Config) -> Result<()> {
    let owner = load_owner(db, config)?;
    serde_json::to_writer_pretty(&mut *writer, &owner.to_state())
        .context("failed to serialize owner state")?;
    writeln!(writer)?;
    Ok(())
}
