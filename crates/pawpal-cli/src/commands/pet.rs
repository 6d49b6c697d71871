//! Pet commands: `pawpal pet add` and `pawpal pet list`.

use std::io::Write;

use anyhow::{Context, Result};
use clap::Args;
use pawpal_core::Owner;
use pawpal_db::Database;
use serde::Serialize;

use super::util::{load_owner, save_owner, truncate};
use crate::Config;

#[derive(Debug, Args)]
pub struct AddArgs {
    /// Name of the pet.
    pub name: String,

    /// Species, e.g. Dog or Cat.
    #[arg(long)]
    pub species: String,

    /// Age in years.
    #[arg(long, allow_negative_numbers = true)]
    pub age: i64,
}

/// Pet data for JSON output.
#[derive(Debug, Serialize)]
struct PetEntry<'a> {
    id: u64,
    name: &'a str,
    species: &'a str,
    age: u32,
    tasks: usize,
    pending: usize,
}

pub fn add<W: Write>(
    writer: &mut W,
    db: &mut Database,
    config: &Config,
    args: &AddArgs,
) -> Result<()> {
    let mut owner = load_owner(db, config)?;
    let id = owner
        .add_pet(&args.name, &args.species, args.age)
        .context("invalid pet")?;
    save_owner(db, &owner)?;

    let name = owner.pet_name(id).unwrap_or(&args.name);
    writeln!(writer, "Added pet {id}: {name}")?;
    Ok(())
}

pub fn list<W: Write>(writer: &mut W, db: &Database, config: &Config, json: bool) -> Result<()> {
    let owner = load_owner(db, config)?;
    let entries = pet_entries(&owner);

    if json {
        serde_json::to_writer_pretty(&mut *writer, &entries).context("failed to serialize pets")?;
        writeln!(writer)?;
        return Ok(());
    }

    writeln!(writer, "PETS ({})", owner.name())?;
    writeln!(writer)?;
    if entries.is_empty() {
        writeln!(writer, "No pets yet.")?;
        writeln!(writer)?;
        writeln!(
            writer,
            "Hint: Run 'pawpal pet add <name> --species <species> --age <years>' to add one."
        )?;
        return Ok(());
    }

    writeln!(
        writer,
        "{:<4}  {:<16}  {:<10}  {:>3}  Tasks",
        "ID", "Name", "Species", "Age"
    )?;
    writeln!(writer, "────  ────────────────  ──────────  ───  ──────────")?;
    for entry in &entries {
        writeln!(
            writer,
            "{:<4}  {:<16}  {:<10}  {:>3}  {} ({} pending)",
            entry.id,
            truncate(entry.name, 16),
            truncate(entry.species, 10),
            entry.age,
            entry.tasks,
            entry.pending
        )?;
    }
    Ok(())
}

fn pet_entries(owner: &Owner) -> Vec<PetEntry<'_>> {
    owner
        .pets()
        .map(|pet| PetEntry {
            id: pet.id().get(),
            name: pet.name(),
            species: pet.species(),
            age: pet.age(),
            tasks: pet.tasks().len(),
            pending: pet.tasks().iter().filter(|task| !task.is_completed()).count(),
        })
        .collect()
}
