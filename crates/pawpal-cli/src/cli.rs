//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use pawpal_core::TaskId;

use crate::commands::{pet, plan, task};

/// Pet care task planner.
///
/// Keeps track of your pets and their care tasks, plans a day within a time
/// budget, and flags tasks whose times overlap.
#[derive(Debug, Parser)]
#[command(name = "pawpal", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Add and list pets.
    #[command(subcommand)]
    Pet(PetAction),

    /// Add, list and complete care tasks.
    #[command(subcommand)]
    Task(TaskAction),

    /// Fit pending tasks into a daily time budget.
    Plan(plan::PlanArgs),

    /// List pending tasks whose time windows overlap.
    Conflicts {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show what the database holds.
    Status,

    /// Write all pets and tasks to stdout as JSON.
    Export,

    /// Replace all pets and tasks with a JSON document read from stdin.
    Import,
}

/// Pet subcommands.
#[derive(Debug, Subcommand)]
pub enum PetAction {
    /// Register a new pet.
    Add(pet::AddArgs),

    /// List pets with their task counts.
    List {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },
}

/// Task subcommands.
#[derive(Debug, Subcommand)]
pub enum TaskAction {
    /// Add a care task for a pet.
    Add(task::AddArgs),

    /// List tasks, optionally filtered and sorted.
    List(task::ListArgs),

    /// Mark a task completed. Recurring tasks get their next occurrence.
    Complete {
        /// Id of the task to complete.
        id: TaskId,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_task_add_with_legacy_priority() {
        let cli = Cli::parse_from([
            "pawpal",
            "task",
            "add",
            "--pet",
            "Rocky",
            "--description",
            "Walk",
            "--duration",
            "30",
            "--priority",
            "high",
            "--frequency",
            "Daily",
            "--due",
            "2026-02-15T08:00",
        ]);
        let Some(Commands::Task(TaskAction::Add(args))) = cli.command else {
            panic!("expected task add");
        };
        assert_eq!(args.priority, pawpal_core::Priority::High);
        assert_eq!(args.frequency, pawpal_core::Frequency::Daily);
        assert_eq!(args.due.as_deref(), Some("2026-02-15T08:00"));
    }

    #[test]
    fn pending_and_done_conflict() {
        let result = Cli::try_parse_from(["pawpal", "task", "list", "--pending", "--done"]);
        assert!(result.is_err());
    }

    #[test]
    fn plan_date_and_all_conflict() {
        let result = Cli::try_parse_from(["pawpal", "plan", "--date", "2026-02-15", "--all"]);
        assert!(result.is_err());
    }

    #[test]
    fn pet_add_accepts_negative_age_for_validation() {
        let cli = Cli::parse_from(["pawpal", "pet", "add", "Rocky", "--species", "Dog", "--age", "-1"]);
        let Some(Commands::Pet(PetAction::Add(args))) = cli.command else {
            panic!("expected pet add");
        };
        assert_eq!(args.age, -1);
    }
}
