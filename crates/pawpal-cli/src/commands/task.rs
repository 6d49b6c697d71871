//! Task commands: `pawpal task add`, `pawpal task list` and `pawpal task complete`.

use std::fmt::Write as _;
use std::io::Write;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use pawpal_core::{
    Completion, Frequency, NewTask, Owner, Priority, Task, TaskFilter, TaskId, filter_tasks,
    sort_by_priority_and_time, sort_tasks_by_time,
};
use pawpal_db::Database;
use serde::Serialize;

use super::util::{
    find_pet, format_due, load_owner, parse_due_time, pet_label, save_owner, truncate,
};
use crate::Config;

#[derive(Debug, Args)]
pub struct AddArgs {
    /// Name of the pet the task is for.
    #[arg(long)]
    pub pet: String,

    /// What needs doing.
    #[arg(long)]
    pub description: String,

    /// How long it takes, in minutes.
    #[arg(long)]
    pub duration: u32,

    /// high, medium or low.
    #[arg(long, default_value_t = Priority::Medium)]
    pub priority: Priority,

    /// one_time, daily, weekly or monthly.
    #[arg(long, default_value_t = Frequency::OneTime)]
    pub frequency: Frequency,

    /// When the task is due (YYYY-MM-DDTHH:MM). Omit for unscheduled tasks.
    #[arg(long)]
    pub due: Option<String>,
}

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Only tasks for the pet with this name.
    #[arg(long)]
    pub pet: Option<String>,

    /// Only tasks that are not completed.
    #[arg(long, conflicts_with = "done")]
    pub pending: bool,

    /// Only completed tasks.
    #[arg(long)]
    pub done: bool,

    /// Order of the listing. Defaults to pet then insertion order.
    #[arg(long, value_enum)]
    pub sort: Option<SortKey>,

    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Orderings offered by `pawpal task list --sort`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortKey {
    /// Earliest due time first, unscheduled last.
    Time,
    /// Highest priority first, then earliest due time.
    Priority,
}

/// Task data for JSON output.
#[derive(Debug, Serialize)]
struct TaskEntry<'a> {
    pet: &'a str,
    #[serde(flatten)]
    task: &'a Task,
}

pub fn add<W: Write>(
    writer: &mut W,
    db: &mut Database,
    config: &Config,
    args: &AddArgs,
) -> Result<()> {
    let mut owner = load_owner(db, config)?;
    let pet_id = find_pet(&owner, &args.pet)?.id();

    let mut new = NewTask::new(&args.description, args.duration)
        .priority(args.priority)
        .frequency(args.frequency);
    if let Some(due) = &args.due {
        new = new.due(parse_due_time(due)?);
    }

    let task = owner.add_task(pet_id, new).context("invalid task")?;
    let line = format!(
        "Added task {}: {} for {} ({} min, {}, due {})",
        task.id(),
        task.description(),
        args.pet,
        task.duration_minutes(),
        task.priority(),
        format_due(task.due_time())
    );
    save_owner(db, &owner)?;

    writeln!(writer, "{line}")?;
    Ok(())
}

pub fn list<W: Write>(
    writer: &mut W,
    db: &Database,
    config: &Config,
    args: &ListArgs,
) -> Result<()> {
    let owner = load_owner(db, config)?;

    let mut filter = TaskFilter::all();
    if let Some(name) = &args.pet {
        filter = filter.pet(name);
    }
    if args.pending {
        filter = filter.completed(false);
    } else if args.done {
        filter = filter.completed(true);
    }

    let matching = filter_tasks(owner.tasks(), &owner, &filter);
    let tasks = match args.sort {
        Some(SortKey::Time) => sort_tasks_by_time(matching),
        Some(SortKey::Priority) => sort_by_priority_and_time(matching),
        None => matching,
    };

    if args.json {
        let entries: Vec<TaskEntry<'_>> = tasks
            .iter()
            .map(|task| TaskEntry {
                pet: pet_label(&owner, task),
                task,
            })
            .collect();
        serde_json::to_writer_pretty(&mut *writer, &entries)
            .context("failed to serialize tasks")?;
        writeln!(writer)?;
        return Ok(());
    }

    write!(writer, "{}", format_tasks(&owner, &tasks))?;
    Ok(())
}

pub fn complete<W: Write>(
    writer: &mut W,
    db: &mut Database,
    config: &Config,
    id: TaskId,
) -> Result<()> {
    let mut owner = load_owner(db, config)?;
    let completion = owner.complete_task(id)?;
    save_owner(db, &owner)?;

    write!(writer, "{}", format_completion(&owner, &completion))?;
    Ok(())
}

/// Format tasks as a table.
pub fn format_tasks(owner: &Owner, tasks: &[&Task]) -> String {
    let mut output = String::new();

    writeln!(output, "TASKS").unwrap();
    writeln!(output).unwrap();

    if tasks.is_empty() {
        writeln!(output, "No matching tasks.").unwrap();
        return output;
    }

    writeln!(
        output,
        "{:>3}  {:<10}  {:<16}  {:>4}  {:<6}  {:<8}  {:<4}  Description",
        "ID", "Pet", "Due", "Min", "Prio", "Repeats", "Done"
    )
    .unwrap();
    writeln!(
        output,
        "───  ──────────  ────────────────  ────  ──────  ────────  ────  ────────────────────"
    )
    .unwrap();
    for task in tasks {
        writeln!(
            output,
            "{:>3}  {:<10}  {:<16}  {:>4}  {:<6}  {:<8}  {:<4}  {}",
            task.id().get(),
            truncate(pet_label(owner, task), 10),
            format_due(task.due_time()),
            task.duration_minutes(),
            task.priority().as_str(),
            task.frequency().as_str(),
            if task.is_completed() { "yes" } else { "no" },
            task.description()
        )
        .unwrap();
    }

    output
}

fn format_completion(owner: &Owner, completion: &Completion) -> String {
    let mut output = String::new();
    let task = &completion.completed;
    writeln!(
        output,
        "Completed task {}: {} ({})",
        task.id(),
        task.description(),
        pet_label(owner, task)
    )
    .unwrap();
    if let Some(successor) = &completion.successor {
        writeln!(
            output,
            "Next occurrence: task {} due {}",
            successor.id(),
            format_due(successor.due_time())
        )
        .unwrap();
    }
    for warning in &completion.warnings {
        writeln!(output, "Warning: {warning}").unwrap();
    }
    output
}
