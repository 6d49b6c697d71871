//! Plan command: fits pending tasks into a daily time budget.
//!
//! Candidates are the pending tasks due on the chosen date plus unscheduled
//! tasks, or every pending task with `--all`.

use std::fmt::Write as _;
use std::io::Write;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::Args;
use pawpal_core::{DailyPlan, Owner, Task, generate_daily_schedule, tasks_due_on};
use pawpal_db::Database;
use serde::Serialize;

use super::util::{format_due, load_owner, pet_label};
use crate::Config;

#[derive(Debug, Args)]
pub struct PlanArgs {
    /// Minutes available. Defaults to `daily_budget_minutes` from the config.
    #[arg(long)]
    pub budget: Option<u32>,

    /// Day to plan (YYYY-MM-DD). Defaults to today.
    #[arg(long, conflicts_with = "all")]
    pub date: Option<NaiveDate>,

    /// Plan across every date instead of a single day.
    #[arg(long)]
    pub all: bool,

    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct PlanOutput<'a> {
    date: Option<NaiveDate>,
    #[serde(flatten)]
    plan: &'a DailyPlan<'a>,
}

pub fn run<W: Write>(
    writer: &mut W,
    db: &Database,
    config: &Config,
    args: &PlanArgs,
) -> Result<()> {
    let owner = load_owner(db, config)?;
    let budget = args.budget.unwrap_or(config.daily_budget_minutes);
    let date = if args.all {
        None
    } else {
        Some(args.date.unwrap_or_else(|| Local::now().date_naive()))
    };

    let candidates: Vec<&Task> = match date {
        Some(date) => tasks_due_on(owner.tasks(), date),
        None => owner.tasks().collect(),
    };
    let plan = generate_daily_schedule(candidates, budget);
    tracing::debug!(
        ?date,
        budget,
        accepted = plan.accepted.len(),
        skipped = plan.skipped.len(),
        "generated plan"
    );

    if args.json {
        let output = PlanOutput { date, plan: &plan };
        serde_json::to_writer_pretty(&mut *writer, &output).context("failed to serialize plan")?;
        writeln!(writer)?;
        return Ok(());
    }

    write!(writer, "{}", format_plan(&owner, &plan, date))?;
    Ok(())
}

/// Format a plan for human-readable output.
pub fn format_plan(owner: &Owner, plan: &DailyPlan<'_>, date: Option<NaiveDate>) -> String {
    let mut output = String::new();

    match date {
        Some(date) => writeln!(output, "PLAN for {date} (budget {} min)", plan.budget_minutes),
        None => writeln!(output, "PLAN for all dates (budget {} min)", plan.budget_minutes),
    }
    .unwrap();
    writeln!(output).unwrap();

    if plan.accepted.is_empty() && plan.skipped.is_empty() {
        writeln!(output, "Nothing to schedule.").unwrap();
        return output;
    }

    for (index, task) in plan.accepted.iter().enumerate() {
        writeln!(
            output,
            "{:>3}. {:<16}  {:<6}  {:>4} min  {} ({})",
            index + 1,
            format_due(task.due_time()),
            task.priority().as_str(),
            task.duration_minutes(),
            task.description(),
            pet_label(owner, task)
        )
        .unwrap();
    }
    if plan.accepted.is_empty() {
        writeln!(output, "No task fits the budget.").unwrap();
    }

    writeln!(output).unwrap();
    writeln!(
        output,
        "Used {} of {} minutes, {} remaining.",
        plan.minutes_used, plan.budget_minutes, plan.minutes_remaining
    )
    .unwrap();

    if !plan.skipped.is_empty() {
        writeln!(output).unwrap();
        writeln!(output, "Skipped (did not fit):").unwrap();
        for task in &plan.skipped {
            writeln!(
                output,
                "  - {} ({}), {} min",
                task.description(),
                pet_label(owner, task),
                task.duration_minutes()
            )
            .unwrap();
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    use insta::assert_snapshot;
    use pawpal_core::{NewTask, TaskId};

    use crate::commands::testing::{feb15, seed_household, temp_db};

    fn plan_args(budget: Option<u32>) -> PlanArgs {
        PlanArgs {
            budget,
            date: NaiveDate::from_ymd_opt(2026, 2, 15),
            all: false,
            json: false,
        }
    }

    fn plan_output(db: &Database, config: &Config, args: &PlanArgs) -> String {
        let mut output = Vec::new();
        run(&mut output, db, config, args).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn plan_fills_budget_greedily() {
        let (_temp, mut db, config) = temp_db();
        seed_household(&mut db);

        assert_snapshot!(plan_output(&db, &config, &plan_args(Some(60))), @r"
        PLAN for 2026-02-15 (budget 60 min)

          1. 2026-02-15 08:00  HIGH      30 min  Morning walk (Rocky)
          2. 2026-02-15 08:15  HIGH      10 min  Breakfast (Rocky)
          3. 2026-02-15 08:20  MEDIUM    15 min  Clean litter box (Luna)

        Used 55 of 60 minutes, 5 remaining.

        Skipped (did not fit):
          - Vet appointment (Rocky), 90 min
          - Brushing (Luna), 20 min
        ");
    }

    #[test]
    fn plan_uses_configured_budget() {
        let (_temp, mut db, config) = temp_db();
        seed_household(&mut db);
        let args = PlanArgs {
            json: true,
            ..plan_args(None)
        };

        let output = plan_output(&db, &config, &args);
        let plan: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(plan["date"], "2026-02-15");
        assert_eq!(plan["budget_minutes"], 120);
        // 30 + 10 + 15 + 20 fit once the 90 minute vet visit is skipped.
        assert_eq!(plan["minutes_used"], 75);
        assert_eq!(plan["accepted"].as_array().unwrap().len(), 4);
        assert_eq!(plan["skipped"][0]["description"], "Vet appointment");
    }

    #[test]
    fn plan_for_other_day_keeps_only_unscheduled_tasks() {
        let (_temp, mut db, config) = temp_db();
        seed_household(&mut db);
        let args = PlanArgs {
            date: NaiveDate::from_ymd_opt(2026, 2, 16),
            ..plan_args(Some(120))
        };

        assert_snapshot!(plan_output(&db, &config, &args), @r"
        PLAN for 2026-02-16 (budget 120 min)

          1. -                 LOW       20 min  Brushing (Luna)

        Used 20 of 120 minutes, 100 remaining.
        ");
    }

    #[test]
    fn plan_all_dates_includes_successors() {
        let (_temp, mut db, config) = temp_db();
        seed_household(&mut db);
        let mut owner = db.load_owner("Abigail").unwrap();
        owner.complete_task(TaskId::new(1)).unwrap();
        db.save_owner(&owner).unwrap();

        let args = PlanArgs {
            budget: Some(45),
            date: None,
            all: true,
            json: false,
        };
        assert_snapshot!(plan_output(&db, &config, &args), @r"
        PLAN for all dates (budget 45 min)

          1. 2026-02-15 08:15  HIGH      10 min  Breakfast (Rocky)
          2. 2026-02-16 08:00  HIGH      30 min  Morning walk (Rocky)

        Used 40 of 45 minutes, 5 remaining.

        Skipped (did not fit):
          - Clean litter box (Luna), 15 min
          - Vet appointment (Rocky), 90 min
          - Brushing (Luna), 20 min
        ");
    }

    #[test]
    fn plan_zero_budget_accepts_nothing() {
        let (_temp, mut db, config) = temp_db();
        let mut owner = db.load_owner("Abigail").unwrap();
        let rocky = owner.add_pet("Rocky", "Dog", 4).unwrap();
        owner
            .add_task(rocky, NewTask::new("Walk", 30).due(feb15(9, 0)))
            .unwrap();
        db.save_owner(&owner).unwrap();

        assert_snapshot!(plan_output(&db, &config, &plan_args(Some(0))), @r"
        PLAN for 2026-02-15 (budget 0 min)

        No task fits the budget.

        Used 0 of 0 minutes, 0 remaining.

        Skipped (did not fit):
          - Walk (Rocky), 30 min
        ");
    }

    #[test]
    fn plan_with_no_tasks() {
        let (_temp, db, config) = temp_db();
        assert_snapshot!(plan_output(&db, &config, &plan_args(Some(30))), @r"
        PLAN for 2026-02-15 (budget 30 min)

        Nothing to schedule.
        ");
    }
}
