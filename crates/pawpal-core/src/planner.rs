//! Greedy daily plan builder.
//!
//! # Algorithm
//!
//! 1. Drop completed tasks; scheduled and unscheduled tasks both remain.
//! 2. Order candidates with [`sort_by_priority_and_time`].
//! 3. Walk the candidates once, accepting each task whose duration still fits
//!    the remaining budget and skipping the rest.
//!
//! Skipped tasks are never revisited and no later task is swapped in for an
//! earlier one, so the plan does not maximize budget use. It is, however,
//! fully determined by the input order and the budget.

use serde::Serialize;

use crate::ordering::sort_by_priority_and_time;
use crate::task::Task;

/// Tasks chosen for a day and how much of the budget they use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyPlan<'a> {
    /// Accepted tasks in priority-then-time order.
    pub accepted: Vec<&'a Task>,
    /// Candidates that did not fit, in the order they were considered.
    pub skipped: Vec<&'a Task>,
    pub budget_minutes: u32,
    pub minutes_used: u32,
    pub minutes_remaining: u32,
}

impl DailyPlan<'_> {
    pub fn is_empty(&self) -> bool {
        self.accepted.is_empty()
    }
}

/// Selects uncompleted tasks that fit within `budget_minutes`, greedily in
/// priority-then-time order.
pub fn generate_daily_schedule<'a, I>(tasks: I, budget_minutes: u32) -> DailyPlan<'a>
where
    I: IntoIterator<Item = &'a Task>,
{
    let candidates =
        sort_by_priority_and_time(tasks.into_iter().filter(|task| !task.is_completed()));

    let mut remaining = budget_minutes;
    let mut accepted = Vec::new();
    let mut skipped = Vec::new();
    for task in candidates {
        if task.duration_minutes() <= remaining {
            remaining -= task.duration_minutes();
            accepted.push(task);
        } else {
            skipped.push(task);
        }
    }

    let plan = DailyPlan {
        accepted,
        skipped,
        budget_minutes,
        minutes_used: budget_minutes - remaining,
        minutes_remaining: remaining,
    };
    tracing::debug!(
        budget = budget_minutes,
        accepted = plan.accepted.len(),
        skipped = plan.skipped.len(),
        used = plan.minutes_used,
        "generated daily plan"
    );
    plan
}
