//! Successor generation for recurring tasks.
//!
//! Offsets are fixed durations: a day, a week, or [`MONTHLY_INTERVAL_DAYS`]
//! days. Month lengths are not taken into account.

use std::fmt;

use chrono::{NaiveDateTime, TimeDelta};
use serde::Serialize;

use crate::task::{Task, end_of};
use crate::types::{Frequency, TaskId};

/// Days between occurrences of a monthly task.
pub const MONTHLY_INTERVAL_DAYS: i64 = 30;

/// Time between occurrences, or `None` for one-time tasks.
pub fn recurrence_interval(frequency: Frequency) -> Option<TimeDelta> {
    match frequency {
        Frequency::OneTime => None,
        Frequency::Daily => Some(TimeDelta::days(1)),
        Frequency::Weekly => Some(TimeDelta::days(7)),
        Frequency::Monthly => Some(TimeDelta::days(MONTHLY_INTERVAL_DAYS)),
    }
}

/// A non-fatal condition that degraded an operation's result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Warning {
    /// The recurring task had no due time, so its successor has none either.
    MissingDueTime { task_id: TaskId },
    /// The shifted due time, or the end of the successor's window, left the
    /// representable range; the successor is unscheduled.
    DueTimeOutOfRange { task_id: TaskId },
    /// The task was already completed; nothing changed.
    AlreadyCompleted { task_id: TaskId },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingDueTime { task_id } => write!(
                f,
                "task {task_id} has no due time; its next occurrence is unscheduled"
            ),
            Self::DueTimeOutOfRange { task_id } => write!(
                f,
                "next due time for task {task_id} is out of range; its next occurrence is unscheduled"
            ),
            Self::AlreadyCompleted { task_id } => {
                write!(f, "task {task_id} was already completed")
            }
        }
    }
}

/// Outcome of completing a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Completion {
    /// The task as it stands after completion.
    pub completed: Task,
    /// The next occurrence, when one was created.
    pub successor: Option<Task>,
    /// Anything that degraded the result.
    pub warnings: Vec<Warning>,
}

/// A planned successor and any warnings produced while planning it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Regenerated {
    pub task: Task,
    pub warnings: Vec<Warning>,
}

/// Builds the next occurrence of `task` under `id`.
///
/// Returns `None` for one-time tasks. The successor copies every attribute
/// except the id, the completion flag and the due time.
pub fn regenerate(task: &Task, id: TaskId) -> Option<Regenerated> {
    let interval = recurrence_interval(task.frequency())?;
    let mut warnings = Vec::new();
    let due_time = match task.due_time() {
        Some(due) => next_due_time(due, interval, task.duration_minutes()).or_else(|| {
            warnings.push(Warning::DueTimeOutOfRange { task_id: task.id() });
            None
        }),
        None => {
            warnings.push(Warning::MissingDueTime { task_id: task.id() });
            None
        }
    };
    Some(Regenerated {
        task: task.respawn(id, due_time),
        warnings,
    })
}

/// The shifted due time, provided the successor still ends in range.
fn next_due_time(due: NaiveDateTime, interval: TimeDelta, minutes: u32) -> Option<NaiveDateTime> {
    due.checked_add_signed(interval).filter(|next| end_of(*next, minutes).is_some())
}
