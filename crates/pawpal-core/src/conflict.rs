//! Pairwise overlap detection between scheduled tasks.
//!
//! Only uncompleted tasks with a due time take part. Each unordered pair is
//! tested once with the half-open rule of [`Window::overlaps`], so tasks that
//! merely touch (one ends as the other starts) never conflict.
//!
//! The scan is quadratic in the number of participating tasks, which is fine
//! at household scale.

use std::fmt;

use serde::Serialize;

use crate::ordering::sort_tasks_by_time;
use crate::task::{Task, Window};
use crate::types::TaskId;

/// Whether both sides of a conflict belong to the same pet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictKind {
    SamePet,
    CrossPet,
}

impl ConflictKind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::SamePet => "same_pet",
            Self::CrossPet => "cross_pet",
        }
    }
}

impl fmt::Display for ConflictKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Two tasks whose windows overlap.
///
/// `task_a` starts no later than `task_b`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Conflict {
    pub task_a: TaskId,
    pub task_b: TaskId,
    pub kind: ConflictKind,
}

/// Reports every overlapping pair among the uncompleted, scheduled tasks.
///
/// Records are ordered by the start time of `task_a`, then of `task_b`;
/// tasks sharing a start time keep their input order.
pub fn detect_all_conflicts<'a, I>(tasks: I) -> Vec<Conflict>
where
    I: IntoIterator<Item = &'a Task>,
{
    let candidates: Vec<(&Task, Window)> = sort_tasks_by_time(
        tasks.into_iter().filter(|task| !task.is_completed()),
    )
    .into_iter()
    .filter_map(|task| task.window().map(|window| (task, window)))
    .collect();

    let mut conflicts = Vec::new();
    for (i, (a, window_a)) in candidates.iter().enumerate() {
        for (b, window_b) in &candidates[i + 1..] {
            if !window_a.overlaps(window_b) {
                continue;
            }
            let kind = if a.pet_id() == b.pet_id() {
                ConflictKind::SamePet
            } else {
                ConflictKind::CrossPet
            };
            conflicts.push(Conflict {
                task_a: a.id(),
                task_b: b.id(),
                kind,
            });
        }
    }

    tracing::debug!(
        candidates = candidates.len(),
        conflicts = conflicts.len(),
        "conflict scan finished"
    );
    conflicts
}
