//! Total orders over tasks.
//!
//! Both sorts are stable: tasks that compare equal keep their input order.
//! Unscheduled tasks (no due time) sort after every scheduled one.

use std::cmp::Ordering;

use crate::task::Task;

/// Orders by due time ascending, unscheduled last.
pub fn cmp_by_time(a: &Task, b: &Task) -> Ordering {
    match (a.due_time(), b.due_time()) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Orders by priority (high first), then by [`cmp_by_time`].
pub fn cmp_by_priority_then_time(a: &Task, b: &Task) -> Ordering {
    a.priority()
        .rank()
        .cmp(&b.priority().rank())
        .then_with(|| cmp_by_time(a, b))
}

/// Returns the tasks ordered by due time, unscheduled tasks last.
pub fn sort_tasks_by_time<'a, I>(tasks: I) -> Vec<&'a Task>
where
    I: IntoIterator<Item = &'a Task>,
{
    let mut sorted: Vec<&Task> = tasks.into_iter().collect();
    sorted.sort_by(|a, b| cmp_by_time(a, b));
    sorted
}

/// Returns the tasks ordered by priority, breaking ties by due time.
pub fn sort_by_priority_and_time<'a, I>(tasks: I) -> Vec<&'a Task>
where
    I: IntoIterator<Item = &'a Task>,
{
    let mut sorted: Vec<&Task> = tasks.into_iter().collect();
    sorted.sort_by(|a, b| cmp_by_priority_then_time(a, b));
    sorted
}
