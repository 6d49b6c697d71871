//! Core scheduling engine for pet care tasks.
//!
//! This crate contains the fundamental types and logic for:
//! - Entities: owners, pets and their care tasks
//! - Ordering: by due time, and by priority then due time
//! - Filtering: by pet name and completion state
//! - Conflict detection: overlapping time windows between tasks
//! - Recurrence: successor tasks for daily, weekly and monthly tasks
//! - Planning: greedy selection of tasks into a daily time budget
//!
//! Nothing here performs I/O; persistence and presentation live in other crates.

mod conflict;
mod filter;
mod ordering;
mod owner;
mod pet;
mod planner;
pub mod recurrence;
mod task;
pub mod types;

pub use conflict::{Conflict, ConflictKind, detect_all_conflicts};
pub use filter::{TaskFilter, filter_tasks, tasks_due_on};
pub use ordering::{
    cmp_by_priority_then_time, cmp_by_time, sort_by_priority_and_time, sort_tasks_by_time,
};
pub use owner::{DEFAULT_OWNER_NAME, EngineError, Owner, OwnerState};
pub use pet::Pet;
pub use planner::{DailyPlan, generate_daily_schedule};
pub use recurrence::{Completion, Warning};
pub use task::{NewTask, Task, Window};
pub use types::{Frequency, PetId, Priority, TaskId, ValidationError};
