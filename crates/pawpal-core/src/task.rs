//! Care tasks and the time windows they occupy.

use chrono::{NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};

use crate::types::{Frequency, PetId, Priority, TaskId, ValidationError, require_non_empty};

/// Caller-supplied attributes for a task that does not exist yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub description: String,
    pub duration_minutes: u32,
    pub priority: Priority,
    pub due_time: Option<NaiveDateTime>,
    pub frequency: Frequency,
}

impl NewTask {
    /// A one-time, medium priority, unscheduled task.
    pub fn new(description: impl Into<String>, duration_minutes: u32) -> Self {
        Self {
            description: description.into(),
            duration_minutes,
            priority: Priority::Medium,
            due_time: None,
            frequency: Frequency::OneTime,
        }
    }

    #[must_use]
    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    #[must_use]
    pub fn due(mut self, due_time: NaiveDateTime) -> Self {
        self.due_time = Some(due_time);
        self
    }

    #[must_use]
    pub fn frequency(mut self, frequency: Frequency) -> Self {
        self.frequency = frequency;
        self
    }
}

/// A single care task belonging to one pet.
///
/// Fields are read-only outside the crate. State changes go through
/// [`Owner`](crate::Owner) so that id assignment and completion stay consistent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    pet_id: PetId,
    description: String,
    duration_minutes: u32,
    priority: Priority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    due_time: Option<NaiveDateTime>,
    #[serde(default)]
    frequency: Frequency,
    #[serde(default)]
    completed: bool,
}

impl Task {
    /// Builds a validated, uncompleted task.
    ///
    /// A scheduled task must also end within chrono's range, so every task
    /// with a due time has a [`Window`].
    ///
    /// The caller is responsible for `id` being unique; [`Owner::add_task`](crate::Owner::add_task)
    /// draws it from the owner's counter.
    pub fn new(id: TaskId, pet_id: PetId, new: NewTask) -> Result<Self, ValidationError> {
        let description = require_non_empty(new.description, "description")?;
        if new.duration_minutes == 0 {
            return Err(ValidationError::ZeroDuration);
        }
        check_end(new.due_time, new.duration_minutes)?;
        Ok(Self {
            id,
            pet_id,
            description,
            duration_minutes: new.duration_minutes,
            priority: new.priority,
            due_time: new.due_time,
            frequency: new.frequency,
            completed: false,
        })
    }

    /// Rebuilds a previously persisted task, including its completion state.
    ///
    /// Intended for storage collaborators; the result still has to pass
    /// through [`Owner::from_state`](crate::Owner::from_state) to be used.
    pub fn restore(
        id: TaskId,
        pet_id: PetId,
        new: NewTask,
        completed: bool,
    ) -> Result<Self, ValidationError> {
        let mut task = Self::new(id, pet_id, new)?;
        task.completed = completed;
        Ok(task)
    }

    /// Re-checks the invariants of a task that bypassed [`Task::new`], e.g. one
    /// that was deserialized.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.description.trim().is_empty() {
            return Err(ValidationError::Empty {
                field: "description",
            });
        }
        if self.duration_minutes == 0 {
            return Err(ValidationError::ZeroDuration);
        }
        check_end(self.due_time, self.duration_minutes)
    }

    pub const fn id(&self) -> TaskId {
        self.id
    }

    pub const fn pet_id(&self) -> PetId {
        self.pet_id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub const fn duration_minutes(&self) -> u32 {
        self.duration_minutes
    }

    pub const fn priority(&self) -> Priority {
        self.priority
    }

    pub const fn due_time(&self) -> Option<NaiveDateTime> {
        self.due_time
    }

    pub const fn frequency(&self) -> Frequency {
        self.frequency
    }

    pub const fn is_completed(&self) -> bool {
        self.completed
    }

    /// When the task finishes, if it is scheduled.
    pub fn end_time(&self) -> Option<NaiveDateTime> {
        self.window().map(|window| window.end)
    }

    /// The half-open interval the task occupies, if it is scheduled.
    pub fn window(&self) -> Option<Window> {
        let start = self.due_time?;
        let end = end_of(start, self.duration_minutes)?;
        Some(Window { start, end })
    }

    /// Whether both tasks are scheduled and their windows overlap.
    pub fn overlaps_with(&self, other: &Self) -> bool {
        match (self.window(), other.window()) {
            (Some(a), Some(b)) => a.overlaps(&b),
            _ => false,
        }
    }

    /// Flips the completion flag. Returns `true` only on the false-to-true edge.
    pub(crate) const fn mark_complete(&mut self) -> bool {
        if self.completed {
            return false;
        }
        self.completed = true;
        true
    }

    /// Copy of this task under a new id, uncompleted, due at `due_time`.
    pub(crate) fn respawn(&self, id: TaskId, due_time: Option<NaiveDateTime>) -> Self {
        Self {
            id,
            due_time,
            completed: false,
            ..self.clone()
        }
    }

    #[cfg(test)]
    pub(crate) fn with_completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }
}

/// `start + minutes`, or `None` past chrono's last representable instant.
pub(crate) fn end_of(start: NaiveDateTime, minutes: u32) -> Option<NaiveDateTime> {
    start.checked_add_signed(TimeDelta::minutes(i64::from(minutes)))
}

fn check_end(due_time: Option<NaiveDateTime>, minutes: u32) -> Result<(), ValidationError> {
    match due_time {
        Some(start) if end_of(start, minutes).is_none() => Err(ValidationError::EndOutOfRange),
        _ => Ok(()),
    }
}

/// Half-open time interval `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl Window {
    /// Touching endpoints do not overlap.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::{NaiveDate, NaiveDateTime};

    use super::{NewTask, Task};
    use crate::types::{Frequency, PetId, Priority, TaskId};

    pub fn at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    pub fn task(id: u64, pet: u64, description: &str, minutes: u32) -> NewTaskBuilder {
        NewTaskBuilder {
            id,
            pet,
            new: NewTask::new(description, minutes),
        }
    }

    pub struct NewTaskBuilder {
        id: u64,
        pet: u64,
        new: NewTask,
    }

    impl NewTaskBuilder {
        pub fn due(mut self, hour: u32, minute: u32) -> Self {
            self.new = self.new.due(at(hour, minute));
            self
        }

        pub fn priority(mut self, priority: Priority) -> Self {
            self.new = self.new.priority(priority);
            self
        }

        pub fn frequency(mut self, frequency: Frequency) -> Self {
            self.new = self.new.frequency(frequency);
            self
        }

        pub fn build(self) -> Task {
            Task::new(TaskId::new(self.id), PetId::new(self.pet), self.new).unwrap()
        }

        pub fn completed(self) -> Task {
            self.build().with_completed(true)
        }
    }
}
