//! The owner aggregate: every pet, every task, and the id counters.
//!
//! All mutation of pets and tasks goes through [`Owner`]. Id counters are
//! plain fields, so a single owner value is the single writer; sharing one
//! store between processes is not supported.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::pet::Pet;
use crate::recurrence::{Completion, Warning, regenerate};
use crate::task::{NewTask, Task};
use crate::types::{PetId, TaskId, ValidationError, require_non_empty};

/// Name used when nothing else is known about the owner.
pub const DEFAULT_OWNER_NAME: &str = "Pet Owner";

/// Errors returned by owner operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("pet not found: {0}")]
    PetNotFound(PetId),

    #[error("task not found: {0}")]
    TaskNotFound(TaskId),
}

/// Serializable snapshot of an owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerState {
    pub name: String,
    #[serde(default)]
    pub pets: Vec<Pet>,
}

/// A pet owner and everything they look after.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Owner {
    name: String,
    pets: BTreeMap<PetId, Pet>,
    next_pet_id: u64,
    next_task_id: u64,
}

impl Default for Owner {
    fn default() -> Self {
        Self::new(DEFAULT_OWNER_NAME)
    }
}

impl Owner {
    /// Creates an owner with no pets. A blank name falls back to
    /// [`DEFAULT_OWNER_NAME`].
    pub fn new(name: impl Into<String>) -> Self {
        let name = require_non_empty(name, "owner name")
            .unwrap_or_else(|_| DEFAULT_OWNER_NAME.to_string());
        Self {
            name,
            pets: BTreeMap::new(),
            next_pet_id: 1,
            next_task_id: 1,
        }
    }

    /// Rebuilds an owner from a snapshot.
    ///
    /// Every pet and task is re-validated and ids must be unique. Both id
    /// counters resume one past the largest id seen, so regenerated tasks
    /// never collide with restored ones. A snapshot holding `u64::MAX` as an
    /// id leaves no room for a counter and is rejected.
    pub fn from_state(state: OwnerState) -> Result<Self, ValidationError> {
        let mut owner = Self::new(state.name);
        let mut seen_tasks = std::collections::HashSet::new();
        let mut max_task_id = 0;

        for pet in state.pets {
            pet.validate()?;
            for task in pet.tasks() {
                if !seen_tasks.insert(task.id()) {
                    return Err(ValidationError::DuplicateTaskId { id: task.id() });
                }
                max_task_id = max_task_id.max(task.id().get());
            }
            let id = pet.id();
            if owner.pets.insert(id, pet).is_some() {
                return Err(ValidationError::DuplicatePetId { id });
            }
        }

        owner.next_task_id = following(max_task_id, "task")?;
        if let Some(max_pet_id) = owner.pets.keys().next_back() {
            owner.next_pet_id = following(max_pet_id.get(), "pet")?;
        }

        tracing::debug!(
            pets = owner.pets.len(),
            tasks = seen_tasks.len(),
            next_task_id = owner.next_task_id,
            "restored owner state"
        );
        Ok(owner)
    }

    /// Snapshot of the owner suitable for serialization.
    pub fn to_state(&self) -> OwnerState {
        OwnerState {
            name: self.name.clone(),
            pets: self.pets.values().cloned().collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The id the next created task will receive.
    pub const fn next_task_id(&self) -> TaskId {
        TaskId::new(self.next_task_id)
    }

    /// Registers a new pet and returns its id.
    pub fn add_pet(
        &mut self,
        name: impl Into<String>,
        species: impl Into<String>,
        age: i64,
    ) -> Result<PetId, ValidationError> {
        let id = PetId::new(self.next_pet_id);
        let next_pet_id = following(self.next_pet_id, "pet")?;
        let pet = Pet::new(id, name, species, age)?;
        tracing::debug!(pet_id = %id, name = pet.name(), "added pet");
        self.pets.insert(id, pet);
        self.next_pet_id = next_pet_id;
        Ok(id)
    }

    /// Pets in id order.
    pub fn pets(&self) -> impl Iterator<Item = &Pet> {
        self.pets.values()
    }

    pub fn pet(&self, id: PetId) -> Option<&Pet> {
        self.pets.get(&id)
    }

    /// First pet (in id order) with exactly this name.
    pub fn pet_by_name(&self, name: &str) -> Option<&Pet> {
        self.pets.values().find(|pet| pet.name() == name)
    }

    pub fn pet_name(&self, id: PetId) -> Option<&str> {
        self.pets.get(&id).map(Pet::name)
    }

    /// Every task, grouped by pet in id order, each pet's tasks in insertion order.
    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.pets.values().flat_map(Pet::tasks)
    }

    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks().find(|task| task.id() == id)
    }

    pub fn task_count(&self) -> usize {
        self.pets.values().map(|pet| pet.tasks().len()).sum()
    }

    /// Creates a task for `pet_id` with a fresh id.
    ///
    /// Nothing changes, not even the id counter, if validation fails.
    pub fn add_task(&mut self, pet_id: PetId, new: NewTask) -> Result<&Task, EngineError> {
        let id = TaskId::new(self.next_task_id);
        let next_task_id = following(self.next_task_id, "task")?;
        let pet = self
            .pets
            .get_mut(&pet_id)
            .ok_or(EngineError::PetNotFound(pet_id))?;
        let task = Task::new(id, pet_id, new)?;
        tracing::debug!(task_id = %id, %pet_id, description = task.description(), "added task");
        self.next_task_id = next_task_id;
        Ok(pet.push_task(task))
    }

    /// Marks a task completed and, for recurring tasks, appends its successor
    /// to the same pet.
    ///
    /// A successor is created only on the transition to completed. Completing
    /// an already-completed task changes nothing and reports
    /// [`Warning::AlreadyCompleted`]. If a successor is due but no task id is
    /// left for it, the task stays pending and an error is returned.
    pub fn complete_task(&mut self, task_id: TaskId) -> Result<Completion, EngineError> {
        let successor_id = TaskId::new(self.next_task_id);
        let pet = self
            .pets
            .values_mut()
            .find(|pet| pet.tasks().iter().any(|task| task.id() == task_id))
            .ok_or(EngineError::TaskNotFound(task_id))?;
        let task = pet
            .task_mut(task_id)
            .ok_or(EngineError::TaskNotFound(task_id))?;
        let next_task_id = if !task.is_completed() && task.frequency().is_recurring() {
            following(self.next_task_id, "task")?
        } else {
            self.next_task_id
        };

        if !task.mark_complete() {
            tracing::debug!(%task_id, "task already completed");
            return Ok(Completion {
                completed: task.clone(),
                successor: None,
                warnings: vec![Warning::AlreadyCompleted { task_id }],
            });
        }

        let completed = task.clone();
        let Some(regenerated) = regenerate(&completed, successor_id) else {
            tracing::debug!(%task_id, "completed one-time task");
            return Ok(Completion {
                completed,
                successor: None,
                warnings: Vec::new(),
            });
        };

        for warning in &regenerated.warnings {
            tracing::warn!(%task_id, %warning, "degraded recurrence");
        }
        tracing::debug!(
            %task_id,
            successor_id = %successor_id,
            due = ?regenerated.task.due_time(),
            "created successor task"
        );
        pet.push_task(regenerated.task.clone());
        self.next_task_id = next_task_id;

        Ok(Completion {
            completed,
            successor: Some(regenerated.task),
            warnings: regenerated.warnings,
        })
    }
}

/// The id after `id`, or an error once the id space is used up.
fn following(id: u64, kind: &'static str) -> Result<u64, ValidationError> {
    id.checked_add(1).ok_or(ValidationError::IdsExhausted { kind })
}
