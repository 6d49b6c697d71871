//! Pets and the tasks they own.

use serde::{Deserialize, Serialize};

use crate::task::Task;
use crate::types::{PetId, TaskId, ValidationError, require_non_empty};

/// A pet and its care tasks, in insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pet {
    id: PetId,
    name: String,
    species: String,
    age: u32,
    #[serde(default)]
    tasks: Vec<Task>,
}

impl Pet {
    /// Builds a validated pet with no tasks.
    pub fn new(
        id: PetId,
        name: impl Into<String>,
        species: impl Into<String>,
        age: i64,
    ) -> Result<Self, ValidationError> {
        let name = require_non_empty(name, "pet name")?;
        let species = require_non_empty(species, "species")?;
        if age < 0 {
            return Err(ValidationError::NegativeAge { value: age });
        }
        let age = u32::try_from(age).map_err(|_| ValidationError::AgeOutOfRange { value: age })?;
        Ok(Self {
            id,
            name,
            species,
            age,
            tasks: Vec::new(),
        })
    }

    /// Rebuilds a previously persisted pet together with its tasks, in order.
    pub fn restore(
        id: PetId,
        name: impl Into<String>,
        species: impl Into<String>,
        age: i64,
        tasks: Vec<Task>,
    ) -> Result<Self, ValidationError> {
        let mut pet = Self::new(id, name, species, age)?;
        pet.tasks = tasks;
        pet.validate()?;
        Ok(pet)
    }

    /// Re-checks the invariants of a pet that bypassed [`Pet::new`], including
    /// every task it holds.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_non_empty(self.name.as_str(), "pet name")?;
        require_non_empty(self.species.as_str(), "species")?;
        for task in &self.tasks {
            if task.pet_id() != self.id {
                return Err(ValidationError::PetMismatch {
                    task: task.id(),
                    expected: task.pet_id(),
                    actual: self.id,
                });
            }
            task.validate()?;
        }
        Ok(())
    }

    pub const fn id(&self) -> PetId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn species(&self) -> &str {
        &self.species
    }

    pub const fn age(&self) -> u32 {
        self.age
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub(crate) fn push_task(&mut self, task: Task) -> &Task {
        debug_assert_eq!(task.pet_id(), self.id);
        let index = self.tasks.len();
        self.tasks.push(task);
        &self.tasks[index]
    }

    pub(crate) fn task_mut(&mut self, id: TaskId) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|task| task.id() == id)
    }
}
