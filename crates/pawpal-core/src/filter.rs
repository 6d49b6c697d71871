//! Predicate composition over task collections.

use chrono::NaiveDate;

use crate::owner::Owner;
use crate::task::Task;

/// Criteria for [`filter_tasks`]. Unset criteria match everything; set ones
/// are combined with logical AND.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskFilter<'f> {
    /// Exact name of the owning pet.
    pub pet_name: Option<&'f str>,
    /// Required completion state.
    pub completed: Option<bool>,
}

impl<'f> TaskFilter<'f> {
    /// Matches every task.
    pub const fn all() -> Self {
        Self {
            pet_name: None,
            completed: None,
        }
    }

    #[must_use]
    pub const fn pet(mut self, name: &'f str) -> Self {
        self.pet_name = Some(name);
        self
    }

    #[must_use]
    pub const fn completed(mut self, completed: bool) -> Self {
        self.completed = Some(completed);
        self
    }

    fn matches(&self, task: &Task, owner: &Owner) -> bool {
        if self
            .completed
            .is_some_and(|completed| task.is_completed() != completed)
        {
            return false;
        }
        match self.pet_name {
            Some(name) => owner.pet_name(task.pet_id()) == Some(name),
            None => true,
        }
    }
}

/// Returns the tasks matching `filter`, in input order.
///
/// `owner` resolves each task's pet id to a pet name.
pub fn filter_tasks<'a, I>(tasks: I, owner: &Owner, filter: &TaskFilter<'_>) -> Vec<&'a Task>
where
    I: IntoIterator<Item = &'a Task>,
{
    tasks
        .into_iter()
        .filter(|task| filter.matches(task, owner))
        .collect()
}

/// Tasks due on `date`, plus unscheduled tasks, in input order.
pub fn tasks_due_on<'a, I>(tasks: I, date: NaiveDate) -> Vec<&'a Task>
where
    I: IntoIterator<Item = &'a Task>,
{
    tasks
        .into_iter()
        .filter(|task| task.due_time().is_none_or(|due| due.date() == date))
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::task::NewTask;
    use crate::types::TaskId;

    fn household() -> Owner {
        let mut owner = Owner::new("Test Owner");
        let rocky = owner.add_pet("Rocky", "Dog", 4).unwrap();
        let luna = owner.add_pet("Luna", "Cat", 2).unwrap();
        owner.add_task(rocky, NewTask::new("Walk Rocky", 30)).unwrap();
        owner.add_task(luna, NewTask::new("Feed Luna", 10)).unwrap();
        owner.add_task(rocky, NewTask::new("Feed Rocky", 10)).unwrap();
        owner.complete_task(TaskId::new(1)).unwrap();
        owner
    }

    fn descriptions(tasks: &[&Task]) -> Vec<String> {
        tasks.iter().map(|t| t.description().to_string()).collect()
    }

    #[test]
    fn no_criteria_returns_everything_in_order() {
        let owner = household();
        let all: Vec<&Task> = owner.tasks().collect();
        let filtered = filter_tasks(owner.tasks(), &owner, &TaskFilter::all());
        assert_eq!(filtered, all);
    }

    #[test]
    fn filters_by_pet_name() {
        let owner = household();
        let filtered = filter_tasks(owner.tasks(), &owner, &TaskFilter::all().pet("Rocky"));
        assert_eq!(descriptions(&filtered), ["Walk Rocky", "Feed Rocky"]);
    }

    #[test]
    fn pet_name_match_is_exact() {
        let owner = household();
        let filtered = filter_tasks(owner.tasks(), &owner, &TaskFilter::all().pet("rocky"));
        assert!(filtered.is_empty());
    }

    #[test]
    fn filters_by_completion() {
        let owner = household();
        let done = filter_tasks(owner.tasks(), &owner, &TaskFilter::all().completed(true));
        assert_eq!(descriptions(&done), ["Walk Rocky"]);
        let pending = filter_tasks(owner.tasks(), &owner, &TaskFilter::all().completed(false));
        assert_eq!(descriptions(&pending), ["Feed Rocky", "Feed Luna"]);
    }

    #[test]
    fn combined_criteria_are_the_intersection() {
        let owner = household();
        let by_pet = filter_tasks(owner.tasks(), &owner, &TaskFilter::all().pet("Rocky"));
        let by_state = filter_tasks(owner.tasks(), &owner, &TaskFilter::all().completed(false));
        let both = filter_tasks(
            owner.tasks(),
            &owner,
            &TaskFilter::all().pet("Rocky").completed(false),
        );
        let intersection: Vec<&Task> = by_pet
            .iter()
            .copied()
            .filter(|task| by_state.iter().any(|other| other.id() == task.id()))
            .collect();
        assert_eq!(both, intersection);
        assert_eq!(descriptions(&both), ["Feed Rocky"]);
    }

    #[test]
    fn unknown_pet_yields_nothing() {
        let owner = household();
        let filtered = filter_tasks(owner.tasks(), &owner, &TaskFilter::all().pet("Nobody"));
        assert!(filtered.is_empty());
    }

    #[test]
    fn due_on_keeps_same_day_and_unscheduled() {
        let mut owner = Owner::new("Test Owner");
        let pet = owner.add_pet("Rocky", "Dog", 4).unwrap();
        let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let next = day.succ_opt().unwrap();
        owner
            .add_task(pet, NewTask::new("today", 10).due(day.and_hms_opt(8, 0, 0).unwrap()))
            .unwrap();
        owner
            .add_task(pet, NewTask::new("tomorrow", 10).due(next.and_hms_opt(8, 0, 0).unwrap()))
            .unwrap();
        owner.add_task(pet, NewTask::new("whenever", 10)).unwrap();

        let due = tasks_due_on(owner.tasks(), day);
        assert_eq!(descriptions(&due), ["today", "whenever"]);
    }
}
