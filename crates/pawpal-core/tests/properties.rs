//! Property tests for the scheduling engine.

use std::collections::HashSet;

use chrono::{NaiveDate, NaiveDateTime};
use pawpal_core::{
    ConflictKind, Frequency, NewTask, Owner, Priority, Task, TaskFilter, TaskId,
    detect_all_conflicts, filter_tasks, generate_daily_schedule, sort_by_priority_and_time,
    sort_tasks_by_time,
};
use proptest::prelude::*;

#[derive(Debug, Clone)]
struct TaskSpec {
    pet: usize,
    minutes: u32,
    priority: Priority,
    due: Option<u32>,
    frequency: Frequency,
    complete: bool,
}

fn priority() -> impl Strategy<Value = Priority> {
    prop_oneof![Just(Priority::High), Just(Priority::Medium), Just(Priority::Low)]
}

fn frequency() -> impl Strategy<Value = Frequency> {
    prop_oneof![
        Just(Frequency::OneTime),
        Just(Frequency::Daily),
        Just(Frequency::Weekly),
        Just(Frequency::Monthly),
    ]
}

fn task_spec() -> impl Strategy<Value = TaskSpec> {
    (
        0..3usize,
        1..180u32,
        priority(),
        proptest::option::of(0..(24 * 60u32)),
        frequency(),
        any::<bool>(),
    )
        .prop_map(|(pet, minutes, priority, due, frequency, complete)| TaskSpec {
            pet,
            minutes,
            priority,
            due,
            frequency,
            complete,
        })
}

fn minute_of_day(minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(minute / 60, minute % 60, 0)
        .unwrap()
}

/// Builds an owner with three pets and the given tasks, completing the ones
/// flagged for completion.
fn build_owner(specs: &[TaskSpec]) -> Owner {
    let mut owner = Owner::new("Prop Owner");
    let pets = [
        owner.add_pet("Rocky", "Dog", 4).unwrap(),
        owner.add_pet("Luna", "Cat", 2).unwrap(),
        owner.add_pet("Tweety", "Bird", 1).unwrap(),
    ];
    let mut to_complete = Vec::new();
    for spec in specs {
        let mut new = NewTask::new("task", spec.minutes)
            .priority(spec.priority)
            .frequency(spec.frequency);
        if let Some(minute) = spec.due {
            new = new.due(minute_of_day(minute));
        }
        let id = owner.add_task(pets[spec.pet], new).unwrap().id();
        if spec.complete {
            to_complete.push(id);
        }
    }
    for id in to_complete {
        owner.complete_task(id).unwrap();
    }
    owner
}

proptest! {
    #[test]
    fn time_sort_puts_unscheduled_last_and_timed_ascending(specs in prop::collection::vec(task_spec(), 0..40)) {
        let owner = build_owner(&specs);
        let sorted = sort_tasks_by_time(owner.tasks());
        prop_assert_eq!(sorted.len(), owner.task_count());

        let first_unscheduled = sorted.iter().position(|t| t.due_time().is_none()).unwrap_or(sorted.len());
        prop_assert!(sorted[first_unscheduled..].iter().all(|t| t.due_time().is_none()));
        prop_assert!(sorted[..first_unscheduled]
            .windows(2)
            .all(|pair| pair[0].due_time() <= pair[1].due_time()));
    }

    #[test]
    fn time_sort_is_stable_for_unscheduled(specs in prop::collection::vec(task_spec(), 0..40)) {
        let owner = build_owner(&specs);
        let original: Vec<TaskId> = owner.tasks().filter(|t| t.due_time().is_none()).map(Task::id).collect();
        let sorted: Vec<TaskId> = sort_tasks_by_time(owner.tasks())
            .into_iter()
            .filter(|t| t.due_time().is_none())
            .map(Task::id)
            .collect();
        prop_assert_eq!(sorted, original);
    }

    #[test]
    fn priority_sort_never_inverts_bands(specs in prop::collection::vec(task_spec(), 0..40)) {
        let owner = build_owner(&specs);
        let sorted = sort_by_priority_and_time(owner.tasks());
        prop_assert!(sorted.windows(2).all(|pair| pair[0].priority() <= pair[1].priority()));
    }

    #[test]
    fn planner_respects_budget(specs in prop::collection::vec(task_spec(), 0..40), budget in 0..600u32) {
        let owner = build_owner(&specs);
        let plan = generate_daily_schedule(owner.tasks(), budget);

        let used: u32 = plan.accepted.iter().map(|t| t.duration_minutes()).sum();
        prop_assert!(used <= budget);
        prop_assert_eq!(used, plan.minutes_used);
        prop_assert_eq!(plan.minutes_used + plan.minutes_remaining, budget);
        prop_assert!(plan.accepted.iter().all(|t| t.duration_minutes() <= budget));
        prop_assert!(plan.accepted.iter().all(|t| !t.is_completed()));

        let expected_order = sort_by_priority_and_time(plan.accepted.iter().copied());
        prop_assert_eq!(&plan.accepted, &expected_order);

        let pending = owner.tasks().filter(|t| !t.is_completed()).count();
        prop_assert_eq!(plan.accepted.len() + plan.skipped.len(), pending);
    }

    #[test]
    fn conflicts_are_exactly_the_overlapping_pending_pairs(specs in prop::collection::vec(task_spec(), 0..25)) {
        let owner = build_owner(&specs);
        let conflicts = detect_all_conflicts(owner.tasks());

        let mut seen = HashSet::new();
        for conflict in &conflicts {
            prop_assert_ne!(conflict.task_a, conflict.task_b);
            let key = if conflict.task_a < conflict.task_b {
                (conflict.task_a, conflict.task_b)
            } else {
                (conflict.task_b, conflict.task_a)
            };
            prop_assert!(seen.insert(key));

            let a = owner.task(conflict.task_a).unwrap();
            let b = owner.task(conflict.task_b).unwrap();
            prop_assert!(!a.is_completed() && !b.is_completed());
            prop_assert!(a.overlaps_with(b));
            let same_pet = a.pet_id() == b.pet_id();
            prop_assert_eq!(conflict.kind == ConflictKind::SamePet, same_pet);
        }

        let pending: Vec<&Task> = owner.tasks().filter(|t| !t.is_completed()).collect();
        let mut expected = 0;
        for (i, a) in pending.iter().enumerate() {
            for b in &pending[i + 1..] {
                if a.overlaps_with(b) {
                    expected += 1;
                }
            }
        }
        prop_assert_eq!(conflicts.len(), expected);
    }

    #[test]
    fn filter_with_both_criteria_is_the_intersection(specs in prop::collection::vec(task_spec(), 0..40), completed in any::<bool>()) {
        let owner = build_owner(&specs);
        let by_pet: HashSet<TaskId> = filter_tasks(owner.tasks(), &owner, &TaskFilter::all().pet("Luna"))
            .into_iter().map(Task::id).collect();
        let by_state: HashSet<TaskId> = filter_tasks(owner.tasks(), &owner, &TaskFilter::all().completed(completed))
            .into_iter().map(Task::id).collect();
        let both: HashSet<TaskId> = filter_tasks(owner.tasks(), &owner, &TaskFilter::all().pet("Luna").completed(completed))
            .into_iter().map(Task::id).collect();
        let intersection: HashSet<TaskId> = by_pet.intersection(&by_state).copied().collect();
        prop_assert_eq!(both, intersection);

        let unfiltered = filter_tasks(owner.tasks(), &owner, &TaskFilter::all());
        let all: Vec<&Task> = owner.tasks().collect();
        prop_assert_eq!(unfiltered, all);
    }

    #[test]
    fn task_ids_stay_pairwise_distinct(specs in prop::collection::vec(task_spec(), 0..40), repeats in 0..3usize) {
        let mut owner = build_owner(&specs);
        for _ in 0..repeats {
            let ids: Vec<TaskId> = owner.tasks().map(Task::id).collect();
            for id in ids {
                owner.complete_task(id).unwrap();
            }
        }
        let ids: HashSet<TaskId> = owner.tasks().map(Task::id).collect();
        prop_assert_eq!(ids.len(), owner.task_count());
    }
}
