use chrono::{Duration, NaiveDate, NaiveDateTime};
use nexflow::{CompletionSet, ScheduleEntry, TaskRecord, compute_schedule};
use proptest::prelude::*;
use std::collections::HashMap;

fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 6, 2)
        .unwrap()
        .and_hms_opt(10, 0, 0)
        .unwrap()
}

// Acyclic by construction: task N may only depend on tasks 0..N-1.
// Durations are whole quarter hours so every end time is exact.
fn acyclic_tasks_strategy(max_tasks: usize) -> impl Strategy<Value = Vec<TaskRecord>> {
    (1..=max_tasks).prop_flat_map(|num_tasks| {
        proptest::collection::vec((1..=32u32, any::<Option<usize>>()), num_tasks).prop_map(
            |raw| {
                raw.into_iter()
                    .enumerate()
                    .map(|(i, (quarters, dep))| {
                        let record = TaskRecord::new(format!("task_{i}"), quarters as f64 * 0.25);
                        match dep {
                            Some(dep_idx) if i > 0 => {
                                record.with_dependency(format!("task_{}", dep_idx % i))
                            }
                            _ => record,
                        }
                    })
                    .collect()
            },
        )
    })
}

fn by_name(entries: &[ScheduleEntry]) -> HashMap<&str, &ScheduleEntry> {
    entries.iter().map(|e| (e.name.as_str(), e)).collect()
}

proptest! {
    #[test]
    fn timing_follows_dependencies(tasks in acyclic_tasks_strategy(24)) {
        let entries = compute_schedule(&tasks, &CompletionSet::new(), now()).unwrap();
        prop_assert_eq!(entries.len(), tasks.len());

        let entries_by_name = by_name(&entries);
        for task in &tasks {
            let entry = entries_by_name[task.name.as_str()];
            let expected_end = entry.start
                + Duration::milliseconds((entry.duration_hours * 3_600_000.0) as i64);
            prop_assert_eq!(entry.end, expected_end);
            match task.dependency_name() {
                None => prop_assert_eq!(entry.start, now()),
                Some(dep) => prop_assert_eq!(entry.start, entries_by_name[dep].end),
            }
        }
    }

    #[test]
    fn output_is_topologically_ordered(tasks in acyclic_tasks_strategy(24)) {
        let entries = compute_schedule(&tasks, &CompletionSet::new(), now()).unwrap();
        let position: HashMap<&str, usize> = entries
            .iter()
            .enumerate()
            .map(|(idx, e)| (e.name.as_str(), idx))
            .collect();
        for task in &tasks {
            if let Some(dep) = task.dependency_name() {
                prop_assert!(position[dep] < position[task.name.as_str()]);
            }
        }
    }

    #[test]
    fn completed_tasks_never_appear(
        tasks in acyclic_tasks_strategy(24),
        picks in proptest::collection::vec(any::<usize>(), 0..8),
    ) {
        let completed: CompletionSet = picks
            .iter()
            .map(|p| tasks[p % tasks.len()].name.clone())
            .collect();
        let entries = compute_schedule(&tasks, &completed, now()).unwrap();

        prop_assert_eq!(entries.len(), tasks.len() - completed.len());
        for entry in &entries {
            prop_assert!(!completed.contains(&entry.name));
            let blocked = entry.blocked_by.iter().any(|b| !completed.contains(b));
            prop_assert_eq!(entry.markable, !blocked);
        }

        let again = compute_schedule(&tasks, &completed, now()).unwrap();
        prop_assert_eq!(entries, again);
    }
}
