use chrono::{Duration, NaiveDate, NaiveDateTime};
use nexflow::report::status_label;
use nexflow::{
    CompletionSet, PassClock, Schedule, ScheduleConfig, TaskRecord, TaskStatus, compute_schedule,
    compute_schedule_with,
};

fn t() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 1, 6)
        .unwrap()
        .and_hms_opt(14, 0, 0)
        .unwrap()
}

#[test]
fn root_before_its_end_is_in_progress() {
    let tasks = vec![TaskRecord::new("A", 2.0)];
    let entries = compute_schedule(&tasks, &CompletionSet::new(), t()).unwrap();
    assert_eq!(entries[0].status, TaskStatus::InProgress);
    assert!(entries[0].markable);
    assert_eq!(status_label(&entries[0]), "In Progress");
}

#[test]
fn root_past_its_end_is_running_late() {
    let tasks = vec![TaskRecord::new("A", 1.0)];
    let clock = PassClock::anchored(t() - Duration::hours(3), t());
    let entries =
        compute_schedule_with(&tasks, &CompletionSet::new(), clock, &ScheduleConfig::default())
            .unwrap();
    assert_eq!(entries[0].end, t() - Duration::hours(2));
    assert_eq!(entries[0].status, TaskStatus::RunningLate);
    assert!(entries[0].markable);
    assert_eq!(status_label(&entries[0]), "Running Late");
}

#[test]
fn dependent_of_unfinished_task_waits() {
    let tasks = vec![
        TaskRecord::new("A", 1.0),
        TaskRecord::new("B", 1.0).with_dependency("A"),
    ];
    // B's own window is long past; the dependency still takes precedence.
    let clock = PassClock::anchored(t() - Duration::hours(10), t());
    let entries =
        compute_schedule_with(&tasks, &CompletionSet::new(), clock, &ScheduleConfig::default())
            .unwrap();
    let b = entries.iter().find(|e| e.name == "B").unwrap();
    assert_eq!(b.status, TaskStatus::Waiting);
    assert_eq!(b.blocked_by, vec!["A".to_string()]);
    assert!(!b.markable);
    assert_eq!(status_label(b), "Waiting for A to be completed");
}

#[test]
fn completed_task_is_absent() {
    let tasks = vec![TaskRecord::new("A", 1.0), TaskRecord::new("B", 1.0)];
    let completed: CompletionSet = ["A"].into_iter().collect();
    let entries = compute_schedule(&tasks, &completed, t()).unwrap();
    assert_eq!(entries.len(), 1);
    assert!(entries.iter().all(|e| e.name != "A"));
}

#[test]
fn shared_predecessor_fans_out_to_same_start() {
    let mut schedule = Schedule::new();
    schedule.add("A", 3.0, None).unwrap();
    schedule.add("B", 1.0, Some("A")).unwrap();
    schedule.add("C", 2.0, Some("A")).unwrap();
    schedule.mark_done("A", t()).unwrap();

    let entries = schedule.compute(t()).unwrap();
    let b = entries.iter().find(|e| e.name == "B").unwrap();
    let c = entries.iter().find(|e| e.name == "C").unwrap();
    assert_eq!(b.start, t() + Duration::hours(3));
    assert_eq!(c.start, t() + Duration::hours(3));
    assert!(b.markable && c.markable);
}

#[test]
fn readding_completed_task_makes_it_pending_again() {
    let mut schedule = Schedule::new();
    schedule.add("A", 1.0, None).unwrap();
    schedule.mark_done("A", t()).unwrap();
    assert!(schedule.compute(t()).unwrap().is_empty());

    schedule.add("A", 2.0, None).unwrap();
    assert!(!schedule.completed().contains("A"));
    let entries = schedule.compute(t()).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].name, "A");
    assert_eq!(entries[0].duration_hours, 2.0);
    assert_eq!(entries[0].status, TaskStatus::InProgress);
}
