//! One scheduling pass: build the graph, reject cycles, run the forward pass
//! and classify every node against a single captured clock.

use crate::calculations::{ForwardPass, TaskStatus, classify};
use crate::completion::CompletionSet;
use crate::config::ScheduleConfig;
use crate::errors::ScheduleResult;
use crate::graph::{GraphBuilder, ensure_acyclic};
use crate::store::TaskSource;
use crate::task::TaskRecord;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Times captured once at the start of a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassClock {
    /// When tasks without dependencies start.
    pub anchor: NaiveDateTime,
    /// The instant statuses are evaluated against.
    pub now: NaiveDateTime,
}

impl PassClock {
    pub fn at(now: NaiveDateTime) -> Self {
        Self { anchor: now, now }
    }

    pub fn anchored(anchor: NaiveDateTime, now: NaiveDateTime) -> Self {
        Self { anchor, now }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub name: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub duration_hours: f64,
    pub status: TaskStatus,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub blocked_by: Vec<String>,
    pub markable: bool,
    /// Materialized from a dependency that was never submitted as a task.
    #[serde(default)]
    pub implicit: bool,
}

/// Schedule every non-completed task, with roots starting at `now`.
pub fn compute_schedule(
    tasks: &[TaskRecord],
    completed: &CompletionSet,
    now: NaiveDateTime,
) -> ScheduleResult<Vec<ScheduleEntry>> {
    compute_schedule_with(tasks, completed, PassClock::at(now), &ScheduleConfig::default())
}

pub fn compute_schedule_from<S: TaskSource + ?Sized>(
    source: &S,
    clock: PassClock,
    config: &ScheduleConfig,
) -> ScheduleResult<Vec<ScheduleEntry>> {
    compute_schedule_with(source.list_tasks(), source.completed_names(), clock, config)
}

pub fn compute_schedule_with(
    tasks: &[TaskRecord],
    completed: &CompletionSet,
    clock: PassClock,
    config: &ScheduleConfig,
) -> ScheduleResult<Vec<ScheduleEntry>> {
    let graph = GraphBuilder::new(tasks, config).build()?;
    ensure_acyclic(&graph)?;
    let timings = ForwardPass::new(&graph).execute(clock.anchor)?;

    let mut entries = Vec::with_capacity(timings.len());
    for timing in timings {
        let name = graph.name(timing.index);
        let node = graph.node(timing.index);
        let classification = classify(
            name,
            node.predecessors.iter().map(|&pred| graph.name(pred)),
            timing.end,
            completed,
            clock.now,
        );
        if classification.status == TaskStatus::Completed {
            continue;
        }
        entries.push(ScheduleEntry {
            name: name.to_string(),
            start: timing.start,
            end: timing.end,
            duration_hours: node.duration_hours,
            status: classification.status,
            blocked_by: classification.blocked_by,
            markable: classification.markable,
            implicit: node.implicit,
        });
    }

    debug!(
        tasks = tasks.len(),
        nodes = graph.len(),
        scheduled = entries.len(),
        "scheduling pass complete"
    );
    Ok(entries)
}
