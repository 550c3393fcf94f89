use crate::errors::{ScheduleError, ScheduleResult};
use crate::graph::{DependencyGraph, find_cycle};
use chrono::{Duration, NaiveDateTime};
use std::cmp::Reverse;
use std::collections::BinaryHeap;

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// Computed timing for one node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeTiming {
    pub index: usize,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

/// `None` when the duration does not fit in a `Duration`.
pub fn hours_to_duration(hours: f64) -> Option<Duration> {
    let millis = (hours * MILLIS_PER_HOUR).round();
    if !millis.is_finite() || millis < 0.0 || millis >= i64::MAX as f64 {
        return None;
    }
    Duration::try_milliseconds(millis as i64)
}

/// Kahn's algorithm; among ready nodes the one inserted first goes first.
pub fn topological_order(graph: &DependencyGraph) -> ScheduleResult<Vec<usize>> {
    let mut in_degree: Vec<usize> = (0..graph.len())
        .map(|idx| graph.node(idx).predecessors.len())
        .collect();
    let mut ready: BinaryHeap<Reverse<usize>> = in_degree
        .iter()
        .enumerate()
        .filter(|&(_, &deg)| deg == 0)
        .map(|(idx, _)| Reverse(idx))
        .collect();

    let mut order = Vec::with_capacity(graph.len());
    while let Some(Reverse(idx)) = ready.pop() {
        order.push(idx);
        for &succ in &graph.node(idx).successors {
            in_degree[succ] -= 1;
            if in_degree[succ] == 0 {
                ready.push(Reverse(succ));
            }
        }
    }

    if order.len() < graph.len() {
        return Err(ScheduleError::InvalidDependencyGraph {
            cycle: find_cycle(graph).unwrap_or_default(),
        });
    }
    Ok(order)
}

pub struct ForwardPass<'a> {
    graph: &'a DependencyGraph,
}

impl<'a> ForwardPass<'a> {
    pub fn new(graph: &'a DependencyGraph) -> Self {
        Self { graph }
    }

    /// Timings in topological order. Roots start at `anchor`; every other node
    /// starts once its slowest direct dependency has finished.
    pub fn execute(&self, anchor: NaiveDateTime) -> ScheduleResult<Vec<NodeTiming>> {
        let order = topological_order(self.graph)?;
        let mut finishes: Vec<Option<NaiveDateTime>> = vec![None; self.graph.len()];
        let mut timings = Vec::with_capacity(order.len());

        for idx in order {
            let node = self.graph.node(idx);
            let start = node
                .predecessors
                .iter()
                .filter_map(|&pred| finishes[pred])
                .max()
                .unwrap_or(anchor);
            let end = hours_to_duration(node.duration_hours)
                .and_then(|duration| start.checked_add_signed(duration))
                .ok_or_else(|| ScheduleError::ScheduleOutOfRange {
                    task: self.graph.name(idx).to_string(),
                })?;
            finishes[idx] = Some(end);
            timings.push(NodeTiming { index: idx, start, end });
        }

        Ok(timings)
    }
}
