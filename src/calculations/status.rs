use crate::completion::CompletionSet;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Completed,
    Waiting,
    InProgress,
    RunningLate,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Completed => "completed",
            TaskStatus::Waiting => "waiting",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::RunningLate => "running_late",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub status: TaskStatus,
    /// Direct dependencies that are not completed yet.
    pub blocked_by: Vec<String>,
    pub markable: bool,
}

/// Classify one task; the first matching rule wins.
///
/// 1. completed
/// 2. waiting on at least one unfinished direct dependency
/// 3. in progress while `now` is before the computed end
/// 4. running late otherwise
pub fn classify<'p>(
    name: &str,
    predecessors: impl IntoIterator<Item = &'p str>,
    end: NaiveDateTime,
    completed: &CompletionSet,
    now: NaiveDateTime,
) -> Classification {
    if completed.contains(name) {
        return Classification {
            status: TaskStatus::Completed,
            blocked_by: Vec::new(),
            markable: false,
        };
    }

    let blocked_by: Vec<String> = predecessors
        .into_iter()
        .filter(|pred| !completed.contains(pred))
        .map(str::to_string)
        .collect();
    if !blocked_by.is_empty() {
        return Classification {
            status: TaskStatus::Waiting,
            blocked_by,
            markable: false,
        };
    }

    let status = if now < end {
        TaskStatus::InProgress
    } else {
        TaskStatus::RunningLate
    };
    Classification {
        status,
        blocked_by,
        markable: true,
    }
}
