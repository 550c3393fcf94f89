//! Errors surfaced by a scheduling pass and by session actions.

use crate::task_validation::TaskValidationError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScheduleError {
    #[error("cycle detected in dependencies: {}", format_cycle(.cycle))]
    InvalidDependencyGraph { cycle: Vec<String> },

    #[error(transparent)]
    InvalidTask(#[from] TaskValidationError),

    #[error("task '{0}' not found")]
    TaskNotFound(String),

    #[error("task '{0}' is already completed")]
    AlreadyCompleted(String),

    #[error("task '{task}' ends outside the representable time range")]
    ScheduleOutOfRange { task: String },

    #[error("task '{name}' is waiting for {} to be completed", .blocked_by.join(", "))]
    NotMarkable {
        name: String,
        blocked_by: Vec<String>,
    },
}

pub type ScheduleResult<T> = Result<T, ScheduleError>;

fn format_cycle(cycle: &[String]) -> String {
    match cycle.first() {
        Some(first) => format!("{} -> {}", cycle.join(" -> "), first),
        None => "unknown path".to_string(),
    }
}
