use crate::config::{ScheduleConfig, ValidationMode};
use crate::task::TaskRecord;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TaskValidationError {
    #[error("task name must not be empty")]
    EmptyName,

    #[error("task '{task}' has invalid duration {value:?} (must be a positive number of hours)")]
    InvalidDuration { task: String, value: Option<f64> },

    #[error("task '{task}' depends on unknown task '{dependency}'")]
    UnknownDependency { task: String, dependency: String },
}

/// Checks that hold in every validation mode.
pub fn validate_name(task: &TaskRecord) -> Result<(), TaskValidationError> {
    if task.name.trim().is_empty() {
        return Err(TaskValidationError::EmptyName);
    }
    Ok(())
}

/// Validate a record at submission time.
///
/// Lenient mode only rejects empty names; strict mode also rejects bad
/// durations. Dependencies are checked when the graph is built because the
/// referenced task may be submitted later.
pub fn validate_task(
    task: &TaskRecord,
    config: &ScheduleConfig,
) -> Result<(), TaskValidationError> {
    validate_name(task)?;
    if config.validation == ValidationMode::Strict && task.valid_duration().is_none() {
        return Err(TaskValidationError::InvalidDuration {
            task: task.name.clone(),
            value: task.duration_hours,
        });
    }
    Ok(())
}

/// Duration to use for `task` in the graph.
pub fn resolve_duration(
    task: &TaskRecord,
    config: &ScheduleConfig,
) -> Result<f64, TaskValidationError> {
    if let Some(hours) = task.valid_duration() {
        return Ok(hours);
    }
    match config.validation {
        ValidationMode::Strict => Err(TaskValidationError::InvalidDuration {
            task: task.name.clone(),
            value: task.duration_hours,
        }),
        ValidationMode::Lenient => {
            warn!(
                task = %task.name,
                value = ?task.duration_hours,
                default = config.default_duration_hours,
                "coercing invalid duration to default"
            );
            Ok(config.default_duration_hours)
        }
    }
}
