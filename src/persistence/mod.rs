use crate::completion::CompletionSet;
use crate::config::ScheduleConfig;
use crate::metadata::ScheduleMetadata;
use crate::schedule::Schedule;
use crate::store::{TaskSource, TaskStore};
use crate::task::TaskRecord;
use crate::task_validation;
use serde::{Deserialize, Serialize};
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[cfg(feature = "sqlite")]
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid data: {0}")]
    InvalidData(String),
    #[error("storage lock poisoned")]
    LockPoisoned,
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;

pub trait ScheduleStore {
    fn save_schedule(&self, schedule: &Schedule) -> PersistenceResult<()>;
    fn load_schedule(&self) -> PersistenceResult<Option<Schedule>>;
}

/// Everything a session needs to be restored, minus its configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub metadata: ScheduleMetadata,
    pub tasks: Vec<TaskRecord>,
    #[serde(default)]
    pub completed: CompletionSet,
}

impl SessionSnapshot {
    pub fn from_schedule(schedule: &Schedule) -> PersistenceResult<Self> {
        validate_tasks(schedule.tasks())?;
        Ok(Self {
            metadata: schedule.metadata().clone(),
            tasks: schedule.store().list_tasks().to_vec(),
            completed: schedule.completed().clone(),
        })
    }

    /// Restore a session. Completion flags are carried over as stored.
    pub fn into_schedule(self, config: ScheduleConfig) -> PersistenceResult<Schedule> {
        validate_tasks(&self.tasks)?;
        let store = TaskStore::from_parts(self.tasks, self.completed);
        Ok(Schedule::from_parts(self.metadata, config, store))
    }
}

pub fn validate_tasks(tasks: &[TaskRecord]) -> PersistenceResult<()> {
    for task in tasks {
        task_validation::validate_name(task)
            .map_err(|err| PersistenceError::InvalidData(err.to_string()))?;
    }
    Ok(())
}

pub mod file;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use file::{
    load_schedule_from_csv, load_schedule_from_json, save_schedule_to_csv, save_schedule_to_json,
};
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteScheduleStore;
