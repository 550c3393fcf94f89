pub mod calculations;
pub mod completion;
pub mod config;
pub mod errors;
pub mod graph;
#[cfg(feature = "http_api")]
pub mod http_api;
pub mod logging;
pub mod metadata;
pub mod pass;
pub mod persistence;
pub mod report;
pub mod schedule;
pub mod store;
pub mod task;
pub mod task_validation;

pub use calculations::TaskStatus;
pub use completion::CompletionSet;
pub use config::{AnchorMode, ConfigError, ScheduleConfig, ValidationMode};
pub use errors::{ScheduleError, ScheduleResult};
pub use metadata::ScheduleMetadata;
pub use pass::{PassClock, ScheduleEntry, compute_schedule, compute_schedule_with};
pub use schedule::{RefreshSummary, Schedule};
pub use store::{TaskSource, TaskStore};
pub use task::TaskRecord;
pub use task_validation::TaskValidationError;
pub use persistence::{
    PersistenceError, ScheduleStore, SessionSnapshot, load_schedule_from_csv,
    load_schedule_from_json, save_schedule_to_csv, save_schedule_to_json,
};
#[cfg(feature = "sqlite")]
pub use persistence::SqliteScheduleStore;
