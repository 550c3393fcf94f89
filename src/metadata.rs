use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleMetadata {
    pub project_name: String,
    pub project_description: String,
    /// Start of the session; the anchor for roots under `AnchorMode::Session`.
    pub session_started: NaiveDateTime,
}

impl ScheduleMetadata {
    pub fn new(session_started: NaiveDateTime) -> Self {
        Self {
            project_name: "New Project".to_string(),
            project_description: "No description".to_string(),
            session_started,
        }
    }
}

impl Default for ScheduleMetadata {
    fn default() -> Self {
        Self::new(Local::now().naive_local())
    }
}
