use serde::{Deserialize, Serialize};

/// A task as submitted by the user.
///
/// `duration_hours` stays optional so malformed submissions can be carried
/// through to the graph builder, which decides whether to coerce or reject
/// them depending on the configured [`ValidationMode`](crate::ValidationMode).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_hours: Option<f64>,
    /// Name of the single task this one waits on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependency: Option<String>,
}

impl TaskRecord {
    pub fn new(name: impl Into<String>, duration_hours: f64) -> Self {
        Self {
            name: name.into(),
            duration_hours: Some(duration_hours),
            dependency: None,
        }
    }

    pub fn with_dependency(mut self, dependency: impl Into<String>) -> Self {
        self.dependency = Some(dependency.into());
        self
    }

    /// The dependency name, if one is set and not blank.
    pub fn dependency_name(&self) -> Option<&str> {
        self.dependency
            .as_deref()
            .filter(|name| !name.trim().is_empty())
    }

    /// Duration if it is a usable positive number of hours.
    pub fn valid_duration(&self) -> Option<f64> {
        self.duration_hours
            .filter(|hours| hours.is_finite() && *hours > 0.0)
    }
}
