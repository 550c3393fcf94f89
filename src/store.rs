use crate::completion::CompletionSet;
use crate::task::TaskRecord;
use serde::{Deserialize, Serialize};

/// Read side of the task store, as consumed by a scheduling pass.
pub trait TaskSource {
    fn list_tasks(&self) -> &[TaskRecord];
    fn completed_names(&self) -> &CompletionSet;
}

/// In-memory task records in submission order plus the completion set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskStore {
    tasks: Vec<TaskRecord>,
    completed: CompletionSet,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a store from persisted parts without touching completion flags.
    pub fn from_parts(tasks: Vec<TaskRecord>, completed: CompletionSet) -> Self {
        Self { tasks, completed }
    }

    /// Append a record. Re-submitting a name clears its completion flag.
    pub fn add_task(&mut self, task: TaskRecord) {
        self.completed.unmark(&task.name);
        self.tasks.push(task);
    }

    pub fn mark_complete(&mut self, name: impl Into<String>) -> bool {
        self.completed.mark(name)
    }

    pub fn unmark(&mut self, name: &str) -> bool {
        self.completed.unmark(name)
    }

    pub fn is_completed(&self, name: &str) -> bool {
        self.completed.contains(name)
    }

    /// True when any record carries `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.tasks.iter().any(|task| task.name == name)
    }

    /// Last submitted record for `name`.
    pub fn latest(&self, name: &str) -> Option<&TaskRecord> {
        self.tasks.iter().rev().find(|task| task.name == name)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn into_parts(self) -> (Vec<TaskRecord>, CompletionSet) {
        (self.tasks, self.completed)
    }
}

impl TaskSource for TaskStore {
    fn list_tasks(&self) -> &[TaskRecord] {
        &self.tasks
    }

    fn completed_names(&self) -> &CompletionSet {
        &self.completed
    }
}
