use crate::calculations::TaskStatus;
use crate::completion::CompletionSet;
use crate::config::{AnchorMode, ScheduleConfig};
use crate::errors::{ScheduleError, ScheduleResult};
use crate::metadata::ScheduleMetadata;
use crate::pass::{self, PassClock, ScheduleEntry};
use crate::store::{TaskSource, TaskStore};
use crate::task::TaskRecord;
use crate::task_validation;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefreshSummary {
    pub task_count: usize,
    pub completed_count: usize,
    pub in_progress_count: usize,
    pub running_late_count: usize,
    pub waiting_count: usize,
    pub latest_finish: Option<NaiveDateTime>,
}

impl RefreshSummary {
    fn from_entries(entries: &[ScheduleEntry], completed_count: usize) -> Self {
        let count = |status: TaskStatus| entries.iter().filter(|e| e.status == status).count();
        Self {
            task_count: entries.len() + completed_count,
            completed_count,
            in_progress_count: count(TaskStatus::InProgress),
            running_late_count: count(TaskStatus::RunningLate),
            waiting_count: count(TaskStatus::Waiting),
            latest_finish: entries.iter().map(|e| e.end).max(),
        }
    }

    pub fn to_cli_summary(&self) -> String {
        let mut parts = Vec::new();
        parts.push(format!("tasks={}", self.task_count));
        parts.push(format!("done={}", self.completed_count));
        if self.in_progress_count > 0 {
            parts.push(format!("in_progress={}", self.in_progress_count));
        }
        if self.running_late_count > 0 {
            parts.push(format!("late={}", self.running_late_count));
        }
        if self.waiting_count > 0 {
            parts.push(format!("waiting={}", self.waiting_count));
        }
        if let Some(finish) = self.latest_finish {
            parts.push(format!("finish={}", finish.format("%Y-%m-%d %H:%M")));
        }
        parts.join(", ")
    }
}

/// A working session: the task store plus the settings every pass runs with.
#[derive(Debug, Clone)]
pub struct Schedule {
    store: TaskStore,
    metadata: ScheduleMetadata,
    config: ScheduleConfig,
}

impl Default for Schedule {
    fn default() -> Self {
        Self::new()
    }
}

impl Schedule {
    pub fn new() -> Self {
        Self::from_parts(ScheduleMetadata::default(), ScheduleConfig::default(), TaskStore::new())
    }

    pub fn with_config(config: ScheduleConfig) -> Self {
        Self::from_parts(ScheduleMetadata::default(), config, TaskStore::new())
    }

    pub fn new_with_metadata(metadata: ScheduleMetadata, config: ScheduleConfig) -> Self {
        Self::from_parts(metadata, config, TaskStore::new())
    }

    pub(crate) fn from_parts(
        metadata: ScheduleMetadata,
        config: ScheduleConfig,
        store: TaskStore,
    ) -> Self {
        Self {
            store,
            metadata,
            config,
        }
    }

    pub fn metadata(&self) -> &ScheduleMetadata {
        &self.metadata
    }

    pub fn config(&self) -> &ScheduleConfig {
        &self.config
    }

    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    pub fn tasks(&self) -> &[TaskRecord] {
        self.store.list_tasks()
    }

    pub fn completed(&self) -> &CompletionSet {
        self.store.completed_names()
    }

    pub fn set_config(&mut self, config: ScheduleConfig) {
        self.config = config;
    }

    pub fn set_project_name(&mut self, name: impl Into<String>) {
        self.metadata.project_name = name.into();
    }

    pub fn set_project_description(&mut self, description: impl Into<String>) {
        self.metadata.project_description = description.into();
    }

    pub fn add_task(&mut self, task: TaskRecord) -> ScheduleResult<()> {
        task_validation::validate_task(&task, &self.config)?;
        info!(task = %task.name, dependency = ?task.dependency_name(), "task added");
        self.store.add_task(task);
        Ok(())
    }

    pub fn add(
        &mut self,
        name: &str,
        duration_hours: f64,
        dependency: Option<&str>,
    ) -> ScheduleResult<()> {
        let mut task = TaskRecord::new(name, duration_hours);
        task.dependency = dependency.map(str::to_string);
        self.add_task(task)
    }

    /// Clock for a pass run at `now`, honouring the configured anchor mode.
    pub fn clock(&self, now: NaiveDateTime) -> PassClock {
        match self.config.anchor {
            AnchorMode::Pass => PassClock::at(now),
            AnchorMode::Session => PassClock::anchored(self.metadata.session_started, now),
        }
    }

    pub fn compute(&self, now: NaiveDateTime) -> ScheduleResult<Vec<ScheduleEntry>> {
        pass::compute_schedule_from(&self.store, self.clock(now), &self.config)
    }

    pub fn refresh(&self, now: NaiveDateTime) -> ScheduleResult<RefreshSummary> {
        let entries = self.compute(now)?;
        Ok(RefreshSummary::from_entries(&entries, self.completed_in_graph()))
    }

    /// Mark `name` done if the current schedule allows it.
    pub fn mark_done(&mut self, name: &str, now: NaiveDateTime) -> ScheduleResult<()> {
        if self.store.is_completed(name) {
            return Err(ScheduleError::AlreadyCompleted(name.to_string()));
        }
        let entries = self.compute(now)?;
        let entry = entries
            .iter()
            .find(|entry| entry.name == name)
            .ok_or_else(|| ScheduleError::TaskNotFound(name.to_string()))?;
        if !entry.markable {
            return Err(ScheduleError::NotMarkable {
                name: name.to_string(),
                blocked_by: entry.blocked_by.clone(),
            });
        }
        self.store.mark_complete(name);
        info!(task = name, "task marked done");
        Ok(())
    }

    /// Returns `false` if the task was not marked done.
    pub fn unmark(&mut self, name: &str) -> bool {
        let removed = self.store.unmark(name);
        if removed {
            info!(task = name, "task unmarked");
        }
        removed
    }

    /// Completed names that correspond to a node in the current graph.
    fn completed_in_graph(&self) -> usize {
        self.completed()
            .iter()
            .filter(|name| {
                self.store.contains(name)
                    || self
                        .tasks()
                        .iter()
                        .any(|task| task.dependency_name() == Some(*name))
            })
            .count()
    }
}
