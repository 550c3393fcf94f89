use super::DependencyGraph;
use crate::config::{ScheduleConfig, ValidationMode};
use crate::task::TaskRecord;
use crate::task_validation::{self, TaskValidationError};
use tracing::{debug, warn};

pub struct GraphBuilder<'a> {
    tasks: &'a [TaskRecord],
    config: &'a ScheduleConfig,
}

impl<'a> GraphBuilder<'a> {
    pub fn new(tasks: &'a [TaskRecord], config: &'a ScheduleConfig) -> Self {
        Self { tasks, config }
    }

    pub fn build(&self) -> Result<DependencyGraph, TaskValidationError> {
        let mut graph = DependencyGraph::new();

        // Nodes first so a later record's duration wins and a dependency on a
        // task submitted afterwards still resolves to the real node.
        let mut record_nodes = Vec::with_capacity(self.tasks.len());
        for task in self.tasks {
            task_validation::validate_name(task)?;
            let duration = task_validation::resolve_duration(task, self.config)?;
            record_nodes.push(graph.upsert_node(&task.name, duration));
        }

        for (task, &to) in self.tasks.iter().zip(&record_nodes) {
            let Some(dependency) = task.dependency_name() else {
                continue;
            };
            let from = match graph.index_of(dependency) {
                Some(idx) => idx,
                None => match self.config.validation {
                    ValidationMode::Strict => {
                        return Err(TaskValidationError::UnknownDependency {
                            task: task.name.clone(),
                            dependency: dependency.to_string(),
                        });
                    }
                    ValidationMode::Lenient => {
                        warn!(
                            task = %task.name,
                            dependency,
                            "materializing implicit node for unknown dependency"
                        );
                        graph.ensure_node(dependency, self.config.default_duration_hours)
                    }
                },
            };
            graph.add_edge(from, to);
        }

        debug!(
            nodes = graph.len(),
            edges = graph.edge_count(),
            "built dependency graph"
        );
        Ok(graph)
    }
}
