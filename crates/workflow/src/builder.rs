//! Explicit workflow construction.
//!
//! Tasks are built as plain values first, then passed together with the
//! dependency declarations into a single [`define_workflow`] call. There is
//! no ambient "current workflow" that tasks register themselves with.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::dag::add_dependency;
use crate::models::{Schedule, TaskSpec, WorkflowSpec};
use crate::DefinitionError;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Settings applied to every task that doesn't override them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDefaults {
    pub retries: u32,
}

/// A task as declared, before defaults are applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskConfig {
    pub id: String,
    pub command_template: String,
    /// `None` falls back to [`TaskDefaults::retries`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retries: Option<u32>,
}

impl TaskConfig {
    /// Declare a task that runs `command_template` in a shell.
    pub fn bash(id: impl Into<String>, command_template: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            command_template: command_template.into(),
            retries: None,
        }
    }

    pub fn retries(mut self, retries: u32) -> Self {
        self.retries = Some(retries);
        self
    }
}

/// One predecessor and the tasks that wait on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyConfig {
    pub upstream: String,
    pub downstream: Vec<String>,
}

impl DependencyConfig {
    pub fn new<I, S>(upstream: impl Into<String>, downstream: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            upstream: upstream.into(),
            downstream: downstream.into_iter().map(Into::into).collect(),
        }
    }
}

/// Everything needed to declare a workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowConfig {
    pub id: String,
    pub description: String,
    pub schedule: Schedule,
    pub start_date: DateTime<Utc>,
    pub catchup: bool,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub task_defaults: TaskDefaults,
    pub tasks: Vec<TaskConfig>,
    #[serde(default)]
    pub dependencies: Vec<DependencyConfig>,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            id: String::new(),
            description: String::new(),
            schedule: Schedule::daily(),
            start_date: DateTime::<Utc>::UNIX_EPOCH,
            catchup: true,
            tags: Vec::new(),
            task_defaults: TaskDefaults::default(),
            tasks: Vec::new(),
            dependencies: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// define_workflow
// ---------------------------------------------------------------------------

/// Turn a [`WorkflowConfig`] into a [`WorkflowSpec`].
///
/// Task IDs are checked for uniqueness and each dependency declaration is
/// recorded through [`add_dependency`]. Deeper checks are left to the engine
/// that eventually receives the spec.
///
/// # Errors
/// - [`DefinitionError::EmptyTaskId`] / [`DefinitionError::DuplicateTaskId`]
///   for bad task IDs.
/// - Any error from [`add_dependency`].
pub fn define_workflow(config: WorkflowConfig) -> Result<WorkflowSpec, DefinitionError> {
    let WorkflowConfig {
        id,
        description,
        schedule,
        start_date,
        catchup,
        tags,
        task_defaults,
        tasks,
        dependencies,
    } = config;

    let mut seen: BTreeSet<&str> = BTreeSet::new();
    for task in &tasks {
        if task.id.is_empty() {
            return Err(DefinitionError::EmptyTaskId);
        }
        if !seen.insert(task.id.as_str()) {
            return Err(DefinitionError::DuplicateTaskId(task.id.clone()));
        }
    }

    let tasks: Vec<TaskSpec> = tasks
        .into_iter()
        .map(|t| TaskSpec {
            id: t.id,
            command_template: t.command_template,
            retries: t.retries.unwrap_or(task_defaults.retries),
        })
        .collect();

    let mut spec = WorkflowSpec {
        id,
        description,
        schedule,
        start_date,
        catchup,
        tags: tags.into_iter().collect(),
        tasks,
        dependencies: BTreeSet::new(),
    };

    for dependency in &dependencies {
        add_dependency(&mut spec, &dependency.upstream, dependency.downstream.as_slice())?;
    }

    info!(
        workflow_id = %spec.id,
        "workflow defined with {} tasks and {} dependencies",
        spec.tasks.len(),
        spec.dependencies.len()
    );

    Ok(spec)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(tasks: Vec<TaskConfig>, dependencies: Vec<DependencyConfig>) -> WorkflowConfig {
        WorkflowConfig {
            id: "test".into(),
            tasks,
            dependencies,
            ..WorkflowConfig::default()
        }
    }

    #[test]
    fn duplicate_task_id_is_rejected() {
        let result = define_workflow(config(
            vec![TaskConfig::bash("a", "date"), TaskConfig::bash("a", "date")],
            vec![],
        ));
        assert_eq!(result, Err(DefinitionError::DuplicateTaskId("a".into())));
    }

    #[test]
    fn empty_task_id_is_rejected() {
        let result = define_workflow(config(vec![TaskConfig::bash("", "date")], vec![]));
        assert_eq!(result, Err(DefinitionError::EmptyTaskId));
    }

    #[test]
    fn task_defaults_fill_only_unset_retries() {
        let mut cfg = config(
            vec![
                TaskConfig::bash("inherits", "date"),
                TaskConfig::bash("overrides", "date").retries(0),
            ],
            vec![],
        );
        cfg.task_defaults = TaskDefaults { retries: 2 };

        let spec = define_workflow(cfg).unwrap();
        assert_eq!(spec.task("inherits").map(|t| t.retries), Some(2));
        assert_eq!(spec.task("overrides").map(|t| t.retries), Some(0));
    }

    #[test]
    fn dependency_on_missing_task_fails_definition() {
        let result = define_workflow(config(
            vec![TaskConfig::bash("a", "date")],
            vec![DependencyConfig::new("a", ["missing"])],
        ));
        assert!(matches!(
            result,
            Err(DefinitionError::UnknownTask { task_id, .. }) if task_id == "missing"
        ));
    }

    #[test]
    fn tags_become_a_set() {
        let mut cfg = config(vec![], vec![]);
        cfg.tags = vec!["b".into(), "a".into(), "b".into()];

        let spec = define_workflow(cfg).unwrap();
        assert_eq!(spec.tags.into_iter().collect::<Vec<_>>(), vec!["a", "b"]);
    }
}
