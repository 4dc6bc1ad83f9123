//! Definition-time error types.

use thiserror::Error;

/// Errors produced while declaring or validating a workflow.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DefinitionError {
    /// Two or more tasks share the same ID.
    #[error("duplicate task ID: '{0}'")]
    DuplicateTaskId(String),

    /// A task was declared with an empty ID.
    #[error("task ID must not be empty")]
    EmptyTaskId,

    /// A dependency references a task ID that isn't declared in the workflow.
    #[error("dependency references unknown task '{task_id}' ({side} side)")]
    UnknownTask {
        task_id: String,
        side: &'static str,
    },

    /// The dependency graph would contain (or contains) a cycle.
    ///
    /// The endpoints are known when the offending edge is rejected by
    /// `add_dependency`; a full-graph validation only knows that one exists.
    #[error("{}", cycle_message(.upstream, .downstream))]
    CycleDetected {
        upstream: Option<String>,
        downstream: Option<String>,
    },

    /// The schedule can't be handed to an engine as-is.
    #[error("invalid schedule: {0}")]
    InvalidSchedule(String),
}

fn cycle_message(upstream: &Option<String>, downstream: &Option<String>) -> String {
    match (upstream, downstream) {
        (Some(up), Some(down)) => format!("dependency '{up}' -> '{down}' would create a cycle"),
        _ => "workflow graph contains a cycle".to_string(),
    }
}
