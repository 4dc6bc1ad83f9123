//! Core data model for workflow definitions.
//!
//! These types describe what a workflow looks like before it is handed to
//! an orchestration engine. They serialise to/from JSON so a definition can
//! live in a file as easily as in code.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::DefinitionError;

// ---------------------------------------------------------------------------
// Schedule
// ---------------------------------------------------------------------------

/// How often the engine should start a new run of the workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Schedule {
    /// A fixed period between consecutive logical dates.
    Interval {
        /// Length of the period in whole seconds.
        seconds: u64,
    },
    /// A cron schedule evaluated by the engine.
    Cron {
        /// Standard cron expression (5 fields).
        expression: String,
    },
    /// Only started on demand.
    Manual,
}

impl Schedule {
    /// Build an interval schedule. Negative periods collapse to zero and are
    /// rejected by [`Schedule::validate`].
    pub fn interval(period: chrono::Duration) -> Self {
        Self::Interval {
            seconds: period.num_seconds().max(0) as u64,
        }
    }

    pub fn daily() -> Self {
        Self::interval(chrono::Duration::days(1))
    }

    /// The period of an interval schedule.
    pub fn period(&self) -> Option<chrono::Duration> {
        match self {
            Self::Interval { seconds } => i64::try_from(*seconds)
                .ok()
                .map(chrono::Duration::seconds),
            _ => None,
        }
    }

    /// Check the schedule is something an engine could act on.
    pub fn validate(&self) -> Result<(), DefinitionError> {
        match self {
            Self::Interval { seconds: 0 } => Err(DefinitionError::InvalidSchedule(
                "interval must be longer than zero seconds".into(),
            )),
            Self::Interval { seconds } if i64::try_from(*seconds).is_err() => Err(
                DefinitionError::InvalidSchedule(format!("interval of {seconds}s is too long")),
            ),
            Self::Cron { expression } => {
                let fields = expression.split_whitespace().count();
                if fields == 5 {
                    Ok(())
                } else {
                    Err(DefinitionError::InvalidSchedule(format!(
                        "cron expression '{expression}' has {fields} fields, expected 5"
                    )))
                }
            }
            _ => Ok(()),
        }
    }
}

// ---------------------------------------------------------------------------
// TaskSpec
// ---------------------------------------------------------------------------

/// A single shell-command step in the workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSpec {
    /// Unique identifier within this workflow (referenced by dependencies).
    pub id: String,
    /// Shell command, possibly containing `{{ name }}` placeholders that the
    /// engine fills in from the run context before invoking a shell.
    pub command_template: String,
    /// How many times the engine may retry the task after a failure.
    #[serde(default)]
    pub retries: u32,
}

impl TaskSpec {
    pub fn new(id: impl Into<String>, command_template: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            command_template: command_template.into(),
            retries: 0,
        }
    }

    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    /// Names of the placeholders in the command template, in order of first
    /// appearance. Filters are ignored: `{{ ds | upper }}` yields `ds`.
    pub fn placeholders(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        let mut rest = self.command_template.as_str();

        while let Some(open) = rest.find("{{") {
            let after_open = &rest[open + 2..];
            let Some(close) = after_open.find("}}") else {
                break;
            };

            let name = after_open[..close]
                .split('|')
                .next()
                .unwrap_or_default()
                .trim();
            if !name.is_empty() && !names.iter().any(|n| n == name) {
                names.push(name.to_string());
            }

            rest = &after_open[close + 2..];
        }

        names
    }
}

// ---------------------------------------------------------------------------
// DependencyEdge
// ---------------------------------------------------------------------------

/// `upstream` must finish before `downstream` may begin.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DependencyEdge {
    pub upstream: String,
    pub downstream: String,
}

impl DependencyEdge {
    pub fn new(upstream: impl Into<String>, downstream: impl Into<String>) -> Self {
        Self {
            upstream: upstream.into(),
            downstream: downstream.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// WorkflowSpec
// ---------------------------------------------------------------------------

/// A complete workflow definition, ready to hand to an engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowSpec {
    pub id: String,
    pub description: String,
    pub schedule: Schedule,
    pub start_date: DateTime<Utc>,
    /// Whether the engine should backfill runs between `start_date` and now.
    pub catchup: bool,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    pub tasks: Vec<TaskSpec>,
    #[serde(default)]
    pub dependencies: BTreeSet<DependencyEdge>,
}

impl WorkflowSpec {
    pub fn task(&self, id: &str) -> Option<&TaskSpec> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn contains_task(&self, id: &str) -> bool {
        self.task(id).is_some()
    }

    /// IDs of the tasks that must finish before `id` starts.
    pub fn upstream_of(&self, id: &str) -> Vec<&str> {
        self.dependencies
            .iter()
            .filter(|e| e.downstream == id)
            .map(|e| e.upstream.as_str())
            .collect()
    }

    /// IDs of the tasks waiting on `id`.
    pub fn downstream_of(&self, id: &str) -> Vec<&str> {
        self.dependencies
            .iter()
            .filter(|e| e.upstream == id)
            .map(|e| e.downstream.as_str())
            .collect()
    }

    /// Tasks with no upstream dependency, in declaration order.
    pub fn roots(&self) -> Vec<&TaskSpec> {
        self.tasks
            .iter()
            .filter(|t| !self.dependencies.iter().any(|e| e.downstream == t.id))
            .collect()
    }
}
