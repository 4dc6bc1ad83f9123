//! The tutorial workflow: print the date, then sleep and echo the logical
//! date in parallel.

use chrono::{TimeZone, Utc};

use crate::builder::{define_workflow, DependencyConfig, TaskConfig, WorkflowConfig};
use crate::{DefinitionError, Schedule, WorkflowSpec};

pub const TUTORIAL_WORKFLOW_ID: &str = "tutorial";

pub fn tutorial_config() -> WorkflowConfig {
    WorkflowConfig {
        id: TUTORIAL_WORKFLOW_ID.into(),
        description: "A simple tutorial DAG".into(),
        schedule: Schedule::daily(),
        start_date: Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).single().unwrap_or_default(),
        catchup: false,
        tags: vec!["example_tag".into()],
        tasks: vec![
            TaskConfig::bash("print_date", "date"),
            TaskConfig::bash("sleep", "sleep 5").retries(3),
            TaskConfig::bash("echo_execution_date", "echo {{ ds }}"),
        ],
        dependencies: vec![DependencyConfig::new(
            "print_date",
            ["sleep", "echo_execution_date"],
        )],
        ..WorkflowConfig::default()
    }
}

pub fn tutorial_workflow() -> Result<WorkflowSpec, DefinitionError> {
    define_workflow(tutorial_config())
}
