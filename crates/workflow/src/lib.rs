//! `workflow` crate — declarative workflow definitions and their validation.
//!
//! Nothing here runs a task. A [`WorkflowSpec`] is built once, checked, and
//! handed to an orchestration engine which owns scheduling, retries and
//! command templating from then on.

pub mod models;
pub mod error;
pub mod dag;
pub mod builder;
pub mod tutorial;

pub use models::{DependencyEdge, Schedule, TaskSpec, WorkflowSpec};
pub use error::DefinitionError;
pub use dag::{add_dependency, validate_workflow};
pub use builder::{define_workflow, DependencyConfig, TaskConfig, TaskDefaults, WorkflowConfig};
pub use tutorial::tutorial_workflow;

#[cfg(test)]
mod tutorial_tests;
