//! The `Orchestrator` trait — the contract an engine client must fulfil.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use workflow::WorkflowSpec;

use crate::OrchestratorError;

/// Per-run values an engine substitutes into command templates.
///
/// Only the data is described here; rendering belongs to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunContext {
    pub run_id: Uuid,
    /// The start of the data interval this run covers.
    pub logical_date: NaiveDate,
}

impl RunContext {
    pub fn new(logical_date: NaiveDate) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            logical_date,
        }
    }

    /// The `{{ ds }}` value: the logical date as `YYYY-MM-DD`.
    pub fn ds(&self) -> String {
        self.logical_date.format("%Y-%m-%d").to_string()
    }
}

/// Receipt for a workflow accepted by an engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub id: Uuid,
    pub workflow_id: String,
    pub submitted_at: DateTime<Utc>,
}

/// An orchestration engine that takes over a workflow once it is defined.
///
/// Scheduling per `schedule`, skipping backfill when `catchup` is false,
/// retrying tasks up to `retries`, and filling in command placeholders from a
/// [`RunContext`] are all the engine's job after `submit` returns.
#[async_trait]
pub trait Orchestrator: Send + Sync {
    async fn submit(&self, spec: &WorkflowSpec) -> Result<Submission, OrchestratorError>;
}
