//! `MockOrchestrator` — a test double for `Orchestrator`.
//!
//! Stands in for a real engine in tests and in the CLI's `submit` command.

use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;
use workflow::{validate_workflow, WorkflowSpec};

use crate::{traits::Submission, Orchestrator, OrchestratorError};

/// Behaviour injected into `MockOrchestrator` at construction time.
pub enum MockBehaviour {
    /// Accept every valid workflow.
    Accept,
    /// Refuse every workflow with the given reason.
    Reject(String),
    /// Act as if the engine can't be reached.
    Unavailable(String),
}

/// An in-process engine that records every workflow it accepts.
pub struct MockOrchestrator {
    pub behaviour: MockBehaviour,
    /// Accepted workflows, in submission order.
    pub accepted: Arc<Mutex<Vec<WorkflowSpec>>>,
}

impl MockOrchestrator {
    pub fn accepting() -> Self {
        Self::with_behaviour(MockBehaviour::Accept)
    }

    pub fn rejecting(reason: impl Into<String>) -> Self {
        Self::with_behaviour(MockBehaviour::Reject(reason.into()))
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::with_behaviour(MockBehaviour::Unavailable(reason.into()))
    }

    fn with_behaviour(behaviour: MockBehaviour) -> Self {
        Self {
            behaviour,
            accepted: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Number of workflows accepted so far.
    pub fn accepted_count(&self) -> usize {
        self.accepted
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn accepted_ids(&self) -> Vec<String> {
        self.accepted
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|spec| spec.id.clone())
            .collect()
    }
}

#[async_trait]
impl Orchestrator for MockOrchestrator {
    async fn submit(&self, spec: &WorkflowSpec) -> Result<Submission, OrchestratorError> {
        match &self.behaviour {
            MockBehaviour::Unavailable(reason) => {
                return Err(OrchestratorError::Unavailable(reason.clone()));
            }
            MockBehaviour::Reject(reason) => {
                warn!(workflow_id = %spec.id, "workflow rejected: {}", reason);
                return Err(OrchestratorError::Rejected(reason.clone()));
            }
            MockBehaviour::Accept => {}
        }

        if let Err(e) = validate_workflow(spec) {
            warn!(workflow_id = %spec.id, "workflow failed validation: {}", e);
            return Err(e.into());
        }

        self.accepted
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(spec.clone());

        let submission = Submission {
            id: Uuid::new_v4(),
            workflow_id: spec.id.clone(),
            submitted_at: Utc::now(),
        };
        info!(
            workflow_id = %spec.id,
            submission_id = %submission.id,
            "workflow accepted"
        );

        Ok(submission)
    }
}
