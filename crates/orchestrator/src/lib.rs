//! `orchestrator` crate — the boundary with the external orchestration engine.
//!
//! A defined workflow is handed to an [`Orchestrator`]; everything that
//! happens afterwards (scheduling, retries, templating, execution) belongs
//! to the engine behind that trait.

pub mod error;
pub mod traits;
pub mod mock;

pub use error::OrchestratorError;
pub use traits::{Orchestrator, RunContext, Submission};
pub use mock::MockOrchestrator;
