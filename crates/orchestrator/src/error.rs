//! Engine-boundary error type.

use thiserror::Error;
use workflow::DefinitionError;

/// Errors returned when handing a workflow to an engine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OrchestratorError {
    /// The engine refused the definition.
    #[error("workflow rejected by engine: {0}")]
    Rejected(String),

    /// The engine couldn't be reached; submitting again later may succeed.
    #[error("engine unavailable: {0}")]
    Unavailable(String),

    /// The definition failed validation before it was sent.
    #[error("invalid workflow definition: {0}")]
    Definition(#[from] DefinitionError),
}
