//! Error handling for the assignment engine.

use crate::workflow::WorkflowState;

/// Specialized error type for assignment operations
#[derive(Debug, thiserror::Error)]
pub enum AssignmentError {
    /// Invalid configuration, rejected before any data is fetched
    #[error("Configuration error: {0}")]
    Config(String),

    /// A workflow method was called in a state that does not permit it
    #[error("Invalid workflow transition: cannot {action} while {state}")]
    InvalidTransition {
        /// The state the workflow was in
        state: WorkflowState,
        /// The operation that was attempted
        action: &'static str,
    },

    /// A plan failed its pre-execution invariant checks
    #[error("Plan validation failed: {0}")]
    PlanValidation(String),

    /// Failure at the document-store boundary
    #[error("Store error: {0}")]
    Store(String),

    /// Error reading or writing store files
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error serializing or deserializing store documents
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for assignment operations
pub type Result<T> = std::result::Result<T, AssignmentError>;
