//! Domain errors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Validation: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Payment gateway or mail relay call failed or timed out. Retriable by
    /// the caller; nothing is partially committed when this surfaces from a
    /// workflow.
    #[error("Gateway: {0}")]
    Gateway(String),
}

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;
