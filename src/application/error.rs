//! Application-level errors (wraps domain errors)

use thiserror::Error;

use crate::domain::DomainError;

/// Application errors wrap domain errors and add façade and service context.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    /// The façade allows each optional child kind at most once per item.
    #[error("item {index} already has {kind} children")]
    ChildAlreadyPresent { index: usize, kind: &'static str },

    #[error("item index {index} out of range (list has {len} items)")]
    ItemOutOfRange { index: usize, len: usize },

    #[error("config error: {message}")]
    Config { message: String },

    #[error("operation failed: {context}")]
    OperationFailed {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
