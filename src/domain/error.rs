//! Domain-level errors (no I/O concerns)

use thiserror::Error;

/// Domain errors represent violations of the element model's contract.
///
/// Every variant is raised synchronously at the point of violation:
/// declaration, attribute assignment or append.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Malformed node-type declaration; the type is never registered.
    #[error("invalid definition of {type_name}: {reason}")]
    Definition { type_name: String, reason: String },

    /// Attribute value outside its field's closed enumeration.
    #[error("{field} must be one of [{}] or absent, got {value:?}", .allowed.join(", "))]
    Validation {
        field: String,
        allowed: Vec<String>,
        value: String,
    },

    /// Child type not in the parent's whitelist.
    #[error("element must be one of [{}]: got {got}", .allowed.join(", "))]
    ChildNotAllowed {
        parent: String,
        allowed: Vec<String>,
        got: String,
    },

    #[error("{element} has no attribute named {name:?}")]
    UnknownAttribute { element: String, name: String },

    #[error("xml serialization failed: {0}")]
    Serialize(String),
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
