//! Error types for the object store.
//!
//! Every fallible operation in this crate returns [`PersistenceError`]. The
//! top-level enum groups failures by category so callers can match on the
//! category they care about (a missing object, a rejected update, a storage
//! failure) without knowing which adapter produced it.
//!
//! Contract violations are not represented here. A converter that produces an
//! object whose identifier differs from its entity's id indicates a broken
//! mapping, not a storage condition, and panics instead.

// Error enum variant fields are self-documenting via their #[error(...)] messages
#![allow(missing_docs)]

use thiserror::Error;

/// The single error type surfaced to callers of the object store.
#[derive(Error, Debug)]
pub enum PersistenceError {
    /// No stored object exists for the given identifier.
    #[error("object not found: {id}")]
    NotFound { id: String },

    /// Validation errors (update strategy rejections, invalid requests)
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Transaction lifecycle errors
    #[error(transparent)]
    Transaction(#[from] TransactionError),

    /// Storage adapter errors
    #[error(transparent)]
    Backend(#[from] BackendError),
}

impl PersistenceError {
    /// Creates a not-found error for any debuggable identifier.
    pub fn not_found(id: &impl std::fmt::Debug) -> Self {
        PersistenceError::NotFound {
            id: format!("{:?}", id),
        }
    }

    /// Returns true if this error reports a missing object.
    pub fn is_not_found(&self) -> bool {
        matches!(self, PersistenceError::NotFound { .. })
    }

    /// Returns true if this error was raised by validation.
    pub fn is_validation(&self) -> bool {
        matches!(self, PersistenceError::Validation(_))
    }
}

/// Errors raised by update strategies and request validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// An update attempted to change a field that is fixed after creation.
    #[error("field '{field}' is immutable")]
    ImmutableField { field: String },

    /// The object was derived from a different version of the stored entity.
    #[error("version mismatch: expected {expected}, found {actual}")]
    VersionMismatch { expected: String, actual: String },

    /// The object exposes data the caller is not allowed to read.
    #[error("read of field '{field}' denied")]
    ReadDenied { field: String },

    /// Generic rejection by a domain rule.
    #[error("rejected: {message}")]
    Rejected { message: String },

    /// A page request asked for zero elements.
    #[error("invalid page size: {size}")]
    InvalidPageSize { size: usize },

    /// The mark of a page request cannot be used with the requested ordering.
    #[error("invalid mark: {message}")]
    InvalidMark { message: String },
}

/// Errors related to the execution context lifecycle.
#[derive(Error, Debug)]
pub enum TransactionError {
    /// The context could not be acquired or the transaction could not start.
    #[error("failed to begin transaction: {reason}")]
    BeginFailed { reason: String },

    /// Committing the transaction failed.
    #[error("failed to commit transaction: {reason}")]
    CommitFailed { reason: String },

    /// Rolling back the transaction failed.
    #[error("failed to roll back transaction: {reason}")]
    RollbackFailed { reason: String },

    /// Another execution committed conflicting changes first.
    #[error("transaction conflict: {reason}")]
    Conflict { reason: String },

    /// The context was already committed or rolled back.
    #[error("transaction no longer active")]
    Inactive,
}

/// Errors originating from a storage adapter.
#[derive(Error, Debug)]
pub enum BackendError {
    /// Connection to the store failed.
    #[error("connection failed to {backend_name}: {message}")]
    ConnectionFailed {
        backend_name: String,
        message: String,
    },

    /// A statement failed to execute.
    #[error("query failed in {backend_name}: {message}")]
    Query {
        backend_name: String,
        message: String,
    },

    /// The store rejected a write because of a constraint (duplicate key, ...).
    #[error("constraint violation in {backend_name}: {message}")]
    Constraint {
        backend_name: String,
        message: String,
    },

    /// A stored value could not be mapped to or from its native form.
    #[error("serialization error: {message}")]
    Serialization { message: String },

    /// Internal adapter error.
    #[error("internal error in {backend_name}: {message}")]
    Internal {
        backend_name: String,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

/// Result type alias for object store operations.
pub type PersistenceResult<T> = Result<T, PersistenceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_formats_id() {
        let err = PersistenceError::not_found(&42_i64);
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "object not found: 42");

        let err = PersistenceError::not_found(&"device-7");
        assert_eq!(err.to_string(), "object not found: \"device-7\"");
    }

    #[test]
    fn test_validation_conversion() {
        let err: PersistenceError = ValidationError::ImmutableField {
            field: "serial".to_string(),
        }
        .into();
        assert!(err.is_validation());
        assert!(!err.is_not_found());
        assert_eq!(err.to_string(), "field 'serial' is immutable");
    }

    #[test]
    fn test_transaction_error_display() {
        let err: PersistenceError = TransactionError::RollbackFailed {
            reason: "disk I/O error".to_string(),
        }
        .into();
        assert_eq!(
            err.to_string(),
            "failed to roll back transaction: disk I/O error"
        );
    }

    #[test]
    fn test_backend_error_source() {
        use std::error::Error as _;

        let io = std::io::Error::other("broken pipe");
        let err = BackendError::Internal {
            backend_name: "memory".to_string(),
            message: "write failed".to_string(),
            source: Some(Box::new(io)),
        };
        assert!(err.source().is_some());
        assert_eq!(err.to_string(), "internal error in memory: write failed");
    }
}
