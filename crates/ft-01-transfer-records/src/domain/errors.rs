//! # Domain Errors
//!
//! Error types for the Transfer Records subsystem.
//!
//! ## Design Principles
//!
//! - Each error maps to one failure mode of a lifecycle, query or history step
//! - Input errors are raised before any ledger access
//! - Nothing is retried or rolled back here; the ledger transaction is the unit
//!   of atomicity

use super::composite::printable_key;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during transfer record operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransferError {
    /// Wrong arity or an empty required field.
    #[error("{message}")]
    InvalidArgument { message: String },

    /// Create on a key that already holds a record.
    #[error("This transfer already exists: {}", printable_key(.key))]
    AlreadyExists { key: String },

    /// Read, delete or complete on an absent key.
    #[error("Transfer does not exist: {}", printable_key(.key))]
    NotFound { key: String },

    /// Stored bytes do not match the record shape.
    #[error("Failed to decode JSON of {}: {message}", printable_key(.key))]
    DecodeFailed { key: String, message: String },

    /// Index marker could not be written after the primary write.
    #[error("Failed to write index entry for {index}: {message}")]
    IndexWriteFailed { index: String, message: String },

    /// Index marker could not be removed after the primary delete.
    #[error("Failed to delete index entry for {index}: {message}")]
    IndexDeleteFailed { index: String, message: String },

    /// The ledger backend has no rich-query capability.
    #[error("Rich queries are not supported by this ledger")]
    QueryUnsupported,

    /// Malformed selector or backend query/iterator failure.
    #[error("Query execution failed: {message}")]
    QueryExecutionFailed { message: String },

    /// Generic read/write/delete failure from the ledger.
    #[error("Ledger I/O failed: {message}")]
    LedgerIOFailed { message: String },
}

impl TransferError {
    /// Shorthand for an `InvalidArgument` error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Classify this error for serialization.
    pub fn kind(&self) -> TransferErrorKind {
        match self {
            Self::InvalidArgument { .. } => TransferErrorKind::InvalidArgument,
            Self::AlreadyExists { .. } => TransferErrorKind::AlreadyExists,
            Self::NotFound { .. } => TransferErrorKind::NotFound,
            Self::DecodeFailed { .. } => TransferErrorKind::DecodeFailed,
            Self::IndexWriteFailed { .. } => TransferErrorKind::IndexWriteFailed,
            Self::IndexDeleteFailed { .. } => TransferErrorKind::IndexDeleteFailed,
            Self::QueryUnsupported => TransferErrorKind::QueryUnsupported,
            Self::QueryExecutionFailed { .. } => TransferErrorKind::QueryExecutionFailed,
            Self::LedgerIOFailed { .. } => TransferErrorKind::LedgerIOFailed,
        }
    }

    /// Map a ledger failure that happened while running a query.
    ///
    /// `Unsupported` stays distinct; everything else becomes
    /// `QueryExecutionFailed`.
    pub fn from_query_failure(err: LedgerError) -> Self {
        match err {
            LedgerError::Unsupported { .. } => Self::QueryUnsupported,
            other => Self::QueryExecutionFailed {
                message: other.to_string(),
            },
        }
    }
}

impl From<LedgerError> for TransferError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::Unsupported { .. } => TransferError::QueryUnsupported,
            other => TransferError::LedgerIOFailed {
                message: other.to_string(),
            },
        }
    }
}

/// Error kind enumeration for serialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransferErrorKind {
    InvalidArgument,
    AlreadyExists,
    NotFound,
    DecodeFailed,
    IndexWriteFailed,
    IndexDeleteFailed,
    QueryUnsupported,
    QueryExecutionFailed,
    LedgerIOFailed,
}

/// Serializable failure message returned through the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferErrorPayload {
    pub error_type: TransferErrorKind,
    pub message: String,
}

impl From<&TransferError> for TransferErrorPayload {
    fn from(err: &TransferError) -> Self {
        Self {
            error_type: err.kind(),
            message: err.to_string(),
        }
    }
}

impl TransferErrorPayload {
    /// Encode as a single-line JSON message.
    pub fn to_message(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| self.message.clone())
    }
}

/// Errors raised by a ledger adapter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// Read, write or delete failure.
    #[error("ledger I/O error: {message}")]
    Io { message: String },

    /// The backend does not provide the requested capability.
    #[error("{capability} is not supported by this ledger")]
    Unsupported { capability: &'static str },

    /// The query text could not be interpreted by the backend.
    #[error("invalid query: {message}")]
    InvalidQuery { message: String },

    /// A result or history iterator broke mid-stream.
    #[error("iterator failed: {message}")]
    Iterator { message: String },

    /// Composite key attributes contain reserved characters or the key is
    /// not a composite key.
    #[error("invalid composite key: {message}")]
    InvalidCompositeKey { message: String },
}
