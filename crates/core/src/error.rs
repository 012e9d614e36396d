//! Error types for Cairn
//!
//! This module defines all error types used throughout the system.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.
//!
//! # Categories
//!
//! | Category | Variants | Description |
//! |----------|----------|-------------|
//! | Configuration | `Configuration`, `UnresolvableKind` | Startup wiring failures, fatal |
//! | Transaction | `TransactionState`, `NullTransaction`, `TransactionTypeMismatch`, `TransactionNotActive`, `TransactionConflict` | Transaction misuse or conflicts |
//! | Iteration | `UnsupportedOperation`, `InvalidCursor`, `InvalidInput` | Bad requests against a query |
//! | Storage | `KindNotRegistered`, `DuplicateKind`, `Serialization`, `Io`, `Storage` | Datastore failures |
//!
//! None of these are retried by this crate; they propagate to the caller.

use crate::entity::KindLookupError;
use std::io;
use thiserror::Error;

/// Result type alias for Cairn operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Cairn
#[derive(Debug, Error)]
pub enum Error {
    // ==================== Configuration ====================
    /// A required collaborator or resource is missing or empty
    #[error("configuration error: {reason}")]
    Configuration {
        /// What is misconfigured
        reason: String,
    },

    /// A configured entity kind name does not resolve
    #[error("cannot resolve entity kind '{name}'")]
    UnresolvableKind {
        /// Name as it appeared in the configuration
        name: String,
        /// Underlying lookup failure
        #[source]
        source: KindLookupError,
    },

    // ==================== Transaction ====================
    /// Commit/rollback requested on a handle that is not transactional
    #[error("transaction state error: {reason}")]
    TransactionState {
        /// Why the request was rejected
        reason: String,
    },

    /// No transaction handle was supplied where one is required
    #[error("transaction handle must not be null")]
    NullTransaction,

    /// The supplied transaction handle belongs to another backend
    #[error("transaction type mismatch: expected {expected}, got {actual}")]
    TransactionTypeMismatch {
        /// Type the DAO layer expected
        expected: String,
        /// Type actually received
        actual: String,
    },

    /// Operation on a transaction that has already finished
    #[error("transaction not active")]
    TransactionNotActive,

    /// Commit-time validation failed
    #[error("transaction conflict: {reason}")]
    TransactionConflict {
        /// Conflict description
        reason: String,
    },

    // ==================== Iteration ====================
    /// Operation not supported by a read-only sequence
    #[error("unsupported operation: {operation}")]
    UnsupportedOperation {
        /// Operation name
        operation: &'static str,
    },

    /// Cursor token cannot be decoded or belongs to another query
    #[error("invalid cursor: {reason}")]
    InvalidCursor {
        /// Decode failure description
        reason: String,
    },

    /// Invalid request parameters
    #[error("invalid input: {reason}")]
    InvalidInput {
        /// What was wrong with the input
        reason: String,
    },

    // ==================== Storage ====================
    /// Entity kind used before registration
    #[error("entity kind not registered: {kind}")]
    KindNotRegistered {
        /// Kind name
        kind: String,
    },

    /// Entity kind registered twice with the datastore
    #[error("entity kind already registered: {kind}")]
    DuplicateKind {
        /// Kind name
        kind: String,
    },

    /// Serialization/deserialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Storage layer error
    #[error("storage error: {0}")]
    Storage(String),
}

impl Error {
    /// Build a configuration error
    pub fn configuration(reason: impl Into<String>) -> Self {
        Error::Configuration {
            reason: reason.into(),
        }
    }

    /// Build a transaction state error
    pub fn transaction_state(reason: impl Into<String>) -> Self {
        Error::TransactionState {
            reason: reason.into(),
        }
    }

    /// Build an invalid cursor error
    pub fn invalid_cursor(reason: impl Into<String>) -> Self {
        Error::InvalidCursor {
            reason: reason.into(),
        }
    }

    /// Build an invalid input error
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Error::InvalidInput {
            reason: reason.into(),
        }
    }

    /// True for errors caused by API misuse rather than runtime conditions
    pub fn is_programmer_error(&self) -> bool {
        matches!(
            self,
            Error::TransactionState { .. }
                | Error::NullTransaction
                | Error::TransactionTypeMismatch { .. }
                | Error::UnsupportedOperation { .. }
        )
    }
}
