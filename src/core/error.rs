//! Unified error handling for DocDB
//!
//! A single `DbError` enum covers the operation surface. Write conflicts are
//! a transient kind: the retry driver consumes them and they are never
//! returned to a caller. All other kinds are fatal to the operation and
//! carry enough context (namespace, index name, key pattern) to be
//! actionable without further lookups.

use thiserror::Error;

use crate::storage::oplog::OplogError;

/// Unified database error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DbError {
    #[error("namespace not found: {namespace}")]
    NamespaceNotFound { namespace: String },

    #[error("not primary while dropping indexes in {namespace}")]
    NotPrimary { namespace: String },

    #[error("{0}")]
    IndexNotFound(String),

    #[error("{0}")]
    InvalidOptions(String),

    #[error("write conflict: {0}")]
    WriteConflict(String),

    #[error("durability failure: {0}")]
    Durability(String),

    #[error("internal error: {0}")]
    Internal(String),
}

/// Unified result type
pub type DbResult<T> = Result<T, DbError>;

impl DbError {
    /// Transient structural race on the catalog; the only retryable kind.
    pub fn is_write_conflict(&self) -> bool {
        matches!(self, DbError::WriteConflict(_))
    }
}

impl From<OplogError> for DbError {
    fn from(err: OplogError) -> Self {
        DbError::Durability(err.to_string())
    }
}
