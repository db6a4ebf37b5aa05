//! Core types shared across the database layers:
//! - unified error type and result alias
//! - namespace identifier
//! - write-conflict retry combinator

pub mod error;
pub mod namespace;
pub mod retry;

pub use error::{DbError, DbResult};
pub use namespace::Namespace;
pub use retry::with_write_conflict_retry;
