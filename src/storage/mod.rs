//! Storage-side collaborators of the drop operation:
//! - database DDL lock manager
//! - durable operation log

pub mod lock;
pub mod oplog;

pub use lock::{DatabaseLockManager, DdlGuard};
pub use oplog::{MemoryOplog, OplogAppender, OplogEntry, OplogError};
