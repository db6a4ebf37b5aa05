//! Durable operation log
//!
//! Successful catalog DDL is recorded here before the mutation becomes
//! visible, so a replicated log entry reflecting the change exists by the
//! time the operation is acknowledged. Log shipping itself is external; the
//! core only appends.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::index::selector::IndexSelector;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OplogError {
    #[error("oplog append failed: {0}")]
    AppendFailed(String),
}

/// One replicable operation record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OplogEntry {
    pub namespace: String,
    pub operation: String,
    pub detail: serde_json::Value,
}

impl OplogEntry {
    pub fn drop_indexes(namespace: &str, selector: &IndexSelector) -> Self {
        Self {
            namespace: namespace.to_string(),
            operation: "dropIndexes".to_string(),
            detail: serde_json::json!({ "index": selector.to_json() }),
        }
    }
}

/// Durable-log appender seam. `append` returning an error means the
/// operation must not be acknowledged as committed.
pub trait OplogAppender: Send + Sync {
    fn append(&self, entry: &OplogEntry) -> Result<(), OplogError>;
}

/// In-memory appender for embedding and tests.
#[derive(Default)]
pub struct MemoryOplog {
    entries: Mutex<Vec<OplogEntry>>,
}

impl MemoryOplog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<OplogEntry> {
        self.entries.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl OplogAppender for MemoryOplog {
    fn append(&self, entry: &OplogEntry) -> Result<(), OplogError> {
        self.entries.lock().push(entry.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_drop_indexes_entry_shape() {
        let entry = OplogEntry::drop_indexes("db.coll", &IndexSelector::name("a_1"));
        assert_eq!(entry.namespace, "db.coll");
        assert_eq!(entry.operation, "dropIndexes");
        assert_eq!(entry.detail, json!({"index": "a_1"}));
    }

    #[test]
    fn test_memory_oplog_appends_in_order() {
        let oplog = MemoryOplog::new();
        assert!(oplog.is_empty());

        oplog
            .append(&OplogEntry::drop_indexes(
                "db.coll",
                &IndexSelector::AllNonPrimary,
            ))
            .expect("append");
        oplog
            .append(&OplogEntry::drop_indexes("db.coll", &IndexSelector::name("a_1")))
            .expect("append");

        let entries = oplog.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].detail, json!({"index": "*"}));
        assert_eq!(entries[1].detail, json!({"index": "a_1"}));
    }
}
