//! Index administration service
//!
//! Home of the transactional index-removal operation. One call composes
//! three concerns into an atomic unit:
//! - a retry-scoped transaction driver (optimistic concurrency, unbounded
//!   retry on write conflict),
//! - a per-attempt consistency gate (replication authority),
//! - the drop executor (cancel matching builds, resolve the selector,
//!   remove descriptors, report the prior count).
//!
//! Either the whole sequence commits, or nothing of the attempt is visible.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::catalog::collection::CatalogTxn;
use crate::catalog::store::CatalogStore;
use crate::config::Config;
use crate::core::error::{DbError, DbResult};
use crate::core::namespace::Namespace;
use crate::core::retry::with_write_conflict_retry;
use crate::index::builds::{IndexBuildRegistry, KillCriteria};
use crate::index::selector::IndexSelector;
use crate::replication::{check_writable, ReplicationCoordinator};
use crate::storage::lock::DatabaseLockManager;
use crate::storage::oplog::{OplogAppender, OplogEntry};

/// What a successful dropIndexes reports back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropIndexesReport {
    /// Total number of indexes in the catalog before the operation.
    #[serde(rename = "indexesBefore")]
    pub indexes_before: usize,
    #[serde(rename = "message", skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

pub struct IndexAdminService {
    catalog: Arc<CatalogStore>,
    builds: Arc<IndexBuildRegistry>,
    locks: Arc<DatabaseLockManager>,
    replication: Arc<dyn ReplicationCoordinator>,
    oplog: Arc<dyn OplogAppender>,
    config: Config,
}

impl IndexAdminService {
    pub fn new(
        catalog: Arc<CatalogStore>,
        builds: Arc<IndexBuildRegistry>,
        locks: Arc<DatabaseLockManager>,
        replication: Arc<dyn ReplicationCoordinator>,
        oplog: Arc<dyn OplogAppender>,
        config: Config,
    ) -> Self {
        Self {
            catalog,
            builds,
            locks,
            replication,
            oplog,
            config,
        }
    }

    /// Atomically remove the selected secondary index(es) from the
    /// collection's catalog. Write conflicts are retried internally and are
    /// never returned; every other failure is fatal to the operation.
    pub fn drop_indexes(
        &self,
        namespace: &str,
        selector: &IndexSelector,
    ) -> DbResult<DropIndexesReport> {
        with_write_conflict_retry("dropIndexes", namespace, || {
            self.drop_indexes_attempt(namespace, selector)
        })
    }

    /// One attempt: locks, gate, executor, durable record, commit.
    fn drop_indexes_attempt(
        &self,
        namespace: &str,
        selector: &IndexSelector,
    ) -> DbResult<DropIndexesReport> {
        let ns = Namespace::parse(namespace).ok_or_else(|| DbError::NamespaceNotFound {
            namespace: namespace.to_string(),
        })?;

        let _ddl = self.locks.lock_for_ddl(ns.database());

        // Re-evaluated every attempt; role can change between retries.
        check_writable(
            self.replication.as_ref(),
            self.config.writes_are_replicated,
            &ns,
        )?;

        let collection =
            self.catalog
                .get_collection(namespace)
                .ok_or_else(|| DbError::NamespaceNotFound {
                    namespace: namespace.to_string(),
                })?;

        if !self.config.quiet {
            log::info!("CMD: dropIndexes {}", namespace);
        }

        // Cancel matching in-flight builds before the catalog transaction
        // begins, so no build races past the point of no return.
        let criteria = KillCriteria::from_selector(namespace, selector);
        let cancelled = self.builds.cancel_matching(&criteria);
        if !cancelled.is_empty() {
            log::debug!(
                "cancelled {} in-progress index build(s) on {}",
                cancelled.len(),
                namespace
            );
        }

        let mut txn = collection.begin_catalog_txn();
        let report = Self::execute_drop(&mut txn, selector)?;

        // Durable record first, visibility second: the entry is appended
        // under the catalog write lock after the version re-check, and the
        // working copy is only published if the append succeeded.
        let entry = OplogEntry::drop_indexes(namespace, selector);
        collection.commit_catalog(txn, || self.oplog.append(&entry).map_err(DbError::from))?;

        Ok(report)
    }

    /// Resolve the selector against the working copy and remove.
    fn execute_drop(txn: &mut CatalogTxn, selector: &IndexSelector) -> DbResult<DropIndexesReport> {
        let indexes_before = txn.catalog().num_indexes();

        match selector {
            IndexSelector::AllNonPrimary => {
                txn.catalog_mut().drop_all_non_primary();
                Ok(DropIndexesReport {
                    indexes_before,
                    message: Some("non-primary indexes dropped".to_string()),
                })
            }
            IndexSelector::Name(name) => {
                let (id, primary) = match txn.catalog().find_by_name(name) {
                    Some(descriptor) => (descriptor.id(), descriptor.is_primary()),
                    None => {
                        return Err(DbError::IndexNotFound(format!(
                            "index not found with name [{}]",
                            name
                        )))
                    }
                };
                if primary {
                    return Err(DbError::InvalidOptions(
                        "cannot drop primary-key index".to_string(),
                    ));
                }
                txn.catalog_mut().drop_index(id)?;
                Ok(DropIndexesReport {
                    indexes_before,
                    message: None,
                })
            }
            IndexSelector::KeyPattern(pattern) => {
                let (id, primary) = match txn.catalog().find_by_key_pattern(pattern) {
                    Some(descriptor) => (descriptor.id(), descriptor.is_primary()),
                    None => {
                        return Err(DbError::InvalidOptions(format!(
                            "can't find index with key: {}",
                            pattern
                        )))
                    }
                };
                if primary {
                    return Err(DbError::InvalidOptions(
                        "cannot drop primary-key index".to_string(),
                    ));
                }
                txn.catalog_mut().drop_index(id)?;
                Ok(DropIndexesReport {
                    indexes_before,
                    message: None,
                })
            }
        }
    }
}
