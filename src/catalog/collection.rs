//! Collection handle and its versioned index catalog
//!
//! The catalog is an arena of descriptors keyed by `IndexId` with an
//! auxiliary name map. DDL mutates a working copy (`CatalogTxn`) pinned to
//! the version observed at begin; commit re-checks the version under the
//! write lock and publishes atomically. The index-build completion path
//! (`publish_index`) writes directly and bumps the version, which is what a
//! pinned transaction observes as a write conflict.

use std::collections::{BTreeMap, HashMap};

use parking_lot::RwLock;

use crate::catalog::descriptor::{
    IndexDescriptor, IndexId, KeyPattern, PRIMARY_INDEX_NAME, PRIMARY_KEY_FIELD,
};
use crate::core::error::{DbError, DbResult};
use crate::core::namespace::Namespace;

/// Name-keyed, creation-ordered set of index descriptors for one collection.
#[derive(Debug, Clone)]
pub struct IndexCatalog {
    version: u64,
    next_id: u64,
    entries: BTreeMap<IndexId, IndexDescriptor>,
    by_name: HashMap<String, IndexId>,
}

impl IndexCatalog {
    fn new() -> Self {
        Self {
            version: 0,
            next_id: 1,
            entries: BTreeMap::new(),
            by_name: HashMap::new(),
        }
    }

    /// Structural version; bumped on every committed change.
    pub fn version(&self) -> u64 {
        self.version
    }

    fn bump_version(&mut self) {
        self.version += 1;
    }

    fn set_version(&mut self, version: u64) {
        self.version = version;
    }

    pub fn num_indexes(&self) -> usize {
        self.entries.len()
    }

    /// Add a descriptor. Names are unique within a catalog; key patterns are
    /// not. At most one descriptor may carry the primary flag.
    pub fn register(
        &mut self,
        name: &str,
        key_pattern: KeyPattern,
        primary: bool,
    ) -> DbResult<IndexId> {
        if self.by_name.contains_key(name) {
            return Err(DbError::InvalidOptions(format!(
                "index with name [{}] already exists",
                name
            )));
        }
        if primary && self.primary().is_some() {
            return Err(DbError::Internal(
                "catalog already has a primary-key index".to_string(),
            ));
        }
        let id = IndexId(self.next_id);
        self.next_id += 1;
        self.entries.insert(
            id,
            IndexDescriptor::new(id, name.to_string(), key_pattern, primary),
        );
        self.by_name.insert(name.to_string(), id);
        Ok(id)
    }

    pub fn primary(&self) -> Option<&IndexDescriptor> {
        self.entries.values().find(|d| d.is_primary())
    }

    pub fn find_by_name(&self, name: &str) -> Option<&IndexDescriptor> {
        self.by_name.get(name).and_then(|id| self.entries.get(id))
    }

    /// Exact key-pattern match. Patterns are not unique, so this returns the
    /// oldest matching descriptor.
    pub fn find_by_key_pattern(&self, pattern: &KeyPattern) -> Option<&IndexDescriptor> {
        self.entries.values().find(|d| d.key_pattern() == pattern)
    }

    /// Remove one descriptor. Callers are responsible for refusing the
    /// primary-key index before getting here.
    pub fn drop_index(&mut self, id: IndexId) -> DbResult<IndexDescriptor> {
        let descriptor = self
            .entries
            .remove(&id)
            .ok_or_else(|| DbError::Internal(format!("no index with id {} in catalog", id.0)))?;
        self.by_name.remove(descriptor.name());
        Ok(descriptor)
    }

    /// Remove every non-primary descriptor; returns how many were removed.
    /// Removing zero is not an error.
    pub fn drop_all_non_primary(&mut self) -> usize {
        let doomed: Vec<IndexId> = self
            .entries
            .values()
            .filter(|d| !d.is_primary())
            .map(|d| d.id())
            .collect();
        for id in &doomed {
            if let Some(descriptor) = self.entries.remove(id) {
                self.by_name.remove(descriptor.name());
            }
        }
        doomed.len()
    }

    /// Descriptors in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &IndexDescriptor> {
        self.entries.values()
    }

    pub fn index_names(&self) -> Vec<String> {
        self.iter().map(|d| d.name().to_string()).collect()
    }
}

/// Working copy of one collection's catalog, pinned to the version observed
/// when the transaction began.
pub struct CatalogTxn {
    base_version: u64,
    working: IndexCatalog,
}

impl CatalogTxn {
    pub fn catalog(&self) -> &IndexCatalog {
        &self.working
    }

    pub fn catalog_mut(&mut self) -> &mut IndexCatalog {
        &mut self.working
    }

    pub fn base_version(&self) -> u64 {
        self.base_version
    }
}

/// A single catalog namespace. Owned by the `CatalogStore`; the drop
/// operation borrows it for the duration of one attempt.
#[derive(Debug)]
pub struct Collection {
    namespace: Namespace,
    indexes: RwLock<IndexCatalog>,
}

impl Collection {
    /// A new collection always carries its primary-key index.
    pub fn new(namespace: Namespace) -> Self {
        let mut catalog = IndexCatalog::new();
        catalog
            .register(
                PRIMARY_INDEX_NAME,
                KeyPattern::ascending(PRIMARY_KEY_FIELD),
                true,
            )
            .expect("empty catalog accepts the primary-key index");
        Self {
            namespace,
            indexes: RwLock::new(catalog),
        }
    }

    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    /// Begin a catalog transaction: clone the current state and pin its
    /// version.
    pub fn begin_catalog_txn(&self) -> CatalogTxn {
        let guard = self.indexes.read();
        CatalogTxn {
            base_version: guard.version(),
            working: guard.clone(),
        }
    }

    /// Publish a transaction's working copy.
    ///
    /// Under the write lock the pinned version is re-checked; a mismatch
    /// means another writer got in between begin and commit and the attempt
    /// must be discarded. `pre_commit` runs after the check and before the
    /// swap: if it fails (durable recording, typically) the working copy is
    /// dropped and the visible catalog is untouched.
    pub fn commit_catalog<F>(&self, txn: CatalogTxn, pre_commit: F) -> DbResult<()>
    where
        F: FnOnce() -> DbResult<()>,
    {
        let mut guard = self.indexes.write();
        if guard.version() != txn.base_version {
            return Err(DbError::WriteConflict(format!(
                "index catalog for {} changed underneath the attempt (base version {}, now {})",
                self.namespace,
                txn.base_version,
                guard.version()
            )));
        }
        pre_commit()?;
        let mut working = txn.working;
        working.set_version(txn.base_version);
        working.bump_version();
        *guard = working;
        Ok(())
    }

    /// Direct registration path used by index-build completion and by the
    /// surrounding layer when seeding collections. Bypasses the DDL locks,
    /// so it bumps the version and invalidates pinned transactions.
    pub fn publish_index(&self, name: &str, key_pattern: KeyPattern) -> DbResult<IndexId> {
        let mut guard = self.indexes.write();
        let id = guard.register(name, key_pattern, false)?;
        guard.bump_version();
        Ok(id)
    }

    /// Point-in-time copy for inspection.
    pub fn catalog_snapshot(&self) -> IndexCatalog {
        self.indexes.read().clone()
    }

    pub fn num_indexes(&self) -> usize {
        self.indexes.read().num_indexes()
    }
}
