//! Catalog store: namespace -> collection handle resolution

use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::catalog::collection::Collection;
use crate::core::error::{DbError, DbResult};
use crate::core::namespace::Namespace;

/// Registry of live collections, keyed by namespace string. Owned by the
/// surrounding database layer; the drop operation only resolves handles
/// through it.
#[derive(Default)]
pub struct CatalogStore {
    collections: DashMap<String, Arc<Collection>>,
}

impl CatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a collection (with its primary-key index) under `namespace`.
    pub fn create_collection(&self, namespace: &str) -> DbResult<Arc<Collection>> {
        let ns = Namespace::parse(namespace).ok_or_else(|| DbError::InvalidOptions(format!(
            "invalid namespace: {}",
            namespace
        )))?;
        // Entry holds the shard lock, so existence check and insert are one
        // atomic step even under concurrent creates.
        match self.collections.entry(namespace.to_string()) {
            Entry::Occupied(_) => Err(DbError::InvalidOptions(format!(
                "collection already exists: {}",
                namespace
            ))),
            Entry::Vacant(vacant) => {
                let collection = Arc::new(Collection::new(ns));
                vacant.insert(Arc::clone(&collection));
                Ok(collection)
            }
        }
    }

    /// Resolve a namespace to its collection handle, if any.
    pub fn get_collection(&self, namespace: &str) -> Option<Arc<Collection>> {
        self.collections.get(namespace).map(|c| Arc::clone(&c))
    }

    pub fn contains(&self, namespace: &str) -> bool {
        self.collections.contains_key(namespace)
    }

    pub fn len(&self) -> usize {
        self.collections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collections.is_empty()
    }
}
