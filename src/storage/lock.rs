//! Database DDL lock manager
//!
//! Catalog structure (not just row data) is mutated by DDL, so an attempt
//! holds two locks for its whole duration: a shared intent lock on the
//! database and an exclusive lock on the database's catalog metadata. The
//! exclusive lock totally orders catalog mutations within a database;
//! acquisition blocks until a concurrent holder releases.

use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::lock_api::{ArcMutexGuard, ArcRwLockReadGuard, ArcRwLockWriteGuard};
use parking_lot::{Mutex, RawMutex, RawRwLock, RwLock};

#[derive(Clone, Default)]
struct DatabaseLocks {
    intent: Arc<RwLock<()>>,
    catalog_meta: Arc<Mutex<()>>,
}

/// Held for the duration of one DDL attempt. Dropping it releases the
/// catalog metadata lock first, then the intent lock.
pub struct DdlGuard {
    _catalog_meta: ArcMutexGuard<RawMutex, ()>,
    _intent: ArcRwLockReadGuard<RawRwLock, ()>,
}

/// Per-database lock registry.
#[derive(Default)]
pub struct DatabaseLockManager {
    databases: DashMap<String, DatabaseLocks>,
}

impl DatabaseLockManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared intent lock on the database plus the exclusive catalog
    /// metadata lock. Blocks until both are available.
    pub fn lock_for_ddl(&self, database: &str) -> DdlGuard {
        let locks = self
            .databases
            .entry(database.to_string())
            .or_default()
            .clone();
        let intent = locks.intent.read_arc();
        let catalog_meta = locks.catalog_meta.lock_arc();
        DdlGuard {
            _catalog_meta: catalog_meta,
            _intent: intent,
        }
    }

    /// Exclusive database lock, used by whole-database operations that must
    /// drain intent holders (e.g. dropDatabase in the surrounding layer).
    pub fn lock_database_exclusive(&self, database: &str) -> ArcRwLockWriteGuard<RawRwLock, ()> {
        let locks = self
            .databases
            .entry(database.to_string())
            .or_default()
            .clone();
        locks.intent.write_arc()
    }
}
