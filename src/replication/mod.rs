//! Replication role oracle and the consistency gate
//!
//! The gate runs once per attempt, after the DDL locks are held and before
//! any catalog access. It is never cached: replica-set role can change
//! between retry attempts.

use std::sync::atomic::{AtomicBool, Ordering};

use dashmap::DashSet;

use crate::core::error::{DbError, DbResult};
use crate::core::namespace::Namespace;

/// Capability the consistency gate queries. Injected rather than ambient so
/// the gate is testable with a fake oracle.
pub trait ReplicationCoordinator: Send + Sync {
    /// Can this node currently accept writes for `database`?
    fn can_accept_writes(&self, database: &str) -> bool;
}

/// Standalone node: always writable.
#[derive(Debug, Default)]
pub struct SingleNodeCoordinator;

impl ReplicationCoordinator for SingleNodeCoordinator {
    fn can_accept_writes(&self, _database: &str) -> bool {
        true
    }
}

/// Replica-set member whose role can change at runtime. Writes are accepted
/// only while primary, and individual databases can be marked non-writable
/// (e.g. mid state-transfer).
#[derive(Default)]
pub struct ReplicaSetMember {
    primary: AtomicBool,
    non_writable: DashSet<String>,
}

impl ReplicaSetMember {
    pub fn new(primary: bool) -> Self {
        Self {
            primary: AtomicBool::new(primary),
            non_writable: DashSet::new(),
        }
    }

    pub fn step_up(&self) {
        self.primary.store(true, Ordering::Release);
    }

    pub fn step_down(&self) {
        self.primary.store(false, Ordering::Release);
    }

    pub fn is_primary(&self) -> bool {
        self.primary.load(Ordering::Acquire)
    }

    pub fn set_database_writable(&self, database: &str, writable: bool) {
        if writable {
            self.non_writable.remove(database);
        } else {
            self.non_writable.insert(database.to_string());
        }
    }
}

impl ReplicationCoordinator for ReplicaSetMember {
    fn can_accept_writes(&self, database: &str) -> bool {
        self.is_primary() && !self.non_writable.contains(database)
    }
}

/// Consistency gate. Rejects the attempt when this operation's writes are
/// supposed to be replicated and the node is not authoritative for the
/// namespace's database.
pub fn check_writable(
    coordinator: &dyn ReplicationCoordinator,
    writes_are_replicated: bool,
    namespace: &Namespace,
) -> DbResult<()> {
    if writes_are_replicated && !coordinator.can_accept_writes(namespace.database()) {
        return Err(DbError::NotPrimary {
            namespace: namespace.to_string(),
        });
    }
    Ok(())
}
