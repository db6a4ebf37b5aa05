//! Shared fixtures for the integration tests

use std::sync::Arc;

use docdb::api::service::index_admin::IndexAdminService;
use docdb::catalog::descriptor::KeyPattern;
use docdb::catalog::store::CatalogStore;
use docdb::config::Config;
use docdb::index::builds::IndexBuildRegistry;
use docdb::replication::ReplicaSetMember;
use docdb::storage::oplog::{MemoryOplog, OplogAppender, OplogEntry, OplogError};

/// A wired-up database core with a replica-set role that tests can flip.
pub struct TestDb {
    pub service: Arc<IndexAdminService>,
    pub catalog: Arc<CatalogStore>,
    pub builds: Arc<IndexBuildRegistry>,
    pub oplog: Arc<MemoryOplog>,
    pub replication: Arc<ReplicaSetMember>,
}

impl TestDb {
    pub fn primary() -> Self {
        Self::with_role(true)
    }

    pub fn secondary() -> Self {
        Self::with_role(false)
    }

    fn with_role(primary: bool) -> Self {
        let catalog = Arc::new(CatalogStore::new());
        let builds = Arc::new(IndexBuildRegistry::new());
        let oplog = Arc::new(MemoryOplog::new());
        let replication = Arc::new(ReplicaSetMember::new(primary));
        let service = Arc::new(IndexAdminService::new(
            Arc::clone(&catalog),
            Arc::clone(&builds),
            Arc::new(docdb::storage::lock::DatabaseLockManager::new()),
            Arc::clone(&replication) as Arc<dyn docdb::replication::ReplicationCoordinator>,
            Arc::clone(&oplog) as Arc<dyn OplogAppender>,
            Config::default(),
        ));
        Self {
            service,
            catalog,
            builds,
            oplog,
            replication,
        }
    }

    /// Create a collection and publish one ascending index per field name.
    pub fn seed_collection(&self, namespace: &str, fields: &[&str]) {
        let collection = self
            .catalog
            .create_collection(namespace)
            .expect("create collection");
        for field in fields {
            collection
                .publish_index(&format!("{}_1", field), KeyPattern::ascending(field))
                .expect("publish index");
        }
    }

    pub fn index_names(&self, namespace: &str) -> Vec<String> {
        self.catalog
            .get_collection(namespace)
            .expect("collection exists")
            .catalog_snapshot()
            .index_names()
    }

    pub fn catalog_version(&self, namespace: &str) -> u64 {
        self.catalog
            .get_collection(namespace)
            .expect("collection exists")
            .catalog_snapshot()
            .version()
    }
}

/// Appender whose appends always fail, for durability-path tests.
pub struct FailingOplog;

impl OplogAppender for FailingOplog {
    fn append(&self, _entry: &OplogEntry) -> Result<(), OplogError> {
        Err(OplogError::AppendFailed("injected append failure".to_string()))
    }
}
