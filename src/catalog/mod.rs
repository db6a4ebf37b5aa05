//! Index catalog subsystem
//!
//! A collection's secondary indexes are described by `IndexDescriptor`
//! entries held in an `IndexCatalog` arena. The catalog is versioned: every
//! committed structural change bumps the version, which is how concurrent
//! structural races are detected.

pub mod collection;
pub mod descriptor;
pub mod store;

pub use collection::{CatalogTxn, Collection, IndexCatalog};
pub use descriptor::{IndexDescriptor, IndexDirection, IndexId, KeyPattern, PRIMARY_INDEX_NAME};
pub use store::CatalogStore;
