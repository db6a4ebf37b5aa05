//! Service layer

pub mod index_admin;

pub use index_admin::{DropIndexesReport, IndexAdminService};
