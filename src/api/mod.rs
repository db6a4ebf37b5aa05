//! Embeddable API surface. Command dispatch and network transport live in
//! the surrounding layer; this module exposes the service objects they call.

pub mod service;

pub use service::index_admin::{DropIndexesReport, IndexAdminService};
