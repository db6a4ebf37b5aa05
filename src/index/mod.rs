//! Index subsystem pieces the drop operation coordinates with:
//! - the removal selector and its loosely-typed wire form
//! - the registry of in-flight index builds and their kill criteria

pub mod builds;
pub mod selector;

pub use builds::{BuildDescriptor, BuildHandle, IndexBuildRegistry, KillCriteria};
pub use selector::IndexSelector;
