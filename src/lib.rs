//! DocDB - A lightweight embeddable document database core implemented in Rust
//!
//! This crate provides the catalog and coordination machinery for secondary
//! index removal: the index catalog, the in-flight build registry, the
//! replication consistency gate and the retry-scoped transaction driver.

pub mod api;
pub mod catalog;
pub mod config;
pub mod core;
pub mod index;
pub mod replication;
pub mod storage;
