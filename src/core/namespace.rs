//! Namespace identifier: `<database>.<collection>`

use std::fmt;

use serde::{Deserialize, Serialize};

/// A fully qualified collection namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Namespace {
    database: String,
    collection: String,
}

impl Namespace {
    /// Parse a `db.collection` string. Returns `None` when the string has no
    /// dot separator or either component is empty; such a namespace can never
    /// resolve to a collection.
    pub fn parse(ns: &str) -> Option<Self> {
        let (database, collection) = ns.split_once('.')?;
        if database.is_empty() || collection.is_empty() {
            return None;
        }
        Some(Self {
            database: database.to_string(),
            collection: collection.to_string(),
        })
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.database, self.collection)
    }
}
