//! Index descriptor and key pattern types

use std::fmt;

use serde::{Deserialize, Serialize};

/// Name of the mandatory primary-key index, created with the collection.
pub const PRIMARY_INDEX_NAME: &str = "_id_";

/// Field the primary-key index covers.
pub const PRIMARY_KEY_FIELD: &str = "_id";

/// Stable catalog identifier for one index. Assigned monotonically, so id
/// order is creation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct IndexId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IndexDirection {
    #[serde(rename = "asc")]
    Ascending,
    #[serde(rename = "desc")]
    Descending,
}

impl IndexDirection {
    pub fn as_i64(&self) -> i64 {
        match self {
            IndexDirection::Ascending => 1,
            IndexDirection::Descending => -1,
        }
    }

    /// Only +1 and -1 are valid wire values for a direction.
    pub fn from_i64(value: i64) -> Option<Self> {
        match value {
            1 => Some(IndexDirection::Ascending),
            -1 => Some(IndexDirection::Descending),
            _ => None,
        }
    }
}

/// Ordered field -> direction mapping. Equality is order-sensitive: the
/// pattern `{a: 1, b: 1}` is not the pattern `{b: 1, a: 1}`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct KeyPattern(Vec<(String, IndexDirection)>);

impl KeyPattern {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Single ascending field, the common case.
    pub fn ascending(field: &str) -> Self {
        Self::new().with_field(field, IndexDirection::Ascending)
    }

    pub fn with_field(mut self, field: &str, direction: IndexDirection) -> Self {
        self.0.push((field.to_string(), direction));
        self
    }

    pub fn fields(&self) -> impl Iterator<Item = &(String, IndexDirection)> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// JSON object form, e.g. `{"a": 1, "b": -1}`. Field order is preserved.
    pub fn to_json(&self) -> serde_json::Value {
        let mut map = serde_json::Map::new();
        for (field, direction) in &self.0 {
            map.insert(field.clone(), serde_json::Value::from(direction.as_i64()));
        }
        serde_json::Value::Object(map)
    }
}

// Display renders the brace-object form used in error messages,
// e.g. `{ a: 1, b: -1 }`.
impl fmt::Display for KeyPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{ ")?;
        for (i, (field, direction)) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", field, direction.as_i64())?;
        }
        write!(f, " }}")
    }
}

/// One catalog entry describing a single index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexDescriptor {
    id: IndexId,
    name: String,
    key_pattern: KeyPattern,
    primary: bool,
}

impl IndexDescriptor {
    pub(crate) fn new(id: IndexId, name: String, key_pattern: KeyPattern, primary: bool) -> Self {
        Self {
            id,
            name,
            key_pattern,
            primary,
        }
    }

    pub fn id(&self) -> IndexId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn key_pattern(&self) -> &KeyPattern {
        &self.key_pattern
    }

    /// The primary-key index can never be dropped.
    pub fn is_primary(&self) -> bool {
        self.primary
    }
}
