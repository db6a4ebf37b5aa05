//! Index removal selector
//!
//! Exactly one form is active per invocation: wildcard, name, or key
//! pattern. The dispatch layer hands over a loosely-typed JSON value
//! (`"*"`, `"a_1"`, or `{"a": 1}`); `parse` turns it into the typed form and
//! rejects anything else.

use serde_json::Value;

use crate::catalog::descriptor::{IndexDirection, KeyPattern};
use crate::core::error::{DbError, DbResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexSelector {
    /// Every non-primary index in the catalog.
    AllNonPrimary,
    Name(String),
    KeyPattern(KeyPattern),
}

impl IndexSelector {
    pub fn name(name: &str) -> Self {
        IndexSelector::Name(name.to_string())
    }

    /// Parse the wire form of the `index` field of a dropIndexes request.
    pub fn parse(spec: &Value) -> DbResult<Self> {
        match spec {
            Value::String(s) if s == "*" => Ok(IndexSelector::AllNonPrimary),
            Value::String(s) => Ok(IndexSelector::Name(s.clone())),
            Value::Object(fields) => {
                let mut pattern = KeyPattern::new();
                for (field, direction) in fields {
                    let direction = direction
                        .as_i64()
                        .and_then(IndexDirection::from_i64)
                        .ok_or_else(|| {
                            DbError::InvalidOptions(format!(
                                "bad index key pattern, field [{}] must be 1 or -1",
                                field
                            ))
                        })?;
                    pattern = pattern.with_field(field, direction);
                }
                Ok(IndexSelector::KeyPattern(pattern))
            }
            _ => Err(DbError::IndexNotFound("invalid index name spec".to_string())),
        }
    }

    /// JSON form for the durable operation log.
    pub fn to_json(&self) -> Value {
        match self {
            IndexSelector::AllNonPrimary => Value::from("*"),
            IndexSelector::Name(name) => Value::from(name.as_str()),
            IndexSelector::KeyPattern(pattern) => pattern.to_json(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_wildcard() {
        assert_eq!(
            IndexSelector::parse(&json!("*")).expect("wildcard"),
            IndexSelector::AllNonPrimary
        );
    }

    #[test]
    fn test_parse_name() {
        assert_eq!(
            IndexSelector::parse(&json!("a_1")).expect("name"),
            IndexSelector::Name("a_1".to_string())
        );
    }

    #[test]
    fn test_parse_key_pattern_preserves_field_order() {
        let selector = IndexSelector::parse(&json!({"b": 1, "a": -1})).expect("pattern");
        let expected = KeyPattern::new()
            .with_field("b", IndexDirection::Ascending)
            .with_field("a", IndexDirection::Descending);
        assert_eq!(selector, IndexSelector::KeyPattern(expected));
    }

    #[test]
    fn test_parse_rejects_bad_direction() {
        let err = IndexSelector::parse(&json!({"a": 2})).expect_err("bad direction");
        assert!(matches!(err, DbError::InvalidOptions(_)));
        let err = IndexSelector::parse(&json!({"a": "text"})).expect_err("bad direction");
        assert!(matches!(err, DbError::InvalidOptions(_)));
    }

    #[test]
    fn test_parse_rejects_invalid_spec() {
        for spec in [json!(42), json!(null), json!([1, 2]), json!(true)] {
            let err = IndexSelector::parse(&spec).expect_err("invalid spec");
            assert_eq!(
                err,
                DbError::IndexNotFound("invalid index name spec".to_string())
            );
        }
    }

    #[test]
    fn test_to_json_round_trip() {
        let selector = IndexSelector::parse(&json!({"a": 1})).expect("pattern");
        assert_eq!(selector.to_json(), json!({"a": 1}));
        assert_eq!(IndexSelector::AllNonPrimary.to_json(), json!("*"));
    }
}
