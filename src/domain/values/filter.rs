//! Structured filters over document metadata (`where`) and document text
//! (`where_document`).
//!
//! Filters arrive as JSON and are parsed into typed trees before use:
//!
//! ```json
//! {"$and": [{"source": "notion"}, {"page": {"$gte": 3}}]}
//! {"$contains": "listening"}
//! ```

use crate::domain::error::DomainError;
use crate::domain::values::metadata::{Metadata, MetadataValue};
use serde_json::Value;

/// Comparison applied to a single metadata key.
#[derive(Debug, Clone, PartialEq)]
pub enum Comparison {
    Eq(MetadataValue),
    Ne(MetadataValue),
    Gt(f64),
    Gte(f64),
    Lt(f64),
    Lte(f64),
    In(Vec<MetadataValue>),
    Nin(Vec<MetadataValue>),
}

/// Metadata filter.
#[derive(Debug, Clone, PartialEq)]
pub enum Where {
    Field { key: String, op: Comparison },
    And(Vec<Where>),
    Or(Vec<Where>),
}

/// Document text filter.
#[derive(Debug, Clone, PartialEq)]
pub enum WhereDocument {
    Contains(String),
    NotContains(String),
    And(Vec<WhereDocument>),
    Or(Vec<WhereDocument>),
}

fn single_entry<'a>(value: &'a Value, what: &str) -> Result<(&'a String, &'a Value), DomainError> {
    let obj = value
        .as_object()
        .ok_or_else(|| DomainError::InvalidInput(format!("{what} must be an object, got {value}")))?;
    if obj.len() != 1 {
        return Err(DomainError::InvalidInput(format!(
            "{what} must have exactly one key, got {}; combine conditions with $and / $or",
            obj.len()
        )));
    }
    obj.iter()
        .next()
        .ok_or_else(|| DomainError::InvalidInput(format!("{what} is empty")))
}

fn logical_operands<'a>(op: &str, value: &'a Value) -> Result<&'a Vec<Value>, DomainError> {
    let list = value
        .as_array()
        .ok_or_else(|| DomainError::InvalidInput(format!("{op} expects a list, got {value}")))?;
    if list.len() < 2 {
        return Err(DomainError::InvalidInput(format!(
            "{op} expects at least two conditions, got {}",
            list.len()
        )));
    }
    Ok(list)
}

fn number(op: &str, value: &Value) -> Result<f64, DomainError> {
    value
        .as_f64()
        .ok_or_else(|| DomainError::InvalidInput(format!("{op} expects a number, got {value}")))
}

fn value_list(op: &str, value: &Value) -> Result<Vec<MetadataValue>, DomainError> {
    let list = value
        .as_array()
        .ok_or_else(|| DomainError::InvalidInput(format!("{op} expects a list, got {value}")))?;
    if list.is_empty() {
        return Err(DomainError::InvalidInput(format!("{op} expects a non-empty list")));
    }
    list.iter().map(MetadataValue::from_json).collect()
}

impl Comparison {
    fn parse(value: &Value) -> Result<Self, DomainError> {
        if !value.is_object() {
            return Ok(Comparison::Eq(MetadataValue::from_json(value)?));
        }
        let (op, operand) = single_entry(value, "Operator expression")?;
        match op.as_str() {
            "$eq" => Ok(Comparison::Eq(MetadataValue::from_json(operand)?)),
            "$ne" => Ok(Comparison::Ne(MetadataValue::from_json(operand)?)),
            "$gt" => Ok(Comparison::Gt(number(op, operand)?)),
            "$gte" => Ok(Comparison::Gte(number(op, operand)?)),
            "$lt" => Ok(Comparison::Lt(number(op, operand)?)),
            "$lte" => Ok(Comparison::Lte(number(op, operand)?)),
            "$in" => Ok(Comparison::In(value_list(op, operand)?)),
            "$nin" => Ok(Comparison::Nin(value_list(op, operand)?)),
            other => Err(DomainError::InvalidInput(format!("Unknown operator: {other}"))),
        }
    }

    fn matches(&self, value: &MetadataValue) -> bool {
        match self {
            Comparison::Eq(expected) => value.loosely_eq(expected),
            Comparison::Ne(expected) => !value.loosely_eq(expected),
            Comparison::Gt(n) => value.as_f64().is_some_and(|v| v > *n),
            Comparison::Gte(n) => value.as_f64().is_some_and(|v| v >= *n),
            Comparison::Lt(n) => value.as_f64().is_some_and(|v| v < *n),
            Comparison::Lte(n) => value.as_f64().is_some_and(|v| v <= *n),
            Comparison::In(options) => options.iter().any(|o| value.loosely_eq(o)),
            Comparison::Nin(options) => !options.iter().any(|o| value.loosely_eq(o)),
        }
    }
}

impl Where {
    pub fn from_json(value: &Value) -> Result<Self, DomainError> {
        let (key, operand) = single_entry(value, "where filter")?;
        match key.as_str() {
            "$and" => Ok(Where::And(
                logical_operands(key, operand)?
                    .iter()
                    .map(Where::from_json)
                    .collect::<Result<_, _>>()?,
            )),
            "$or" => Ok(Where::Or(
                logical_operands(key, operand)?
                    .iter()
                    .map(Where::from_json)
                    .collect::<Result<_, _>>()?,
            )),
            k if k.starts_with('$') => Err(DomainError::InvalidInput(format!(
                "Unknown logical operator in where filter: {k}"
            ))),
            k => Ok(Where::Field {
                key: k.to_string(),
                op: Comparison::parse(operand)?,
            }),
        }
    }

    /// Documents lacking the key never match, whatever the operator.
    pub fn matches(&self, metadata: &Metadata) -> bool {
        match self {
            Where::Field { key, op } => metadata.get(key).is_some_and(|v| op.matches(v)),
            Where::And(items) => items.iter().all(|w| w.matches(metadata)),
            Where::Or(items) => items.iter().any(|w| w.matches(metadata)),
        }
    }
}

impl WhereDocument {
    pub fn from_json(value: &Value) -> Result<Self, DomainError> {
        let (key, operand) = single_entry(value, "where_document filter")?;
        let text = |op: &str| {
            operand
                .as_str()
                .map(str::to_string)
                .ok_or_else(|| DomainError::InvalidInput(format!("{op} expects a string, got {operand}")))
        };
        match key.as_str() {
            "$contains" => Ok(WhereDocument::Contains(text(key.as_str())?)),
            "$not_contains" => Ok(WhereDocument::NotContains(text(key.as_str())?)),
            "$and" => Ok(WhereDocument::And(
                logical_operands(key, operand)?
                    .iter()
                    .map(WhereDocument::from_json)
                    .collect::<Result<_, _>>()?,
            )),
            "$or" => Ok(WhereDocument::Or(
                logical_operands(key, operand)?
                    .iter()
                    .map(WhereDocument::from_json)
                    .collect::<Result<_, _>>()?,
            )),
            other => Err(DomainError::InvalidInput(format!(
                "Unknown where_document operator: {other}"
            ))),
        }
    }

    pub fn matches(&self, document: Option<&str>) -> bool {
        match self {
            WhereDocument::Contains(needle) => document.is_some_and(|d| d.contains(needle.as_str())),
            WhereDocument::NotContains(needle) => !document.is_some_and(|d| d.contains(needle.as_str())),
            WhereDocument::And(items) => items.iter().all(|w| w.matches(document)),
            WhereDocument::Or(items) => items.iter().any(|w| w.matches(document)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::values::metadata::metadata_from_json;
    use serde_json::json;

    fn meta(v: Value) -> Metadata {
        metadata_from_json(&v).unwrap()
    }

    #[test]
    fn test_shorthand_equality() {
        let w = Where::from_json(&json!({"source": "notion"})).unwrap();
        assert!(w.matches(&meta(json!({"source": "notion"}))));
        assert!(!w.matches(&meta(json!({"source": "google-docs"}))));
        assert!(!w.matches(&Metadata::new()));
    }

    #[test]
    fn test_numeric_ranges() {
        let w = Where::from_json(&json!({"$and": [{"page": {"$gte": 2}}, {"page": {"$lt": 5}}]})).unwrap();
        assert!(w.matches(&meta(json!({"page": 2}))));
        assert!(w.matches(&meta(json!({"page": 4.5}))));
        assert!(!w.matches(&meta(json!({"page": 5}))));
        assert!(!w.matches(&meta(json!({"page": "3"}))));
    }

    #[test]
    fn test_membership_and_or() {
        let w = Where::from_json(&json!({"$or": [
            {"source": {"$in": ["notion", "slack"]}},
            {"draft": true}
        ]}))
        .unwrap();
        assert!(w.matches(&meta(json!({"source": "slack"}))));
        assert!(w.matches(&meta(json!({"source": "web", "draft": true}))));
        assert!(!w.matches(&meta(json!({"source": "web"}))));

        let nin = Where::from_json(&json!({"source": {"$nin": ["notion"]}})).unwrap();
        assert!(nin.matches(&meta(json!({"source": "web"}))));
        assert!(!nin.matches(&Metadata::new()));
    }

    #[test]
    fn test_ne_requires_key() {
        let w = Where::from_json(&json!({"source": {"$ne": "notion"}})).unwrap();
        assert!(w.matches(&meta(json!({"source": "web"}))));
        assert!(!w.matches(&meta(json!({"source": "notion"}))));
        assert!(!w.matches(&Metadata::new()));
    }

    #[test]
    fn test_rejects_malformed_filters() {
        assert!(Where::from_json(&json!({"a": 1, "b": 2})).is_err());
        assert!(Where::from_json(&json!({"$and": [{"a": 1}]})).is_err());
        assert!(Where::from_json(&json!({"$xor": []})).is_err());
        assert!(Where::from_json(&json!({"a": {"$gt": "x"}})).is_err());
        assert!(Where::from_json(&json!({"a": {"$like": "x"}})).is_err());
        assert!(Where::from_json(&json!({"a": {"$in": []}})).is_err());
        assert!(Where::from_json(&json!("source")).is_err());
    }

    #[test]
    fn test_where_document() {
        let w = WhereDocument::from_json(&json!({"$and": [
            {"$contains": "listening"},
            {"$not_contains": "draft"}
        ]}))
        .unwrap();
        assert!(w.matches(Some("arabic listening practice")));
        assert!(!w.matches(Some("listening draft")));
        assert!(!w.matches(None));

        let not = WhereDocument::from_json(&json!({"$not_contains": "x"})).unwrap();
        assert!(not.matches(None));
        assert!(WhereDocument::from_json(&json!({"$regex": "x"})).is_err());
    }
}
