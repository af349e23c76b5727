use crate::domain::error::DomainError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Scalar value attached to a metadata key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

/// Metadata of a document or collection. Keys are kept sorted so that
/// serialized output is stable.
pub type Metadata = BTreeMap<String, MetadataValue>;

impl MetadataValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            MetadataValue::Int(i) => Some(*i as f64),
            MetadataValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            MetadataValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Equality where integers and floats compare by numeric value.
    pub fn loosely_eq(&self, other: &MetadataValue) -> bool {
        match (self.as_f64(), other.as_f64()) {
            (Some(a), Some(b)) => a == b,
            _ => self == other,
        }
    }

    /// NaN and infinities have no JSON form and could not be read back once stored.
    pub fn ensure_finite(&self, key: &str) -> Result<(), DomainError> {
        match self {
            MetadataValue::Float(f) if !f.is_finite() => Err(DomainError::InvalidInput(format!(
                "Metadata value for '{key}' must be a finite number, got {f}"
            ))),
            _ => Ok(()),
        }
    }

    pub fn from_json(value: &serde_json::Value) -> Result<Self, DomainError> {
        match value {
            serde_json::Value::Bool(b) => Ok(MetadataValue::Bool(*b)),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(MetadataValue::Int(i))
                } else if let Some(f) = n.as_f64() {
                    Ok(MetadataValue::Float(f))
                } else {
                    Err(DomainError::InvalidInput(format!("Unsupported number: {n}")))
                }
            }
            serde_json::Value::String(s) => Ok(MetadataValue::Str(s.clone())),
            other => Err(DomainError::InvalidInput(format!(
                "Metadata values must be strings, numbers or booleans, got {other}"
            ))),
        }
    }
}

impl fmt::Display for MetadataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetadataValue::Bool(b) => write!(f, "{b}"),
            MetadataValue::Int(i) => write!(f, "{i}"),
            MetadataValue::Float(x) => write!(f, "{x}"),
            MetadataValue::Str(s) => write!(f, "{s}"),
        }
    }
}

impl From<&str> for MetadataValue {
    fn from(s: &str) -> Self {
        MetadataValue::Str(s.to_string())
    }
}

impl From<String> for MetadataValue {
    fn from(s: String) -> Self {
        MetadataValue::Str(s)
    }
}

impl From<i64> for MetadataValue {
    fn from(i: i64) -> Self {
        MetadataValue::Int(i)
    }
}

impl From<f64> for MetadataValue {
    fn from(f: f64) -> Self {
        MetadataValue::Float(f)
    }
}

impl From<bool> for MetadataValue {
    fn from(b: bool) -> Self {
        MetadataValue::Bool(b)
    }
}

/// Check metadata built in code before it is stored.
pub fn validate_metadata(metadata: &Metadata) -> Result<(), DomainError> {
    for (key, value) in metadata {
        if key.is_empty() {
            return Err(DomainError::InvalidInput("Metadata keys must not be empty".into()));
        }
        value.ensure_finite(key)?;
    }
    Ok(())
}

/// Parse a JSON object into metadata, rejecting nested values and empty keys.
pub fn metadata_from_json(value: &serde_json::Value) -> Result<Metadata, DomainError> {
    let obj = value
        .as_object()
        .ok_or_else(|| DomainError::InvalidInput(format!("Metadata must be an object, got {value}")))?;
    let mut metadata = Metadata::new();
    for (key, v) in obj {
        if key.is_empty() {
            return Err(DomainError::InvalidInput("Metadata keys must not be empty".into()));
        }
        metadata.insert(key.clone(), MetadataValue::from_json(v)?);
    }
    Ok(metadata)
}
