use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Optional fields returned alongside ids by `get` and `query`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Include {
    Documents,
    Metadatas,
    Distances,
    Embeddings,
}

impl Include {
    /// Fields returned by `query` when the caller does not choose.
    pub fn query_default() -> Vec<Include> {
        vec![Include::Metadatas, Include::Documents, Include::Distances]
    }

    /// Fields returned by `get` when the caller does not choose.
    pub fn get_default() -> Vec<Include> {
        vec![Include::Metadatas, Include::Documents]
    }
}

impl fmt::Display for Include {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Include::Documents => write!(f, "documents"),
            Include::Metadatas => write!(f, "metadatas"),
            Include::Distances => write!(f, "distances"),
            Include::Embeddings => write!(f, "embeddings"),
        }
    }
}

impl FromStr for Include {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "documents" => Ok(Include::Documents),
            "metadatas" => Ok(Include::Metadatas),
            "distances" => Ok(Include::Distances),
            "embeddings" => Ok(Include::Embeddings),
            _ => Err(format!("Unknown include field: {s}")),
        }
    }
}
