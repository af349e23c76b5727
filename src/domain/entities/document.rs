use crate::domain::values::metadata::Metadata;
use serde::{Deserialize, Serialize};

/// A document as held by a collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredDocument {
    pub id: String,
    pub document: Option<String>,
    pub metadata: Metadata,
    pub embedding: Vec<f32>,
}

impl StoredDocument {
    pub fn new(id: String, document: Option<String>, metadata: Metadata, embedding: Vec<f32>) -> Self {
        Self {
            id,
            document,
            metadata,
            embedding,
        }
    }
}
