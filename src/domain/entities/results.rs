use crate::domain::entities::document::StoredDocument;
use crate::domain::values::include::Include;
use crate::domain::values::metadata::Metadata;
use serde::Serialize;

/// A document together with its distance to the query vector.
#[derive(Debug, Clone)]
pub struct ScoredDocument {
    pub document: StoredDocument,
    pub distance: f64,
}

/// Ranked matches, one inner list per query, closest first.
///
/// Fields not requested through `include` are `None`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct QueryResult {
    pub ids: Vec<Vec<String>>,
    pub documents: Option<Vec<Vec<Option<String>>>>,
    pub metadatas: Option<Vec<Vec<Metadata>>>,
    pub distances: Option<Vec<Vec<f64>>>,
    pub embeddings: Option<Vec<Vec<Vec<f32>>>>,
    pub included: Vec<Include>,
}

impl QueryResult {
    pub fn from_hits(hits: Vec<Vec<ScoredDocument>>, include: &[Include]) -> Self {
        let wants = |field: Include| include.contains(&field);
        Self {
            ids: hits
                .iter()
                .map(|row| row.iter().map(|h| h.document.id.clone()).collect())
                .collect(),
            documents: wants(Include::Documents).then(|| {
                hits.iter()
                    .map(|row| row.iter().map(|h| h.document.document.clone()).collect())
                    .collect()
            }),
            metadatas: wants(Include::Metadatas).then(|| {
                hits.iter()
                    .map(|row| row.iter().map(|h| h.document.metadata.clone()).collect())
                    .collect()
            }),
            distances: wants(Include::Distances)
                .then(|| hits.iter().map(|row| row.iter().map(|h| h.distance).collect()).collect()),
            embeddings: wants(Include::Embeddings).then(|| {
                hits.iter()
                    .map(|row| row.iter().map(|h| h.document.embedding.clone()).collect())
                    .collect()
            }),
            included: include.to_vec(),
        }
    }

    /// Number of matches returned for the query at `index`.
    pub fn len_of(&self, index: usize) -> usize {
        self.ids.get(index).map_or(0, Vec::len)
    }
}

/// Unranked documents in insertion order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GetResult {
    pub ids: Vec<String>,
    pub documents: Option<Vec<Option<String>>>,
    pub metadatas: Option<Vec<Metadata>>,
    pub embeddings: Option<Vec<Vec<f32>>>,
    pub included: Vec<Include>,
}

impl GetResult {
    pub fn from_documents(docs: Vec<StoredDocument>, include: &[Include]) -> Self {
        let wants = |field: Include| include.contains(&field);
        Self {
            ids: docs.iter().map(|d| d.id.clone()).collect(),
            documents: wants(Include::Documents).then(|| docs.iter().map(|d| d.document.clone()).collect()),
            metadatas: wants(Include::Metadatas).then(|| docs.iter().map(|d| d.metadata.clone()).collect()),
            embeddings: wants(Include::Embeddings).then(|| docs.iter().map(|d| d.embedding.clone()).collect()),
            included: include
                .iter()
                .copied()
                .filter(|i| *i != Include::Distances)
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
