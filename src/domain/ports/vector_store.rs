use crate::domain::error::DomainError;
use crate::domain::values::distance::DistanceMetric;
use std::collections::HashSet;

pub trait VectorStore: Send + Sync {
    /// Nearest `limit` ids to `vector` within a collection, closest first.
    /// When `candidates` is given, only those ids are considered.
    fn search_similar(
        &self,
        collection_id: &str,
        vector: &[f32],
        metric: DistanceMetric,
        candidates: Option<&HashSet<String>>,
        limit: usize,
    ) -> Result<Vec<(String, f64)>, DomainError>;
}
