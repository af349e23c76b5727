use crate::domain::error::DomainError;
use crate::domain::ports::vector_store::VectorStore;
use crate::domain::values::distance::DistanceMetric;
use crate::infrastructure::sqlite::{deserialize_vector, SharedConnection};
use rusqlite::params;
use std::collections::HashSet;

/// Exact nearest-neighbour search over the vectors stored alongside documents.
pub struct SqliteVectorStore {
    conn: SharedConnection,
}

impl SqliteVectorStore {
    pub fn new(conn: SharedConnection) -> Self {
        Self { conn }
    }
}

impl VectorStore for SqliteVectorStore {
    fn search_similar(
        &self,
        collection_id: &str,
        vector: &[f32],
        metric: DistanceMetric,
        candidates: Option<&HashSet<String>>,
        limit: usize,
    ) -> Result<Vec<(String, f64)>, DomainError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| DomainError::Database(e.to_string()))?;
        let mut stmt = conn.prepare("SELECT id, vector FROM documents WHERE collection_id = ?1 ORDER BY seq")?;
        let rows = stmt.query_map(params![collection_id], |row| {
            let id: String = row.get(0)?;
            let blob: Vec<u8> = row.get(1)?;
            Ok((id, blob))
        })?;

        let mut results: Vec<(String, f64)> = Vec::new();
        for row in rows {
            let (id, blob) = row?;
            if candidates.is_some_and(|allowed| !allowed.contains(&id)) {
                continue;
            }
            let stored = deserialize_vector(&blob);
            let distance = metric.distance(vector, &stored);
            results.push((id, distance));
        }

        // stable sort: equal distances keep insertion order
        results.sort_by(|a, b| a.1.total_cmp(&b.1));
        results.truncate(limit);
        Ok(results)
    }
}
