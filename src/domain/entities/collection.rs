use crate::domain::values::collection_name::CollectionName;
use crate::domain::values::distance::DistanceMetric;
use crate::domain::values::metadata::Metadata;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionInfo {
    pub id: String,
    pub name: CollectionName,
    pub metadata: Option<Metadata>,
    pub metric: DistanceMetric,
    /// Fixed by the first vector stored in the collection.
    pub dimension: Option<usize>,
    pub created_at: DateTime<Utc>,
}

impl CollectionInfo {
    pub fn new(name: CollectionName, metadata: Option<Metadata>, metric: DistanceMetric) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            metadata,
            metric,
            dimension: None,
            created_at: Utc::now(),
        }
    }
}
