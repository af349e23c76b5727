use crate::domain::entities::collection::CollectionInfo;
use crate::domain::error::DomainError;
use crate::domain::ports::collection_repository::CollectionRepository;
use crate::domain::values::collection_name::CollectionName;
use crate::domain::values::metadata::Metadata;
use crate::infrastructure::sqlite::{conversion_error, SharedConnection};
use chrono::DateTime;
use rusqlite::{params, OptionalExtension};

const SELECT_COLS: &str = "id, name, metadata, metric, dimension, created_at";

pub struct SqliteCollectionRepo {
    conn: SharedConnection,
}

impl SqliteCollectionRepo {
    pub fn new(conn: SharedConnection) -> Self {
        Self { conn }
    }

    fn row_to_collection(row: &rusqlite::Row) -> Result<CollectionInfo, rusqlite::Error> {
        let name_str: String = row.get(1)?;
        let metadata_str: Option<String> = row.get(2)?;
        let metric_str: String = row.get(3)?;
        let dimension: Option<i64> = row.get(4)?;
        let created_str: String = row.get(5)?;

        let metadata = metadata_str
            .map(|s| serde_json::from_str::<Metadata>(&s))
            .transpose()
            .map_err(|e| conversion_error(2, format!("invalid collection metadata: {e}")))?;

        Ok(CollectionInfo {
            id: row.get(0)?,
            name: CollectionName::new(&name_str).map_err(|e| conversion_error(1, e))?,
            metadata,
            metric: metric_str.parse().map_err(|e| conversion_error(3, e))?,
            dimension: dimension.map(|d| d as usize),
            created_at: DateTime::parse_from_rfc3339(&created_str)
                .map(|dt| dt.with_timezone(&chrono::Utc))
                .map_err(|e| conversion_error(5, format!("invalid timestamp: {e}")))?,
        })
    }
}

impl CollectionRepository for SqliteCollectionRepo {
    fn create(&self, collection: &CollectionInfo) -> Result<(), DomainError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| DomainError::Database(e.to_string()))?;
        let taken: i64 = conn.query_row(
            "SELECT COUNT(*) FROM collections WHERE name = ?1",
            params![collection.name.as_str()],
            |r| r.get(0),
        )?;
        if taken > 0 {
            return Err(DomainError::AlreadyExists(format!(
                "Collection {} already exists",
                collection.name
            )));
        }
        let metadata = collection
            .metadata
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;
        conn.execute(
            "INSERT INTO collections (id, name, metadata, metric, dimension, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                collection.id,
                collection.name.as_str(),
                metadata,
                collection.metric.to_string(),
                collection.dimension.map(|d| d as i64),
                collection.created_at.to_rfc3339(),
            ],
        )
        .map_err(|e| DomainError::Database(format!("Failed to create collection: {e}")))?;
        Ok(())
    }

    fn get_by_name(&self, name: &CollectionName) -> Result<Option<CollectionInfo>, DomainError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| DomainError::Database(e.to_string()))?;
        let sql = format!("SELECT {} FROM collections WHERE name = ?1", SELECT_COLS);
        Ok(conn
            .query_row(&sql, params![name.as_str()], Self::row_to_collection)
            .optional()?)
    }

    fn get_by_id(&self, id: &str) -> Result<Option<CollectionInfo>, DomainError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| DomainError::Database(e.to_string()))?;
        let sql = format!("SELECT {} FROM collections WHERE id = ?1", SELECT_COLS);
        Ok(conn
            .query_row(&sql, params![id], Self::row_to_collection)
            .optional()?)
    }

    fn list(&self) -> Result<Vec<CollectionInfo>, DomainError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| DomainError::Database(e.to_string()))?;
        let sql = format!("SELECT {} FROM collections ORDER BY name", SELECT_COLS);
        let mut stmt = conn.prepare(&sql)?;
        let collections = stmt
            .query_map([], Self::row_to_collection)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(collections)
    }

    fn delete(&self, id: &str) -> Result<(), DomainError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| DomainError::Database(e.to_string()))?;
        // documents go with it through ON DELETE CASCADE
        let removed = conn.execute("DELETE FROM collections WHERE id = ?1", params![id])?;
        if removed == 0 {
            return Err(DomainError::NotFound(format!("Collection id {id}")));
        }
        Ok(())
    }
}
