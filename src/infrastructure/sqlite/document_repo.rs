use crate::domain::entities::document::StoredDocument;
use crate::domain::error::DomainError;
use crate::domain::ports::document_repository::{DocumentRepository, WriteMode};
use crate::domain::values::metadata::Metadata;
use crate::infrastructure::sqlite::{conversion_error, deserialize_vector, serialize_vector, SharedConnection};
use rusqlite::{params, OptionalExtension};

const SELECT_COLS: &str = "seq, id, document, metadata, vector";

pub struct SqliteDocumentRepo {
    conn: SharedConnection,
}

impl SqliteDocumentRepo {
    pub fn new(conn: SharedConnection) -> Self {
        Self { conn }
    }

    fn row_to_document(row: &rusqlite::Row) -> Result<(i64, StoredDocument), rusqlite::Error> {
        let seq: i64 = row.get(0)?;
        let metadata_str: String = row.get(3)?;
        let blob: Vec<u8> = row.get(4)?;
        let metadata: Metadata = serde_json::from_str(&metadata_str)
            .map_err(|e| conversion_error(3, format!("invalid document metadata: {e}")))?;
        Ok((
            seq,
            StoredDocument {
                id: row.get(1)?,
                document: row.get(2)?,
                metadata,
                embedding: deserialize_vector(&blob),
            },
        ))
    }
}

impl DocumentRepository for SqliteDocumentRepo {
    fn write(&self, collection_id: &str, docs: &[StoredDocument], mode: WriteMode) -> Result<(), DomainError> {
        let mut conn = self
            .conn
            .lock()
            .map_err(|e| DomainError::Database(e.to_string()))?;
        let tx = conn.transaction()?;
        {
            if mode == WriteMode::Insert {
                let mut exists = tx.prepare("SELECT 1 FROM documents WHERE collection_id = ?1 AND id = ?2")?;
                for doc in docs {
                    if exists.exists(params![collection_id, doc.id])? {
                        return Err(DomainError::AlreadyExists(format!(
                            "Document id {} already exists in collection",
                            doc.id
                        )));
                    }
                }
            }

            if let Some(first) = docs.first() {
                tx.execute(
                    "UPDATE collections SET dimension = ?1 WHERE id = ?2 AND dimension IS NULL",
                    params![first.embedding.len() as i64, collection_id],
                )?;
                let dimension: i64 = tx
                    .query_row(
                        "SELECT dimension FROM collections WHERE id = ?1",
                        params![collection_id],
                        |r| r.get::<_, Option<i64>>(0),
                    )
                    .optional()?
                    .flatten()
                    .ok_or_else(|| DomainError::NotFound(format!("Collection id {collection_id}")))?;
                if let Some(bad) = docs.iter().find(|d| d.embedding.len() as i64 != dimension) {
                    return Err(DomainError::InvalidInput(format!(
                        "Embedding dimension {} does not match collection dimensionality {dimension}",
                        bad.embedding.len()
                    )));
                }
            }

            let mut stmt = tx.prepare(
                "INSERT INTO documents (collection_id, id, document, metadata, vector)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT (collection_id, id) DO UPDATE SET
                     document = excluded.document,
                     metadata = excluded.metadata,
                     vector = excluded.vector",
            )?;
            for doc in docs {
                stmt.execute(params![
                    collection_id,
                    doc.id,
                    doc.document,
                    serde_json::to_string(&doc.metadata)?,
                    serialize_vector(&doc.embedding),
                ])
                .map_err(|e| DomainError::Database(format!("Failed to write document {}: {e}", doc.id)))?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn existing_ids(&self, collection_id: &str, ids: &[String]) -> Result<Vec<String>, DomainError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| DomainError::Database(e.to_string()))?;
        let mut stmt = conn.prepare("SELECT 1 FROM documents WHERE collection_id = ?1 AND id = ?2")?;
        let mut found = Vec::new();
        for id in ids {
            if stmt.exists(params![collection_id, id])? {
                found.push(id.clone());
            }
        }
        Ok(found)
    }

    fn get_by_ids(&self, collection_id: &str, ids: &[String]) -> Result<Vec<StoredDocument>, DomainError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| DomainError::Database(e.to_string()))?;
        let sql = format!("SELECT {} FROM documents WHERE collection_id = ?1 AND id = ?2", SELECT_COLS);
        let mut stmt = conn.prepare(&sql)?;
        let mut rows = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(row) = stmt
                .query_row(params![collection_id, id], Self::row_to_document)
                .optional()?
            {
                rows.push(row);
            }
        }
        rows.sort_by_key(|(seq, _)| *seq);
        rows.dedup_by_key(|(seq, _)| *seq);
        Ok(rows.into_iter().map(|(_, doc)| doc).collect())
    }

    fn list(&self, collection_id: &str) -> Result<Vec<StoredDocument>, DomainError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| DomainError::Database(e.to_string()))?;
        let sql = format!("SELECT {} FROM documents WHERE collection_id = ?1 ORDER BY seq", SELECT_COLS);
        let mut stmt = conn.prepare(&sql)?;
        let docs = stmt
            .query_map(params![collection_id], Self::row_to_document)?
            .map(|r| r.map(|(_, doc)| doc))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(docs)
    }

    fn delete(&self, collection_id: &str, ids: &[String]) -> Result<usize, DomainError> {
        let mut conn = self
            .conn
            .lock()
            .map_err(|e| DomainError::Database(e.to_string()))?;
        let tx = conn.transaction()?;
        let mut removed = 0;
        {
            let mut stmt = tx.prepare("DELETE FROM documents WHERE collection_id = ?1 AND id = ?2")?;
            for id in ids {
                removed += stmt.execute(params![collection_id, id])?;
            }
        }
        tx.commit()?;
        Ok(removed)
    }

    fn count(&self, collection_id: &str) -> Result<usize, DomainError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| DomainError::Database(e.to_string()))?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM documents WHERE collection_id = ?1",
            params![collection_id],
            |r| r.get(0),
        )?;
        Ok(count as usize)
    }
}
