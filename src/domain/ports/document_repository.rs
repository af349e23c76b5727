use crate::domain::entities::document::StoredDocument;
use crate::domain::error::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Fail the whole batch if any id is already present.
    Insert,
    /// Replace present ids in place, insert the rest.
    Upsert,
}

/// Document storage scoped by collection id. All listings come back in
/// insertion order.
pub trait DocumentRepository: Send + Sync {
    /// Writes the batch atomically. The first write to a collection fixes its
    /// dimension; vectors of any other length fail the batch.
    fn write(&self, collection_id: &str, docs: &[StoredDocument], mode: WriteMode) -> Result<(), DomainError>;
    fn existing_ids(&self, collection_id: &str, ids: &[String]) -> Result<Vec<String>, DomainError>;
    fn get_by_ids(&self, collection_id: &str, ids: &[String]) -> Result<Vec<StoredDocument>, DomainError>;
    fn list(&self, collection_id: &str) -> Result<Vec<StoredDocument>, DomainError>;
    fn delete(&self, collection_id: &str, ids: &[String]) -> Result<usize, DomainError>;
    fn count(&self, collection_id: &str) -> Result<usize, DomainError>;
}
