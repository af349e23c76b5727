use crate::domain::entities::collection::CollectionInfo;
use crate::domain::error::DomainError;
use crate::domain::values::collection_name::CollectionName;

pub trait CollectionRepository: Send + Sync {
    /// Fails with `AlreadyExists` when the name is taken.
    fn create(&self, collection: &CollectionInfo) -> Result<(), DomainError>;
    fn get_by_name(&self, name: &CollectionName) -> Result<Option<CollectionInfo>, DomainError>;
    fn get_by_id(&self, id: &str) -> Result<Option<CollectionInfo>, DomainError>;
    fn list(&self) -> Result<Vec<CollectionInfo>, DomainError>;
    /// Removes the collection together with its documents.
    fn delete(&self, id: &str) -> Result<(), DomainError>;
}
