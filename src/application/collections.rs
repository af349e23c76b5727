use crate::domain::entities::collection::CollectionInfo;
use crate::domain::error::DomainError;
use crate::domain::ports::collection_repository::CollectionRepository;
use crate::domain::values::collection_name::CollectionName;
use crate::domain::values::distance::{DistanceMetric, SPACE_KEY};
use crate::domain::values::metadata::{validate_metadata, Metadata};
use std::sync::Arc;

pub struct CollectionsUseCase {
    repo: Arc<dyn CollectionRepository>,
}

impl CollectionsUseCase {
    pub fn new(repo: Arc<dyn CollectionRepository>) -> Self {
        Self { repo }
    }

    fn parse_name(name: &str) -> Result<CollectionName, DomainError> {
        CollectionName::new(name).map_err(DomainError::InvalidInput)
    }

    fn metric_from(metadata: Option<&Metadata>) -> Result<DistanceMetric, DomainError> {
        match metadata.and_then(|m| m.get(SPACE_KEY)) {
            None => Ok(DistanceMetric::default()),
            Some(value) => value
                .as_str()
                .ok_or_else(|| DomainError::InvalidInput(format!("{SPACE_KEY} must be a string, got {value}")))?
                .parse()
                .map_err(DomainError::InvalidInput),
        }
    }

    pub fn create(&self, name: &str, metadata: Option<Metadata>) -> Result<CollectionInfo, DomainError> {
        let name = Self::parse_name(name)?;
        if let Some(metadata) = &metadata {
            validate_metadata(metadata)?;
        }
        let metric = Self::metric_from(metadata.as_ref())?;
        let collection = CollectionInfo::new(name, metadata, metric);
        self.repo.create(&collection)?;
        tracing::info!(name = %collection.name, id = %collection.id, %metric, "created collection");
        Ok(collection)
    }

    pub fn get_or_create(&self, name: &str, metadata: Option<Metadata>) -> Result<CollectionInfo, DomainError> {
        let parsed = Self::parse_name(name)?;
        if let Some(existing) = self.repo.get_by_name(&parsed)? {
            if metadata.is_some() && metadata != existing.metadata {
                tracing::debug!(name = %existing.name, "collection exists; ignoring new metadata");
            }
            return Ok(existing);
        }
        self.create(name, metadata)
    }

    pub fn get(&self, name: &str) -> Result<CollectionInfo, DomainError> {
        let parsed = Self::parse_name(name)?;
        self.repo
            .get_by_name(&parsed)?
            .ok_or_else(|| DomainError::NotFound(format!("Collection {name} does not exist")))
    }

    /// Reload a collection by id, picking up a dimension fixed since the handle was taken.
    pub fn refresh(&self, id: &str) -> Result<CollectionInfo, DomainError> {
        self.repo
            .get_by_id(id)?
            .ok_or_else(|| DomainError::NotFound(format!("Collection id {id} no longer exists")))
    }

    pub fn list(&self) -> Result<Vec<CollectionInfo>, DomainError> {
        self.repo.list()
    }

    pub fn count(&self) -> Result<usize, DomainError> {
        Ok(self.repo.list()?.len())
    }

    pub fn delete(&self, name: &str) -> Result<(), DomainError> {
        let collection = self.get(name)?;
        self.repo.delete(&collection.id)?;
        tracing::info!(name = %collection.name, id = %collection.id, "deleted collection");
        Ok(())
    }
}
