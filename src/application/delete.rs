use crate::application::collections::CollectionsUseCase;
use crate::application::get::select_documents;
use crate::domain::error::DomainError;
use crate::domain::ports::document_repository::DocumentRepository;
use crate::domain::values::filter::{Where, WhereDocument};
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct DeleteRequest {
    pub ids: Option<Vec<String>>,
    pub where_filter: Option<Where>,
    pub where_document: Option<WhereDocument>,
}

pub struct DeleteUseCase {
    collections: Arc<CollectionsUseCase>,
    repo: Arc<dyn DocumentRepository>,
}

impl DeleteUseCase {
    pub fn new(collections: Arc<CollectionsUseCase>, repo: Arc<dyn DocumentRepository>) -> Self {
        Self { collections, repo }
    }

    /// Returns the ids that were removed.
    pub fn execute(&self, collection_id: &str, request: &DeleteRequest) -> Result<Vec<String>, DomainError> {
        if request.ids.is_none() && request.where_filter.is_none() && request.where_document.is_none() {
            return Err(DomainError::InvalidInput(
                "Delete needs ids, a where filter or a where_document filter".into(),
            ));
        }
        let collection = self.collections.refresh(collection_id)?;
        let targets: Vec<String> = select_documents(
            self.repo.as_ref(),
            &collection.id,
            request.ids.as_deref(),
            request.where_filter.as_ref(),
            request.where_document.as_ref(),
        )?
        .into_iter()
        .map(|d| d.id)
        .collect();

        if targets.is_empty() {
            return Ok(targets);
        }
        let removed = self.repo.delete(&collection.id, &targets)?;
        tracing::debug!(collection = %collection.name, removed, "deleted documents");
        Ok(targets)
    }
}
