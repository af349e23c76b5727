use crate::application::collections::CollectionsUseCase;
use crate::domain::entities::document::StoredDocument;
use crate::domain::entities::results::GetResult;
use crate::domain::error::DomainError;
use crate::domain::ports::document_repository::DocumentRepository;
use crate::domain::values::filter::{Where, WhereDocument};
use crate::domain::values::include::Include;
use std::sync::Arc;

pub const DEFAULT_PEEK: usize = 10;

#[derive(Debug, Clone)]
pub struct GetRequest {
    pub ids: Option<Vec<String>>,
    pub where_filter: Option<Where>,
    pub where_document: Option<WhereDocument>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
    pub include: Vec<Include>,
}

impl Default for GetRequest {
    fn default() -> Self {
        Self {
            ids: None,
            where_filter: None,
            where_document: None,
            limit: None,
            offset: None,
            include: Include::get_default(),
        }
    }
}

impl GetRequest {
    pub fn ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ids = Some(ids.into_iter().map(Into::into).collect());
        self
    }

    pub fn where_filter(mut self, filter: Where) -> Self {
        self.where_filter = Some(filter);
        self
    }

    pub fn where_document(mut self, filter: WhereDocument) -> Self {
        self.where_document = Some(filter);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn include(mut self, include: Vec<Include>) -> Self {
        self.include = include;
        self
    }
}

/// Documents of a collection restricted by ids and filters, in insertion order.
pub(crate) fn select_documents(
    repo: &dyn DocumentRepository,
    collection_id: &str,
    ids: Option<&[String]>,
    where_filter: Option<&Where>,
    where_document: Option<&WhereDocument>,
) -> Result<Vec<StoredDocument>, DomainError> {
    let docs = match ids {
        Some(ids) => repo.get_by_ids(collection_id, ids)?,
        None => repo.list(collection_id)?,
    };
    Ok(docs
        .into_iter()
        .filter(|d| where_filter.map_or(true, |w| w.matches(&d.metadata)))
        .filter(|d| where_document.map_or(true, |w| w.matches(d.document.as_deref())))
        .collect())
}

pub struct GetUseCase {
    collections: Arc<CollectionsUseCase>,
    repo: Arc<dyn DocumentRepository>,
}

impl GetUseCase {
    pub fn new(collections: Arc<CollectionsUseCase>, repo: Arc<dyn DocumentRepository>) -> Self {
        Self { collections, repo }
    }

    pub fn get(&self, collection_id: &str, request: &GetRequest) -> Result<GetResult, DomainError> {
        let collection = self.collections.refresh(collection_id)?;
        let docs = select_documents(
            self.repo.as_ref(),
            &collection.id,
            request.ids.as_deref(),
            request.where_filter.as_ref(),
            request.where_document.as_ref(),
        )?;
        let page: Vec<StoredDocument> = docs
            .into_iter()
            .skip(request.offset.unwrap_or(0))
            .take(request.limit.unwrap_or(usize::MAX))
            .collect();
        Ok(GetResult::from_documents(page, &request.include))
    }

    pub fn peek(&self, collection_id: &str, limit: usize) -> Result<GetResult, DomainError> {
        self.get(collection_id, &GetRequest::default().limit(limit))
    }

    pub fn count(&self, collection_id: &str) -> Result<usize, DomainError> {
        let collection = self.collections.refresh(collection_id)?;
        self.repo.count(&collection.id)
    }
}
