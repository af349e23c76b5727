use crate::application::collections::CollectionsUseCase;
use crate::application::get::select_documents;
use crate::domain::entities::results::{QueryResult, ScoredDocument};
use crate::domain::error::DomainError;
use crate::domain::ports::document_repository::DocumentRepository;
use crate::domain::ports::embedding_port::{EmbeddingProvider, InputType};
use crate::domain::ports::vector_store::VectorStore;
use crate::domain::values::distance::is_finite_vector;
use crate::domain::values::filter::{Where, WhereDocument};
use crate::domain::values::include::Include;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

pub const DEFAULT_N_RESULTS: usize = 10;

#[derive(Debug, Clone)]
pub struct QueryRequest {
    pub query_texts: Option<Vec<String>>,
    pub query_embeddings: Option<Vec<Vec<f32>>>,
    pub n_results: usize,
    pub where_filter: Option<Where>,
    pub where_document: Option<WhereDocument>,
    pub include: Vec<Include>,
}

impl Default for QueryRequest {
    fn default() -> Self {
        Self {
            query_texts: None,
            query_embeddings: None,
            n_results: DEFAULT_N_RESULTS,
            where_filter: None,
            where_document: None,
            include: Include::query_default(),
        }
    }
}

impl QueryRequest {
    pub fn texts<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            query_texts: Some(texts.into_iter().map(Into::into).collect()),
            ..Default::default()
        }
    }

    pub fn embeddings(embeddings: Vec<Vec<f32>>) -> Self {
        Self {
            query_embeddings: Some(embeddings),
            ..Default::default()
        }
    }

    pub fn n_results(mut self, n: usize) -> Self {
        self.n_results = n;
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

    pub fn include(mut self, include: Vec<Include>) -> Self {
        self.include = include;
        self
    }
}

pub struct QueryUseCase {
    collections: Arc<CollectionsUseCase>,
    repo: Arc<dyn DocumentRepository>,
    embedder: Arc<dyn EmbeddingProvider>,
    vector_store: Arc<dyn VectorStore>,
}

impl QueryUseCase {
    pub fn new(
        collections: Arc<CollectionsUseCase>,
        repo: Arc<dyn DocumentRepository>,
        embedder: Arc<dyn EmbeddingProvider>,
        vector_store: Arc<dyn VectorStore>,
    ) -> Self {
        Self {
            collections,
            repo,
            embedder,
            vector_store,
        }
    }

    async fn query_vectors(&self, request: &QueryRequest) -> Result<Vec<Vec<f32>>, DomainError> {
        let vectors = self.resolve_vectors(request).await?;
        if vectors.iter().any(|v| !is_finite_vector(v)) {
            return Err(DomainError::InvalidInput(
                "Query embeddings must contain only finite numbers".into(),
            ));
        }
        Ok(vectors)
    }

    async fn resolve_vectors(&self, request: &QueryRequest) -> Result<Vec<Vec<f32>>, DomainError> {
        match (&request.query_texts, &request.query_embeddings) {
            (Some(_), Some(_)) => Err(DomainError::InvalidInput(
                "Supply either query_texts or query_embeddings, not both".into(),
            )),
            (None, None) => Err(DomainError::InvalidInput(
                "Supply query_texts or query_embeddings".into(),
            )),
            (Some(texts), None) => {
                if texts.is_empty() {
                    return Err(DomainError::InvalidInput("query_texts must not be empty".into()));
                }
                let vectors = self.embedder.embed(texts, InputType::Query).await?;
                if vectors.len() != texts.len() {
                    return Err(DomainError::Embedding(format!(
                        "{} returned {} vectors for {} queries",
                        self.embedder.name(),
                        vectors.len(),
                        texts.len()
                    )));
                }
                Ok(vectors)
            }
            (None, Some(embeddings)) => {
                if embeddings.is_empty() {
                    return Err(DomainError::InvalidInput("query_embeddings must not be empty".into()));
                }
                Ok(embeddings.clone())
            }
        }
    }

    pub async fn execute(&self, collection_id: &str, request: &QueryRequest) -> Result<QueryResult, DomainError> {
        if request.n_results == 0 {
            return Err(DomainError::InvalidInput("n_results must be a positive integer".into()));
        }
        let collection = self.collections.refresh(collection_id)?;
        let vectors = self.query_vectors(request).await?;

        let Some(dimension) = collection.dimension else {
            // nothing has been stored yet
            return Ok(QueryResult::from_hits(vec![Vec::new(); vectors.len()], &request.include));
        };
        if let Some(bad) = vectors.iter().find(|v| v.len() != dimension) {
            return Err(DomainError::InvalidInput(format!(
                "Query embedding dimension {} does not match collection dimensionality {dimension}",
                bad.len()
            )));
        }

        let candidates: Option<HashSet<String>> =
            if request.where_filter.is_some() || request.where_document.is_some() {
                Some(
                    select_documents(
                        self.repo.as_ref(),
                        &collection.id,
                        None,
                        request.where_filter.as_ref(),
                        request.where_document.as_ref(),
                    )?
                    .into_iter()
                    .map(|d| d.id)
                    .collect(),
                )
            } else {
                None
            };

        let mut hits = Vec::with_capacity(vectors.len());
        for vector in &vectors {
            let ranked = self.vector_store.search_similar(
                &collection.id,
                vector,
                collection.metric,
                candidates.as_ref(),
                request.n_results,
            )?;
            let ids: Vec<String> = ranked.iter().map(|(id, _)| id.clone()).collect();
            let mut docs: HashMap<String, _> = self
                .repo
                .get_by_ids(&collection.id, &ids)?
                .into_iter()
                .map(|d| (d.id.clone(), d))
                .collect();
            let row: Vec<ScoredDocument> = ranked
                .into_iter()
                .filter_map(|(id, distance)| {
                    docs.remove(&id).map(|document| ScoredDocument { document, distance })
                })
                .collect();
            if row.len() < request.n_results {
                tracing::warn!(
                    collection = %collection.name,
                    requested = request.n_results,
                    available = row.len(),
                    "fewer matches than requested"
                );
            }
            hits.push(row);
        }

        Ok(QueryResult::from_hits(hits, &request.include))
    }
}
