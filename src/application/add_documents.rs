use crate::application::collections::CollectionsUseCase;
use crate::domain::entities::collection::CollectionInfo;
use crate::domain::entities::document::StoredDocument;
use crate::domain::error::DomainError;
use crate::domain::ports::document_repository::{DocumentRepository, WriteMode};
use crate::domain::ports::embedding_port::{EmbeddingProvider, InputType};
use crate::domain::values::distance::is_finite_vector;
use crate::domain::values::metadata::{validate_metadata, Metadata};
use std::collections::HashSet;
use std::sync::Arc;

/// A batch of documents addressed by id. Every supplied sequence must be
/// as long as `ids`.
#[derive(Debug, Clone, Default)]
pub struct AddRequest {
    pub ids: Vec<String>,
    pub documents: Option<Vec<String>>,
    pub metadatas: Option<Vec<Metadata>>,
    pub embeddings: Option<Vec<Vec<f32>>>,
}

impl AddRequest {
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ids: ids.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    pub fn documents<I, S>(mut self, documents: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.documents = Some(documents.into_iter().map(Into::into).collect());
        self
    }

    pub fn metadatas(mut self, metadatas: Vec<Metadata>) -> Self {
        self.metadatas = Some(metadatas);
        self
    }

    pub fn embeddings(mut self, embeddings: Vec<Vec<f32>>) -> Self {
        self.embeddings = Some(embeddings);
        self
    }

    fn validate(&self) -> Result<(), DomainError> {
        if self.ids.is_empty() {
            return Err(DomainError::InvalidInput("Expected at least one id".into()));
        }
        if self.ids.iter().any(|id| id.is_empty()) {
            return Err(DomainError::InvalidInput("Ids must be non-empty strings".into()));
        }
        let mut seen = HashSet::with_capacity(self.ids.len());
        for id in &self.ids {
            if !seen.insert(id.as_str()) {
                return Err(DomainError::DuplicateId(id.clone()));
            }
        }

        let n = self.ids.len();
        let lengths = [
            ("documents", self.documents.as_ref().map(Vec::len)),
            ("metadatas", self.metadatas.as_ref().map(Vec::len)),
            ("embeddings", self.embeddings.as_ref().map(Vec::len)),
        ];
        for (field, len) in lengths {
            if let Some(len) = len {
                if len != n {
                    return Err(DomainError::InvalidInput(format!(
                        "Number of {field} ({len}) must match number of ids ({n})"
                    )));
                }
            }
        }
        for metadata in self.metadatas.iter().flatten() {
            validate_metadata(metadata)?;
        }
        Ok(())
    }
}

pub struct AddDocumentsUseCase {
    collections: Arc<CollectionsUseCase>,
    repo: Arc<dyn DocumentRepository>,
    embedder: Arc<dyn EmbeddingProvider>,
}

impl AddDocumentsUseCase {
    pub fn new(
        collections: Arc<CollectionsUseCase>,
        repo: Arc<dyn DocumentRepository>,
        embedder: Arc<dyn EmbeddingProvider>,
    ) -> Self {
        Self {
            collections,
            repo,
            embedder,
        }
    }

    pub async fn add(&self, collection_id: &str, request: AddRequest) -> Result<(), DomainError> {
        self.write(collection_id, request, WriteMode::Insert).await
    }

    pub async fn upsert(&self, collection_id: &str, request: AddRequest) -> Result<(), DomainError> {
        self.write(collection_id, request, WriteMode::Upsert).await
    }

    /// Replace the supplied fields of existing documents. A changed document
    /// text without a supplied embedding is embedded again.
    pub async fn update(&self, collection_id: &str, request: AddRequest) -> Result<(), DomainError> {
        request.validate()?;
        let collection = self.collections.refresh(collection_id)?;

        let existing = self.repo.get_by_ids(&collection.id, &request.ids)?;
        if existing.len() != request.ids.len() {
            let found: HashSet<&str> = existing.iter().map(|d| d.id.as_str()).collect();
            let missing: Vec<&str> = request
                .ids
                .iter()
                .map(String::as_str)
                .filter(|id| !found.contains(id))
                .collect();
            return Err(DomainError::NotFound(format!("Document ids {missing:?}")));
        }

        let mut current: Vec<StoredDocument> = request
            .ids
            .iter()
            .filter_map(|id| existing.iter().find(|d| &d.id == id).cloned())
            .collect();

        let mut to_embed: Vec<usize> = Vec::new();
        for (i, doc) in current.iter_mut().enumerate() {
            if let Some(metadatas) = &request.metadatas {
                doc.metadata = metadatas[i].clone();
            }
            if let Some(documents) = &request.documents {
                if doc.document.as_deref() != Some(documents[i].as_str()) {
                    doc.document = Some(documents[i].clone());
                    to_embed.push(i);
                }
            }
            if let Some(embeddings) = &request.embeddings {
                doc.embedding = embeddings[i].clone();
            }
        }

        if request.embeddings.is_none() && !to_embed.is_empty() {
            let texts: Vec<String> = to_embed
                .iter()
                .map(|i| current[*i].document.clone().unwrap_or_default())
                .collect();
            let vectors = self.embed_documents(&texts).await?;
            for (i, vector) in to_embed.into_iter().zip(vectors) {
                current[i].embedding = vector;
            }
        }

        let vectors: Vec<&[f32]> = current.iter().map(|d| d.embedding.as_slice()).collect();
        self.check_dimension(&collection, &vectors)?;
        self.repo.write(&collection.id, &current, WriteMode::Upsert)?;
        tracing::debug!(collection = %collection.name, count = current.len(), "updated documents");
        Ok(())
    }

    async fn write(&self, collection_id: &str, request: AddRequest, mode: WriteMode) -> Result<(), DomainError> {
        request.validate()?;
        if request.documents.is_none() && request.embeddings.is_none() {
            return Err(DomainError::InvalidInput(
                "Either documents or embeddings must be supplied".into(),
            ));
        }
        let collection = self.collections.refresh(collection_id)?;

        if mode == WriteMode::Insert {
            // fail before spending embedding calls on a batch that cannot be written
            let taken = self.repo.existing_ids(&collection.id, &request.ids)?;
            if let Some(id) = taken.first() {
                return Err(DomainError::AlreadyExists(format!(
                    "Document id {id} already exists in collection {}",
                    collection.name
                )));
            }
        }

        let AddRequest {
            ids,
            documents,
            metadatas,
            embeddings,
        } = request;

        let embeddings = match embeddings {
            Some(e) => e,
            None => self.embed_documents(documents.as_deref().unwrap_or_default()).await?,
        };
        let vectors: Vec<&[f32]> = embeddings.iter().map(Vec::as_slice).collect();
        self.check_dimension(&collection, &vectors)?;

        let mut documents = documents.map(Vec::into_iter);
        let mut metadatas = metadatas.map(Vec::into_iter);
        let batch: Vec<StoredDocument> = ids
            .into_iter()
            .zip(embeddings)
            .map(|(id, embedding)| {
                StoredDocument::new(
                    id,
                    documents.as_mut().and_then(|it| it.next()),
                    metadatas.as_mut().and_then(|it| it.next()).unwrap_or_default(),
                    embedding,
                )
            })
            .collect();

        // the repository fixes the dimension of an empty collection in the same transaction
        self.repo.write(&collection.id, &batch, mode)?;
        tracing::debug!(collection = %collection.name, count = batch.len(), ?mode, "wrote documents");
        Ok(())
    }

    async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, DomainError> {
        let vectors = self.embedder.embed(texts, InputType::Document).await?;
        if vectors.len() != texts.len() {
            return Err(DomainError::Embedding(format!(
                "{} returned {} vectors for {} documents",
                self.embedder.name(),
                vectors.len(),
                texts.len()
            )));
        }
        Ok(vectors)
    }

    fn check_dimension(&self, collection: &CollectionInfo, vectors: &[&[f32]]) -> Result<(), DomainError> {
        let expected = match (collection.dimension, vectors.first()) {
            (Some(d), _) => d,
            (None, Some(first)) => first.len(),
            (None, None) => return Ok(()),
        };
        if expected == 0 {
            return Err(DomainError::InvalidInput("Embeddings must not be empty".into()));
        }
        if vectors.iter().any(|v| !is_finite_vector(v)) {
            return Err(DomainError::InvalidInput(
                "Embeddings must contain only finite numbers".into(),
            ));
        }
        if let Some(bad) = vectors.iter().find(|v| v.len() != expected) {
            tracing::warn!(
                collection = %collection.name,
                expected,
                got = bad.len(),
                "embedding dimension mismatch"
            );
            return Err(DomainError::InvalidInput(format!(
                "Embedding dimension {} does not match collection dimensionality {expected}",
                bad.len()
            )));
        }
        Ok(())
    }
}
