pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

use crate::application::add_documents::{AddDocumentsUseCase, AddRequest};
use crate::application::collections::CollectionsUseCase;
use crate::application::delete::{DeleteRequest, DeleteUseCase};
use crate::application::get::{GetRequest, GetUseCase};
use crate::application::query::{QueryRequest, QueryUseCase};
use crate::config::Config;
use crate::domain::entities::collection::CollectionInfo;
use crate::domain::entities::results::{GetResult, QueryResult};
use crate::domain::error::DomainError;
use crate::domain::ports::collection_repository::CollectionRepository;
use crate::domain::ports::document_repository::DocumentRepository;
use crate::domain::ports::embedding_port::EmbeddingProvider;
use crate::domain::ports::vector_store::VectorStore;
use crate::domain::values::distance::DistanceMetric;
use crate::domain::values::metadata::Metadata;
use crate::infrastructure::embeddings::hashing::HashingProvider;
use crate::infrastructure::sqlite::collection_repo::SqliteCollectionRepo;
use crate::infrastructure::sqlite::document_repo::SqliteDocumentRepo;
use crate::infrastructure::sqlite::vector_store::SqliteVectorStore;
use crate::infrastructure::sqlite::{open_connection, IN_MEMORY};
use std::sync::Arc;

struct Services {
    collections_uc: Arc<CollectionsUseCase>,
    add_uc: AddDocumentsUseCase,
    query_uc: QueryUseCase,
    get_uc: GetUseCase,
    delete_uc: DeleteUseCase,
}

/// Handle to a document store.
pub struct DocVault {
    services: Arc<Services>,
}

impl DocVault {
    pub fn new(config: &Config) -> Result<Self, DomainError> {
        Self::with_providers(&config.db_path, config.build_embedder())
    }

    /// In-memory store, discarded when the handle is dropped.
    pub fn ephemeral() -> Result<Self, DomainError> {
        Self::with_providers(IN_MEMORY, Arc::new(HashingProvider::default()))
    }

    pub fn with_providers(db_path: &str, embedder: Arc<dyn EmbeddingProvider>) -> Result<Self, DomainError> {
        let conn = open_connection(db_path)?;

        let collection_repo: Arc<dyn CollectionRepository> = Arc::new(SqliteCollectionRepo::new(conn.clone()));
        let document_repo: Arc<dyn DocumentRepository> = Arc::new(SqliteDocumentRepo::new(conn.clone()));
        let vector_store: Arc<dyn VectorStore> = Arc::new(SqliteVectorStore::new(conn));

        // Collections embedded by another provider cannot be queried with this one
        let provider_dim = embedder.dimension();
        for collection in collection_repo.list()? {
            if let Some(stored_dim) = collection.dimension {
                if stored_dim != provider_dim {
                    tracing::warn!(
                        collection = %collection.name,
                        stored_dim,
                        provider_dim,
                        provider = embedder.name(),
                        "stored vectors do not match the embedding provider; text queries will fail"
                    );
                }
            }
        }

        let collections_uc = Arc::new(CollectionsUseCase::new(collection_repo.clone()));
        let services = Services {
            add_uc: AddDocumentsUseCase::new(collections_uc.clone(), document_repo.clone(), embedder.clone()),
            query_uc: QueryUseCase::new(collections_uc.clone(), document_repo.clone(), embedder, vector_store),
            get_uc: GetUseCase::new(collections_uc.clone(), document_repo.clone()),
            delete_uc: DeleteUseCase::new(collections_uc.clone(), document_repo),
            collections_uc,
        };
        tracing::debug!(db_path, "opened store");
        Ok(Self {
            services: Arc::new(services),
        })
    }

    fn handle(&self, info: CollectionInfo) -> Collection {
        Collection {
            info,
            services: self.services.clone(),
        }
    }

    /// Fails with `AlreadyExists` if the name is taken.
    pub fn create_collection(&self, name: &str, metadata: Option<Metadata>) -> Result<Collection, DomainError> {
        let info = self.services.collections_uc.create(name, metadata)?;
        Ok(self.handle(info))
    }

    pub fn get_or_create_collection(&self, name: &str, metadata: Option<Metadata>) -> Result<Collection, DomainError> {
        let info = self.services.collections_uc.get_or_create(name, metadata)?;
        Ok(self.handle(info))
    }

    pub fn get_collection(&self, name: &str) -> Result<Collection, DomainError> {
        let info = self.services.collections_uc.get(name)?;
        Ok(self.handle(info))
    }

    pub fn list_collections(&self) -> Result<Vec<CollectionInfo>, DomainError> {
        self.services.collections_uc.list()
    }

    pub fn count_collections(&self) -> Result<usize, DomainError> {
        self.services.collections_uc.count()
    }

    pub fn delete_collection(&self, name: &str) -> Result<(), DomainError> {
        self.services.collections_uc.delete(name)
    }
}

/// Handle to one collection of a [`DocVault`]. Operations fail with
/// `NotFound` once the collection has been deleted.
#[derive(Clone)]
pub struct Collection {
    info: CollectionInfo,
    services: Arc<Services>,
}

impl Collection {
    pub fn id(&self) -> &str {
        &self.info.id
    }

    pub fn name(&self) -> &str {
        self.info.name.as_str()
    }

    pub fn metadata(&self) -> Option<&Metadata> {
        self.info.metadata.as_ref()
    }

    pub fn metric(&self) -> DistanceMetric {
        self.info.metric
    }

    /// Current state of the collection as stored.
    pub fn info(&self) -> Result<CollectionInfo, DomainError> {
        self.services.collections_uc.refresh(&self.info.id)
    }

    pub async fn add(&self, request: AddRequest) -> Result<(), DomainError> {
        self.services.add_uc.add(&self.info.id, request).await
    }

    pub async fn upsert(&self, request: AddRequest) -> Result<(), DomainError> {
        self.services.add_uc.upsert(&self.info.id, request).await
    }

    pub async fn update(&self, request: AddRequest) -> Result<(), DomainError> {
        self.services.add_uc.update(&self.info.id, request).await
    }

    pub async fn query(&self, request: &QueryRequest) -> Result<QueryResult, DomainError> {
        self.services.query_uc.execute(&self.info.id, request).await
    }

    pub fn get(&self, request: &GetRequest) -> Result<GetResult, DomainError> {
        self.services.get_uc.get(&self.info.id, request)
    }

    pub fn peek(&self, limit: usize) -> Result<GetResult, DomainError> {
        self.services.get_uc.peek(&self.info.id, limit)
    }

    pub fn count(&self) -> Result<usize, DomainError> {
        self.services.get_uc.count(&self.info.id)
    }

    /// Returns the removed ids.
    pub fn delete(&self, request: &DeleteRequest) -> Result<Vec<String>, DomainError> {
        self.services.delete_uc.execute(&self.info.id, request)
    }
}

impl std::fmt::Debug for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collection")
            .field("id", &self.info.id)
            .field("name", &self.info.name)
            .field("metric", &self.info.metric)
            .finish()
    }
}
