pub mod collection_repository;
pub mod document_repository;
pub mod embedding_port;
pub mod vector_store;
