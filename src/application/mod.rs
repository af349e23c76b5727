pub mod add_documents;
pub mod collections;
pub mod delete;
pub mod get;
pub mod query;
