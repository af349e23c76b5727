//! The end-to-end example: create a collection, add two documents and
//! query it once.

use crate::application::add_documents::AddRequest;
use crate::application::query::QueryRequest;
use crate::domain::entities::results::QueryResult;
use crate::domain::error::DomainError;
use crate::domain::values::metadata::Metadata;
use crate::DocVault;

pub const COLLECTION: &str = "arabic_listening_comprehension";

fn source(name: &str) -> Metadata {
    Metadata::from([("source".to_string(), name.into())])
}

pub async fn run(vault: &DocVault) -> Result<QueryResult, DomainError> {
    let collection = vault.create_collection(COLLECTION, None)?;

    collection
        .add(
            AddRequest::new(["doc1", "doc2"])
                .documents(["document1", "document2"])
                .metadatas(vec![source("notion"), source("google-docs")]),
        )
        .await?;

    collection
        .query(&QueryRequest::texts(["This is a query document"]).n_results(2))
        .await
}
