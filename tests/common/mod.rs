//! Shared test helpers.
#![allow(dead_code)]

use docvault::application::add_documents::AddRequest;
use docvault::domain::values::metadata::{Metadata, MetadataValue};
use docvault::infrastructure::embeddings::hashing::HashingProvider;
use docvault::{Collection, DocVault};
use std::sync::Arc;

pub fn setup() -> DocVault {
    DocVault::with_providers(":memory:", Arc::new(HashingProvider::default())).unwrap()
}

pub fn meta(pairs: &[(&str, MetadataValue)]) -> Metadata {
    pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
}

pub fn source(name: &str) -> Metadata {
    meta(&[("source", name.into())])
}

/// The two documents of the example script.
pub async fn seed(collection: &Collection) {
    collection
        .add(
            AddRequest::new(["doc1", "doc2"])
                .documents(["document1", "document2"])
                .metadatas(vec![source("notion"), source("google-docs")]),
        )
        .await
        .unwrap();
}
