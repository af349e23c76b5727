mod common;

use common::seed;
use docvault::application::query::QueryRequest;
use docvault::config::Config;
use docvault::infrastructure::embeddings::hashing::HashingProvider;
use docvault::DocVault;
use std::sync::Arc;

fn open(path: &str) -> DocVault {
    DocVault::with_providers(path, Arc::new(HashingProvider::default())).unwrap()
}

#[tokio::test]
async fn test_documents_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("vault.db");
    let path = path.to_str().unwrap();

    {
        let vault = open(path);
        let c = vault.create_collection("arabic_listening_comprehension", None).unwrap();
        seed(&c).await;
    }

    let vault = open(path);
    let c = vault.get_collection("arabic_listening_comprehension").unwrap();
    assert_eq!(c.count().unwrap(), 2);
    assert_eq!(c.info().unwrap().dimension, Some(384));

    let results = c
        .query(&QueryRequest::texts(["This is a query document"]).n_results(2))
        .await
        .unwrap();
    assert_eq!(results.len_of(0), 2);

    assert!(vault.create_collection("arabic_listening_comprehension", None).is_err());
}

#[tokio::test]
async fn test_in_memory_stores_are_independent() {
    let first = DocVault::ephemeral().unwrap();
    first.create_collection("lessons", None).unwrap();
    let second = DocVault::ephemeral().unwrap();
    assert_eq!(second.count_collections().unwrap(), 0);
}

#[test]
fn test_open_from_config() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = Config::ephemeral();
    config.db_path = dir.path().join("cfg.db").to_string_lossy().into_owned();
    let vault = DocVault::new(&config).unwrap();
    vault.create_collection("from-config", None).unwrap();
    assert!(dir.path().join("cfg.db").exists());
}
