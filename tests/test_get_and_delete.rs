mod common;

use common::{seed, setup, source};
use docvault::application::add_documents::AddRequest;
use docvault::application::delete::DeleteRequest;
use docvault::application::get::GetRequest;
use docvault::domain::values::filter::{Where, WhereDocument};
use docvault::domain::values::include::Include;
use serde_json::json;

#[tokio::test]
async fn test_get_by_ids_skips_unknown() {
    let vault = setup();
    let c = vault.create_collection("lessons", None).unwrap();
    seed(&c).await;

    let result = c.get(&GetRequest::default().ids(["doc2", "nope", "doc1"])).unwrap();
    // insertion order, not request order
    assert_eq!(result.ids, vec!["doc1", "doc2"]);
    assert_eq!(result.included, Include::get_default());
    assert!(result.embeddings.is_none());
}

#[tokio::test]
async fn test_get_with_filters_and_paging() {
    let vault = setup();
    let c = vault.create_collection("lessons", None).unwrap();
    let ids: Vec<String> = (0..6).map(|i| format!("doc{i}")).collect();
    let docs: Vec<String> = (0..6).map(|i| format!("text number {i}")).collect();
    let metadatas = (0..6)
        .map(|i| source(if i % 2 == 0 { "even" } else { "odd" }))
        .collect();
    c.add(AddRequest::new(ids).documents(docs).metadatas(metadatas))
        .await
        .unwrap();

    let evens = c
        .get(&GetRequest::default().where_filter(Where::from_json(&json!({"source": "even"})).unwrap()))
        .unwrap();
    assert_eq!(evens.ids, vec!["doc0", "doc2", "doc4"]);

    let page = c.get(&GetRequest::default().offset(2).limit(3)).unwrap();
    assert_eq!(page.ids, vec!["doc2", "doc3", "doc4"]);

    let by_text = c
        .get(&GetRequest::default().where_document(WhereDocument::from_json(&json!({"$contains": "number 5"})).unwrap()))
        .unwrap();
    assert_eq!(by_text.ids, vec!["doc5"]);

    let peek = c.peek(2).unwrap();
    assert_eq!(peek.len(), 2);
    assert_eq!(peek.ids, vec!["doc0", "doc1"]);
}

#[tokio::test]
async fn test_delete_by_ids_and_filter() {
    let vault = setup();
    let c = vault.create_collection("lessons", None).unwrap();
    seed(&c).await;
    c.add(AddRequest::new(["doc3"]).documents(["document3"]).metadatas(vec![source("notion")]))
        .await
        .unwrap();

    let removed = c
        .delete(&DeleteRequest {
            ids: Some(vec!["doc2".into(), "missing".into()]),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(removed, vec!["doc2"]);
    assert_eq!(c.count().unwrap(), 2);

    let removed = c
        .delete(&DeleteRequest {
            where_filter: Some(Where::from_json(&json!({"source": "notion"})).unwrap()),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(removed, vec!["doc1", "doc3"]);
    assert_eq!(c.count().unwrap(), 0);
}

#[tokio::test]
async fn test_delete_requires_selector() {
    let vault = setup();
    let c = vault.create_collection("lessons", None).unwrap();
    seed(&c).await;
    assert!(c.delete(&DeleteRequest::default()).is_err());
    assert_eq!(c.count().unwrap(), 2);
}

#[tokio::test]
async fn test_deleted_id_can_be_added_again() {
    let vault = setup();
    let c = vault.create_collection("lessons", None).unwrap();
    seed(&c).await;
    c.delete(&DeleteRequest {
        ids: Some(vec!["doc1".into()]),
        ..Default::default()
    })
    .unwrap();
    c.add(AddRequest::new(["doc1"]).documents(["back again"])).await.unwrap();
    let all = c.get(&GetRequest::default()).unwrap();
    assert_eq!(all.ids, vec!["doc2", "doc1"]);
}
