//! Remote embedding providers against a one-shot local HTTP server.

use docvault::domain::error::DomainError;
use docvault::domain::ports::embedding_port::{EmbeddingProvider, InputType};
use docvault::infrastructure::embeddings::openai::OpenAiProvider;
use docvault::infrastructure::embeddings::voyage::VoyageProvider;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

struct Captured {
    head: String,
    body: serde_json::Value,
}

/// Serves `response` to the first connection and returns what was sent.
async fn serve_once(status: &str, response: serde_json::Value) -> (String, JoinHandle<Captured>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    let status = status.to_string();
    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        let (head, body) = loop {
            let n = socket.read(&mut chunk).await.unwrap();
            assert!(n > 0, "connection closed before request completed");
            buf.extend_from_slice(&chunk[..n]);
            let Some(split) = buf.windows(4).position(|w| w == b"\r\n\r\n") else {
                continue;
            };
            let head = String::from_utf8_lossy(&buf[..split]).to_string();
            let length = head
                .lines()
                .find_map(|l| {
                    let (name, value) = l.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length").then(|| value.trim().parse::<usize>().unwrap())
                })
                .unwrap_or(0);
            if buf.len() >= split + 4 + length {
                break (head, buf[split + 4..split + 4 + length].to_vec());
            }
        };

        let payload = response.to_string();
        let reply = format!(
            "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{payload}",
            payload.len()
        );
        socket.write_all(reply.as_bytes()).await.unwrap();
        socket.shutdown().await.unwrap();
        Captured {
            head,
            body: serde_json::from_slice(&body).unwrap(),
        }
    });
    (base_url, handle)
}

fn texts(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[tokio::test]
async fn test_voyage_request_shape() {
    let (base_url, server) = serve_once(
        "200 OK",
        serde_json::json!({
            "data": [
                {"index": 0, "embedding": [0.1, 0.2]},
                {"index": 1, "embedding": [0.3, 0.4]}
            ]
        }),
    )
    .await;
    let provider = VoyageProvider::new("secret-key".into(), None, Some(base_url));

    let vectors = provider
        .embed(&texts(&["listening", "reading"]), InputType::Query)
        .await
        .unwrap();
    assert_eq!(vectors, vec![vec![0.1, 0.2], vec![0.3, 0.4]]);

    let captured = server.await.unwrap();
    assert!(captured.head.starts_with("POST /v1/embeddings HTTP/1.1"));
    assert!(captured
        .head
        .lines()
        .any(|l| l.eq_ignore_ascii_case("authorization: Bearer secret-key")));
    assert_eq!(captured.body["model"], "voyage-3-lite");
    assert_eq!(captured.body["input_type"], "query");
    assert_eq!(captured.body["input"], serde_json::json!(["listening", "reading"]));
    assert_eq!(provider.dimension(), 512);
}

#[tokio::test]
async fn test_voyage_document_input_type() {
    let (base_url, server) = serve_once(
        "200 OK",
        serde_json::json!({"data": [{"index": 0, "embedding": [1.0]}]}),
    )
    .await;
    let provider = VoyageProvider::new("k".into(), Some("voyage-3".into()), Some(base_url));
    provider.embed(&texts(&["doc"]), InputType::Document).await.unwrap();

    let captured = server.await.unwrap();
    assert_eq!(captured.body["input_type"], "document");
    assert_eq!(captured.body["model"], "voyage-3");
}

#[tokio::test]
async fn test_voyage_count_mismatch_is_an_error() {
    let (base_url, _server) = serve_once(
        "200 OK",
        serde_json::json!({"data": [{"index": 0, "embedding": [1.0]}]}),
    )
    .await;
    let provider = VoyageProvider::new("k".into(), None, Some(base_url));
    let err = provider
        .embed(&texts(&["a", "b"]), InputType::Document)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Embedding(_)));
}

#[tokio::test]
async fn test_voyage_http_error_carries_status() {
    let (base_url, _server) = serve_once("401 Unauthorized", serde_json::json!({"detail": "bad key"})).await;
    let provider = VoyageProvider::new("k".into(), None, Some(base_url));
    let err = provider.embed(&texts(&["a"]), InputType::Query).await.unwrap_err();
    match err {
        DomainError::Embedding(msg) => {
            assert!(msg.contains("401"));
            assert!(msg.contains("bad key"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_openai_reorders_by_index() {
    let (base_url, server) = serve_once(
        "200 OK",
        serde_json::json!({
            "data": [
                {"index": 1, "embedding": [2.0]},
                {"index": 0, "embedding": [1.0]}
            ]
        }),
    )
    .await;
    let provider = OpenAiProvider::new("k".into(), None, Some(format!("{base_url}/")));
    let vectors = provider.embed(&texts(&["first", "second"]), InputType::Query).await.unwrap();
    assert_eq!(vectors, vec![vec![1.0], vec![2.0]]);

    let captured = server.await.unwrap();
    assert!(captured.head.starts_with("POST /v1/embeddings HTTP/1.1"));
    assert_eq!(captured.body["model"], "text-embedding-3-small");
    assert!(captured.body.get("input_type").is_none());
}
