use crate::domain::error::DomainError;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// An `/v1/embeddings` endpoint speaking the OpenAI-style wire format.
pub(crate) struct EmbeddingsEndpoint {
    client: Client,
    api_key: String,
    url: String,
    label: &'static str,
}

#[derive(Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingItem>,
}

#[derive(Deserialize)]
struct EmbeddingItem {
    #[serde(default)]
    index: usize,
    embedding: Vec<f32>,
}

impl EmbeddingsEndpoint {
    pub(crate) fn new(label: &'static str, api_key: String, base_url: &str) -> Self {
        Self {
            client: Client::new(),
            api_key,
            url: format!("{}/v1/embeddings", base_url.trim_end_matches('/')),
            label,
        }
    }

    /// Posts `body` and returns one vector per input, in input order.
    pub(crate) async fn fetch<B: Serialize>(&self, body: &B, expected: usize) -> Result<Vec<Vec<f32>>, DomainError> {
        let resp = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| DomainError::Embedding(format!("{} request failed: {e}", self.label)))?;

        let status = resp.status();
        if !status.is_success() {
            let detail = resp.text().await.unwrap_or_default();
            return Err(DomainError::Embedding(format!("{} returned {status}: {detail}", self.label)));
        }

        let mut parsed: EmbeddingsResponse = resp
            .json()
            .await
            .map_err(|e| DomainError::Parse(format!("{} response: {e}", self.label)))?;
        if parsed.data.len() != expected {
            return Err(DomainError::Embedding(format!(
                "{} returned {} embeddings for {expected} inputs",
                self.label,
                parsed.data.len()
            )));
        }
        // stable, so responses without indices keep their order
        parsed.data.sort_by_key(|item| item.index);
        Ok(parsed.data.into_iter().map(|item| item.embedding).collect())
    }
}
