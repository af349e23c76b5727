use crate::domain::error::DomainError;
use crate::domain::ports::embedding_port::{EmbeddingProvider, InputType};
use crate::infrastructure::embeddings::remote::EmbeddingsEndpoint;
use serde::Serialize;

const DEFAULT_MODEL: &str = "voyage-3-lite";
const DEFAULT_BASE_URL: &str = "https://api.voyageai.com";

/// Voyage AI embeddings. Distinguishes document and query inputs.
pub struct VoyageProvider {
    endpoint: EmbeddingsEndpoint,
    model: String,
}

#[derive(Serialize)]
struct VoyageBody<'a> {
    input: &'a [String],
    model: &'a str,
    input_type: &'static str,
}

impl VoyageProvider {
    pub fn new(api_key: String, model: Option<String>, base_url: Option<String>) -> Self {
        Self {
            endpoint: EmbeddingsEndpoint::new("Voyage", api_key, base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)),
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        }
    }
}

fn voyage_dimension(model: &str) -> usize {
    match model {
        "voyage-3" | "voyage-code-3" => 1024,
        "voyage-3-large" | "voyage-large-2" => 1536,
        _ => 512,
    }
}

#[async_trait::async_trait]
impl EmbeddingProvider for VoyageProvider {
    async fn embed(&self, texts: &[String], input_type: InputType) -> Result<Vec<Vec<f32>>, DomainError> {
        let input_type = match input_type {
            InputType::Document => "document",
            InputType::Query => "query",
        };
        tracing::debug!(model = %self.model, count = texts.len(), input_type, "requesting Voyage embeddings");
        let body = VoyageBody {
            input: texts,
            model: &self.model,
            input_type,
        };
        self.endpoint.fetch(&body, texts.len()).await
    }

    fn dimension(&self) -> usize {
        voyage_dimension(&self.model)
    }

    fn name(&self) -> &str {
        "voyage"
    }
}
