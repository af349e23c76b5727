use crate::domain::error::DomainError;
use crate::domain::ports::embedding_port::{EmbeddingProvider, InputType};
use crate::infrastructure::embeddings::remote::EmbeddingsEndpoint;
use serde::Serialize;

const DEFAULT_MODEL: &str = "text-embedding-3-small";
const DEFAULT_BASE_URL: &str = "https://api.openai.com";

pub struct OpenAiProvider {
    endpoint: EmbeddingsEndpoint,
    model: String,
}

#[derive(Serialize)]
struct OpenAiBody<'a> {
    input: &'a [String],
    model: &'a str,
}

impl OpenAiProvider {
    pub fn new(api_key: String, model: Option<String>, base_url: Option<String>) -> Self {
        Self {
            endpoint: EmbeddingsEndpoint::new("OpenAI", api_key, base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)),
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        }
    }
}

#[async_trait::async_trait]
impl EmbeddingProvider for OpenAiProvider {
    // OpenAI has no query/document distinction
    async fn embed(&self, texts: &[String], _input_type: InputType) -> Result<Vec<Vec<f32>>, DomainError> {
        tracing::debug!(model = %self.model, count = texts.len(), "requesting OpenAI embeddings");
        let body = OpenAiBody {
            input: texts,
            model: &self.model,
        };
        self.endpoint.fetch(&body, texts.len()).await
    }

    fn dimension(&self) -> usize {
        if self.model == "text-embedding-3-large" {
            3072
        } else {
            1536
        }
    }

    fn name(&self) -> &str {
        "openai"
    }
}
