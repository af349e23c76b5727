use crate::domain::error::DomainError;
use crate::domain::ports::embedding_port::EmbeddingProvider;
use crate::infrastructure::embeddings::hashing::HashingProvider;
use crate::infrastructure::embeddings::openai::OpenAiProvider;
use crate::infrastructure::embeddings::voyage::VoyageProvider;
use crate::infrastructure::sqlite::IN_MEMORY;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

pub const DEFAULT_DB_PATH: &str = "./docvault.db";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmbeddingBackend {
    #[default]
    Hash,
    OpenAi,
    Voyage,
}

impl fmt::Display for EmbeddingBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmbeddingBackend::Hash => write!(f, "hash"),
            EmbeddingBackend::OpenAi => write!(f, "openai"),
            EmbeddingBackend::Voyage => write!(f, "voyage"),
        }
    }
}

impl FromStr for EmbeddingBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "hash" => Ok(EmbeddingBackend::Hash),
            "openai" => Ok(EmbeddingBackend::OpenAi),
            "voyage" => Ok(EmbeddingBackend::Voyage),
            _ => Err(format!("Unknown embedding provider: {s}. Use hash, openai or voyage")),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct EmbeddingConfig {
    pub backend: EmbeddingBackend,
    pub api_key: String,
    pub model: Option<String>,
    pub base_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: String,
    pub embedding: EmbeddingConfig,
}

impl Config {
    /// Reads `DOCVAULT_*` environment variables.
    pub fn from_env() -> Result<Self, DomainError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, DomainError> {
        let backend = match lookup("DOCVAULT_EMBEDDING_PROVIDER") {
            Some(p) => p.parse().map_err(DomainError::InvalidInput)?,
            None => EmbeddingBackend::default(),
        };
        let api_key = lookup("DOCVAULT_EMBEDDING_API_KEY").unwrap_or_default();
        if backend != EmbeddingBackend::Hash && api_key.is_empty() {
            return Err(DomainError::InvalidInput(format!(
                "DOCVAULT_EMBEDDING_API_KEY is required for the {backend} provider"
            )));
        }
        Ok(Self {
            db_path: lookup("DOCVAULT_DB").unwrap_or_else(|| DEFAULT_DB_PATH.into()),
            embedding: EmbeddingConfig {
                backend,
                api_key,
                model: lookup("DOCVAULT_EMBEDDING_MODEL"),
                base_url: lookup("DOCVAULT_EMBEDDING_BASE_URL"),
            },
        })
    }

    /// In-memory store with the local hashing embedder.
    pub fn ephemeral() -> Self {
        Self {
            db_path: IN_MEMORY.into(),
            embedding: EmbeddingConfig::default(),
        }
    }

    pub fn build_embedder(&self) -> Arc<dyn EmbeddingProvider> {
        let e = &self.embedding;
        match e.backend {
            EmbeddingBackend::Hash => Arc::new(HashingProvider::default()),
            EmbeddingBackend::OpenAi => Arc::new(OpenAiProvider::new(e.api_key.clone(), e.model.clone(), e.base_url.clone())),
            EmbeddingBackend::Voyage => Arc::new(VoyageProvider::new(e.api_key.clone(), e.model.clone(), e.base_url.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.db_path, DEFAULT_DB_PATH);
        assert_eq!(config.embedding.backend, EmbeddingBackend::Hash);
        assert_eq!(config.build_embedder().name(), "hash");
    }

    #[test]
    fn test_remote_provider_requires_key() {
        assert!(Config::from_lookup(lookup(&[("DOCVAULT_EMBEDDING_PROVIDER", "openai")])).is_err());
        let config = Config::from_lookup(lookup(&[
            ("DOCVAULT_EMBEDDING_PROVIDER", "Voyage"),
            ("DOCVAULT_EMBEDDING_API_KEY", "k"),
            ("DOCVAULT_EMBEDDING_MODEL", "voyage-3"),
            ("DOCVAULT_DB", ":memory:"),
        ]))
        .unwrap();
        let embedder = config.build_embedder();
        assert_eq!(embedder.name(), "voyage");
        assert_eq!(embedder.dimension(), 1024);
        assert_eq!(config.db_path, ":memory:");
    }

    #[test]
    fn test_unknown_provider() {
        assert!(Config::from_lookup(lookup(&[("DOCVAULT_EMBEDDING_PROVIDER", "noop")])).is_err());
    }
}
