//! Local embedding by feature hashing.
//!
//! Word tokens and character trigrams are hashed into a fixed number of
//! buckets with a sign bit, then the vector is L2-normalised. Texts sharing
//! words or word fragments end up close; there is no notion of synonyms.
//! Useful offline and in tests, where a remote model is not available.

use crate::domain::error::DomainError;
use crate::domain::ports::embedding_port::{EmbeddingProvider, InputType};

pub const DEFAULT_DIMENSION: usize = 384;

const WORD_WEIGHT: f32 = 1.0;
const TRIGRAM_WEIGHT: f32 = 0.5;

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

#[derive(Debug, Clone)]
pub struct HashingProvider {
    dimension: usize,
}

impl HashingProvider {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
        }
    }

    fn fnv1a(prefix: u8, bytes: &[u8]) -> u64 {
        let mut hash = FNV_OFFSET;
        for b in std::iter::once(&prefix).chain(bytes) {
            hash ^= *b as u64;
            hash = hash.wrapping_mul(FNV_PRIME);
        }
        hash
    }

    fn add_feature(&self, vector: &mut [f32], prefix: u8, feature: &str, weight: f32) {
        let hash = Self::fnv1a(prefix, feature.as_bytes());
        let bucket = (hash % self.dimension as u64) as usize;
        let sign = if hash >> 63 == 1 { -1.0 } else { 1.0 };
        vector[bucket] += sign * weight;
    }

    pub fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0_f32; self.dimension];
        let lowered = text.to_lowercase();
        for token in lowered.split(|c: char| !c.is_alphanumeric()).filter(|t| !t.is_empty()) {
            self.add_feature(&mut vector, b'w', token, WORD_WEIGHT);

            let padded: Vec<char> = std::iter::once('^')
                .chain(token.chars())
                .chain(std::iter::once('$'))
                .collect();
            for window in padded.windows(3) {
                let trigram: String = window.iter().collect();
                self.add_feature(&mut vector, b'c', &trigram, TRIGRAM_WEIGHT);
            }
        }

        let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut vector {
                *v /= norm;
            }
        }
        vector
    }
}

impl Default for HashingProvider {
    fn default() -> Self {
        Self::new(DEFAULT_DIMENSION)
    }
}

#[async_trait::async_trait]
impl EmbeddingProvider for HashingProvider {
    async fn embed(&self, texts: &[String], _input_type: InputType) -> Result<Vec<Vec<f32>>, DomainError> {
        Ok(texts.iter().map(|t| self.embed_text(t)).collect())
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn name(&self) -> &str {
        "hash"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::values::distance::DistanceMetric;

    #[test]
    fn test_deterministic_and_normalised() {
        let p = HashingProvider::default();
        let a = p.embed_text("This is a query document");
        let b = p.embed_text("This is a query document");
        assert_eq!(a, b);
        assert_eq!(a.len(), DEFAULT_DIMENSION);
        let norm: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_case_and_punctuation_insensitive() {
        let p = HashingProvider::default();
        assert_eq!(p.embed_text("Hello, World!"), p.embed_text("hello world"));
    }

    #[test]
    fn test_empty_text_is_zero_vector() {
        let p = HashingProvider::new(16);
        assert!(p.embed_text("  ...  ").iter().all(|x| *x == 0.0));
    }

    #[test]
    fn test_shared_words_are_closer() {
        let p = HashingProvider::default();
        let query = p.embed_text("arabic listening practice");
        let related = p.embed_text("listening practice for arabic learners");
        let unrelated = p.embed_text("grilled vegetables recipe");
        let metric = DistanceMetric::Cosine;
        assert!(metric.distance(&query, &related) < metric.distance(&query, &unrelated));
    }

    #[test]
    fn test_handles_non_ascii_text() {
        let p = HashingProvider::default();
        let v = p.embed_text("فهم الاستماع");
        assert!(v.iter().any(|x| *x != 0.0));
    }
}
