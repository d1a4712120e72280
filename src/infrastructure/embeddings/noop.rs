use crate::domain::error::DomainError;
use crate::domain::ports::embedding_port::EmbeddingProvider;

/// Placeholder used when no embedding backend is configured. Every call
/// fails, so products are stored without vectors until a reindex.
pub struct NoopProvider;

#[async_trait::async_trait]
impl EmbeddingProvider for NoopProvider {
    async fn embed(&self, _image: &[u8]) -> Result<Vec<f32>, DomainError> {
        Err(DomainError::ModelUnavailable(
            "no embedding provider configured".into(),
        ))
    }

    fn dimension(&self) -> usize {
        0
    }

    fn model(&self) -> &str {
        "none"
    }
}
