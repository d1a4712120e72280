use crate::domain::error::DomainError;

/// Turns raw image bytes into a fixed-length feature vector.
///
/// Implementations fail with [`DomainError::UnsupportedMedia`] when the bytes
/// cannot be decoded as an image and with [`DomainError::ModelUnavailable`]
/// when the model cannot be loaded or run. On success the vector always has
/// `dimension()` elements.
#[async_trait::async_trait]
pub trait EmbeddingProvider: Send + Sync {
    async fn embed(&self, image: &[u8]) -> Result<Vec<f32>, DomainError>;
    fn dimension(&self) -> usize;
    fn model(&self) -> &str;
}
