use crate::application::upload::check_upload;
use crate::domain::error::DomainError;
use crate::domain::ports::embedding_port::EmbeddingProvider;
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Clone, Serialize)]
pub struct EmbeddingReport {
    pub embedding: Vec<f32>,
    pub dims: usize,
    pub model: String,
}

pub struct EmbedImageUseCase {
    embedder: Arc<dyn EmbeddingProvider>,
    max_upload_bytes: usize,
}

impl EmbedImageUseCase {
    pub fn new(embedder: Arc<dyn EmbeddingProvider>, max_upload_bytes: usize) -> Self {
        Self {
            embedder,
            max_upload_bytes,
        }
    }

    pub async fn execute(&self, image: &[u8]) -> Result<EmbeddingReport, DomainError> {
        check_upload(image, self.max_upload_bytes)?;
        let embedding = self.embedder.embed(image).await?;
        Ok(EmbeddingReport {
            dims: embedding.len(),
            model: self.embedder.model().to_string(),
            embedding,
        })
    }
}
