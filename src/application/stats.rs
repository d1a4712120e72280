use crate::domain::error::DomainError;
use crate::domain::ports::embedding_port::EmbeddingProvider;
use crate::domain::ports::product_repository::{CatalogStats, ProductRepository};
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Clone, Serialize)]
pub struct StatsReport {
    #[serde(flatten)]
    pub catalog: CatalogStats,
    pub model: String,
    pub model_dimension: usize,
}

pub struct StatsUseCase {
    repo: Arc<dyn ProductRepository>,
    embedder: Arc<dyn EmbeddingProvider>,
}

impl StatsUseCase {
    pub fn new(repo: Arc<dyn ProductRepository>, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self { repo, embedder }
    }

    pub fn stats(&self) -> Result<StatsReport, DomainError> {
        Ok(StatsReport {
            catalog: self.repo.stats()?,
            model: self.embedder.model().to_string(),
            model_dimension: self.embedder.dimension(),
        })
    }
}
