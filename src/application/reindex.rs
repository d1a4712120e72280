use crate::domain::entities::product::Product;
use crate::domain::error::DomainError;
use crate::domain::ports::embedding_port::EmbeddingProvider;
use crate::domain::ports::image_store::ImageStore;
use crate::domain::ports::product_repository::{ListFilter, ProductRepository};
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReindexReport {
    pub embedded: usize,
    pub failed: usize,
}

pub struct ReindexUseCase {
    repo: Arc<dyn ProductRepository>,
    embedder: Arc<dyn EmbeddingProvider>,
    images: Arc<dyn ImageStore>,
}

impl ReindexUseCase {
    pub fn new(
        repo: Arc<dyn ProductRepository>,
        embedder: Arc<dyn EmbeddingProvider>,
        images: Arc<dyn ImageStore>,
    ) -> Self {
        Self { repo, embedder, images }
    }

    /// Embed products that have an image but no vector. With `all`, every
    /// product with an image is re-embedded (needed after a model change).
    pub async fn execute(&self, all: bool) -> Result<ReindexReport, DomainError> {
        let products: Vec<Product> = if all {
            self.repo
                .list(&ListFilter::default())?
                .into_iter()
                .filter(|p| p.image_path.is_some())
                .collect()
        } else {
            self.repo.missing_embeddings()?
        };

        let mut report = ReindexReport::default();
        for product in &products {
            match self.embed_one(product).await {
                Ok(()) => report.embedded += 1,
                Err(e) => {
                    tracing::warn!(product = %product.id, error = %e, "reindex failed for product");
                    report.failed += 1;
                }
            }
        }
        tracing::info!(embedded = report.embedded, failed = report.failed, "reindex finished");
        Ok(report)
    }

    async fn embed_one(&self, product: &Product) -> Result<(), DomainError> {
        let path = product
            .image_path
            .as_deref()
            .ok_or_else(|| DomainError::NotFound(format!("image for product {}", product.id)))?;
        let bytes = self.images.load(path)?;
        let vector = self.embedder.embed(&bytes).await?;
        self.repo.set_embedding(product.id, &vector)
    }
}
