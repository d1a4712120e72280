use crate::application::upload::check_upload;
use crate::domain::entities::catalog_entry::ScoredResult;
use crate::domain::error::DomainError;
use crate::domain::ports::embedding_port::EmbeddingProvider;
use crate::domain::ports::product_repository::ProductRepository;
use crate::domain::ports::similarity_search::SimilaritySearch;
use crate::domain::values::price::Price;
use crate::domain::values::product_id::ProductId;
use serde::Serialize;
use std::sync::Arc;

pub const DEFAULT_K: usize = 5;

/// A ranked product with the fields shown to the caller.
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    pub id: ProductId,
    pub name: String,
    pub description: Option<String>,
    pub price: Price,
    pub image_path: Option<String>,
    pub score: f64,
}

pub struct SearchUseCase {
    repo: Arc<dyn ProductRepository>,
    embedder: Arc<dyn EmbeddingProvider>,
    backend: Arc<dyn SimilaritySearch>,
    max_upload_bytes: usize,
}

impl SearchUseCase {
    pub fn new(
        repo: Arc<dyn ProductRepository>,
        embedder: Arc<dyn EmbeddingProvider>,
        backend: Arc<dyn SimilaritySearch>,
        max_upload_bytes: usize,
    ) -> Self {
        Self {
            repo,
            embedder,
            backend,
            max_upload_bytes,
        }
    }

    /// Rank the catalog against an already computed query vector.
    pub fn search_by_vector(
        &self,
        query: &[f32],
        k: usize,
    ) -> Result<Vec<ScoredResult>, DomainError> {
        let candidates = self.repo.list_entries()?;
        tracing::debug!(
            backend = self.backend.name(),
            candidates = candidates.len(),
            k,
            "searching catalog"
        );
        self.backend.rank(query, &candidates, k)
    }

    /// Embed `image`, rank the catalog, and attach product fields to each hit.
    /// `k` defaults to [`DEFAULT_K`].
    pub async fn search_by_image(
        &self,
        image: &[u8],
        k: Option<usize>,
    ) -> Result<Vec<SearchHit>, DomainError> {
        let k = k.unwrap_or(DEFAULT_K);
        if k == 0 {
            return Err(DomainError::InvalidInput("k must be at least 1".into()));
        }
        check_upload(image, self.max_upload_bytes)?;

        let query = self.embedder.embed(image).await?;
        let ranked = self.search_by_vector(&query, k)?;

        let mut hits = Vec::with_capacity(ranked.len());
        for ScoredResult { id, score } in ranked {
            // Deleted between listing and lookup.
            let Some(product) = self.repo.get(id)? else {
                continue;
            };
            hits.push(SearchHit {
                id,
                name: product.name,
                description: product.description,
                price: product.price,
                image_path: product.image_path,
                score,
            });
        }
        Ok(hits)
    }
}
