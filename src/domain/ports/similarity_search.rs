use crate::domain::entities::catalog_entry::{CatalogEntry, ScoredResult};
use crate::domain::error::DomainError;

/// Similarity search backend. Any implementation, exact or approximate,
/// must honour the same contract: skip unusable candidates, return at most
/// `k` hits ordered by descending score with ties in input order.
pub trait SimilaritySearch: Send + Sync {
    fn rank(
        &self,
        query: &[f32],
        candidates: &[CatalogEntry],
        k: usize,
    ) -> Result<Vec<ScoredResult>, DomainError>;

    /// Backend name for logging
    fn name(&self) -> &str;
}
