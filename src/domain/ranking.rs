//! Top-K ranking of catalog entries against a query vector.
//!
//! Candidates are scored with [`cosine_similarity`] in a single linear pass.
//! Entries without a usable vector (absent, non-finite, or of a different
//! dimensionality than the query) are skipped rather than failing the call.
//! Results are ordered by descending score; equal scores keep their input
//! order.

use crate::domain::entities::catalog_entry::{CatalogEntry, ScoredResult};
use crate::domain::error::DomainError;
use crate::domain::ports::similarity_search::SimilaritySearch;
use crate::domain::similarity::{cosine_similarity, is_valid};
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Heap slot. Ordered so that the *worst* hit is the greatest element,
/// letting a max-heap evict it first.
struct Ranked<'a, I> {
    score: f64,
    position: usize,
    id: &'a I,
}

impl<I> PartialEq for Ranked<'_, I> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<I> Eq for Ranked<'_, I> {}

impl<I> PartialOrd for Ranked<'_, I> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<I> Ord for Ranked<'_, I> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Candidates are filtered to finite values, so scores are never NaN.
        other
            .score
            .partial_cmp(&self.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| self.position.cmp(&other.position))
    }
}

/// Rank `candidates` by cosine similarity to `query` and keep the best `k`.
///
/// Fails with [`DomainError::InvalidQuery`] when the query is empty or holds
/// non-finite values, and with [`DomainError::InvalidInput`] when `k` is 0.
/// Both checks happen before any candidate is scored.
pub fn rank<'a, I, C>(
    query: &[f32],
    candidates: C,
    k: usize,
) -> Result<Vec<ScoredResult<I>>, DomainError>
where
    I: Clone + 'a,
    C: IntoIterator<Item = &'a CatalogEntry<I>>,
{
    if !is_valid(query) {
        return Err(DomainError::InvalidQuery(format!(
            "query vector must be non-empty and finite (len {})",
            query.len()
        )));
    }
    if k == 0 {
        return Err(DomainError::InvalidInput("k must be at least 1".into()));
    }

    let dim = query.len();
    let mut heap: BinaryHeap<Ranked<'a, I>> = BinaryHeap::with_capacity(k + 1);
    let mut scored = 0usize;
    let mut skipped = 0usize;

    for (position, entry) in candidates.into_iter().enumerate() {
        let vector = match entry.vector.as_deref() {
            Some(v) if v.len() == dim && is_valid(v) => v,
            _ => {
                skipped += 1;
                continue;
            }
        };
        scored += 1;
        heap.push(Ranked {
            score: cosine_similarity(query, vector),
            position,
            id: &entry.id,
        });
        if heap.len() > k {
            heap.pop();
        }
    }

    tracing::debug!(dim, k, scored, skipped, "ranked candidates");

    Ok(heap
        .into_sorted_vec()
        .into_iter()
        .map(|r| ScoredResult {
            id: r.id.clone(),
            score: r.score,
        })
        .collect())
}

/// Brute-force backend: scores every candidate, O(N·D).
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearScan;

impl SimilaritySearch for LinearScan {
    fn rank(
        &self,
        query: &[f32],
        candidates: &[CatalogEntry],
        k: usize,
    ) -> Result<Vec<ScoredResult>, DomainError> {
        rank(query, candidates, k)
    }

    fn name(&self) -> &str {
        "linear-scan"
    }
}
