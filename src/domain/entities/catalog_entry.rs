use crate::domain::values::product_id::ProductId;
use serde::Serialize;

/// A candidate handed to ranking: an opaque id and its vector, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry<I = ProductId> {
    pub id: I,
    pub vector: Option<Vec<f32>>,
}

impl<I> CatalogEntry<I> {
    pub fn new(id: I, vector: Option<Vec<f32>>) -> Self {
        Self { id, vector }
    }
}

/// One ranked hit. `score` is the raw cosine similarity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredResult<I = ProductId> {
    pub id: I,
    pub score: f64,
}
