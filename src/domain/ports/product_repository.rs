use crate::domain::entities::catalog_entry::CatalogEntry;
use crate::domain::entities::product::{NewProduct, Product, ProductUpdate};
use crate::domain::error::DomainError;
use crate::domain::values::product_id::ProductId;

#[derive(Debug, Clone, Default)]
pub struct ListFilter {
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct CatalogStats {
    pub total_products: usize,
    pub embedded_products: usize,
    pub dimensions: Vec<DimensionCount>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct DimensionCount {
    pub dimension: usize,
    pub count: usize,
}

/// Persistent product catalog. `list_entries` is the view ranking consumes:
/// every product id with its vector, if one has been computed.
pub trait ProductRepository: Send + Sync {
    fn insert(&self, product: &NewProduct) -> Result<Product, DomainError>;
    fn get(&self, id: ProductId) -> Result<Option<Product>, DomainError>;
    fn list(&self, filter: &ListFilter) -> Result<Vec<Product>, DomainError>;
    fn update(&self, id: ProductId, update: &ProductUpdate) -> Result<Option<Product>, DomainError>;
    fn delete(&self, id: ProductId) -> Result<bool, DomainError>;
    fn set_image(
        &self,
        id: ProductId,
        image_path: &str,
        embedding: Option<&[f32]>,
    ) -> Result<(), DomainError>;
    fn set_embedding(&self, id: ProductId, embedding: &[f32]) -> Result<(), DomainError>;
    fn list_entries(&self) -> Result<Vec<CatalogEntry>, DomainError>;
    fn missing_embeddings(&self) -> Result<Vec<Product>, DomainError>;
    fn stats(&self) -> Result<CatalogStats, DomainError>;
    fn stored_dimension(&self) -> Result<Option<usize>, DomainError>;
}
