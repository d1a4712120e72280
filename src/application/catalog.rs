use crate::domain::entities::product::{Product, ProductUpdate};
use crate::domain::error::DomainError;
use crate::domain::ports::image_store::ImageStore;
use crate::domain::ports::product_repository::{ListFilter, ProductRepository};
use crate::domain::values::price::Price;
use crate::domain::values::product_id::ProductId;
use std::sync::Arc;

pub struct CatalogUseCase {
    repo: Arc<dyn ProductRepository>,
    images: Arc<dyn ImageStore>,
}

impl CatalogUseCase {
    pub fn new(repo: Arc<dyn ProductRepository>, images: Arc<dyn ImageStore>) -> Self {
        Self { repo, images }
    }

    pub fn get(&self, id: ProductId) -> Result<Product, DomainError> {
        self.repo
            .get(id)?
            .ok_or_else(|| DomainError::NotFound(format!("product {id}")))
    }

    pub fn list(
        &self,
        limit: Option<usize>,
        offset: Option<usize>,
    ) -> Result<Vec<Product>, DomainError> {
        self.repo.list(&ListFilter { limit, offset })
    }

    /// A blank description clears the stored one.
    pub fn update(
        &self,
        id: ProductId,
        name: Option<String>,
        description: Option<String>,
        price: Option<f64>,
    ) -> Result<Product, DomainError> {
        let name = match name {
            Some(n) if n.trim().is_empty() => {
                return Err(DomainError::InvalidInput("Product name must not be empty".into()))
            }
            Some(n) => Some(n.trim().to_string()),
            None => None,
        };
        let description = description.map(|d| {
            let trimmed = d.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        });
        let price = price
            .map(Price::from_amount)
            .transpose()
            .map_err(DomainError::InvalidInput)?;

        let update = ProductUpdate {
            name,
            description,
            price,
        };
        let product = self
            .repo
            .update(id, &update)?
            .ok_or_else(|| DomainError::NotFound(format!("product {id}")))?;
        tracing::info!(product = %id, "updated product");
        Ok(product)
    }

    /// Delete the product and its stored image.
    pub fn delete(&self, id: ProductId) -> Result<(), DomainError> {
        let product = self.get(id)?;
        self.repo.delete(id)?;
        if let Some(path) = product.image_path.as_deref() {
            if let Err(e) = self.images.remove(path) {
                tracing::warn!(path, error = %e, "could not remove product image");
            }
        }
        tracing::info!(product = %id, "deleted product");
        Ok(())
    }
}
