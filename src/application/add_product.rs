use crate::application::attach_image::AttachImageUseCase;
use crate::domain::entities::product::{NewProduct, Product};
use crate::domain::error::DomainError;
use crate::domain::ports::product_repository::ProductRepository;
use crate::domain::values::price::Price;
use std::sync::Arc;

pub struct AddProductUseCase {
    repo: Arc<dyn ProductRepository>,
    attach: Arc<AttachImageUseCase>,
}

impl AddProductUseCase {
    pub fn new(repo: Arc<dyn ProductRepository>, attach: Arc<AttachImageUseCase>) -> Self {
        Self { repo, attach }
    }

    pub async fn execute(
        &self,
        name: String,
        description: Option<String>,
        price: Option<f64>,
        image: Option<&[u8]>,
    ) -> Result<Product, DomainError> {
        let price =
            Price::from_amount(price.unwrap_or(0.0)).map_err(DomainError::InvalidInput)?;
        let new_product =
            NewProduct::new(name, description, price).map_err(DomainError::InvalidInput)?;

        // Reject a bad upload before anything is written.
        if let Some(bytes) = image {
            self.attach.check(bytes)?;
        }

        let product = self.repo.insert(&new_product)?;
        tracing::info!(product = %product.id, name = %product.name, "added product");

        let Some(bytes) = image else {
            return Ok(product);
        };
        match self.attach.execute(product.id, bytes).await {
            Ok(product) => Ok(product),
            Err(e) => {
                // An add either stores the product with its image or not at all.
                if let Err(cleanup) = self.repo.delete(product.id) {
                    tracing::warn!(
                        product = %product.id,
                        error = %cleanup,
                        "could not roll back product after failed image attach"
                    );
                }
                Err(e)
            }
        }
    }
}
