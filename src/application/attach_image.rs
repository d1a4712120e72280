use crate::application::upload::check_upload;
use crate::domain::entities::product::Product;
use crate::domain::error::DomainError;
use crate::domain::ports::embedding_port::EmbeddingProvider;
use crate::domain::ports::image_store::ImageStore;
use crate::domain::ports::product_repository::ProductRepository;
use crate::domain::values::image_format::ImageFormat;
use crate::domain::values::product_id::ProductId;
use std::sync::Arc;

pub struct AttachImageUseCase {
    repo: Arc<dyn ProductRepository>,
    embedder: Arc<dyn EmbeddingProvider>,
    images: Arc<dyn ImageStore>,
    max_upload_bytes: usize,
}

impl AttachImageUseCase {
    pub fn new(
        repo: Arc<dyn ProductRepository>,
        embedder: Arc<dyn EmbeddingProvider>,
        images: Arc<dyn ImageStore>,
        max_upload_bytes: usize,
    ) -> Self {
        Self {
            repo,
            embedder,
            images,
            max_upload_bytes,
        }
    }

    pub fn check(&self, bytes: &[u8]) -> Result<ImageFormat, DomainError> {
        check_upload(bytes, self.max_upload_bytes)
    }

    /// Store `bytes` as the product's image and embed it. The previous image,
    /// if any, is removed. An embedding failure leaves the product without a
    /// vector instead of failing the call.
    pub async fn execute(&self, id: ProductId, bytes: &[u8]) -> Result<Product, DomainError> {
        let format = self.check(bytes)?;
        let existing = self
            .repo
            .get(id)?
            .ok_or_else(|| DomainError::NotFound(format!("product {id}")))?;

        let path = self.images.save(bytes, format)?;
        let embedding = match self.embedder.embed(bytes).await {
            Ok(v) => Some(v),
            Err(e) => {
                tracing::warn!(
                    product = %id,
                    error = %e,
                    "embedding failed, stored image without vector"
                );
                None
            }
        };

        if let Err(e) = self.repo.set_image(id, &path, embedding.as_deref()) {
            let _ = self.images.remove(&path);
            return Err(e);
        }
        if let Some(old) = existing.image_path.as_deref() {
            if let Err(e) = self.images.remove(old) {
                tracing::warn!(path = old, error = %e, "could not remove replaced image");
            }
        }
        tracing::info!(
            product = %id,
            path = %path,
            embedded = embedding.is_some(),
            "attached image"
        );

        self.repo
            .get(id)?
            .ok_or_else(|| DomainError::NotFound(format!("product {id}")))
    }
}
