use crate::domain::error::DomainError;
use crate::domain::values::image_format::ImageFormat;

/// Where uploaded product images live.
pub trait ImageStore: Send + Sync {
    /// Persist `bytes` and return the path recorded on the product.
    fn save(&self, bytes: &[u8], format: ImageFormat) -> Result<String, DomainError>;
    fn load(&self, path: &str) -> Result<Vec<u8>, DomainError>;
    /// Remove a stored image. A missing file is not an error.
    fn remove(&self, path: &str) -> Result<(), DomainError>;
}
