use crate::domain::error::DomainError;
use crate::domain::values::image_format::ImageFormat;

/// Gate for any image coming in from a caller: non-empty, within the size
/// limit, and a recognized image container.
pub fn check_upload(bytes: &[u8], max_bytes: usize) -> Result<ImageFormat, DomainError> {
    if bytes.is_empty() {
        return Err(DomainError::InvalidInput("image file is required".into()));
    }
    if bytes.len() > max_bytes {
        return Err(DomainError::InvalidInput(format!(
            "image is {} bytes, limit is {max_bytes}",
            bytes.len()
        )));
    }
    ImageFormat::sniff(bytes)
        .ok_or_else(|| {
            DomainError::UnsupportedMedia(
                "upload is not a PNG, JPEG, GIF, WebP or BMP image".into(),
            )
        })
}
