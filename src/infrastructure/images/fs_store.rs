use crate::domain::error::DomainError;
use crate::domain::ports::image_store::ImageStore;
use crate::domain::values::image_format::ImageFormat;
use std::io::ErrorKind;
use std::path::PathBuf;

/// Keeps uploaded images as `<uuid>.<ext>` files under one directory.
pub struct FsImageStore {
    root: PathBuf,
}

impl FsImageStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ImageStore for FsImageStore {
    fn save(&self, bytes: &[u8], format: ImageFormat) -> Result<String, DomainError> {
        std::fs::create_dir_all(&self.root).map_err(|e| {
            DomainError::Storage(format!("cannot create {}: {e}", self.root.display()))
        })?;
        let path = self
            .root
            .join(format!("{}.{}", uuid::Uuid::new_v4(), format.extension()));
        std::fs::write(&path, bytes)
            .map_err(|e| DomainError::Storage(format!("cannot write {}: {e}", path.display())))?;
        tracing::debug!(path = %path.display(), bytes = bytes.len(), "stored image");
        Ok(path.to_string_lossy().into_owned())
    }

    fn load(&self, path: &str) -> Result<Vec<u8>, DomainError> {
        std::fs::read(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => DomainError::NotFound(format!("image {path}")),
            _ => DomainError::Storage(format!("cannot read {path}: {e}")),
        })
    }

    fn remove(&self, path: &str) -> Result<(), DomainError> {
        match std::fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(DomainError::Storage(format!("cannot remove {path}: {e}"))),
        }
    }
}
