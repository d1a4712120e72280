//! Shared test helpers.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use visearch::domain::error::DomainError;
use visearch::domain::ports::embedding_port::EmbeddingProvider;
use visearch::infrastructure::images::fs_store::FsImageStore;
use visearch::ViSearch;

const PNG_MAGIC: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// Bytes that sniff as PNG; `tag` keeps them distinct.
pub fn fake_png(tag: &str) -> Vec<u8> {
    let mut bytes = PNG_MAGIC.to_vec();
    bytes.extend_from_slice(tag.as_bytes());
    bytes
}

/// Embedding provider with a fixed image -> vector table.
pub struct StubProvider {
    dim: usize,
    vectors: Mutex<HashMap<Vec<u8>, Vec<f32>>>,
    down: AtomicBool,
}

impl StubProvider {
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            vectors: Mutex::new(HashMap::new()),
            down: AtomicBool::new(false),
        }
    }

    pub fn register(&self, image: &[u8], vector: Vec<f32>) {
        self.vectors.lock().unwrap().insert(image.to_vec(), vector);
    }

    pub fn set_down(&self, down: bool) {
        self.down.store(down, Ordering::SeqCst);
    }
}

#[async_trait]
impl EmbeddingProvider for StubProvider {
    async fn embed(&self, image: &[u8]) -> Result<Vec<f32>, DomainError> {
        if self.down.load(Ordering::SeqCst) {
            return Err(DomainError::ModelUnavailable("stub model offline".into()));
        }
        self.vectors
            .lock()
            .unwrap()
            .get(image)
            .cloned()
            .ok_or_else(|| DomainError::UnsupportedMedia("stub cannot decode image".into()))
    }

    fn dimension(&self) -> usize {
        self.dim
    }

    fn model(&self) -> &str {
        "stub"
    }
}

pub struct Harness {
    pub vs: ViSearch,
    pub provider: Arc<StubProvider>,
    pub uploads: TempDir,
}

pub fn setup(dim: usize) -> Harness {
    let provider = Arc::new(StubProvider::new(dim));
    let uploads = tempfile::tempdir().unwrap();
    let vs = ViSearch::with_providers(
        ":memory:",
        provider.clone(),
        Arc::new(FsImageStore::new(uploads.path())),
    )
    .unwrap();
    Harness { vs, provider, uploads }
}
