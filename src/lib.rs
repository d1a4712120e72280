pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;

use crate::application::add_product::AddProductUseCase;
use crate::application::attach_image::AttachImageUseCase;
use crate::application::catalog::CatalogUseCase;
use crate::application::embed::{EmbedImageUseCase, EmbeddingReport};
use crate::application::reindex::{ReindexReport, ReindexUseCase};
use crate::application::search::{SearchHit, SearchUseCase};
use crate::application::stats::{StatsReport, StatsUseCase};
use crate::domain::entities::catalog_entry::ScoredResult;
use crate::domain::entities::product::Product;
use crate::domain::error::DomainError;
use crate::domain::ports::embedding_port::EmbeddingProvider;
use crate::domain::ports::image_store::ImageStore;
use crate::domain::ports::product_repository::ProductRepository;
use crate::domain::ports::similarity_search::SimilaritySearch;
use crate::domain::ranking::LinearScan;
use crate::domain::values::product_id::ProductId;
use crate::infrastructure::config::{Config, ProviderKind};
use crate::infrastructure::embeddings::clip_service::ClipServiceProvider;
use crate::infrastructure::embeddings::noop::NoopProvider;
use crate::infrastructure::images::fs_store::FsImageStore;
use crate::infrastructure::sqlite::migrations::run_migrations;
use crate::infrastructure::sqlite::product_repo::SqliteProductRepo;
use rusqlite::Connection;
use std::sync::Arc;

pub struct ViSearch {
    add_product_uc: AddProductUseCase,
    attach_image_uc: Arc<AttachImageUseCase>,
    catalog_uc: CatalogUseCase,
    embed_uc: EmbedImageUseCase,
    search_uc: SearchUseCase,
    reindex_uc: ReindexUseCase,
    stats_uc: StatsUseCase,
}

impl ViSearch {
    pub fn new(config: &Config) -> Result<Self, DomainError> {
        let embedder: Arc<dyn EmbeddingProvider> = match config.provider {
            ProviderKind::Clip => Arc::new(ClipServiceProvider::new(
                config.embedding_url.clone(),
                Some(config.embedding_model.clone()),
                Some(config.embedding_dimension),
                config.embedding_timeout,
            )),
            ProviderKind::Noop => Arc::new(NoopProvider),
        };
        let images: Arc<dyn ImageStore> = Arc::new(FsImageStore::new(config.upload_dir.clone()));

        Self::with_backend(
            &config.db_path,
            embedder,
            images,
            Arc::new(LinearScan),
            config.max_upload_bytes,
        )
    }

    pub fn with_providers(
        db_path: &str,
        embedder: Arc<dyn EmbeddingProvider>,
        images: Arc<dyn ImageStore>,
    ) -> Result<Self, DomainError> {
        Self::with_backend(
            db_path,
            embedder,
            images,
            Arc::new(LinearScan),
            Config::default().max_upload_bytes,
        )
    }

    pub fn with_backend(
        db_path: &str,
        embedder: Arc<dyn EmbeddingProvider>,
        images: Arc<dyn ImageStore>,
        backend: Arc<dyn SimilaritySearch>,
        max_upload_bytes: usize,
    ) -> Result<Self, DomainError> {
        let conn = Connection::open(db_path)
            .map_err(|e| DomainError::Database(format!("DB error: {e}")))?;
        conn.pragma_update(None, "journal_mode", "WAL")
            .map_err(|e| DomainError::Database(format!("WAL error: {e}")))?;
        run_migrations(&conn)?;

        let repo: Arc<dyn ProductRepository> = Arc::new(SqliteProductRepo::new(conn));

        let provider_dim = embedder.dimension();
        if provider_dim > 0 {
            if let Ok(Some(stored_dim)) = repo.stored_dimension() {
                if stored_dim != provider_dim {
                    tracing::warn!(
                        stored_dim,
                        provider_dim,
                        "stored vectors do not match the embedding model; \
                         run `reindex --all` to re-embed"
                    );
                }
            }
        }

        let attach_image_uc = Arc::new(AttachImageUseCase::new(
            repo.clone(),
            embedder.clone(),
            images.clone(),
            max_upload_bytes,
        ));

        Ok(Self {
            add_product_uc: AddProductUseCase::new(repo.clone(), attach_image_uc.clone()),
            attach_image_uc,
            catalog_uc: CatalogUseCase::new(repo.clone(), images.clone()),
            embed_uc: EmbedImageUseCase::new(embedder.clone(), max_upload_bytes),
            search_uc: SearchUseCase::new(
                repo.clone(),
                embedder.clone(),
                backend,
                max_upload_bytes,
            ),
            reindex_uc: ReindexUseCase::new(repo.clone(), embedder.clone(), images),
            stats_uc: StatsUseCase::new(repo, embedder),
        })
    }

    // Delegating methods
    pub async fn add_product(
        &self,
        name: String,
        description: Option<String>,
        price: Option<f64>,
        image: Option<&[u8]>,
    ) -> Result<Product, DomainError> {
        self.add_product_uc.execute(name, description, price, image).await
    }

    pub async fn attach_image(&self, id: ProductId, image: &[u8]) -> Result<Product, DomainError> {
        self.attach_image_uc.execute(id, image).await
    }

    pub fn get_product(&self, id: ProductId) -> Result<Product, DomainError> {
        self.catalog_uc.get(id)
    }

    pub fn list_products(
        &self,
        limit: Option<usize>,
        offset: Option<usize>,
    ) -> Result<Vec<Product>, DomainError> {
        self.catalog_uc.list(limit, offset)
    }

    pub fn update_product(
        &self,
        id: ProductId,
        name: Option<String>,
        description: Option<String>,
        price: Option<f64>,
    ) -> Result<Product, DomainError> {
        self.catalog_uc.update(id, name, description, price)
    }

    pub fn delete_product(&self, id: ProductId) -> Result<(), DomainError> {
        self.catalog_uc.delete(id)
    }

    pub async fn embed_image(&self, image: &[u8]) -> Result<EmbeddingReport, DomainError> {
        self.embed_uc.execute(image).await
    }

    pub async fn search_by_image(
        &self,
        image: &[u8],
        k: Option<usize>,
    ) -> Result<Vec<SearchHit>, DomainError> {
        self.search_uc.search_by_image(image, k).await
    }

    pub fn search_by_vector(
        &self,
        query: &[f32],
        k: usize,
    ) -> Result<Vec<ScoredResult>, DomainError> {
        self.search_uc.search_by_vector(query, k)
    }

    pub async fn reindex(&self, all: bool) -> Result<ReindexReport, DomainError> {
        self.reindex_uc.execute(all).await
    }

    pub fn stats(&self) -> Result<StatsReport, DomainError> {
        self.stats_uc.stats()
    }
}
