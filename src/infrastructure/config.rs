use crate::domain::error::DomainError;
use crate::infrastructure::embeddings::clip_service::{DEFAULT_DIMENSION, DEFAULT_MODEL};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Noop,
    Clip,
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "noop" | "none" => Ok(ProviderKind::Noop),
            "clip" => Ok(ProviderKind::Clip),
            _ => Err(format!("Unknown embedding provider: {s}")),
        }
    }
}

/// Runtime settings, read from `VISEARCH_*` environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: String,
    pub provider: ProviderKind,
    pub embedding_url: String,
    pub embedding_model: String,
    pub embedding_dimension: usize,
    pub embedding_timeout: Duration,
    pub upload_dir: PathBuf,
    pub max_upload_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: "./visearch.db".into(),
            provider: ProviderKind::Noop,
            embedding_url: "http://localhost:8000".into(),
            embedding_model: DEFAULT_MODEL.into(),
            embedding_dimension: DEFAULT_DIMENSION,
            embedding_timeout: Duration::from_secs(30),
            upload_dir: PathBuf::from("./uploads"),
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, DomainError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, DomainError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();
        let provider = match lookup("VISEARCH_EMBEDDING_PROVIDER") {
            Some(v) => v.parse().map_err(DomainError::InvalidInput)?,
            None => defaults.provider,
        };

        Ok(Self {
            db_path: lookup("VISEARCH_DB").unwrap_or(defaults.db_path),
            provider,
            embedding_url: lookup("VISEARCH_EMBEDDING_URL").unwrap_or(defaults.embedding_url),
            embedding_model: lookup("VISEARCH_EMBEDDING_MODEL").unwrap_or(defaults.embedding_model),
            embedding_dimension: parse_number(&lookup, "VISEARCH_EMBEDDING_DIM")?
                .unwrap_or(defaults.embedding_dimension),
            embedding_timeout: parse_number(&lookup, "VISEARCH_EMBEDDING_TIMEOUT_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.embedding_timeout),
            upload_dir: lookup("VISEARCH_UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.upload_dir),
            max_upload_bytes: parse_number(&lookup, "VISEARCH_MAX_UPLOAD_BYTES")?
                .unwrap_or(defaults.max_upload_bytes),
        })
    }
}

fn parse_number<F, T>(lookup: &F, key: &str) -> Result<Option<T>, DomainError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| DomainError::InvalidInput(format!("{key} must be a number, got '{raw}'"))),
    }
}
