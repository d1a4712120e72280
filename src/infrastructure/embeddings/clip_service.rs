use crate::domain::error::DomainError;
use crate::domain::ports::embedding_port::EmbeddingProvider;
use crate::domain::values::image_format::ImageFormat;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::sync::OnceLock;
use std::time::Duration;

pub const DEFAULT_MODEL: &str = "openai/clip-vit-base-patch32";
pub const DEFAULT_DIMENSION: usize = 512;

/// One HTTP client for the whole process, built on first use.
static HTTP_CLIENT: OnceLock<Client> = OnceLock::new();

fn shared_client() -> &'static Client {
    HTTP_CLIENT.get_or_init(Client::new)
}

/// Calls a CLIP image feature-extraction service: `POST {base_url}/embed`
/// with the image as multipart field `image`.
pub struct ClipServiceProvider {
    client: Client,
    base_url: String,
    model: String,
    dimension: usize,
    timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct EmbedResponse {
    embedding: Vec<f32>,
    dims: usize,
    #[serde(default)]
    model: Option<String>,
}

impl ClipServiceProvider {
    pub fn new(
        base_url: String,
        model: Option<String>,
        dimension: Option<usize>,
        timeout: Duration,
    ) -> Self {
        Self {
            client: shared_client().clone(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            dimension: dimension.unwrap_or(DEFAULT_DIMENSION),
            timeout,
        }
    }

    fn check_response(&self, resp: EmbedResponse) -> Result<Vec<f32>, DomainError> {
        if resp.embedding.len() != resp.dims {
            return Err(DomainError::ModelUnavailable(format!(
                "embedding service reported {} dims but returned {} values",
                resp.dims,
                resp.embedding.len()
            )));
        }
        if resp.dims != self.dimension {
            return Err(DomainError::ModelUnavailable(format!(
                "expected {}-dimensional embeddings from {}, got {} (model {})",
                self.dimension,
                self.model,
                resp.dims,
                resp.model.as_deref().unwrap_or("unknown")
            )));
        }
        Ok(resp.embedding)
    }
}

#[async_trait::async_trait]
impl EmbeddingProvider for ClipServiceProvider {
    async fn embed(&self, image: &[u8]) -> Result<Vec<f32>, DomainError> {
        let format = ImageFormat::sniff(image)
            .ok_or_else(|| DomainError::UnsupportedMedia("not a recognized image".into()))?;

        let part = Part::bytes(image.to_vec())
            .file_name(format!("image.{}", format.extension()))
            .mime_str(format.mime_type())
            .map_err(|e| DomainError::UnsupportedMedia(e.to_string()))?;
        let form = Form::new().part("image", part);

        let url = format!("{}/embed", self.base_url);
        tracing::debug!(%url, %format, bytes = image.len(), "requesting image embedding");

        let resp = self
            .client
            .post(&url)
            .multipart(form)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| DomainError::ModelUnavailable(format!("embedding service error: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(match status {
                StatusCode::BAD_REQUEST | StatusCode::UNSUPPORTED_MEDIA_TYPE => {
                    DomainError::UnsupportedMedia(format!("embedding service {status}: {body}"))
                }
                _ => DomainError::ModelUnavailable(format!("embedding service {status}: {body}")),
            });
        }

        let result: EmbedResponse = resp
            .json()
            .await
            .map_err(|e| DomainError::Parse(format!("Parse error: {e}")))?;
        self.check_response(result)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn model(&self) -> &str {
        &self.model
    }
}
