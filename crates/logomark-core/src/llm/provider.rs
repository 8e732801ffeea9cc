//! Brand provider trait, image input, and the factory.
//!
//! Defines the interface both model backends implement, plus the factory
//! that picks one from an already-resolved [`ProviderConfig`].

use async_trait::async_trait;
use base64::Engine;
use std::time::Duration;

use super::decode::decode_brand;
use crate::config::{ProviderConfig, ProviderKind};
use crate::error::{IdentifyError, ProviderError};
use crate::types::BrandResult;

/// Instruction sent with every image.
pub const IDENTIFY_PROMPT: &str = "Identify the company or brand shown in this logo image. \
     Set brand_name to the brand's name. Set is_confident to true only if you actually \
     recognize a specific brand; if no logo is visible or the mark is not one you know, \
     set is_confident to false. Give a one-sentence reasoning.";

/// Appended when the backend cannot be asked for schema-constrained output.
pub const JSON_ONLY_INSTRUCTION: &str = "Respond with only a JSON object of the form \
     {\"brand_name\": string, \"is_confident\": boolean, \"reasoning\": string} and no other text.";

/// Base64-encoded image ready to send to a model API.
#[derive(Debug, Clone)]
pub struct ImageInput {
    /// Base64-encoded image bytes
    pub data: String,
    /// MIME type (e.g., "image/jpeg", "image/png")
    pub media_type: String,
}

impl ImageInput {
    /// Create an `ImageInput` from raw bytes and format string.
    ///
    /// The format is the image format identifier (e.g., "jpeg", "png", "webp").
    pub fn from_bytes(bytes: &[u8], format: &str) -> Self {
        let media_type = match format {
            "jpeg" | "jpg" => "image/jpeg",
            "png" => "image/png",
            "webp" => "image/webp",
            "gif" => "image/gif",
            "bmp" => "image/bmp",
            other => {
                tracing::warn!("Unknown image format '{other}', defaulting to image/jpeg");
                "image/jpeg"
            }
        };

        Self {
            data: base64::engine::general_purpose::STANDARD.encode(bytes),
            media_type: media_type.to_string(),
        }
    }

    /// Return a data URL suitable for OpenAI-style APIs.
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.media_type, self.data)
    }
}

/// JSON schema of the expected answer, in JSON Schema form.
pub(crate) fn brand_json_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "object",
        "properties": {
            "brand_name": { "type": "string" },
            "is_confident": { "type": "boolean" },
            "reasoning": { "type": "string" }
        },
        "required": ["brand_name", "is_confident", "reasoning"],
        "additionalProperties": false
    })
}

/// Map a transport error to a [`ProviderError`], keeping timeouts distinct.
pub(crate) fn transport_error(provider: &str, timeout: Duration, e: reqwest::Error) -> ProviderError {
    if e.is_timeout() {
        ProviderError::Timeout {
            provider: provider.to_string(),
            timeout_ms: timeout.as_millis() as u64,
        }
    } else {
        ProviderError::Request {
            provider: provider.to_string(),
            message: e.to_string(),
        }
    }
}

/// Trait both model backends implement.
///
/// Uses `async_trait` because native async fn in trait is not object-safe
/// (we need `Box<dyn BrandProvider>` for dynamic dispatch).
#[async_trait]
pub trait BrandProvider: Send + Sync {
    /// Provider name for logging ("hosted" or "local").
    fn name(&self) -> &str;

    /// Model identifier requests are sent to.
    fn model(&self) -> &str;

    /// Send the image and prompt, returning the raw answer text.
    async fn complete(&self, image: &ImageInput) -> Result<String, ProviderError>;

    /// Per-request timeout for this provider.
    fn timeout(&self) -> Duration;

    /// Identify the brand in an image: one request, then a strict decode.
    async fn identify(&self, image: &ImageInput) -> Result<BrandResult, IdentifyError> {
        let raw = self.complete(image).await?;
        tracing::trace!("{} raw answer: {}", self.name(), raw);
        Ok(decode_brand(&raw)?)
    }
}

/// Factory that creates the configured provider.
pub struct ProviderFactory;

impl ProviderFactory {
    /// Create the provider selected by `config.kind`.
    pub fn create(config: &ProviderConfig) -> Result<Box<dyn BrandProvider>, ProviderError> {
        let provider: Box<dyn BrandProvider> = match config.kind {
            ProviderKind::Hosted => Box::new(super::gemini::GeminiProvider::new(config)?),
            ProviderKind::Local => Box::new(super::local::LocalProvider::new(config)?),
        };
        tracing::debug!(
            "Using {} provider with model {}",
            provider.name(),
            provider.model()
        );
        Ok(provider)
    }
}

/// Build a reqwest client, surfacing TLS/backend init failures as provider errors.
pub(crate) fn http_client(provider: &str) -> Result<reqwest::Client, ProviderError> {
    reqwest::Client::builder()
        .build()
        .map_err(|e| ProviderError::Request {
            provider: provider.to_string(),
            message: format!("failed to build HTTP client: {e}"),
        })
}
