//! Hosted provider using the Gemini `generateContent` API.
//!
//! Sends the image as an inline base64 part and asks for a JSON answer
//! constrained by `responseSchema`, so no free-text parsing is needed.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use super::provider::{http_client, transport_error, BrandProvider, ImageInput, IDENTIFY_PROMPT};
use crate::config::{ProviderConfig, DEFAULT_HOSTED_ENDPOINT};
use crate::error::ProviderError;

const NAME: &str = "hosted";

/// Gemini provider reached with an API key.
pub struct GeminiProvider {
    endpoint: String,
    api_key: String,
    model: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl GeminiProvider {
    pub fn new(config: &ProviderConfig) -> Result<Self, ProviderError> {
        let endpoint = config
            .endpoint
            .as_deref()
            .unwrap_or(DEFAULT_HOSTED_ENDPOINT)
            .trim_end_matches('/')
            .to_string();
        Ok(Self {
            endpoint,
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            timeout: Duration::from_millis(config.timeout_ms),
            client: http_client(NAME)?,
        })
    }

    fn url(&self) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, self.model)
    }

    fn build_request(&self, image: &ImageInput) -> GenerateRequest {
        GenerateRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: image.media_type.clone(),
                            data: image.data.clone(),
                        },
                    },
                    Part::Text {
                        text: IDENTIFY_PROMPT.to_string(),
                    },
                ],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: response_schema(),
                temperature: 0.0,
            },
        }
    }
}

/// Gemini takes an OpenAPI-style schema with upper-case type names.
fn response_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "OBJECT",
        "properties": {
            "brand_name": { "type": "STRING", "description": "The company or brand name." },
            "is_confident": {
                "type": "BOOLEAN",
                "description": "True only if a specific brand was recognized."
            },
            "reasoning": { "type": "STRING" }
        },
        "required": ["brand_name", "is_confident"],
        "propertyOrdering": ["brand_name", "is_confident", "reasoning"]
    })
}

// --- Request types ---

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Part {
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
    Text {
        text: String,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: String,
    response_schema: serde_json::Value,
    temperature: f32,
}

// --- Response types ---

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    total_token_count: Option<u32>,
}

impl GenerateResponse {
    /// Concatenated text of the first candidate.
    fn text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let text = content
            .parts
            .into_iter()
            .filter_map(|p| p.text)
            .collect::<Vec<_>>()
            .join("");
        let text = text.trim().to_string();
        (!text.is_empty()).then_some(text)
    }
}

#[async_trait]
impl BrandProvider for GeminiProvider {
    fn name(&self) -> &str {
        NAME
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, image: &ImageInput) -> Result<String, ProviderError> {
        let start = Instant::now();
        let body = self.build_request(image);

        let resp = self
            .client
            .post(self.url())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| transport_error(NAME, self.timeout, e))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(ProviderError::Status {
                provider: NAME.to_string(),
                status: status.as_u16(),
                body: text,
            });
        }

        let generate_resp: GenerateResponse = resp
            .json()
            .await
            .map_err(|e| transport_error(NAME, self.timeout, e))?;

        let tokens = generate_resp
            .usage_metadata
            .as_ref()
            .and_then(|u| u.total_token_count);
        tracing::debug!(
            "Gemini answered in {}ms ({} tokens)",
            start.elapsed().as_millis(),
            tokens.map_or_else(|| "?".to_string(), |t| t.to_string())
        );

        generate_resp
            .text()
            .ok_or_else(|| ProviderError::EmptyResponse {
                provider: NAME.to_string(),
            })
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }
}
