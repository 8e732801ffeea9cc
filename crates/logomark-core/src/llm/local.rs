//! Local provider for self-hosted OpenAI-compatible servers (LM Studio,
//! llama.cpp server, vLLM, Ollama's `/v1` shim).
//!
//! Sends the image via data URL in the user message content array. When
//! structured output is enabled the request carries a JSON schema
//! `response_format`; otherwise the prompt asks for bare JSON and the
//! decoder digs it out of the text.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use super::provider::{
    brand_json_schema, http_client, transport_error, BrandProvider, ImageInput, IDENTIFY_PROMPT,
    JSON_ONLY_INSTRUCTION,
};
use crate::config::{ProviderConfig, DEFAULT_LOCAL_ENDPOINT};
use crate::error::ProviderError;

const NAME: &str = "local";

/// Provider for a locally reachable Chat Completions endpoint.
pub struct LocalProvider {
    endpoint: String,
    api_key: String,
    model: String,
    timeout: Duration,
    structured_output: bool,
    client: reqwest::Client,
}

impl LocalProvider {
    pub fn new(config: &ProviderConfig) -> Result<Self, ProviderError> {
        let endpoint = config
            .endpoint
            .as_deref()
            .unwrap_or(DEFAULT_LOCAL_ENDPOINT)
            .trim_end_matches('/')
            .to_string();
        Ok(Self {
            endpoint,
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            timeout: Duration::from_millis(config.timeout_ms),
            structured_output: config.structured_output,
            client: http_client(NAME)?,
        })
    }

    fn build_request(&self, image: &ImageInput) -> ChatRequest {
        let (prompt, response_format) = if self.structured_output {
            (
                IDENTIFY_PROMPT.to_string(),
                Some(ResponseFormat {
                    format_type: "json_schema".to_string(),
                    json_schema: JsonSchemaFormat {
                        name: "brand_result".to_string(),
                        strict: true,
                        schema: brand_json_schema(),
                    },
                }),
            )
        } else {
            (format!("{IDENTIFY_PROMPT} {JSON_ONLY_INSTRUCTION}"), None)
        };

        ChatRequest {
            model: self.model.clone(),
            temperature: 0.0,
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: vec![
                    ChatContent::Text { text: prompt },
                    ChatContent::ImageUrl {
                        image_url: ImageUrl {
                            url: image.data_url(),
                        },
                    },
                ],
            }],
            response_format,
        }
    }
}

// --- Request types ---

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: Vec<ChatContent>,
}

#[derive(Serialize)]
#[serde(tag = "type")]
enum ChatContent {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(rename = "image_url")]
    ImageUrl { image_url: ImageUrl },
}

#[derive(Serialize)]
struct ImageUrl {
    url: String,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: String,
    json_schema: JsonSchemaFormat,
}

#[derive(Serialize)]
struct JsonSchemaFormat {
    name: String,
    strict: bool,
    schema: serde_json::Value,
}

// --- Response types ---

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
    usage: Option<ChatUsage>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ChatUsage {
    total_tokens: u32,
}

#[async_trait]
impl BrandProvider for LocalProvider {
    fn name(&self) -> &str {
        NAME
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, image: &ImageInput) -> Result<String, ProviderError> {
        let start = Instant::now();
        let url = format!("{}/chat/completions", self.endpoint);
        let body = self.build_request(image);

        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
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

        let chat_resp: ChatResponse = resp
            .json()
            .await
            .map_err(|e| transport_error(NAME, self.timeout, e))?;

        tracing::debug!(
            "Local model answered in {}ms ({} tokens)",
            start.elapsed().as_millis(),
            chat_resp
                .usage
                .as_ref()
                .map_or_else(|| "?".to_string(), |u| u.total_tokens.to_string())
        );

        chat_resp
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .ok_or_else(|| ProviderError::EmptyResponse {
                provider: NAME.to_string(),
            })
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProviderKind;
    use crate::error::IdentifyError;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(endpoint: &str, structured_output: bool) -> ProviderConfig {
        ProviderConfig {
            kind: ProviderKind::Local,
            endpoint: Some(endpoint.to_string()),
            api_key: "lm-studio".to_string(),
            model: "qwen2.5-vl".to_string(),
            timeout_ms: 5_000,
            structured_output,
        }
    }

    fn image() -> ImageInput {
        ImageInput::from_bytes(&[0xFF, 0xD8, 0xFF], "jpeg")
    }

    fn chat_body(content: &str) -> serde_json::Value {
        serde_json::json!({
            "choices": [{ "message": { "role": "assistant", "content": content } }],
            "usage": { "total_tokens": 42 }
        })
    }

    /// A server answering every POST with `response`.
    async fn server_with(response: ResponseTemplate) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(response)
            .mount(&server)
            .await;
        server
    }

    #[test]
    fn test_structured_request_has_schema() {
        let provider = LocalProvider::new(&config("http://localhost:1234/v1", true)).unwrap();
        let body = serde_json::to_value(provider.build_request(&image())).unwrap();

        assert_eq!(body["model"], "qwen2.5-vl");
        assert_eq!(body["response_format"]["type"], "json_schema");
        assert_eq!(
            body["response_format"]["json_schema"]["schema"]["properties"]["brand_name"]["type"],
            "string"
        );
        let content = &body["messages"][0]["content"];
        assert_eq!(content[0]["type"], "text");
        assert_eq!(content[1]["type"], "image_url");
        assert!(content[1]["image_url"]["url"]
            .as_str()
            .unwrap()
            .starts_with("data:image/jpeg;base64,"));
    }

    #[test]
    fn test_plain_request_asks_for_json_text() {
        let provider = LocalProvider::new(&config("http://localhost:1234/v1", false)).unwrap();
        let body = serde_json::to_value(provider.build_request(&image())).unwrap();

        assert!(body.get("response_format").is_none());
        let prompt = body["messages"][0]["content"][0]["text"].as_str().unwrap();
        assert!(prompt.contains("only a JSON object"));
    }

    #[tokio::test]
    async fn test_identify_structured_answer() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer lm-studio"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(chat_body(r#"{"brand_name":"Nike","is_confident":true}"#)),
            )
            .expect(1)
            .mount(&server)
            .await;
        let provider = LocalProvider::new(&config(&format!("{}/v1/", server.uri()), true)).unwrap();

        let result = provider.identify(&image()).await.unwrap();
        assert_eq!(result.brand_name, "Nike");
        assert!(result.is_confident);

        let requests = server.received_requests().await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
        assert_eq!(body["model"], "qwen2.5-vl");
        assert_eq!(body["response_format"]["type"], "json_schema");
    }

    #[tokio::test]
    async fn test_identify_fenced_text_answer() {
        let answer = "```json\n{\"brand_name\":\"Shell\",\"is_confident\":true}\n```";
        let server = server_with(ResponseTemplate::new(200).set_body_json(chat_body(answer))).await;
        let provider = LocalProvider::new(&config(&server.uri(), false)).unwrap();

        let result = provider.identify(&image()).await.unwrap();
        assert_eq!(result.brand_name, "Shell");
    }

    #[tokio::test]
    async fn test_identify_prose_answer_is_decode_error() {
        let server = server_with(
            ResponseTemplate::new(200).set_body_json(chat_body("Looks like Shell to me.")),
        )
        .await;
        let provider = LocalProvider::new(&config(&server.uri(), false)).unwrap();

        assert!(matches!(
            provider.identify(&image()).await,
            Err(IdentifyError::Decode(_))
        ));
    }

    #[tokio::test]
    async fn test_empty_choices_is_provider_error() {
        let server = server_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "choices": [] })),
        )
        .await;
        let provider = LocalProvider::new(&config(&server.uri(), true)).unwrap();

        assert!(matches!(
            provider.complete(&image()).await,
            Err(ProviderError::EmptyResponse { .. })
        ));
    }

    #[tokio::test]
    async fn test_server_error_is_provider_error() {
        let server = server_with(
            ResponseTemplate::new(500).set_body_string(r#"{"error":"model not loaded"}"#),
        )
        .await;
        let provider = LocalProvider::new(&config(&server.uri(), true)).unwrap();

        match provider.complete(&image()).await {
            Err(ProviderError::Status { status, body, .. }) => {
                assert_eq!(status, 500);
                assert!(body.contains("model not loaded"));
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_silent_server_times_out() {
        // Accepts the connection and never answers.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let held = tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(5)).await;
            drop(socket);
        });

        let mut slow = config(&format!("http://{addr}/v1"), true);
        slow.timeout_ms = 200;
        let provider = LocalProvider::new(&slow).unwrap();

        let started = Instant::now();
        match provider.identify(&image()).await {
            Err(IdentifyError::Provider(ProviderError::Timeout { provider, timeout_ms })) => {
                assert_eq!(provider, "local");
                assert_eq!(timeout_ms, 200);
            }
            other => panic!("expected timeout, got {other:?}"),
        }
        assert!(started.elapsed() < Duration::from_secs(5));
        held.abort();
    }
}
