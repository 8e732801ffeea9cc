//! Sub-configuration structs with their defaults.

use serde::{Deserialize, Serialize};

/// Default hosted (Gemini) API base URL.
pub const DEFAULT_HOSTED_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Hosted model used when neither config nor `GEMINI_MODEL_NAME` names one.
pub const DEFAULT_HOSTED_MODEL: &str = "gemini-2.5-flash";

/// Default base URL of a local OpenAI-compatible server (LM Studio's default port).
pub const DEFAULT_LOCAL_ENDPOINT: &str = "http://127.0.0.1:1234/v1";

/// Placeholder key accepted by most local servers.
pub const DEFAULT_LOCAL_API_KEY: &str = "lm-studio";

/// Processing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    /// File extensions picked up when walking a directory
    pub supported_formats: Vec<String>,

    /// Pause between consecutive provider calls in a batch (free-tier rate limits)
    pub request_interval_ms: u64,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            supported_formats: vec![
                "jpg".to_string(),
                "jpeg".to_string(),
                "png".to_string(),
                "webp".to_string(),
                "bmp".to_string(),
                "gif".to_string(),
            ],
            request_interval_ms: 0,
        }
    }
}

/// Resource limits to protect against problematic inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum file size in megabytes
    pub max_file_size_mb: u64,

    /// Decode timeout for trim/extend in milliseconds
    pub decode_timeout_ms: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_file_size_mb: 20,
            decode_timeout_ms: 10_000,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// Which model backend to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Managed Gemini API reached with an API key
    #[default]
    Hosted,
    /// Self-hosted OpenAI-compatible server
    Local,
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderKind::Hosted => write!(f, "hosted"),
            ProviderKind::Local => write!(f, "local"),
        }
    }
}

/// Provider section: default backend plus per-backend settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderSettings {
    /// Backend used when `--provider` is not given
    pub default: ProviderKind,

    /// Hosted (Gemini) settings
    pub hosted: HostedConfig,

    /// Local OpenAI-compatible settings
    pub local: LocalConfig,
}

/// Hosted provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HostedConfig {
    /// API base URL
    pub endpoint: String,

    /// API key (supports ${ENV_VAR} syntax)
    pub api_key: String,

    /// Model name (supports ${ENV_VAR} syntax)
    pub model: String,

    /// Per-request timeout in milliseconds
    pub timeout_ms: u64,
}

impl Default for HostedConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_HOSTED_ENDPOINT.to_string(),
            api_key: "${GEMINI_API_KEY}".to_string(),
            model: "${GEMINI_MODEL_NAME}".to_string(),
            timeout_ms: 60_000,
        }
    }
}

/// Local provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalConfig {
    /// Base URL of the OpenAI-compatible API (supports ${ENV_VAR} syntax)
    pub endpoint: String,

    /// API key (supports ${ENV_VAR} syntax)
    pub api_key: String,

    /// Model name (supports ${ENV_VAR} syntax)
    pub model: String,

    /// Per-request timeout in milliseconds
    pub timeout_ms: u64,

    /// Send a JSON schema `response_format`. Turn off for servers that reject it.
    pub structured_output: bool,
}

impl Default for LocalConfig {
    fn default() -> Self {
        Self {
            endpoint: "${LOCAL_OPENAI_BASE_URL}".to_string(),
            api_key: "${LOCAL_OPENAI_API_KEY}".to_string(),
            model: "${LOCAL_OPENAI_MODEL_NAME}".to_string(),
            // Vision models running locally can be slow
            timeout_ms: 120_000,
            structured_output: true,
        }
    }
}

/// Resolved, immutable settings handed to a provider constructor.
///
/// Built once by [`super::Config::provider_config`]; providers never read
/// the environment themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    /// Backend variant
    pub kind: ProviderKind,
    /// Base URL; `None` means the variant's default
    pub endpoint: Option<String>,
    /// API key sent with every request
    pub api_key: String,
    /// Model identifier
    pub model: String,
    /// Per-request timeout in milliseconds
    pub timeout_ms: u64,
    /// Ask the backend for schema-constrained output
    pub structured_output: bool,
}
