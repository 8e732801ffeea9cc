//! Configuration management for Logomark.
//!
//! Configuration is loaded from the platform config directory with sensible
//! defaults. All config structs implement `Default`, so a missing file or a
//! partial file both work.

mod types;
mod validate;

pub use types::*;

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure for Logomark.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Processing settings
    pub processing: ProcessingConfig,

    /// Resource limits
    pub limits: LimitsConfig,

    /// Logging settings
    pub logging: LoggingConfig,

    /// Model provider settings
    pub provider: ProviderSettings,
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Returns default configuration if the file doesn't exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default config file path.
    ///
    /// Uses platform-appropriate directories:
    /// - macOS: ~/Library/Application Support/com.logomark.logomark/config.toml
    /// - Linux: ~/.config/logomark/config.toml
    /// - Windows: C:\Users\<User>\AppData\Roaming\logomark\config\config.toml
    ///
    /// Falls back to ~/.logomark/config.toml if directory detection fails.
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("com", "logomark", "logomark")
            .map(|dirs| dirs.config_dir().to_path_buf().join("config.toml"))
            .unwrap_or_else(|| {
                let home = shellexpand::tilde("~").into_owned();
                PathBuf::from(home).join(".logomark").join("config.toml")
            })
    }

    /// Serialize the config to a pretty TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ValidationError(e.to_string()))
    }

    /// Resolve the settings for one provider into an immutable [`ProviderConfig`].
    ///
    /// `kind` overrides `provider.default`; `model_override` overrides the
    /// configured model. This is the only place `${ENV_VAR}` references are
    /// expanded.
    pub fn provider_config(
        &self,
        kind: Option<ProviderKind>,
        model_override: Option<&str>,
    ) -> Result<ProviderConfig, ConfigError> {
        let kind = kind.unwrap_or(self.provider.default);
        match kind {
            ProviderKind::Hosted => {
                let cfg = &self.provider.hosted;
                let api_key = resolve_env_var(&cfg.api_key).ok_or_else(|| {
                    ConfigError::ValidationError(
                        "Hosted API key not set. Set GEMINI_API_KEY or provider.hosted.api_key."
                            .to_string(),
                    )
                })?;
                let model = model_override
                    .map(String::from)
                    .or_else(|| resolve_env_var(&cfg.model))
                    .unwrap_or_else(|| DEFAULT_HOSTED_MODEL.to_string());
                Ok(ProviderConfig {
                    kind,
                    endpoint: resolve_env_var(&cfg.endpoint),
                    api_key,
                    model,
                    timeout_ms: cfg.timeout_ms,
                    structured_output: true,
                })
            }
            ProviderKind::Local => {
                let cfg = &self.provider.local;
                let model = model_override
                    .map(String::from)
                    .or_else(|| resolve_env_var(&cfg.model))
                    .ok_or_else(|| {
                        ConfigError::ValidationError(
                            "Local model name not set. Set LOCAL_OPENAI_MODEL_NAME, \
                             provider.local.model, or pass --model."
                                .to_string(),
                        )
                    })?;
                Ok(ProviderConfig {
                    kind,
                    endpoint: Some(
                        resolve_env_var(&cfg.endpoint)
                            .unwrap_or_else(|| DEFAULT_LOCAL_ENDPOINT.to_string()),
                    ),
                    api_key: resolve_env_var(&cfg.api_key)
                        .unwrap_or_else(|| DEFAULT_LOCAL_API_KEY.to_string()),
                    model,
                    timeout_ms: cfg.timeout_ms,
                    structured_output: cfg.structured_output,
                })
            }
        }
    }
}

/// Resolve `${ENV_VAR}` references in config strings.
///
/// Plain strings pass through; empty strings and unset variables yield `None`.
pub fn resolve_env_var(value: &str) -> Option<String> {
    if value.starts_with("${") && value.ends_with('}') {
        let var_name = &value[2..value.len() - 1];
        std::env::var(var_name).ok().filter(|v| !v.is_empty())
    } else if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
