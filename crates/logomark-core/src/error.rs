//! Error types for Logomark.
//!
//! Errors are split by the layer that produces them so the batch walker can
//! report a per-file failure with its path and a readable cause, while the
//! CLI can still turn anything into a non-zero exit.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for Logomark operations.
#[derive(Error, Debug)]
pub enum LogomarkError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Rename errors for a single file
    #[error("Rename error: {0}")]
    Rename(#[from] RenameError),

    /// Trim/extend errors for a single file
    #[error("Image error: {0}")]
    Image(#[from] ImageOpError),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Failures talking to a model backend.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Connection, DNS, or body transfer failure
    #[error("{provider} request failed: {message}")]
    Request { provider: String, message: String },

    /// The request exceeded the provider timeout
    #[error("{provider} request timed out after {timeout_ms}ms")]
    Timeout { provider: String, timeout_ms: u64 },

    /// The endpoint answered with a non-success status
    #[error("{provider} HTTP {status}: {body}")]
    Status {
        provider: String,
        status: u16,
        body: String,
    },

    /// The endpoint answered successfully but without any content
    #[error("{provider} returned an empty response")]
    EmptyResponse { provider: String },
}

/// The model answered, but not with the expected structure.
#[derive(Error, Debug)]
pub enum DecodeError {
    /// No JSON object could be parsed out of the payload
    #[error("response is not JSON: {0}")]
    NotJson(String),

    /// JSON was found but its fields have the wrong types
    #[error("response has an unexpected shape: {0}")]
    InvalidShape(String),
}

/// Errors from a single `identify` call: either the transport or the answer.
#[derive(Error, Debug)]
pub enum IdentifyError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// Per-file rename errors, organized by stage.
#[derive(Error, Debug)]
pub enum RenameError {
    /// File not found
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// Reading the source or moving it failed
    #[error("IO error for {path}: {message}")]
    Io { path: PathBuf, message: String },

    /// File exceeds size limit
    #[error("File too large: {path} ({size_mb}MB > {max_mb}MB)")]
    FileTooLarge {
        path: PathBuf,
        size_mb: u64,
        max_mb: u64,
    },

    /// Content is not an image format we can send
    #[error("Unsupported format for {path}: {format}")]
    UnsupportedFormat { path: PathBuf, format: String },

    /// Model backend failed
    #[error("Provider error for {path}: {source}")]
    Provider {
        path: PathBuf,
        #[source]
        source: ProviderError,
    },

    /// Model answer could not be decoded
    #[error("Decode error for {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: DecodeError,
    },
}

impl RenameError {
    /// Attach a path to an `identify` failure.
    pub fn identify(path: PathBuf, error: IdentifyError) -> Self {
        match error {
            IdentifyError::Provider(source) => Self::Provider { path, source },
            IdentifyError::Decode(source) => Self::Decode { path, source },
        }
    }

    /// Short category name used in reports: `io`, `provider` or `decode`.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::FileNotFound(_)
            | Self::Io { .. }
            | Self::FileTooLarge { .. }
            | Self::UnsupportedFormat { .. } => "io",
            Self::Provider { .. } => "provider",
            Self::Decode { .. } => "decode",
        }
    }
}

/// Errors from the trim and extend operations.
#[derive(Error, Debug)]
pub enum ImageOpError {
    /// Reading or writing the image file failed
    #[error("IO error for {path}: {message}")]
    Io { path: PathBuf, message: String },

    /// Image decoding or encoding failed
    #[error("Image codec error for {path}: {message}")]
    Codec { path: PathBuf, message: String },

    /// Fewer than three corners agree on a background color
    #[error("Inconsistent background color in {path}: fewer than 3 corners match")]
    InconsistentBackground { path: PathBuf },

    /// The image has no pixels
    #[error("Image is empty: {0}")]
    EmptyImage(PathBuf),

    /// Decoding and processing took longer than the configured limit
    #[error("Timeout processing {path} after {timeout_ms}ms")]
    Timeout { path: PathBuf, timeout_ms: u64 },

    /// An operation chain such as `e,t48` could not be parsed
    #[error("Invalid operation chain: {0}")]
    InvalidOperation(String),
}

/// Convenience type alias for Logomark results.
pub type Result<T> = std::result::Result<T, LogomarkError>;

/// Convenience type alias for per-file rename results.
pub type RenameResult<T> = std::result::Result<T, RenameError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rename_error_kind() {
        let err = RenameError::FileNotFound(PathBuf::from("a.png"));
        assert_eq!(err.kind(), "io");

        let err = RenameError::identify(
            PathBuf::from("a.png"),
            IdentifyError::Decode(DecodeError::NotJson("nope".into())),
        );
        assert_eq!(err.kind(), "decode");
        assert!(err.to_string().contains("a.png"));
    }

    #[test]
    fn test_status_error_message() {
        let err = ProviderError::Status {
            provider: "hosted".into(),
            status: 401,
            body: "unauthorized".into(),
        };
        assert_eq!(err.to_string(), "hosted HTTP 401: unauthorized");
    }
}
