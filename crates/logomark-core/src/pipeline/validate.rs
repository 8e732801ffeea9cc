//! Input validation before an image is read into memory.

use std::path::Path;

use crate::config::LimitsConfig;
use crate::error::RenameError;

/// Validates files before loading.
pub struct Validator {
    limits: LimitsConfig,
}

impl Validator {
    /// Create a new validator with the given limits.
    pub fn new(limits: LimitsConfig) -> Self {
        Self { limits }
    }

    /// Check that `path` is an existing regular file within the size limit.
    ///
    /// Returns the file size in bytes.
    pub fn validate(&self, path: &Path) -> Result<u64, RenameError> {
        if !path.exists() {
            return Err(RenameError::FileNotFound(path.to_path_buf()));
        }

        let metadata = std::fs::metadata(path).map_err(|e| RenameError::Io {
            path: path.to_path_buf(),
            message: format!("Cannot read metadata: {e}"),
        })?;

        if !metadata.is_file() {
            return Err(RenameError::Io {
                path: path.to_path_buf(),
                message: "Not a regular file".to_string(),
            });
        }

        let max_bytes = self.limits.max_file_size_mb * 1024 * 1024;
        if metadata.len() > max_bytes {
            return Err(RenameError::FileTooLarge {
                path: path.to_path_buf(),
                size_mb: metadata.len() / (1024 * 1024),
                max_mb: self.limits.max_file_size_mb,
            });
        }

        Ok(metadata.len())
    }
}
