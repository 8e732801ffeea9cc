//! Image loading with content-based format detection.
//!
//! The model only ever sees the raw file bytes, so this stage reads the file,
//! detects the format from its magic bytes (not the extension), and parses the
//! header to make sure the file really is an image.

use image::ImageFormat;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use crate::config::LimitsConfig;
use crate::error::RenameError;
use crate::llm::ImageInput;

use super::validate::Validator;

/// Image bytes read from disk, with the detected format.
#[derive(Debug, Clone)]
pub struct LoadedImage {
    /// Source path
    pub path: PathBuf,
    /// Raw file bytes
    pub bytes: Vec<u8>,
    /// Format detected from content
    pub format: ImageFormat,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl LoadedImage {
    /// Short format name ("jpeg", "png", ...).
    pub fn format_name(&self) -> &'static str {
        format_to_str(self.format)
    }

    /// Base64 payload for a provider request.
    pub fn to_input(&self) -> ImageInput {
        ImageInput::from_bytes(&self.bytes, self.format_name())
    }
}

/// Reads and checks image files before they are sent to a provider.
pub struct ImageLoader {
    validator: Validator,
}

impl ImageLoader {
    /// Create a new loader with the given limits.
    pub fn new(limits: LimitsConfig) -> Self {
        Self {
            validator: Validator::new(limits),
        }
    }

    /// Load an image, failing on unreadable files and formats providers can't take.
    pub async fn load(&self, path: &Path) -> Result<LoadedImage, RenameError> {
        self.validator.validate(path)?;

        let bytes = tokio::fs::read(path).await.map_err(|e| RenameError::Io {
            path: path.to_path_buf(),
            message: format!("Cannot read file: {e}"),
        })?;

        inspect_bytes(bytes, path)
    }
}

/// Detect the format of `bytes` and read the image header.
fn inspect_bytes(bytes: Vec<u8>, path: &Path) -> Result<LoadedImage, RenameError> {
    let format = image::guess_format(&bytes).map_err(|_| RenameError::UnsupportedFormat {
        path: path.to_path_buf(),
        format: path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("unknown")
            .to_string(),
    })?;

    if !is_sendable(format) {
        return Err(RenameError::UnsupportedFormat {
            path: path.to_path_buf(),
            format: format!("{format:?}").to_lowercase(),
        });
    }

    let (width, height) = image::ImageReader::with_format(Cursor::new(&bytes), format)
        .into_dimensions()
        .map_err(|e| RenameError::Io {
            path: path.to_path_buf(),
            message: format!("Invalid image file: {e}"),
        })?;

    tracing::trace!("Loaded {:?}: {:?} {}x{}", path, format, width, height);

    Ok(LoadedImage {
        path: path.to_path_buf(),
        bytes,
        format,
        width,
        height,
    })
}

/// Formats the vision APIs accept as inline images.
fn is_sendable(format: ImageFormat) -> bool {
    matches!(
        format,
        ImageFormat::Jpeg | ImageFormat::Png | ImageFormat::WebP | ImageFormat::Gif | ImageFormat::Bmp
    )
}

/// Convert an ImageFormat to a string representation.
pub fn format_to_str(format: ImageFormat) -> &'static str {
    match format {
        ImageFormat::Jpeg => "jpeg",
        ImageFormat::Png => "png",
        ImageFormat::WebP => "webp",
        ImageFormat::Gif => "gif",
        ImageFormat::Tiff => "tiff",
        ImageFormat::Bmp => "bmp",
        ImageFormat::Ico => "ico",
        ImageFormat::Avif => "avif",
        _ => "unknown",
    }
}
