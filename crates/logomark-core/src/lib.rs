//! Logomark Core - brand-based image renaming library.
//!
//! Logomark sends an image to a vision-capable model, asks which brand or
//! logo it shows, and renames the file after the answer. It also trims
//! uniform borders and extends canvases around logos.
//!
//! # Architecture
//!
//! ```text
//! Image → Load → Identify (hosted | local) → Decode → Sanitize → Resolve → Rename
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use logomark_core::{Config, ProviderFactory, RenameOptions, Renamer};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load()?;
//!     let provider = ProviderFactory::create(&config.provider_config(None, None)?)?;
//!     let mut renamer = Renamer::new(Arc::from(provider), config.limits, RenameOptions::default());
//!
//!     let decision = renamer.rename_file("./IMG_0042.png".as_ref()).await?;
//!     println!("{} -> {}", decision.source.display(), decision.target.display());
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod config;
pub mod error;
pub mod image_ops;
pub mod llm;
pub mod naming;
pub mod pipeline;
pub mod types;

#[cfg(test)]
pub(crate) mod test_util;

// Re-exports for convenient access
pub use config::{Config, ProviderConfig, ProviderKind};
pub use error::{
    ConfigError, DecodeError, IdentifyError, ImageOpError, LogomarkError, ProviderError,
    RenameError, RenameResult, Result,
};
pub use image_ops::{parse_ops, EditOp, EditOutcome, ImageEditor};
pub use llm::{decode_brand, BrandProvider, ImageInput, ProviderFactory};
pub use naming::{sanitize_name, NameReservations, FALLBACK_NAME};
pub use pipeline::{BatchReport, DiscoveredFile, FileDiscovery, RenameOptions, Renamer};
pub use types::{BrandResult, RenameDecision};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_default_config_builds_renamer_inputs() {
        let config = Config::default();
        assert_eq!(config.provider.default, ProviderKind::Hosted);
        assert!(config.processing.supported_formats.contains(&"png".to_string()));
    }
}
