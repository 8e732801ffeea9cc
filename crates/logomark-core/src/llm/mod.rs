//! Vision model integration for brand identification.
//!
//! Provides a provider abstraction over exactly two backends (hosted Gemini
//! and a local OpenAI-compatible server) and the strict decoder that turns
//! their answers into [`BrandResult`](crate::types::BrandResult)s.

pub(crate) mod decode;
pub(crate) mod gemini;
pub(crate) mod local;
pub(crate) mod provider;

pub use decode::decode_brand;
pub use gemini::GeminiProvider;
pub use local::LocalProvider;
pub use provider::{BrandProvider, ImageInput, ProviderFactory, IDENTIFY_PROMPT};
