//! Shared fixtures for unit tests.

use async_trait::async_trait;
use image::{Rgba, RgbaImage};
use std::path::Path;
use std::time::Duration;

use crate::error::ProviderError;
use crate::llm::{BrandProvider, ImageInput};

/// Write a small opaque PNG (or whatever format the extension names).
pub(crate) fn write_test_image(path: &Path, width: u32, height: u32) {
    let img = RgbaImage::from_pixel(width, height, Rgba([200, 30, 30, 255]));
    img.save(path).unwrap();
}

/// A `size`x`size` image of `bg` with a `content` square covering `[from, to)`.
pub(crate) fn framed_image(size: u32, bg: Rgba<u8>, content: Rgba<u8>, from: u32, to: u32) -> RgbaImage {
    RgbaImage::from_fn(size, size, |x, y| {
        if (from..to).contains(&x) && (from..to).contains(&y) {
            content
        } else {
            bg
        }
    })
}

/// Provider that replays canned answers in order, one per call.
pub(crate) struct ScriptedProvider {
    answers: std::sync::Mutex<std::collections::VecDeque<Result<String, ProviderError>>>,
    calls: std::sync::atomic::AtomicUsize,
}

impl ScriptedProvider {
    pub(crate) fn new(answers: Vec<Result<String, ProviderError>>) -> Self {
        Self {
            answers: std::sync::Mutex::new(answers.into()),
            calls: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    /// Every call answers with `{"brand_name": brand, "is_confident": true}`.
    pub(crate) fn brands(brands: &[&str]) -> Self {
        Self::new(brands.iter().map(|b| Ok(brand_json(b, true))).collect())
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(std::sync::atomic::Ordering::SeqCst)
    }
}

pub(crate) fn brand_json(brand: &str, confident: bool) -> String {
    serde_json::json!({ "brand_name": brand, "is_confident": confident }).to_string()
}

pub(crate) fn provider_down() -> ProviderError {
    ProviderError::Status {
        provider: "scripted".to_string(),
        status: 503,
        body: "unavailable".to_string(),
    }
}

#[async_trait]
impl BrandProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    fn model(&self) -> &str {
        "scripted-model"
    }

    async fn complete(&self, _image: &ImageInput) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        self.answers
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ProviderError::EmptyResponse {
                provider: "scripted".to_string(),
            }))
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(1)
    }
}

/// Sorted file names in `dir`, for before/after comparisons.
pub(crate) fn list_dir(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
