//! Rename orchestration: load, identify, decide, then apply or report.
//!
//! Each file moves through `Loaded -> Identified -> Decided -> Applied | Reported`.
//! Every failure is returned as a [`RenameError`] for that file only; nothing
//! on disk changes unless the final rename succeeds.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::config::LimitsConfig;
use crate::error::{RenameError, RenameResult};
use crate::llm::BrandProvider;
use crate::naming::{sanitize_name, NameReservations, FALLBACK_NAME};
use crate::types::{BrandResult, RenameDecision};

use super::load::ImageLoader;

/// Options for controlling rename behavior.
#[derive(Debug, Clone, Default)]
pub struct RenameOptions {
    /// Report decisions without touching the filesystem. Later files in the
    /// same run see earlier sources as already moved away.
    pub dry_run: bool,
    /// Move renamed files here instead of renaming in place
    pub output_dir: Option<PathBuf>,
    /// Pause between provider calls in a batch
    pub request_interval: Duration,
    /// Process at most this many files of a batch
    pub max_files: Option<usize>,
}

/// Drives files through identification and renaming.
///
/// Owns the in-run name reservations, so one `Renamer` should be used for a
/// whole batch.
pub struct Renamer {
    pub(super) provider: Arc<dyn BrandProvider>,
    loader: ImageLoader,
    pub(super) options: RenameOptions,
    names: NameReservations,
}

impl Renamer {
    /// Create a renamer around an already-constructed provider.
    pub fn new(provider: Arc<dyn BrandProvider>, limits: LimitsConfig, options: RenameOptions) -> Self {
        Self {
            provider,
            loader: ImageLoader::new(limits),
            options,
            names: NameReservations::new(),
        }
    }

    /// The provider used for identification.
    pub fn provider(&self) -> &dyn BrandProvider {
        self.provider.as_ref()
    }

    /// The options this renamer was built with.
    pub fn options(&self) -> &RenameOptions {
        &self.options
    }

    /// Identify and rename a single file.
    ///
    /// Returns the decision with `applied = true` when the file was moved,
    /// `applied = false` for dry runs and for files that already carry their
    /// resolved name.
    pub async fn rename_file(&mut self, path: &Path) -> RenameResult<RenameDecision> {
        tracing::debug!("Processing: {:?}", path);

        // Loaded
        let loaded = self.loader.load(path).await?;

        // Identified
        let brand = self
            .provider
            .identify(&loaded.to_input())
            .await
            .map_err(|e| RenameError::identify(path.to_path_buf(), e))?;
        tracing::debug!(
            "Identified {:?} as {:?} (confident: {})",
            path,
            brand.brand_name,
            brand.is_confident
        );
        if let Some(reasoning) = &brand.reasoning {
            tracing::trace!("  Reasoning: {}", reasoning);
        }

        // Decided
        let target = self.decide(path, &brand);
        let mut decision = RenameDecision {
            source: path.to_path_buf(),
            target,
            brand,
            applied: false,
        };

        if decision.is_unchanged() {
            tracing::info!("Already named correctly: {:?}", path);
            return Ok(decision);
        }

        // Reported
        if self.options.dry_run {
            tracing::info!("Dry run: {:?} -> {:?}", decision.source, decision.target);
            self.names.vacate(&decision.source);
            return Ok(decision);
        }

        // Applied
        if let Some(dir) = &self.options.output_dir {
            tokio::fs::create_dir_all(dir)
                .await
                .map_err(|e| RenameError::Io {
                    path: dir.clone(),
                    message: format!("Cannot create output directory: {e}"),
                })?;
        }
        apply_rename(&decision.source, &decision.target).await?;
        decision.applied = true;
        tracing::info!("Renamed {:?} -> {:?}", decision.source, decision.target);

        Ok(decision)
    }

    /// Pick a collision-free target path for `path` given the model's answer.
    fn decide(&mut self, path: &Path, brand: &BrandResult) -> PathBuf {
        let base = if brand.is_confident {
            sanitize_name(&brand.brand_name)
        } else {
            tracing::warn!(
                "No brand recognized in {:?}; using fallback name '{FALLBACK_NAME}'",
                path
            );
            FALLBACK_NAME.to_string()
        };

        let dir = self
            .options
            .output_dir
            .clone()
            .unwrap_or_else(|| path.parent().map(Path::to_path_buf).unwrap_or_default());
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
            .unwrap_or_default();

        self.names.resolve_for(path, &dir, &base, &ext)
    }
}

/// Move `source` to `target`, refusing to replace an existing file.
pub async fn apply_rename(source: &Path, target: &Path) -> RenameResult<()> {
    match tokio::fs::try_exists(target).await {
        Ok(false) => {}
        Ok(true) => {
            return Err(RenameError::Io {
                path: source.to_path_buf(),
                message: format!("Target already exists: {}", target.display()),
            })
        }
        Err(e) => {
            return Err(RenameError::Io {
                path: source.to_path_buf(),
                message: format!("Cannot check target {}: {e}", target.display()),
            })
        }
    }

    tokio::fs::rename(source, target)
        .await
        .map_err(|e| RenameError::Io {
            path: source.to_path_buf(),
            message: format!("Cannot rename to {}: {e}", target.display()),
        })
}
