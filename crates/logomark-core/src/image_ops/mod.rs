//! Pixel-level edits: trimming uniform borders and extending the canvas.
//!
//! The pure functions ([`trim_image`], [`extend_image`]) work on decoded
//! images. [`ImageEditor`] wraps them with file I/O, running decode, edit and
//! encode on a blocking task under the configured decode timeout.

mod chain;
mod extend;
mod trim;

pub use chain::{parse_ops, EditOp, DEFAULT_CHAIN_MARGIN};
pub use extend::{extend_image, EXTEND_FACTOR};
pub use trim::{trim_image, Trim};

use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::time::timeout;

use crate::config::LimitsConfig;
use crate::error::ImageOpError;

/// Background color agreed on by at least three of the four corners.
pub fn corner_background(img: &RgbaImage) -> Option<Rgba<u8>> {
    let (width, height) = img.dimensions();
    if width == 0 || height == 0 {
        return None;
    }

    let corners = [
        *img.get_pixel(0, 0),
        *img.get_pixel(width - 1, 0),
        *img.get_pixel(0, height - 1),
        *img.get_pixel(width - 1, height - 1),
    ];

    corners
        .iter()
        .find(|c| corners.iter().filter(|o| o == c).count() >= 3)
        .copied()
}

/// Most common color along the four edges. Ties go to the color seen first.
pub fn edge_background(img: &RgbaImage) -> Rgba<u8> {
    let (width, height) = img.dimensions();
    if width == 0 || height == 0 {
        return Rgba([255, 255, 255, 255]);
    }

    let edge = (0..width)
        .flat_map(|x| [(x, 0), (x, height - 1)])
        .chain((1..height.saturating_sub(1)).flat_map(|y| [(0, y), (width - 1, y)]));

    let mut counts: HashMap<[u8; 4], usize> = HashMap::new();
    let mut order = Vec::new();
    for (x, y) in edge {
        let px = img.get_pixel(x, y).0;
        let count = counts.entry(px).or_insert(0);
        if *count == 0 {
            order.push(px);
        }
        *count += 1;
    }

    let mut best = order[0];
    for px in order {
        if counts[&px] > counts[&best] {
            best = px;
        }
    }
    Rgba(best)
}

/// What a file-level edit produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditOutcome {
    /// Where the result was written, or the source when nothing changed
    pub output: PathBuf,
    /// Whether a new image was written
    pub modified: bool,
}

/// Runs trim and extend against files on disk.
pub struct ImageEditor {
    limits: LimitsConfig,
}

impl ImageEditor {
    pub fn new(limits: LimitsConfig) -> Self {
        Self { limits }
    }

    /// Trim the borders of `path`, writing `<stem>_trimmed.<ext>` next to it,
    /// or overwriting the source when `replace` is set.
    pub async fn trim_file(&self, path: &Path, margin: u32, replace: bool) -> Result<EditOutcome, ImageOpError> {
        let output = output_path(path, "trimmed", replace);
        self.run(path, move |source, img| match trim_image(&img, margin) {
            Trim::Cropped(cropped) => {
                save_image(&cropped, &output)?;
                Ok(EditOutcome { output, modified: true })
            }
            Trim::Unchanged => Ok(EditOutcome {
                output: source.to_path_buf(),
                modified: false,
            }),
            Trim::InconsistentBackground => Err(ImageOpError::InconsistentBackground {
                path: source.to_path_buf(),
            }),
        })
        .await
    }

    /// Extend `path` onto a 3x canvas, writing `<stem>_extended.<ext>` next to
    /// it, or overwriting the source when `replace` is set.
    pub async fn extend_file(&self, path: &Path, replace: bool) -> Result<EditOutcome, ImageOpError> {
        let output = output_path(path, "extended", replace);
        self.run(path, move |_, img| {
            save_image(&extend_image(&img), &output)?;
            Ok(EditOutcome { output, modified: true })
        })
        .await
    }

    /// Run `ops` in order on `path`, writing `<stem>_processed.<ext>` next to
    /// it, or overwriting the source when `replace` is set.
    ///
    /// Nothing is written when no step changed the image. With `skip_same`,
    /// a result identical to the source pixel for pixel (for example `e,t<n>`
    /// landing back on the original crop) is not written either.
    pub async fn apply_ops(
        &self,
        path: &Path,
        ops: &[EditOp],
        replace: bool,
        skip_same: bool,
    ) -> Result<EditOutcome, ImageOpError> {
        let output = output_path(path, "processed", replace);
        let ops = ops.to_vec();
        self.run(path, move |source, original| {
            let mut current = original.clone();
            let mut modified = false;

            for op in ops {
                match op {
                    EditOp::Extend => {
                        current = extend_image(&current);
                        modified = true;
                    }
                    EditOp::Trim(margin) => match trim_image(&current, margin) {
                        Trim::Cropped(cropped) => {
                            current = cropped;
                            modified = true;
                        }
                        Trim::Unchanged => {}
                        Trim::InconsistentBackground => {
                            return Err(ImageOpError::InconsistentBackground {
                                path: source.to_path_buf(),
                            })
                        }
                    },
                }
            }

            if modified && skip_same && same_pixels(&original, &current) {
                tracing::debug!("{:?} came back identical to the source", source);
                modified = false;
            }

            if !modified {
                return Ok(EditOutcome {
                    output: source.to_path_buf(),
                    modified: false,
                });
            }
            save_image(&current, &output)?;
            Ok(EditOutcome { output, modified: true })
        })
        .await
    }

    /// Decode `path` and apply `op` on a blocking task, bounded by the decode timeout.
    async fn run<F>(&self, path: &Path, op: F) -> Result<EditOutcome, ImageOpError>
    where
        F: FnOnce(&Path, DynamicImage) -> Result<EditOutcome, ImageOpError> + Send + 'static,
    {
        if !path.is_file() {
            return Err(ImageOpError::Io {
                path: path.to_path_buf(),
                message: "File not found".to_string(),
            });
        }

        let path_owned = path.to_path_buf();
        let timeout_ms = self.limits.decode_timeout_ms;

        let result = timeout(Duration::from_millis(timeout_ms), async {
            tokio::task::spawn_blocking(move || {
                let img = open_image(&path_owned)?;
                op(&path_owned, img)
            })
            .await
        })
        .await;

        match result {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(e)) => Err(ImageOpError::Codec {
                path: path.to_path_buf(),
                message: format!("Task join error: {e}"),
            }),
            Err(_) => Err(ImageOpError::Timeout {
                path: path.to_path_buf(),
                timeout_ms,
            }),
        }
    }
}

/// `<stem>_<suffix>.<ext>` beside `path`, or `path` itself when replacing.
pub fn output_path(path: &Path, suffix: &str, replace: bool) -> PathBuf {
    if replace {
        return path.to_path_buf();
    }
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match path.extension() {
        Some(ext) => format!("{stem}_{suffix}.{}", ext.to_string_lossy()),
        None => format!("{stem}_{suffix}"),
    };
    path.with_file_name(name)
}

/// Same size, same color type, same bytes.
fn same_pixels(a: &DynamicImage, b: &DynamicImage) -> bool {
    a.width() == b.width()
        && a.height() == b.height()
        && a.color() == b.color()
        && a.as_bytes() == b.as_bytes()
}

fn open_image(path: &Path) -> Result<DynamicImage, ImageOpError> {
    let reader = image::ImageReader::open(path)
        .map_err(|e| ImageOpError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
        .with_guessed_format()
        .map_err(|e| ImageOpError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    let img = reader.decode().map_err(|e| ImageOpError::Codec {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    if img.width() == 0 || img.height() == 0 {
        return Err(ImageOpError::EmptyImage(path.to_path_buf()));
    }
    Ok(img)
}

/// Encode by extension. JPEG has no alpha channel, so it gets RGB.
fn save_image(img: &DynamicImage, path: &Path) -> Result<(), ImageOpError> {
    let format = ImageFormat::from_path(path).map_err(|e| ImageOpError::Codec {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let saved = if format == ImageFormat::Jpeg && img.color().has_alpha() {
        DynamicImage::ImageRgb8(img.to_rgb8()).save_with_format(path, format)
    } else {
        img.save_with_format(path, format)
    };

    saved.map_err(|e| ImageOpError::Codec {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    tracing::debug!("Wrote {:?}", path);
    Ok(())
}
