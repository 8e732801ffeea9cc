//! Border trimming against a corner-detected background color.

use image::{DynamicImage, Rgba, RgbaImage};

use super::corner_background;

/// Result of [`trim_image`].
#[derive(Debug, Clone)]
pub enum Trim {
    /// Content was found and the crop is smaller than the image.
    Cropped(DynamicImage),
    /// The image is all background, or the content already touches the
    /// margin on every side.
    Unchanged,
    /// Fewer than three corners agree on a background color.
    InconsistentBackground,
}

/// Pixel rectangle as `(left, top, right, bottom)`, right/bottom exclusive.
type Bounds = (u32, u32, u32, u32);

/// Crop `img` to the content that differs from the corner background,
/// keeping `margin` pixels of background around it where available.
pub fn trim_image(img: &DynamicImage, margin: u32) -> Trim {
    let rgba = img.to_rgba8();
    let Some(bg) = corner_background(&rgba) else {
        return Trim::InconsistentBackground;
    };

    let Some((left, top, right, bottom)) = content_bounds(&rgba, bg) else {
        tracing::debug!("Image is entirely background");
        return Trim::Unchanged;
    };

    let (width, height) = rgba.dimensions();
    let left = left.saturating_sub(margin);
    let top = top.saturating_sub(margin);
    let right = right.saturating_add(margin).min(width);
    let bottom = bottom.saturating_add(margin).min(height);

    if (left, top, right, bottom) == (0, 0, width, height) {
        return Trim::Unchanged;
    }

    tracing::debug!(
        "Cropping {}x{} to ({}, {})..({}, {})",
        width,
        height,
        left,
        top,
        right,
        bottom
    );
    Trim::Cropped(img.crop_imm(left, top, right - left, bottom - top))
}

/// Smallest rectangle holding every pixel that differs from `bg` in any channel.
fn content_bounds(img: &RgbaImage, bg: Rgba<u8>) -> Option<Bounds> {
    let mut bounds: Option<Bounds> = None;

    for (x, y, px) in img.enumerate_pixels() {
        if *px == bg {
            continue;
        }
        bounds = Some(match bounds {
            None => (x, y, x + 1, y + 1),
            Some((l, t, r, b)) => (l.min(x), t.min(y), r.max(x + 1), b.max(y + 1)),
        });
    }

    bounds
}
