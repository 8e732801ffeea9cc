//! Canvas extension: center an image on a 3x canvas of its edge color.

use image::{imageops, DynamicImage, RgbaImage};

use super::edge_background;

/// Scale factor applied to both dimensions.
pub const EXTEND_FACTOR: u32 = 3;

/// Place `img` in the middle of a canvas three times its width and height,
/// filled with the most common edge color.
///
/// RGB input stays RGB; everything else comes back as RGBA.
pub fn extend_image(img: &DynamicImage) -> DynamicImage {
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    let bg = edge_background(&rgba);

    let mut canvas = RgbaImage::from_pixel(width * EXTEND_FACTOR, height * EXTEND_FACTOR, bg);
    imageops::overlay(&mut canvas, &rgba, i64::from(width), i64::from(height));

    tracing::debug!(
        "Extended {}x{} to {}x{} with background {:?}",
        width,
        height,
        canvas.width(),
        canvas.height(),
        bg.0
    );

    match img {
        DynamicImage::ImageRgb8(_) => DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(canvas).to_rgb8()),
        _ => DynamicImage::ImageRgba8(canvas),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, Rgb, RgbImage, Rgba};

    #[test]
    fn test_rgb_extended_and_centered() {
        let mut img = RgbImage::from_pixel(10, 10, Rgb([255, 255, 255]));
        img.put_pixel(5, 5, Rgb([0, 0, 255]));

        let out = extend_image(&DynamicImage::ImageRgb8(img));
        assert_eq!(out.dimensions(), (30, 30));
        let DynamicImage::ImageRgb8(out) = out else {
            panic!("RGB input should stay RGB");
        };
        assert_eq!(out.get_pixel(15, 15), &Rgb([0, 0, 255]));
        assert_eq!(out.get_pixel(0, 0), &Rgb([255, 255, 255]));
    }

    #[test]
    fn test_transparent_background_preserved() {
        let mut img = RgbaImage::from_pixel(10, 10, Rgba([0, 0, 0, 0]));
        img.put_pixel(5, 5, Rgba([255, 0, 0, 255]));

        let out = extend_image(&DynamicImage::ImageRgba8(img)).to_rgba8();
        assert_eq!(out.dimensions(), (30, 30));
        assert_eq!(out.get_pixel(15, 15), &Rgba([255, 0, 0, 255]));
        assert_eq!(out.get_pixel(0, 0), &Rgba([0, 0, 0, 0]));
    }

    #[test]
    fn test_non_square_image() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(4, 2, Rgba([9, 9, 9, 255])));
        assert_eq!(extend_image(&img).dimensions(), (12, 6));
    }
}
