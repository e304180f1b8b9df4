use image::{DynamicImage, ImageFormat, Rgb, RgbImage, Rgba};

use crate::error::SkinToneError;

/// Decode input bytes into a `DynamicImage`.
pub(crate) fn decode_image(input: &[u8]) -> Result<DynamicImage, SkinToneError> {
    image::load_from_memory(input).map_err(|e| SkinToneError::DecodeError(e.to_string()))
}

/// Detect the input image format from the raw bytes.
pub(crate) fn detect_format(input: &[u8]) -> Result<ImageFormat, SkinToneError> {
    image::guess_format(input).map_err(|e| SkinToneError::DecodeError(e.to_string()))
}

/// Decode to an opaque RGB buffer, rejecting zero-sized images.
pub(crate) fn decode_rgb(input: &[u8]) -> Result<RgbImage, SkinToneError> {
    let decoded = decode_image(input)?;
    if decoded.width() == 0 || decoded.height() == 0 {
        return Err(SkinToneError::ZeroDimensions);
    }
    Ok(flatten_alpha(&decoded))
}

/// Composite any alpha channel onto white.
///
/// Transparent backdrops around cut-out portraits would otherwise drag the
/// cheek average toward black.
pub(crate) fn flatten_alpha(image: &DynamicImage) -> RgbImage {
    if !image.color().has_alpha() {
        return image.to_rgb8();
    }

    let rgba = image.to_rgba8();
    RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let Rgba([r, g, b, a]) = *rgba.get_pixel(x, y);
        Rgb([over_white(r, a), over_white(g, a), over_white(b, a)])
    })
}

/// `c * a + 255 * (1 - a)` in 8-bit fixed point, rounded to nearest.
fn over_white(channel: u8, alpha: u8) -> u8 {
    let (c, a) = (channel as u32, alpha as u32);
    ((c * a + 255 * (255 - a) + 127) / 255) as u8
}
