use image::RgbImage;
use serde::{Deserialize, Serialize};

use crate::error::SkinToneError;
use crate::geometry::Region;

/// Luma weights (ITU-R BT.601) for red, green and blue.
pub(crate) const LUMA_WEIGHTS: [f64; 3] = [0.299, 0.587, 0.114];

/// Order of the three channels inside each pixel of a buffer.
///
/// Buffers decoded by the `image` crate are [`ChannelOrder::Rgb`]; frames
/// handed over from BGR capture stacks keep their native
/// [`ChannelOrder::Bgr`] layout and are reordered only when a colour leaves
/// the pipeline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelOrder {
    /// Red, green, blue.
    #[default]
    Rgb,
    /// Blue, green, red.
    Bgr,
}

impl ChannelOrder {
    /// Reorder a native triplet into red, green, blue.
    pub fn to_rgb<T: Copy>(self, native: [T; 3]) -> [T; 3] {
        match self {
            ChannelOrder::Rgb => native,
            ChannelOrder::Bgr => [native[2], native[1], native[0]],
        }
    }
}

/// Perceptual brightness of a red, green, blue triplet.
pub fn luma(rgb: [f64; 3]) -> f64 {
    LUMA_WEIGHTS[0] * rgb[0] + LUMA_WEIGHTS[1] * rgb[1] + LUMA_WEIGHTS[2] * rgb[2]
}

/// Representative colour of a set of pixels, always in red, green, blue order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorSample {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl ColorSample {
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Perceptual brightness on the 0–255 scale.
    pub fn brightness(&self) -> f64 {
        luma([self.r as f64, self.g as f64, self.b as f64])
    }
}

/// Borrowed rectangular view of an image used as a colour sample.
#[derive(Debug, Clone, Copy)]
pub struct Patch<'a> {
    image: &'a RgbImage,
    region: Region,
}

impl<'a> Patch<'a> {
    /// `region` must lie inside `image`; the sampler guarantees this by
    /// clipping every window before building a patch.
    pub(crate) fn new(image: &'a RgbImage, region: Region) -> Self {
        debug_assert!(region.x + region.width <= image.width());
        debug_assert!(region.y + region.height <= image.height());
        Self { image, region }
    }

    /// Absolute image rectangle covered by this patch.
    pub fn region(&self) -> Region {
        self.region
    }

    /// Number of pixels in the patch.
    pub fn len(&self) -> u64 {
        self.region.area()
    }

    pub fn is_empty(&self) -> bool {
        self.region.is_empty()
    }

    /// Native channel triplets, row by row.
    pub fn pixels(&self) -> impl Iterator<Item = [u8; 3]> + 'a {
        let Region {
            x,
            y,
            width,
            height,
        } = self.region;
        let image = self.image;
        (y..y + height)
            .flat_map(move |row| (x..x + width).map(move |col| image.get_pixel(col, row).0))
    }
}

/// Average every pixel of every patch into a single colour.
///
/// Each pixel carries equal weight, so larger patches dominate. The mean is
/// taken per native channel, reordered to red, green, blue and truncated
/// toward zero.
pub fn aggregate(patches: &[Patch<'_>], order: ChannelOrder) -> Result<ColorSample, SkinToneError> {
    let mut sums = [0u64; 3];
    let mut count = 0u64;

    for patch in patches {
        for pixel in patch.pixels() {
            sums[0] += pixel[0] as u64;
            sums[1] += pixel[1] as u64;
            sums[2] += pixel[2] as u64;
        }
        count += patch.len();
    }

    if count == 0 {
        let region = patches.first().map(Patch::region).unwrap_or(Region {
            x: 0,
            y: 0,
            width: 0,
            height: 0,
        });
        return Err(SkinToneError::EmptyRegion {
            x: region.x as i32,
            y: region.y as i32,
            w: region.width,
            h: region.height,
        });
    }

    let mean = sums.map(|sum| sum as f64 / count as f64);
    let [r, g, b] = order.to_rgb(mean);
    Ok(ColorSample::new(r as u8, g as u8, b as u8))
}
