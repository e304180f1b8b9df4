use image::RgbImage;
use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use crate::color::Patch;
use crate::error::SkinToneError;
use crate::geometry::FaceBox;

/// Half-open `[start, end)` interval expressed as a fraction of a length.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Span {
    pub start: f64,
    pub end: f64,
}

impl Span {
    pub const fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    fn as_pair(&self) -> (f64, f64) {
        (self.start, self.end)
    }

    fn validate(&self, name: &str) -> Result<(), SkinToneError> {
        let in_unit = |v: f64| v.is_finite() && (0.0..=1.0).contains(&v);
        if !in_unit(self.start) || !in_unit(self.end) || self.start >= self.end {
            return Err(SkinToneError::InvalidConfig(format!(
                "{name} must satisfy 0 <= start < end <= 1, got [{}, {})",
                self.start, self.end
            )));
        }
        Ok(())
    }
}

/// Cheek sampling windows, relative to the face box.
///
/// Both cheeks share the same rows. The defaults sit below the eyes and
/// beside the nose, away from the hairline and the box edges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CheekWindows {
    pub rows: Span,
    pub left_cols: Span,
    pub right_cols: Span,
}

impl Default for CheekWindows {
    fn default() -> Self {
        Self {
            rows: Span::new(0.45, 0.72),
            left_cols: Span::new(0.10, 0.35),
            right_cols: Span::new(0.65, 0.90),
        }
    }
}

impl CheekWindows {
    pub fn validate(&self) -> Result<(), SkinToneError> {
        self.rows.validate("cheek rows")?;
        self.left_cols.validate("left cheek columns")?;
        self.right_cols.validate("right cheek columns")?;
        Ok(())
    }
}

/// Cut the left and right cheek patches out of the face.
///
/// Fails with [`SkinToneError::EmptyRegion`] when the face box does not
/// overlap the image. When both cheek windows collapse to nothing (tiny
/// boxes), the whole clipped face is returned as the only patch.
pub fn sample_cheek_regions<'a>(
    image: &'a RgbImage,
    face: FaceBox,
    windows: &CheekWindows,
) -> Result<Vec<Patch<'a>>, SkinToneError> {
    let face_region = face.clip_to(image.width(), image.height());
    if face_region.is_empty() {
        return Err(SkinToneError::EmptyRegion {
            x: face.x,
            y: face.y,
            w: face.width,
            h: face.height,
        });
    }

    let rows = windows.rows.as_pair();
    let left = face_region.fractional_window(rows, windows.left_cols.as_pair());
    let right = face_region.fractional_window(rows, windows.right_cols.as_pair());
    trace!(?face_region, ?left, ?right, "cheek windows");

    let patches: Vec<Patch<'a>> = [left, right]
        .into_iter()
        .filter(|region| !region.is_empty())
        .map(|region| Patch::new(image, region))
        .collect();

    if patches.is_empty() {
        warn!(
            ?face,
            "cheek windows are empty, sampling the whole face instead"
        );
        return Ok(vec![Patch::new(image, face_region)]);
    }

    Ok(patches)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Region;
    use image::Rgb;

    #[test]
    fn default_windows_cut_two_cheeks() {
        let image = RgbImage::new(200, 200);
        let patches = sample_cheek_regions(
            &image,
            FaceBox::new(0, 0, 200, 200),
            &CheekWindows::default(),
        )
        .unwrap();
        assert_eq!(patches.len(), 2);
        assert_eq!(
            patches[0].region(),
            Region {
                x: 20,
                y: 90,
                width: 50,
                height: 54
            }
        );
        assert_eq!(
            patches[1].region(),
            Region {
                x: 130,
                y: 90,
                width: 50,
                height: 54
            }
        );
    }

    #[test]
    fn windows_are_offset_by_face_origin() {
        let image = RgbImage::new(400, 400);
        let patches = sample_cheek_regions(
            &image,
            FaceBox::new(100, 60, 200, 200),
            &CheekWindows::default(),
        )
        .unwrap();
        assert_eq!(patches[0].region().x, 120);
        assert_eq!(patches[0].region().y, 150);
        assert_eq!(patches[1].region().x, 230);
    }

    #[test]
    fn box_outside_image_is_empty_region() {
        let image = RgbImage::new(100, 100);
        let result = sample_cheek_regions(
            &image,
            FaceBox::new(150, 150, 40, 40),
            &CheekWindows::default(),
        );
        assert!(matches!(
            result,
            Err(SkinToneError::EmptyRegion {
                x: 150,
                y: 150,
                w: 40,
                h: 40
            })
        ));
    }

    #[test]
    fn zero_sized_box_is_empty_region() {
        let image = RgbImage::new(100, 100);
        let result =
            sample_cheek_regions(&image, FaceBox::new(10, 10, 0, 20), &CheekWindows::default());
        assert!(matches!(result, Err(SkinToneError::EmptyRegion { .. })));
    }

    #[test]
    fn zero_area_image_is_empty_region() {
        let image = RgbImage::new(0, 0);
        let result =
            sample_cheek_regions(&image, FaceBox::new(0, 0, 10, 10), &CheekWindows::default());
        assert!(matches!(result, Err(SkinToneError::EmptyRegion { .. })));
    }

    #[test]
    fn tiny_box_falls_back_to_whole_face() {
        // A 2x2 face: rows [0, 1) but cols [0, 0) and [1, 1) are empty.
        let image = RgbImage::from_pixel(10, 10, Rgb([1, 2, 3]));
        let patches =
            sample_cheek_regions(&image, FaceBox::new(4, 4, 2, 2), &CheekWindows::default())
                .unwrap();
        assert_eq!(patches.len(), 1);
        assert_eq!(
            patches[0].region(),
            Region {
                x: 4,
                y: 4,
                width: 2,
                height: 2
            }
        );
        assert_eq!(patches[0].len(), 4);
    }

    #[test]
    fn partially_visible_face_samples_the_visible_part() {
        let image = RgbImage::new(100, 100);
        let patches = sample_cheek_regions(
            &image,
            FaceBox::new(-50, -50, 100, 100),
            &CheekWindows::default(),
        )
        .unwrap();
        // Clipped face is 50x50 at the origin.
        for patch in &patches {
            let region = patch.region();
            assert!(region.x + region.width <= 50);
            assert!(region.y + region.height <= 50);
            assert!(!patch.is_empty());
        }
    }

    #[test]
    fn reversed_span_is_rejected() {
        let windows = CheekWindows {
            rows: Span::new(0.72, 0.45),
            ..CheekWindows::default()
        };
        assert!(matches!(
            windows.validate(),
            Err(SkinToneError::InvalidConfig(_))
        ));
    }

    #[test]
    fn out_of_unit_span_is_rejected() {
        let windows = CheekWindows {
            right_cols: Span::new(0.65, 1.2),
            ..CheekWindows::default()
        };
        assert!(windows.validate().is_err());
    }
}
