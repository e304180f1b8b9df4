use serde::{Deserialize, Serialize};

/// Axis-aligned face rectangle in image pixel coordinates.
///
/// The origin may lie outside the image (detectors and callers are free to
/// report boxes that hang over an edge); every consumer clips it through
/// [`FaceBox::clip_to`] before touching pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaceBox {
    /// X coordinate of the top-left corner.
    pub x: i32,
    /// Y coordinate of the top-left corner.
    pub y: i32,
    /// Width of the box.
    #[serde(rename = "w")]
    pub width: u32,
    /// Height of the box.
    #[serde(rename = "h")]
    pub height: u32,
}

impl FaceBox {
    /// Create a face box from its top-left corner and size.
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Area in pixels, used to rank competing detections.
    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Intersect the box with a `width` × `height` image.
    pub fn clip_to(&self, width: u32, height: u32) -> Region {
        let (x0, x1) = clamp_span(self.x as i64, self.x as i64 + self.width as i64, width);
        let (y0, y1) = clamp_span(self.y as i64, self.y as i64 + self.height as i64, height);
        Region {
            x: x0,
            y: y0,
            width: x1 - x0,
            height: y1 - y0,
        }
    }
}

/// Absolute, in-bounds rectangle of pixels. May be empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Region {
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Number of pixels covered.
    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Sub-window given as fractions of this region's own size.
    ///
    /// `rows` and `cols` are `(start, end)` fractions. Each bound is
    /// truncated toward zero and then clamped to `[0, height]` / `[0, width]`,
    /// so the result always lies inside `self` (possibly empty).
    pub fn fractional_window(&self, rows: (f64, f64), cols: (f64, f64)) -> Region {
        let (y0, y1) = clamp_span(
            scale(self.height, rows.0),
            scale(self.height, rows.1),
            self.height,
        );
        let (x0, x1) = clamp_span(
            scale(self.width, cols.0),
            scale(self.width, cols.1),
            self.width,
        );
        Region {
            x: self.x + x0,
            y: self.y + y0,
            width: x1 - x0,
            height: y1 - y0,
        }
    }
}

/// Clamp a half-open span `[start, end)` to `[0, limit]`.
///
/// Returns `(start, end)` with `start <= end <= limit`; a reversed or
/// fully out-of-range span collapses to an empty one.
pub fn clamp_span(start: i64, end: i64, limit: u32) -> (u32, u32) {
    let limit = limit as i64;
    let start = start.clamp(0, limit);
    let end = end.clamp(0, limit).max(start);
    (start as u32, end as u32)
}

fn scale(length: u32, fraction: f64) -> i64 {
    (length as f64 * fraction) as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_span_inside_bounds_is_identity() {
        assert_eq!(clamp_span(10, 20, 100), (10, 20));
    }

    #[test]
    fn clamp_span_clips_both_ends() {
        assert_eq!(clamp_span(-5, 150, 100), (0, 100));
    }

    #[test]
    fn clamp_span_reversed_collapses_to_empty() {
        assert_eq!(clamp_span(30, 10, 100), (30, 30));
    }

    #[test]
    fn clamp_span_fully_outside_is_empty() {
        let (start, end) = clamp_span(120, 180, 100);
        assert_eq!(start, end);
        let (start, end) = clamp_span(-50, -10, 100);
        assert_eq!((start, end), (0, 0));
    }

    #[test]
    fn face_box_inside_image_is_unchanged() {
        let region = FaceBox::new(50, 40, 100, 120).clip_to(200, 200);
        assert_eq!(
            region,
            Region {
                x: 50,
                y: 40,
                width: 100,
                height: 120
            }
        );
    }

    #[test]
    fn face_box_hanging_over_corner_is_clipped() {
        let region = FaceBox::new(-20, 150, 100, 100).clip_to(200, 200);
        assert_eq!(
            region,
            Region {
                x: 0,
                y: 150,
                width: 80,
                height: 50
            }
        );
    }

    #[test]
    fn face_box_outside_image_clips_to_empty() {
        let region = FaceBox::new(300, 300, 50, 50).clip_to(200, 200);
        assert!(region.is_empty());
    }

    #[test]
    fn fractional_window_offsets_from_region_origin() {
        let face = Region {
            x: 50,
            y: 50,
            width: 100,
            height: 100,
        };
        let window = face.fractional_window((0.5, 0.75), (0.25, 0.5));
        assert_eq!(
            window,
            Region {
                x: 75,
                y: 100,
                width: 25,
                height: 25
            }
        );
    }

    #[test]
    fn fractional_window_never_escapes_region() {
        let face = Region {
            x: 10,
            y: 10,
            width: 7,
            height: 9,
        };
        let window = face.fractional_window((0.0, 1.5), (-0.2, 1.0));
        assert_eq!(window.x, 10);
        assert_eq!(window.y, 10);
        assert_eq!(window.width, 7);
        assert_eq!(window.height, 9);
    }

    #[test]
    fn face_box_serializes_with_short_keys() {
        let json = serde_json::to_string(&FaceBox::new(1, 2, 3, 4)).unwrap();
        assert_eq!(json, r#"{"x":1,"y":2,"w":3,"h":4}"#);
    }
}
