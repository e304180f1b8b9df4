use std::ops::RangeInclusive;

use image::GrayImage;
use serde::{Deserialize, Serialize};

use crate::error::SkinToneError;
use crate::geometry::FaceBox;

/// Bounding box of a face candidate reported by a detector.
#[derive(Debug, Clone)]
pub struct FaceBounds {
    /// X coordinate of the top-left corner (pixels).
    pub x: f64,
    /// Y coordinate of the top-left corner (pixels).
    pub y: f64,
    /// Width of the bounding box (pixels).
    pub width: f64,
    /// Height of the bounding box (pixels).
    pub height: f64,
    /// Detection confidence score.
    pub confidence: f64,
}

impl FaceBounds {
    /// Round to the integer pixel grid.
    pub fn to_face_box(&self) -> FaceBox {
        FaceBox::new(
            self.x.round() as i32,
            self.y.round() as i32,
            self.width.round().max(0.0) as u32,
            self.height.round().max(0.0) as u32,
        )
    }
}

/// Accepted range for `1 / scale_factor`.
pub(crate) const SHRINK_RANGE: RangeInclusive<f64> = 0.01..=0.99;

/// Search parameters handed to every [`FaceDetector`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DetectorConfig {
    /// Growth factor between successive search window sizes.
    pub scale_factor: f64,
    /// Overlapping raw detections required to confirm a face.
    pub min_neighbors: u32,
    /// Smallest accepted face, in pixels, for both width and height.
    pub min_face_size: u32,
    /// Minimum confidence for backends that score candidates instead of
    /// counting overlaps.
    pub score_threshold: f64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            scale_factor: 1.1,
            min_neighbors: 5,
            min_face_size: 80,
            score_threshold: 2.0,
        }
    }
}

impl DetectorConfig {
    /// Check that the parameters describe a search the detectors can run.
    pub fn validate(&self) -> Result<(), SkinToneError> {
        // Pyramid backends shrink the image by the reciprocal, which has to
        // stay inside SHRINK_RANGE.
        let shrink = 1.0 / self.scale_factor;
        if !self.scale_factor.is_finite() || !SHRINK_RANGE.contains(&shrink) {
            return Err(SkinToneError::InvalidConfig(format!(
                "scale_factor must lie in [{:.4}, {}], got {}",
                1.0 / SHRINK_RANGE.end(),
                1.0 / SHRINK_RANGE.start(),
                self.scale_factor
            )));
        }
        if self.min_neighbors == 0 {
            return Err(SkinToneError::InvalidConfig(
                "min_neighbors must be >= 1".into(),
            ));
        }
        if !self.score_threshold.is_finite() || self.score_threshold <= 0.0 {
            return Err(SkinToneError::InvalidConfig(format!(
                "score_threshold must be finite and > 0, got {}",
                self.score_threshold
            )));
        }
        Ok(())
    }
}

/// Pluggable face detection backend.
///
/// Implement this trait to provide a custom face detector (ONNX, dlib, a
/// Haar cascade, etc.) and pass it to
/// [`crate::SkinToneAnalyzer::face_detector`] or
/// [`crate::locate_largest_face`].
pub trait FaceDetector: Send + Sync {
    /// Detect faces in a single-channel intensity image.
    fn detect(&self, gray: &GrayImage, config: &DetectorConfig) -> Vec<FaceBounds>;

    /// Whether [`FaceDetector::detect`] returns unmerged sliding-window hits.
    ///
    /// When `true`, the locator clusters overlapping hits and keeps only
    /// clusters with at least [`DetectorConfig::min_neighbors`] members.
    fn reports_raw_windows(&self) -> bool {
        false
    }
}
