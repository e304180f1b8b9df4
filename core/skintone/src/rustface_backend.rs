use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use image::GrayImage;
use tracing::{debug, warn};

use crate::error::SkinToneError;
use crate::face_detector::{DetectorConfig, FaceBounds, FaceDetector, SHRINK_RANGE};

/// SeetaFace refuses search windows smaller than its 20px base window.
const MIN_WINDOW: u32 = 20;

/// Smallest score threshold handed to SeetaFace, which panics on `<= 0`.
const MIN_SCORE: f64 = 0.01;

/// Values actually passed to the SeetaFace detector.
#[derive(Debug, Clone, Copy, PartialEq)]
struct SeetaSettings {
    min_face_size: u32,
    score_thresh: f64,
    pyramid_scale: f32,
}

impl SeetaSettings {
    /// Map a detector configuration onto SeetaFace's accepted ranges.
    ///
    /// Validated configurations pass through unchanged. Anything else is
    /// clamped so an unvalidated config cannot abort the process.
    fn from_config(config: &DetectorConfig) -> Self {
        let defaults = DetectorConfig::default();
        let score_thresh = if config.score_threshold.is_finite() {
            config.score_threshold.max(MIN_SCORE)
        } else {
            defaults.score_threshold
        };
        // SeetaFace shrinks the image instead of growing the window.
        let shrink = 1.0 / config.scale_factor;
        let shrink = if shrink.is_finite() {
            shrink.clamp(*SHRINK_RANGE.start(), *SHRINK_RANGE.end())
        } else {
            1.0 / defaults.scale_factor
        };
        Self {
            min_face_size: config.min_face_size.max(MIN_WINDOW),
            score_thresh,
            pyramid_scale: shrink as f32,
        }
    }
}

/// Face detector backed by the `rustface` crate (SeetaFace engine).
///
/// SeetaFace merges overlapping windows itself and scores the result, so
/// [`DetectorConfig::score_threshold`] gates candidates here and
/// [`DetectorConfig::min_neighbors`] is not consulted.
pub struct RustfaceDetector {
    model: rustface::Model,
}

impl RustfaceDetector {
    /// Load a SeetaFace frontal model (`seeta_fd_frontal_v1.0.bin`) from disk.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, SkinToneError> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|e| SkinToneError::ModelLoad(format!("{}: {e}", path.display())))?;
        Self::from_reader(BufReader::new(file))
    }

    /// Load a SeetaFace model from any byte source.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, SkinToneError> {
        let model =
            rustface::read_model(reader).map_err(|e| SkinToneError::ModelLoad(e.to_string()))?;
        Ok(Self { model })
    }
}

impl FaceDetector for RustfaceDetector {
    fn detect(&self, gray: &GrayImage, config: &DetectorConfig) -> Vec<FaceBounds> {
        let settings = SeetaSettings::from_config(config);
        if config.validate().is_err() {
            warn!(?settings, "detector config out of range, clamped for rustface");
        }

        let mut detector = rustface::create_detector_with_model(self.model.clone());
        detector.set_min_face_size(settings.min_face_size);
        detector.set_score_thresh(settings.score_thresh);
        detector.set_pyramid_scale_factor(settings.pyramid_scale);
        detector.set_slide_window_step(4, 4);

        let faces = detector.detect(&rustface::ImageData::new(
            gray.as_raw(),
            gray.width(),
            gray.height(),
        ));
        debug!(faces = faces.len(), "rustface detection");

        faces
            .iter()
            .map(|face| {
                let bbox = face.bbox();
                FaceBounds {
                    x: bbox.x() as f64,
                    y: bbox.y() as f64,
                    width: bbox.width() as f64,
                    height: bbox.height() as f64,
                    confidence: face.score(),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_model_file_is_a_load_error() {
        let result = RustfaceDetector::from_path("/nonexistent/seeta_fd_frontal_v1.0.bin");
        assert!(matches!(result, Err(SkinToneError::ModelLoad(_))));
    }

    #[test]
    fn garbage_model_bytes_are_rejected() {
        let result = RustfaceDetector::from_reader(std::io::Cursor::new(vec![0u8; 3]));
        assert!(result.is_err());
    }

    #[test]
    fn default_config_maps_to_seeta_settings() {
        let settings = SeetaSettings::from_config(&DetectorConfig::default());
        assert_eq!(settings.min_face_size, 80);
        assert_eq!(settings.score_thresh, 2.0);
        assert!((settings.pyramid_scale - 1.0 / 1.1).abs() < 1e-6);
    }

    #[test]
    fn out_of_range_config_is_clamped_for_seeta() {
        let config = DetectorConfig {
            scale_factor: 1.005,
            min_face_size: 4,
            score_threshold: 0.0,
            ..DetectorConfig::default()
        };
        let settings = SeetaSettings::from_config(&config);
        assert_eq!(settings.min_face_size, MIN_WINDOW);
        assert!(settings.score_thresh > 0.0);
        assert!(settings.pyramid_scale <= 0.99);

        let coarse = DetectorConfig {
            scale_factor: 500.0,
            score_threshold: -3.0,
            ..DetectorConfig::default()
        };
        let settings = SeetaSettings::from_config(&coarse);
        assert!(settings.score_thresh > 0.0);
        assert!(settings.pyramid_scale >= 0.01);

        let broken = DetectorConfig {
            scale_factor: 0.0,
            score_threshold: f64::NAN,
            ..DetectorConfig::default()
        };
        let settings = SeetaSettings::from_config(&broken);
        assert_eq!(settings, SeetaSettings::from_config(&DetectorConfig::default()));
    }
}
