//! Skin tone estimation: find the most prominent face in a photo, sample its
//! cheeks and classify the average colour into a broad tone category.
//!
//! # Example
//!
//! ```no_run
//! use skintone::{SkinToneAnalyzer, SkinToneConfig};
//!
//! let raw_bytes = std::fs::read("photo.jpg").unwrap();
//! let config = SkinToneConfig {
//!     model_path: Some("model/seeta_fd_frontal_v1.0.bin".into()),
//!     ..SkinToneConfig::default()
//! };
//! let analysis = SkinToneAnalyzer::new(raw_bytes)
//!     .unwrap()
//!     .config(config)
//!     .analyze()
//!     .unwrap();
//! println!("{}", serde_json::to_string(&analysis).unwrap());
//! ```
//!
//! The individual stages are exposed as well, for callers that already hold
//! a decoded frame and a face box:
//!
//! ```
//! use image::{Rgb, RgbImage};
//! use skintone::{detect_skin_tone, ChannelOrder, FaceBox, SkinToneConfig, ToneLabel};
//!
//! let image = RgbImage::from_pixel(200, 200, Rgb([160, 160, 160]));
//! let report = detect_skin_tone(
//!     &image,
//!     FaceBox::new(50, 50, 100, 100),
//!     ChannelOrder::Rgb,
//!     &SkinToneConfig::default(),
//! )
//! .unwrap();
//! assert_eq!(report.skin_tone, ToneLabel::Olive);
//! ```

mod color;
mod config;
mod decode;
mod error;
/// Face detection traits and data types.
pub mod face_detector;
mod geometry;
mod locate;
#[cfg(feature = "rustface")]
/// Built-in SeetaFace-based face detector backend.
pub mod rustface_backend;
mod sample;
mod tone;

use image::RgbImage;
use serde::Serialize;
use tracing::debug;

pub use color::{aggregate, luma, ChannelOrder, ColorSample, Patch};
pub use config::SkinToneConfig;
/// Error type returned by skintone operations.
pub use error::SkinToneError;
/// Face detection trait and face bounding-box type.
pub use face_detector::{DetectorConfig, FaceBounds, FaceDetector};
pub use geometry::{clamp_span, FaceBox, Region};
pub use locate::{group_windows, locate_largest_face, to_intensity};
#[cfg(feature = "rustface")]
/// Built-in detector that loads a SeetaFace model.
pub use rustface_backend::RustfaceDetector;
pub use sample::{sample_cheek_regions, CheekWindows, Span};
pub use tone::{classify, ToneLabel, ToneLadder, ToneStep};

/// Tone label plus the colour it was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ToneReport {
    /// Category of the sampled skin.
    pub skin_tone: ToneLabel,
    /// Average cheek colour in red, green, blue order.
    pub average_rgb: ColorSample,
}

/// Result of a full photo analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FaceAnalysis {
    /// Face the tone was sampled from.
    pub face_box: FaceBox,
    /// Tone and colour of that face.
    #[serde(flatten)]
    pub report: ToneReport,
}

/// Classify the skin inside `face` on `image`.
///
/// Runs the cheek sampler, the colour aggregator and the tone ladder. Either
/// both the label and the colour come back, or an error does.
pub fn detect_skin_tone(
    image: &RgbImage,
    face: FaceBox,
    order: ChannelOrder,
    config: &SkinToneConfig,
) -> Result<ToneReport, SkinToneError> {
    let patches = sample_cheek_regions(image, face, &config.cheeks)?;
    let average_rgb = aggregate(&patches, order)?;
    let skin_tone = config.ladder.classify(&average_rgb);
    debug!(
        ?face,
        patches = patches.len(),
        ?average_rgb,
        %skin_tone,
        "skin tone classified"
    );
    Ok(ToneReport {
        skin_tone,
        average_rgb,
    })
}

/// Locate the largest face in an already-decoded frame and classify its skin.
pub fn analyze_image(
    image: &RgbImage,
    order: ChannelOrder,
    detector: &dyn FaceDetector,
    config: &SkinToneConfig,
) -> Result<FaceAnalysis, SkinToneError> {
    let face_box = locate_largest_face(image, order, detector, &config.detector)
        .ok_or(SkinToneError::NoFaceDetected)?;
    let report = detect_skin_tone(image, face_box, order, config)?;
    Ok(FaceAnalysis { face_box, report })
}

/// Builder for analysing an encoded photo.
///
/// Validates the input format on construction, then decodes, locates the
/// face and classifies its skin tone with configurable parameters.
pub struct SkinToneAnalyzer {
    input: Vec<u8>,
    config: SkinToneConfig,
    /// User-provided face detector. When `None`, the built-in rustface backend
    /// is loaded from `config.model_path` (if compiled with the `rustface`
    /// feature).
    detector: Option<Box<dyn FaceDetector>>,
}

impl SkinToneAnalyzer {
    /// Create a new analyzer from raw image bytes (JPEG, PNG, or WebP).
    pub fn new(input: Vec<u8>) -> Result<Self, SkinToneError> {
        decode::detect_format(&input)?;

        Ok(Self {
            input,
            config: SkinToneConfig::default(),
            detector: None,
        })
    }

    /// Replace the whole configuration (default: [`SkinToneConfig::default`]).
    pub fn config(mut self, config: SkinToneConfig) -> Self {
        self.config = config;
        self
    }

    /// Provide a custom face detector implementation.
    ///
    /// When set, this detector is used instead of the built-in rustface backend.
    ///
    /// ```no_run
    /// use image::GrayImage;
    /// use skintone::{DetectorConfig, FaceBounds, FaceDetector, SkinToneAnalyzer};
    ///
    /// struct MyDetector;
    /// impl FaceDetector for MyDetector {
    ///     fn detect(&self, gray: &GrayImage, config: &DetectorConfig) -> Vec<FaceBounds> {
    ///         // Your detection logic here
    ///         vec![]
    ///     }
    /// }
    ///
    /// let bytes = std::fs::read("photo.jpg").unwrap();
    /// let result = SkinToneAnalyzer::new(bytes).unwrap()
    ///     .face_detector(Box::new(MyDetector))
    ///     .analyze();
    /// ```
    pub fn face_detector(mut self, detector: Box<dyn FaceDetector>) -> Self {
        self.detector = Some(detector);
        self
    }

    /// Decode the photo, find the face and classify its skin tone.
    pub fn analyze(self) -> Result<FaceAnalysis, SkinToneError> {
        self.config.validate()?;
        let image = decode::decode_rgb(&self.input)?;
        let detector = match self.detector {
            Some(detector) => detector,
            None => default_detector(&self.config)?,
        };
        analyze_image(&image, ChannelOrder::Rgb, detector.as_ref(), &self.config)
    }
}

#[cfg(feature = "rustface")]
fn default_detector(config: &SkinToneConfig) -> Result<Box<dyn FaceDetector>, SkinToneError> {
    let path = config
        .model_path
        .as_ref()
        .ok_or(SkinToneError::MissingDetector)?;
    Ok(Box::new(RustfaceDetector::from_path(path)?))
}

#[cfg(not(feature = "rustface"))]
fn default_detector(_config: &SkinToneConfig) -> Result<Box<dyn FaceDetector>, SkinToneError> {
    Err(SkinToneError::MissingDetector)
}
