//! Calibration settings for the skin tone pipeline.
//!
//! Every tunable constant lives here so thresholds and sampling windows can
//! be recalibrated from a JSON document without touching code.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::SkinToneError;
use crate::face_detector::DetectorConfig;
use crate::sample::CheekWindows;
use crate::tone::ToneLadder;

/// Complete pipeline configuration. Missing keys fall back to the defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SkinToneConfig {
    pub detector: DetectorConfig,
    pub cheeks: CheekWindows,
    pub ladder: ToneLadder,
    /// SeetaFace model used by the built-in detector when no detector is
    /// supplied explicitly.
    pub model_path: Option<PathBuf>,
}

impl SkinToneConfig {
    /// Parse and validate a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, SkinToneError> {
        let config: SkinToneConfig =
            serde_json::from_str(json).map_err(|e| SkinToneError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), SkinToneError> {
        self.detector.validate()?;
        self.cheeks.validate()?;
        self.ladder.validate()
    }
}
