use std::fmt;

use serde::{Deserialize, Serialize};

use crate::color::ColorSample;
use crate::error::SkinToneError;

/// Broad skin tone category, brightest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToneLabel {
    Fair,
    Medium,
    Olive,
    Brown,
    Deep,
}

impl ToneLabel {
    /// All labels from brightest to darkest.
    pub const ALL: [ToneLabel; 5] = [
        ToneLabel::Fair,
        ToneLabel::Medium,
        ToneLabel::Olive,
        ToneLabel::Brown,
        ToneLabel::Deep,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ToneLabel::Fair => "fair",
            ToneLabel::Medium => "medium",
            ToneLabel::Olive => "olive",
            ToneLabel::Brown => "brown",
            ToneLabel::Deep => "deep",
        }
    }
}

impl fmt::Display for ToneLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One rung of the ladder: brightness at or above `min_brightness` maps to `label`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ToneStep {
    pub min_brightness: f64,
    pub label: ToneLabel,
}

/// Ordered brightness thresholds mapping a colour to a [`ToneLabel`].
///
/// Steps are evaluated from the first to the last; the first step whose
/// `min_brightness` is reached wins. Anything below every step gets `floor`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToneLadder {
    pub steps: Vec<ToneStep>,
    pub floor: ToneLabel,
}

impl Default for ToneLadder {
    fn default() -> Self {
        Self {
            steps: vec![
                ToneStep {
                    min_brightness: 200.0,
                    label: ToneLabel::Fair,
                },
                ToneStep {
                    min_brightness: 165.0,
                    label: ToneLabel::Medium,
                },
                ToneStep {
                    min_brightness: 135.0,
                    label: ToneLabel::Olive,
                },
                ToneStep {
                    min_brightness: 105.0,
                    label: ToneLabel::Brown,
                },
            ],
            floor: ToneLabel::Deep,
        }
    }
}

impl ToneLadder {
    /// Thresholds must be finite and strictly descending.
    pub fn validate(&self) -> Result<(), SkinToneError> {
        for step in &self.steps {
            if !step.min_brightness.is_finite() {
                return Err(SkinToneError::InvalidConfig(format!(
                    "tone threshold for {} is not finite",
                    step.label
                )));
            }
        }
        for pair in self.steps.windows(2) {
            if pair[1].min_brightness >= pair[0].min_brightness {
                return Err(SkinToneError::InvalidConfig(format!(
                    "tone thresholds must descend: {} ({}) is not below {} ({})",
                    pair[1].label, pair[1].min_brightness, pair[0].label, pair[0].min_brightness
                )));
            }
        }
        Ok(())
    }

    /// Map a perceptual brightness value to its label.
    pub fn classify_brightness(&self, brightness: f64) -> ToneLabel {
        self.steps
            .iter()
            .find(|step| brightness >= step.min_brightness)
            .map(|step| step.label)
            .unwrap_or(self.floor)
    }

    /// Map a colour to its label using its perceptual brightness.
    pub fn classify(&self, sample: &ColorSample) -> ToneLabel {
        self.classify_brightness(sample.brightness())
    }
}

/// Classify a colour with the default ladder.
pub fn classify(sample: &ColorSample) -> ToneLabel {
    ToneLadder::default().classify(sample)
}
