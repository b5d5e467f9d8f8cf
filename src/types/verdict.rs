//! Verdict display mapping shared by every form

use crate::types::prediction::{Label, Prediction};
use serde::{Deserialize, Serialize};

/// Color coding of a verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    /// Unfavourable outcome
    Alert,
    /// Favourable outcome
    Info,
}

impl Tone {
    /// CSS color used for the verdict line and the meter fill
    pub fn color(self) -> &'static str {
        match self {
            Tone::Alert => "#ef5350",
            Tone::Info => "#4dd0e1",
        }
    }
}

/// Text and tone for one label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerdictEntry {
    pub text: &'static str,
    pub tone: Tone,
}

/// Label → (text, tone) table for one form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerdictTable {
    pub positive: VerdictEntry,
    pub negative: VerdictEntry,
}

impl VerdictTable {
    pub const fn new(positive: VerdictEntry, negative: VerdictEntry) -> Self {
        Self { positive, negative }
    }

    /// Entry for a label
    pub fn entry(&self, label: Label) -> VerdictEntry {
        match label {
            Label::Positive => self.positive,
            Label::Negative => self.negative,
        }
    }

    /// Build the verdict for a prediction
    pub fn verdict(&self, prediction: &Prediction) -> Verdict {
        let entry = self.entry(prediction.label);
        Verdict {
            label: prediction.label,
            text: entry.text,
            tone: entry.tone,
            percentage: percentage(prediction.positive_probability()),
        }
    }
}

/// What the page shows after a submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verdict {
    pub label: Label,
    pub text: &'static str,
    pub tone: Tone,
    /// Positive-class probability as a whole percentage, 0..=100
    pub percentage: u8,
}

impl Verdict {
    pub fn color(&self) -> &'static str {
        self.tone.color()
    }
}

/// Convert a probability to a whole percentage.
///
/// Rounds half up on the `f64` value: 0.005 → 1, 0.004 → 0. Out-of-range and
/// NaN inputs are clamped to `[0, 1]` first (NaN → 0).
pub fn percentage(probability: f64) -> u8 {
    let p = if probability.is_nan() {
        0.0
    } else {
        probability.clamp(0.0, 1.0)
    };
    (p * 100.0).round() as u8
}
