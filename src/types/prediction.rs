//! Classifier output data structures

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Discrete class predicted by a binary classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    /// Class 0
    Negative,
    /// Class 1
    Positive,
}

impl Label {
    /// Map a raw class index to a label. Only 0 and 1 are valid.
    pub fn from_class(class: i64) -> Result<Self> {
        match class {
            0 => Ok(Label::Negative),
            1 => Ok(Label::Positive),
            other => bail!("classifier returned class {} outside the binary range", other),
        }
    }

    /// Raw class index
    pub fn class(self) -> u8 {
        match self {
            Label::Negative => 0,
            Label::Positive => 1,
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.class())
    }
}

/// Result of a single inference call
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Predicted class
    pub label: Label,
    /// Probability of the positive class, when the model exposes one
    pub probability: Option<f64>,
}

impl Prediction {
    pub fn new(label: Label, probability: Option<f64>) -> Self {
        Self { label, probability }
    }

    /// Positive-class probability, 0.0 when the model has no probability estimates
    pub fn positive_probability(&self) -> f64 {
        self.probability.unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_from_class() {
        assert_eq!(Label::from_class(0).unwrap(), Label::Negative);
        assert_eq!(Label::from_class(1).unwrap(), Label::Positive);
        assert!(Label::from_class(2).is_err());
        assert!(Label::from_class(-1).is_err());
    }

    #[test]
    fn test_missing_probability_defaults_to_zero() {
        let prediction = Prediction::new(Label::Positive, None);
        assert_eq!(prediction.positive_probability(), 0.0);

        let prediction = Prediction::new(Label::Negative, Some(0.27));
        assert_eq!(prediction.positive_probability(), 0.27);
    }

    #[test]
    fn test_prediction_serialization() {
        let prediction = Prediction::new(Label::Positive, Some(0.83));
        let json = serde_json::to_string(&prediction).unwrap();
        assert!(json.contains("\"positive\""));

        let deserialized: Prediction = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, prediction);
    }
}
