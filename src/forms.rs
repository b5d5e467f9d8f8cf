//! Form definitions: which fields each application collects, in which order,
//! and how its verdicts read.

use crate::types::verdict::{Tone, VerdictEntry, VerdictTable};
use serde::Deserialize;
use std::fmt;

/// Which application a process serves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FormKind {
    /// Diabetes risk from eight clinical features
    #[default]
    Diabetes,
    /// Campus placement from CGPA and IQ
    Placement,
}

/// One numeric input control
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericField {
    /// Form key, also the HTML input name
    pub key: &'static str,
    /// Human-readable label
    pub label: &'static str,
    pub min: f64,
    pub max: Option<f64>,
    pub step: Option<f64>,
    /// Decimal places shown in the input
    pub precision: usize,
}

impl NumericField {
    const fn bounded_below(key: &'static str, label: &'static str, precision: usize) -> Self {
        Self {
            key,
            label,
            min: 0.0,
            max: None,
            step: None,
            precision,
        }
    }

    /// Whether a value satisfies this field's bounds.
    ///
    /// Values beyond `f32` range are rejected: the model input is single precision.
    pub fn accepts(&self, value: f64) -> bool {
        value.is_finite()
            && value.abs() <= f32::MAX as f64
            && value >= self.min
            && self.max.map_or(true, |max| value <= max)
    }

    /// Whether a value lies on the field's step grid, counted from `min`
    pub fn on_step(&self, value: f64) -> bool {
        match self.step {
            Some(step) => {
                let steps = (value - self.min) / step;
                (steps - steps.round()).abs() < 1e-6
            }
            None => true,
        }
    }

    /// HTML `step` attribute; derived from precision when no explicit step is set
    pub fn html_step(&self) -> String {
        match self.step {
            Some(step) => format_number(step, self.precision),
            None if self.precision == 0 => "1".to_string(),
            None => format!("0.{}1", "0".repeat(self.precision - 1)),
        }
    }
}

/// Feature order the diabetes model was trained on
const DIABETES_FIELDS: [NumericField; 8] = [
    NumericField::bounded_below("glucose_bmi", "Glucose × BMI Interaction", 2),
    NumericField::bounded_below("glucose", "Glucose", 2),
    NumericField::bounded_below("bmi", "BMI", 2),
    NumericField::bounded_below("bmi_dpf", "BMI × DiabetesPedigreeFunction", 2),
    NumericField {
        key: "age",
        label: "Age",
        min: 0.0,
        max: None,
        step: Some(1.0),
        precision: 0,
    },
    NumericField::bounded_below("preg_age", "Pregnancies × Age Interaction", 2),
    NumericField::bounded_below("dpf", "Diabetes Pedigree Function", 3),
    NumericField::bounded_below("blood_pressure", "Blood Pressure", 2),
];

/// Feature order the placement model was trained on
const PLACEMENT_FIELDS: [NumericField; 2] = [
    NumericField {
        key: "cgpa",
        label: "CGPA",
        min: 0.0,
        max: Some(10.0),
        step: Some(0.01),
        precision: 2,
    },
    NumericField {
        key: "iq",
        label: "IQ",
        min: 0.0,
        max: Some(200.0),
        step: Some(1.0),
        precision: 0,
    },
];

const DIABETES_VERDICTS: VerdictTable = VerdictTable::new(
    VerdictEntry {
        text: "High Risk: Likely Diabetic",
        tone: Tone::Alert,
    },
    VerdictEntry {
        text: "Low Risk: Unlikely Diabetic",
        tone: Tone::Info,
    },
);

const PLACEMENT_VERDICTS: VerdictTable = VerdictTable::new(
    VerdictEntry {
        text: "Will be Placed",
        tone: Tone::Info,
    },
    VerdictEntry {
        text: "Not Likely to be Placed",
        tone: Tone::Alert,
    },
);

impl FormKind {
    /// Fields in model feature order
    pub fn fields(self) -> &'static [NumericField] {
        match self {
            FormKind::Diabetes => &DIABETES_FIELDS,
            FormKind::Placement => &PLACEMENT_FIELDS,
        }
    }

    pub fn verdicts(self) -> &'static VerdictTable {
        match self {
            FormKind::Diabetes => &DIABETES_VERDICTS,
            FormKind::Placement => &PLACEMENT_VERDICTS,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            FormKind::Diabetes => "Diabetes Predictor",
            FormKind::Placement => "Placement Predictor",
        }
    }

    pub fn tagline(self) -> &'static str {
        match self {
            FormKind::Diabetes => "Enter patient details to predict the likelihood of diabetes.",
            FormKind::Placement => "Enter student details to predict the likelihood of placement.",
        }
    }

    /// Default location of the trained model artifact
    pub fn default_model_path(self) -> &'static str {
        match self {
            FormKind::Diabetes => "models/diabetes.onnx",
            FormKind::Placement => "models/placements.onnx",
        }
    }
}

impl fmt::Display for FormKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormKind::Diabetes => write!(f, "diabetes"),
            FormKind::Placement => write!(f, "placement"),
        }
    }
}

/// Render a number with a fixed number of decimals
pub fn format_number(value: f64, precision: usize) -> String {
    format!("{:.*}", precision, value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_counts() {
        assert_eq!(FormKind::Diabetes.fields().len(), 8);
        assert_eq!(FormKind::Placement.fields().len(), 2);
    }

    #[test]
    fn test_field_keys_unique() {
        for kind in [FormKind::Diabetes, FormKind::Placement] {
            let mut keys: Vec<_> = kind.fields().iter().map(|f| f.key).collect();
            keys.sort_unstable();
            keys.dedup();
            assert_eq!(keys.len(), kind.fields().len(), "duplicate key in {}", kind);
        }
    }

    #[test]
    fn test_bounds() {
        let cgpa = &FormKind::Placement.fields()[0];
        assert!(cgpa.accepts(0.0));
        assert!(cgpa.accepts(10.0));
        assert!(!cgpa.accepts(10.01));
        assert!(!cgpa.accepts(-0.1));
        assert!(!cgpa.accepts(f64::NAN));

        let glucose = &FormKind::Diabetes.fields()[1];
        assert!(glucose.accepts(1e6));
        assert!(!glucose.accepts(-1.0));
        assert!(!glucose.accepts(f64::INFINITY));
        assert!(!glucose.accepts(1e39));
        assert!(glucose.accepts(f32::MAX as f64));
    }

    #[test]
    fn test_step() {
        let age = &FormKind::Diabetes.fields()[4];
        assert!(age.on_step(50.0));
        assert!(!age.on_step(50.5));

        let cgpa = &FormKind::Placement.fields()[0];
        assert!(cgpa.on_step(8.12));
        assert!(cgpa.on_step(10.0));
        assert!(!cgpa.on_step(8.123));

        let bmi = &FormKind::Diabetes.fields()[2];
        assert!(bmi.on_step(33.6123));
    }

    #[test]
    fn test_html_step() {
        let fields = FormKind::Diabetes.fields();
        assert_eq!(fields[0].html_step(), "0.01");
        assert_eq!(fields[4].html_step(), "1");
        assert_eq!(fields[6].html_step(), "0.001");
        assert_eq!(FormKind::Placement.fields()[0].html_step(), "0.01");
    }

    #[test]
    fn test_default_model_paths() {
        assert_eq!(FormKind::Diabetes.default_model_path(), "models/diabetes.onnx");
        assert_eq!(FormKind::Placement.default_model_path(), "models/placements.onnx");
    }
}
