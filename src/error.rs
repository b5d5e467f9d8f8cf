//! Error types for form handling

use crate::forms::NumericField;
use thiserror::Error;

/// Rejected form input. Raised before the classifier is called.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormError {
    #[error("{label} must be a number, got {value:?}")]
    NotANumber { label: &'static str, value: String },

    #[error("{label} must be {bounds}, got {value}")]
    OutOfRange {
        label: &'static str,
        bounds: String,
        value: f64,
    },

    #[error("{label} must be a multiple of {step}, got {value}")]
    OffStep {
        label: &'static str,
        step: f64,
        value: f64,
    },
}

impl FormError {
    pub(crate) fn out_of_range(field: &NumericField, value: f64) -> Self {
        let bounds = match field.max {
            Some(max) => format!("between {} and {}", field.min, max),
            None if value.abs() > f32::MAX as f64 => format!("at most {:e}", f32::MAX),
            None => format!("at least {}", field.min),
        };
        FormError::OutOfRange {
            label: field.label,
            bounds,
            value,
        }
    }

    pub(crate) fn off_step(field: &NumericField, value: f64) -> Self {
        FormError::OffStep {
            label: field.label,
            step: field.step.unwrap_or(1.0),
            value,
        }
    }

    /// Label of the offending field
    pub fn field_label(&self) -> &'static str {
        match self {
            FormError::NotANumber { label, .. }
            | FormError::OutOfRange { label, .. }
            | FormError::OffStep { label, .. } => label,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::FormKind;

    #[test]
    fn test_out_of_range_message() {
        let cgpa = &FormKind::Placement.fields()[0];
        let err = FormError::out_of_range(cgpa, 11.0);
        assert_eq!(err.to_string(), "CGPA must be between 0 and 10, got 11");
        assert_eq!(err.field_label(), "CGPA");

        let bmi = &FormKind::Diabetes.fields()[2];
        let err = FormError::out_of_range(bmi, -3.5);
        assert_eq!(err.to_string(), "BMI must be at least 0, got -3.5");

        let err = FormError::out_of_range(bmi, 1e39);
        assert!(err.to_string().starts_with("BMI must be at most 3.4028235e38"));
    }

    #[test]
    fn test_off_step_message() {
        let age = &FormKind::Diabetes.fields()[4];
        let err = FormError::off_step(age, 50.5);
        assert_eq!(err.to_string(), "Age must be a multiple of 1, got 50.5");
    }

    #[test]
    fn test_not_a_number_message() {
        let err = FormError::NotANumber {
            label: "IQ",
            value: "abc".to_string(),
        };
        assert_eq!(err.to_string(), "IQ must be a number, got \"abc\"");
    }
}
