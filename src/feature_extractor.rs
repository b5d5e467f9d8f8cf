//! Feature extraction for classifier inference.
//!
//! Turns a raw form submission into the single-row numeric vector the trained
//! model expects. Features are emitted in the exact order of the form's field
//! table, which is the order the model was trained on.

use crate::error::FormError;
use crate::forms::{FormKind, NumericField};
use crate::types::submission::FormSubmission;

/// Ordered model input for one submission
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    form: FormKind,
    values: Vec<f32>,
}

impl FeatureVector {
    /// Build a vector directly, bypassing form parsing
    pub fn new(form: FormKind, values: Vec<f32>) -> Self {
        Self { form, values }
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// (field key, value) pairs in feature order
    pub fn named(&self) -> impl Iterator<Item = (&'static str, f32)> + '_ {
        self.form
            .fields()
            .iter()
            .map(|f| f.key)
            .zip(self.values.iter().copied())
    }
}

/// Feature extractor that transforms form submissions into model input features.
pub struct FeatureExtractor {
    form: FormKind,
}

impl FeatureExtractor {
    /// Create an extractor for one form.
    pub fn new(form: FormKind) -> Self {
        Self { form }
    }

    /// Extract features from a submission.
    ///
    /// Untouched fields default to 0. Unknown keys are ignored. Any value that
    /// does not parse, is not finite, falls outside the field's bounds or off
    /// its step grid rejects the whole submission.
    pub fn extract(&self, submission: &FormSubmission) -> Result<FeatureVector, FormError> {
        let fields = self.form.fields();
        let mut features = Vec::with_capacity(fields.len());

        for field in fields {
            features.push(parse_field(field, submission.value(field.key))?);
        }

        Ok(FeatureVector {
            form: self.form,
            values: features,
        })
    }

    /// Get the number of features produced.
    pub fn feature_count(&self) -> usize {
        self.form.fields().len()
    }

    /// Get feature names in model order.
    pub fn feature_names(&self) -> Vec<&'static str> {
        self.form.fields().iter().map(|f| f.key).collect()
    }
}

fn parse_field(field: &NumericField, raw: Option<&str>) -> Result<f32, FormError> {
    let Some(raw) = raw else {
        return Ok(0.0);
    };

    let value: f64 = raw.parse().map_err(|_| FormError::NotANumber {
        label: field.label,
        value: raw.to_string(),
    })?;

    if !field.accepts(value) {
        return Err(FormError::out_of_range(field, value));
    }

    if !field.on_step(value) {
        return Err(FormError::off_step(field, value));
    }

    Ok(value as f32)
}
