//! Raw form submission as posted by the browser

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Field key → raw text value, exactly as submitted.
///
/// Values are parsed and bounds-checked by the
/// [`FeatureExtractor`](crate::feature_extractor::FeatureExtractor); this type
/// only carries them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormSubmission {
    values: HashMap<String, String>,
}

impl FormSubmission {
    /// Create an empty submission (every field untouched)
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field value
    pub fn with_value(mut self, key: &str, value: impl Into<String>) -> Self {
        self.values.insert(key.to_string(), value.into());
        self
    }

    /// Trimmed value for a field, `None` when absent or blank
    pub fn value(&self, key: &str) -> Option<&str> {
        self.values
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// Number of submitted keys, including unknown ones
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormSubmission {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
