//! The seam between the form pipeline and a trained model.

use crate::feature_extractor::FeatureVector;
use crate::types::prediction::Label;
use anyhow::Result;

/// A pre-trained binary classifier.
///
/// Implementations are loaded once and shared read-only across requests, so
/// both methods take `&self`.
pub trait Classifier: Send + Sync {
    /// Model name for logging
    fn name(&self) -> &str;

    /// Predict the class of a single row.
    fn predict(&self, features: &FeatureVector) -> Result<Label>;

    /// Class probabilities `[p_class0, p_class1]` for a single row.
    ///
    /// Returns `Ok(None)` when the model does not expose probability estimates.
    fn predict_proba(&self, _features: &FeatureVector) -> Result<Option<[f64; 2]>> {
        Ok(None)
    }

    /// Label and probabilities together. Backends that produce both from a
    /// single evaluation override this.
    fn predict_with_proba(&self, features: &FeatureVector) -> Result<(Label, Option<[f64; 2]>)> {
        Ok((self.predict(features)?, self.predict_proba(features)?))
    }
}
