//! Inference adapter: feature vector in, verdict out.

use crate::config::AppConfig;
use crate::error::FormError;
use crate::feature_extractor::{FeatureExtractor, FeatureVector};
use crate::forms::FormKind;
use crate::models::classifier::Classifier;
use crate::models::loader::ModelLoader;
use crate::types::prediction::Prediction;
use crate::types::submission::FormSubmission;
use crate::types::verdict::Verdict;
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info};

/// Result of one submission's inference
#[derive(Debug, Clone)]
pub struct PredictionResult {
    /// Model input that produced this result
    pub features: FeatureVector,
    /// Raw classifier output
    pub prediction: Prediction,
    /// Display mapping of the prediction
    pub verdict: Verdict,
}

/// Runs one form's classifier. Built once at startup, then shared read-only.
pub struct InferenceEngine {
    form: FormKind,
    extractor: FeatureExtractor,
    classifier: Arc<dyn Classifier>,
}

impl InferenceEngine {
    /// Create an inference engine from configuration, loading the model artifact.
    pub fn new(config: &AppConfig) -> Result<Self> {
        let loader = ModelLoader::with_threads(config.model.onnx_threads)?;
        let classifier = loader.load_model(&config.model.path, &config.app.to_string())?;

        info!(
            form = %config.app,
            probabilities = classifier.has_probabilities(),
            "Inference engine initialized"
        );

        Ok(Self::with_classifier(config.app, Arc::new(classifier)))
    }

    /// Create an inference engine around an already-built classifier
    pub fn with_classifier(form: FormKind, classifier: Arc<dyn Classifier>) -> Self {
        Self {
            form,
            extractor: FeatureExtractor::new(form),
            classifier,
        }
    }

    pub fn form(&self) -> FormKind {
        self.form
    }

    pub fn model_name(&self) -> &str {
        self.classifier.name()
    }

    /// Get the number of features the form feeds the model
    pub fn feature_count(&self) -> usize {
        self.extractor.feature_count()
    }

    /// Parse and bounds-check a submission into the model's feature vector
    pub fn extract(&self, submission: &FormSubmission) -> Result<FeatureVector, FormError> {
        self.extractor.extract(submission)
    }

    /// Run the classifier on a feature vector.
    ///
    /// Classifier errors are returned unchanged. A model without probability
    /// estimates yields probability 0.0.
    pub fn predict(&self, features: &FeatureVector) -> Result<PredictionResult> {
        let (label, probabilities) = self.classifier.predict_with_proba(features)?;

        let probability = match probabilities {
            Some([_, positive]) => Some(positive),
            None => {
                debug!(model = %self.classifier.name(), "Model has no probability estimates");
                None
            }
        };

        let prediction = Prediction::new(label, probability);
        let verdict = self.form.verdicts().verdict(&prediction);

        debug!(
            model = %self.classifier.name(),
            label = %label,
            probability = prediction.positive_probability(),
            percentage = verdict.percentage,
            "Inference complete"
        );

        Ok(PredictionResult {
            features: features.clone(),
            prediction,
            verdict,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::prediction::Label;
    use crate::types::verdict::Tone;
    use anyhow::bail;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Stub {
        label: Label,
        proba: Option<f64>,
    }

    impl Classifier for Stub {
        fn name(&self) -> &str {
            "stub"
        }

        fn predict(&self, _features: &FeatureVector) -> Result<Label> {
            Ok(self.label)
        }

        fn predict_proba(&self, _features: &FeatureVector) -> Result<Option<[f64; 2]>> {
            Ok(self.proba.map(|p| [1.0 - p, p]))
        }
    }

    struct DimensionMismatch;

    impl Classifier for DimensionMismatch {
        fn name(&self) -> &str {
            "broken"
        }

        fn predict(&self, features: &FeatureVector) -> Result<Label> {
            bail!("expected 3 features, got {}", features.len())
        }
    }

    /// Answers only through the combined call
    struct SingleEvaluation {
        evaluations: AtomicUsize,
    }

    impl Classifier for SingleEvaluation {
        fn name(&self) -> &str {
            "single"
        }

        fn predict(&self, _features: &FeatureVector) -> Result<Label> {
            bail!("separate predict call")
        }

        fn predict_proba(&self, _features: &FeatureVector) -> Result<Option<[f64; 2]>> {
            bail!("separate predict_proba call")
        }

        fn predict_with_proba(
            &self,
            _features: &FeatureVector,
        ) -> Result<(Label, Option<[f64; 2]>)> {
            self.evaluations.fetch_add(1, Ordering::SeqCst);
            Ok((Label::Positive, Some([0.25, 0.75])))
        }
    }

    fn engine(form: FormKind, label: Label, proba: Option<f64>) -> InferenceEngine {
        InferenceEngine::with_classifier(form, Arc::new(Stub { label, proba }))
    }

    #[test]
    fn test_diabetes_positive() {
        let engine = engine(FormKind::Diabetes, Label::Positive, Some(0.83));
        let features = engine.extract(&FormSubmission::new()).unwrap();
        let result = engine.predict(&features).unwrap();

        assert_eq!(result.verdict.text, "High Risk: Likely Diabetic");
        assert_eq!(result.verdict.tone, Tone::Alert);
        assert_eq!(result.verdict.percentage, 83);
        assert_eq!(result.features.len(), 8);
    }

    #[test]
    fn test_diabetes_negative() {
        let engine = engine(FormKind::Diabetes, Label::Negative, Some(0.12));
        let features = engine.extract(&FormSubmission::new()).unwrap();
        let result = engine.predict(&features).unwrap();

        assert_eq!(result.verdict.text, "Low Risk: Unlikely Diabetic");
        assert_eq!(result.verdict.tone, Tone::Info);
        assert_eq!(result.verdict.percentage, 12);
    }

    #[test]
    fn test_placement_positive() {
        let engine = engine(FormKind::Placement, Label::Positive, Some(0.5));
        let features = engine.extract(&FormSubmission::new()).unwrap();
        let result = engine.predict(&features).unwrap();

        assert_eq!(result.verdict.text, "Will be Placed");
        assert_eq!(result.verdict.tone, Tone::Info);
        assert_eq!(result.verdict.percentage, 50);
        assert_eq!(result.features.len(), 2);
    }

    #[test]
    fn test_placement_negative() {
        let engine = engine(FormKind::Placement, Label::Negative, Some(0.3));
        let features = engine.extract(&FormSubmission::new()).unwrap();
        let result = engine.predict(&features).unwrap();

        assert_eq!(result.verdict.text, "Not Likely to be Placed");
        assert_eq!(result.verdict.tone, Tone::Alert);
    }

    #[test]
    fn test_missing_probabilities_yield_zero_percent() {
        for form in [FormKind::Diabetes, FormKind::Placement] {
            for label in [Label::Positive, Label::Negative] {
                let engine = engine(form, label, None);
                let features = engine.extract(&FormSubmission::new()).unwrap();
                let result = engine.predict(&features).unwrap();

                assert_eq!(result.prediction.probability, None);
                assert_eq!(result.verdict.percentage, 0);
            }
        }
    }

    #[test]
    fn test_classifier_errors_propagate() {
        let engine =
            InferenceEngine::with_classifier(FormKind::Placement, Arc::new(DimensionMismatch));
        let features = engine.extract(&FormSubmission::new()).unwrap();

        let err = engine.predict(&features).unwrap_err();
        assert!(err.to_string().contains("expected 3 features"));
    }

    #[test]
    fn test_one_evaluation_per_submission() {
        let model = Arc::new(SingleEvaluation {
            evaluations: AtomicUsize::new(0),
        });
        let engine = InferenceEngine::with_classifier(FormKind::Diabetes, model.clone());
        let features = engine.extract(&FormSubmission::new()).unwrap();

        let result = engine.predict(&features).unwrap();
        assert_eq!(result.verdict.percentage, 75);
        assert_eq!(model.evaluations.load(Ordering::SeqCst), 1);
    }
}
