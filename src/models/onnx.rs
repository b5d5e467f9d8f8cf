//! ONNX Runtime backed classifier

use crate::feature_extractor::FeatureVector;
use crate::models::classifier::Classifier;
use crate::types::prediction::Label;
use anyhow::{anyhow, Context, Result};
use ort::memory::Allocator;
use ort::session::{Session, SessionOutputs};
use ort::value::{DowncastableTarget, DynMapValueType, DynSequenceValueType, DynValue, Tensor};
use std::sync::Mutex;
use tracing::debug;

/// Classifier loaded from an ONNX export.
///
/// A session run needs exclusive access, so runs are serialized behind a
/// mutex. The classifier itself is shared immutably.
#[derive(Debug)]
pub struct OnnxClassifier {
    name: String,
    session: Mutex<Session>,
    input_name: String,
    label_output: String,
    probability_output: Option<String>,
}

impl OnnxClassifier {
    pub(crate) fn new(
        name: &str,
        session: Session,
        input_name: String,
        label_output: String,
        probability_output: Option<String>,
    ) -> Self {
        Self {
            name: name.to_string(),
            session: Mutex::new(session),
            input_name,
            label_output,
            probability_output,
        }
    }

    /// Whether the artifact exposes class probabilities
    pub fn has_probabilities(&self) -> bool {
        self.probability_output.is_some()
    }

    /// Run the session on one row and hand the outputs to `extract`
    fn run<T>(
        &self,
        features: &FeatureVector,
        extract: impl FnOnce(&SessionOutputs) -> Result<T>,
    ) -> Result<T> {
        // Prepare input tensor - shape [1, num_features]
        let shape = vec![1_i64, features.len() as i64];
        let input_tensor = Tensor::from_array((shape, features.as_slice().to_vec()))
            .context("Failed to create input tensor")?;

        let mut session = self
            .session
            .lock()
            .map_err(|e| anyhow!("Lock error: {}", e))?;

        let outputs = session
            .run(ort::inputs![&self.input_name => input_tensor])
            .with_context(|| format!("Model {} rejected the feature vector", self.name))?;

        extract(&outputs)
    }
}

impl Classifier for OnnxClassifier {
    fn name(&self) -> &str {
        &self.name
    }

    fn predict(&self, features: &FeatureVector) -> Result<Label> {
        let class = self.run(features, |outputs| self.read_class(outputs))?;

        debug!(model = %self.name, class = class, "Extracted label");
        Label::from_class(class)
    }

    fn predict_proba(&self, features: &FeatureVector) -> Result<Option<[f64; 2]>> {
        if self.probability_output.is_none() {
            return Ok(None);
        }

        let probabilities = self.run(features, |outputs| self.read_probabilities(outputs))?;

        debug!(model = %self.name, probabilities = ?probabilities, "Extracted probabilities");
        Ok(probabilities)
    }

    /// One session run for both outputs
    fn predict_with_proba(&self, features: &FeatureVector) -> Result<(Label, Option<[f64; 2]>)> {
        let (class, probabilities) = self.run(features, |outputs| {
            Ok((self.read_class(outputs)?, self.read_probabilities(outputs)?))
        })?;

        debug!(
            model = %self.name,
            class = class,
            probabilities = ?probabilities,
            "Extracted label and probabilities"
        );
        Ok((Label::from_class(class)?, probabilities))
    }
}

impl OnnxClassifier {
    fn read_class(&self, outputs: &SessionOutputs) -> Result<i64> {
        let output = outputs
            .get(self.label_output.as_str())
            .ok_or_else(|| anyhow!("Output {} missing from model", self.label_output))?;
        extract_class(output)
    }

    fn read_probabilities(&self, outputs: &SessionOutputs) -> Result<Option<[f64; 2]>> {
        let Some(output_name) = self.probability_output.as_deref() else {
            return Ok(None);
        };

        let output = outputs
            .get(output_name)
            .ok_or_else(|| anyhow!("Output {} missing from model", output_name))?;
        extract_probabilities(output).map(Some)
    }
}

/// Read the predicted class from a label tensor (int64, or float for some exporters)
fn extract_class(output: &DynValue) -> Result<i64> {
    if let Ok((_, data)) = output.try_extract_tensor::<i64>() {
        return data
            .first()
            .copied()
            .ok_or_else(|| anyhow!("Empty label tensor"));
    }

    if let Ok((_, data)) = output.try_extract_tensor::<f32>() {
        return data
            .first()
            .map(|&v| v.round() as i64)
            .ok_or_else(|| anyhow!("Empty label tensor"));
    }

    Err(anyhow!("Label output is not a numeric tensor"))
}

/// Read `[p_class0, p_class1]` from a probability output.
///
/// Handles plain tensors and the seq(map(int64, float)) layout emitted by
/// scikit-learn exports with ZipMap.
fn extract_probabilities(output: &DynValue) -> Result<[f64; 2]> {
    if let Ok((shape, data)) = output.try_extract_tensor::<f32>() {
        let dims: Vec<i64> = shape.iter().copied().collect();
        return probabilities_from_tensor(&dims, data)
            .ok_or_else(|| anyhow!("Unexpected probability tensor shape {:?}", dims));
    }

    let dtype = output.dtype();
    if DynSequenceValueType::can_downcast(&dtype) {
        return extract_from_sequence_map(output);
    }

    Err(anyhow!("Probability output has an unsupported type"))
}

fn extract_from_sequence_map(output: &DynValue) -> Result<[f64; 2]> {
    let allocator = Allocator::default();

    let sequence = output
        .downcast_ref::<DynSequenceValueType>()
        .map_err(|e| anyhow!("Failed to downcast to sequence: {}", e))?;

    let maps = sequence.try_extract_sequence::<DynMapValueType>(&allocator)?;

    // Single-row input, so only the first map matters
    let map_value = maps.first().ok_or_else(|| anyhow!("Empty sequence"))?;
    let kv_pairs = map_value.try_extract_key_values::<i64, f32>()?;

    probabilities_from_pairs(&kv_pairs).ok_or_else(|| anyhow!("No probability found in map"))
}

/// `[batch, classes]`, `[classes]`, or a single positive-class probability
fn probabilities_from_tensor(dims: &[i64], data: &[f32]) -> Option<[f64; 2]> {
    let classes = *dims.last()?;
    match classes {
        c if c >= 2 && data.len() >= 2 => Some([data[0] as f64, data[1] as f64]),
        1 => data.first().map(|&p| [1.0 - p as f64, p as f64]),
        _ => None,
    }
}

fn probabilities_from_pairs(pairs: &[(i64, f32)]) -> Option<[f64; 2]> {
    let lookup = |class: i64| {
        pairs
            .iter()
            .find(|(c, _)| *c == class)
            .map(|(_, p)| *p as f64)
    };

    match (lookup(0), lookup(1)) {
        (Some(p0), Some(p1)) => Some([p0, p1]),
        (None, Some(p1)) => Some([1.0 - p1, p1]),
        (Some(p0), None) => Some([p0, 1.0 - p0]),
        (None, None) => None,
    }
}
