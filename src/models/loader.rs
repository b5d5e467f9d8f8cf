//! ONNX model loader

use crate::models::onnx::OnnxClassifier;
use anyhow::{ensure, Context, Result};
use ort::session::{builder::GraphOptimizationLevel, Session};
use std::path::Path;
use tracing::info;

/// Loader for ONNX classifier artifacts
pub struct ModelLoader {
    /// Number of threads for ONNX inference
    onnx_threads: usize,
}

impl ModelLoader {
    /// Create a new model loader with specified number of threads
    pub fn with_threads(onnx_threads: usize) -> Result<Self> {
        ort::init().commit()?;
        info!(onnx_threads = onnx_threads, "ONNX Runtime initialized");
        Ok(Self {
            onnx_threads: onnx_threads.max(1),
        })
    }

    /// Load a classifier from file.
    ///
    /// A missing or unreadable artifact is an error; callers treat it as fatal.
    pub fn load_model<P: AsRef<Path>>(&self, path: P, name: &str) -> Result<OnnxClassifier> {
        let path = path.as_ref();

        ensure!(
            path.is_file(),
            "model artifact {} not found",
            path.display()
        );

        info!(model = %name, path = %path.display(), threads = self.onnx_threads, "Loading ONNX model");

        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .with_intra_threads(self.onnx_threads)?
            .commit_from_file(path)
            .with_context(|| format!("Failed to load model from {}", path.display()))?;

        let input_name = session
            .inputs
            .first()
            .map(|i| i.name.clone())
            .unwrap_or_else(|| "float_input".to_string());

        let output_names: Vec<String> = session.outputs.iter().map(|o| o.name.clone()).collect();
        let (label_output, probability_output) = resolve_outputs(&output_names)
            .with_context(|| format!("Model {} declares no outputs", path.display()))?;

        info!(
            model = %name,
            input = %input_name,
            label_output = %label_output,
            probability_output = ?probability_output,
            "Model loaded successfully"
        );

        Ok(OnnxClassifier::new(
            name,
            session,
            input_name,
            label_output,
            probability_output,
        ))
    }
}

impl Default for ModelLoader {
    fn default() -> Self {
        Self { onnx_threads: 1 }
    }
}

/// Pick the label output and, if present, the probability output.
///
/// Classifier exports name these `output_label` / `output_probability` (or
/// `label` / `probabilities`). When nothing is named like a label the first
/// output is taken as the label.
fn resolve_outputs(names: &[String]) -> Option<(String, Option<String>)> {
    let label = names
        .iter()
        .find(|n| n.contains("label"))
        .or_else(|| names.first())?
        .clone();

    let probability = names
        .iter()
        .find(|n| n.contains("prob") && **n != label)
        .cloned();

    Some((label, probability))
}
