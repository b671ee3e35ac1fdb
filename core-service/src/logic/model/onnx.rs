//! ONNX backend - ONNX Runtime Integration
//!
//! Runs a classifier graph exported with a label output (int64, one per row)
//! and a probability output (float, `[rows, 2]`). Scikit-learn exports with
//! `zipmap=False` have exactly this shape.
//!
//! `Session::run` needs exclusive access, so calls are serialized on a mutex.

use std::path::Path;

use ndarray::Array2;
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Value;
use parking_lot::Mutex;

use super::inference::{InferenceError, Label, PhishingModel, Prediction};
use super::manifest::{LoadError, OnnxBackend};
use crate::logic::features::FEATURE_COUNT;

pub struct OnnxModel {
    name: String,
    session: Mutex<Session>,
    label_output: String,
    probability_output: String,
}

impl OnnxModel {
    /// Load ONNX model from file
    pub fn load(name: String, path: &Path, onnx: &OnnxBackend) -> Result<Self, LoadError> {
        log::info!("Loading ONNX model from: {}", path.display());

        if !path.exists() {
            return Err(LoadError::Backend(format!("Model not found: {}", path.display())));
        }

        let session = Session::builder()
            .map_err(|e| LoadError::Backend(format!("Failed to create session builder: {}", e)))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| LoadError::Backend(format!("Failed to set optimization: {}", e)))?
            .commit_from_file(path)
            .map_err(|e| LoadError::Backend(format!("Failed to load model: {}", e)))?;

        let outputs: Vec<String> = session.outputs.iter().map(|o| o.name.clone()).collect();
        let label_output = pick_output(&outputs, onnx.label_output.as_deref(), "label", 0)?;
        let probability_output =
            pick_output(&outputs, onnx.probability_output.as_deref(), "prob", 1)?;

        log::info!(
            "ONNX model loaded: label={} probabilities={}",
            label_output,
            probability_output
        );

        Ok(Self {
            name,
            session: Mutex::new(session),
            label_output,
            probability_output,
        })
    }

    fn run(&self, features: &[f32]) -> Result<Prediction, InferenceError> {
        if features.len() != FEATURE_COUNT {
            return Err(InferenceError(format!(
                "expected {} features, got {}",
                FEATURE_COUNT,
                features.len()
            )));
        }

        let input_array = Array2::<f32>::from_shape_vec((1, features.len()), features.to_vec())
            .map_err(|e| InferenceError(format!("Array error: {}", e)))?;
        let input_tensor = Value::from_array(input_array)
            .map_err(|e| InferenceError(format!("Tensor error: {}", e)))?;

        let mut session = self.session.lock();
        let outputs = session
            .run(ort::inputs![input_tensor])
            .map_err(|e| InferenceError(format!("Inference failed: {}", e)))?;

        let label_value = outputs
            .get(self.label_output.as_str())
            .ok_or_else(|| InferenceError(format!("No output {}", self.label_output)))?;
        let (_, labels) = label_value
            .try_extract_tensor::<i64>()
            .map_err(|e| InferenceError(format!("Extract label error: {}", e)))?;
        let class = *labels
            .first()
            .ok_or_else(|| InferenceError("Empty label output".to_string()))?;
        let label = Label::from_class_index(class)
            .ok_or_else(|| InferenceError(format!("Unknown class {}", class)))?;

        let prob_value = outputs
            .get(self.probability_output.as_str())
            .ok_or_else(|| InferenceError(format!("No output {}", self.probability_output)))?;
        let (_, probs) = prob_value
            .try_extract_tensor::<f32>()
            .map_err(|e| InferenceError(format!("Extract probability error: {}", e)))?;
        if probs.len() < 2 {
            return Err(InferenceError(format!(
                "Expected 2 class probabilities, got {}",
                probs.len()
            )));
        }

        Ok(Prediction {
            label,
            probabilities: [probs[0], probs[1]],
        })
    }
}

impl PhishingModel for OnnxModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn backend(&self) -> &'static str {
        "onnx"
    }

    fn feature_count(&self) -> usize {
        FEATURE_COUNT
    }

    fn predict_label(&self, features: &[f32]) -> Result<Label, InferenceError> {
        Ok(self.run(features)?.label)
    }

    fn predict_probabilities(&self, features: &[f32]) -> Result<[f32; 2], InferenceError> {
        Ok(self.run(features)?.probabilities)
    }

    fn predict(&self, features: &[f32]) -> Result<Prediction, InferenceError> {
        self.run(features)
    }
}

/// Explicit name if given, else the first output containing `hint`, else
/// the output at `fallback`.
fn pick_output(
    outputs: &[String],
    explicit: Option<&str>,
    hint: &str,
    fallback: usize,
) -> Result<String, LoadError> {
    if let Some(name) = explicit {
        return outputs
            .iter()
            .find(|o| o.as_str() == name)
            .cloned()
            .ok_or_else(|| LoadError::Backend(format!("Model has no output named {}", name)));
    }

    outputs
        .iter()
        .find(|o| o.to_lowercase().contains(hint))
        .or_else(|| outputs.get(fallback))
        .cloned()
        .ok_or_else(|| LoadError::Backend(format!("Model has no {} output", hint)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_pick_output_by_hint() {
        let outputs = names(&["output_label", "output_probability"]);
        assert_eq!(pick_output(&outputs, None, "label", 0).unwrap(), "output_label");
        assert_eq!(pick_output(&outputs, None, "prob", 1).unwrap(), "output_probability");
    }

    #[test]
    fn test_pick_output_fallback_and_explicit() {
        let outputs = names(&["y", "scores"]);
        assert_eq!(pick_output(&outputs, None, "prob", 1).unwrap(), "scores");
        assert_eq!(pick_output(&outputs, Some("y"), "label", 0).unwrap(), "y");
        assert!(pick_output(&outputs, Some("missing"), "label", 0).is_err());
        assert!(pick_output(&names(&["only"]), None, "prob", 1).is_err());
    }
}
