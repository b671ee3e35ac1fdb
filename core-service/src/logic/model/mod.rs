//! Model Module - Classification Engine
//!
//! Separates scoring from feature extraction so the model family can be
//! swapped without touching the pipeline.

pub mod classifier;
pub mod inference;
pub mod linear;
pub mod manifest;
#[cfg(feature = "onnx")]
pub mod onnx;

// Re-export common types
pub use classifier::{ClassProbabilities, ClassificationResult, Classifier, ClassifyError, ModelInfo};
pub use inference::{InferenceError, Label, PhishingModel, Prediction};
pub use linear::{LinearModel, NormalizationParams};
pub use manifest::{load, ModelBackend, LoadError, ModelManifest, OnnxBackend};
