//! Classifier - binds a loaded model to the feature layout
//!
//! A classifier is created once at startup and shared by every request.
//! Each call checks that the vector carries the layout the model was bound
//! to, scores it, and validates that the model produced a proper two-class
//! distribution. A failing call leaves no trace in shared state.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::PROBABILITY_SUM_TOLERANCE;
use crate::logic::features::{
    layout_hash, FeatureVector, LayoutMismatchError, FEATURE_COUNT, FEATURE_VERSION,
};

use super::inference::{InferenceError, Label, PhishingModel};
use super::manifest::LoadError;

// ============================================================================
// RESULT
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassProbabilities {
    pub legitimate: f64,
    pub phishing: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub label: Label,
    pub probabilities: ClassProbabilities,
}

impl ClassificationResult {
    /// Higher of the two class probabilities
    pub fn confidence(&self) -> f64 {
        self.probabilities.legitimate.max(self.probabilities.phishing)
    }
}

// ============================================================================
// ERRORS
// ============================================================================

/// Per-call classification failure
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClassifyError {
    #[error(transparent)]
    LayoutMismatch(#[from] LayoutMismatchError),

    #[error("model expects {expected} features, vector has {actual}")]
    FeatureCount { expected: usize, actual: usize },

    #[error(transparent)]
    Inference(#[from] InferenceError),

    #[error("model returned an invalid distribution: {0}")]
    InvalidOutput(String),
}

// ============================================================================
// MODEL INFO
// ============================================================================

/// Model status for status endpoints and logs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    pub name: String,
    pub backend: String,
    pub feature_version: u8,
    pub layout_hash: u32,
    pub feature_count: usize,
    pub loaded_at: DateTime<Utc>,
    pub inference_count: u64,
    pub avg_latency_us: f64,
}

// ============================================================================
// CLASSIFIER
// ============================================================================

pub struct Classifier {
    model: Arc<dyn PhishingModel>,
    feature_version: u8,
    layout_hash: u32,
    loaded_at: DateTime<Utc>,
    inference_count: AtomicU64,
    latency_sum_us: AtomicU64,
}

impl std::fmt::Debug for Classifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Classifier")
            .field("model", &self.model.name())
            .field("backend", &self.model.backend())
            .field("feature_version", &self.feature_version)
            .field("layout_hash", &format_args!("{:08x}", self.layout_hash))
            .finish()
    }
}

impl Classifier {
    /// Bind a model to the current feature layout.
    ///
    /// Callers loading from a manifest must have validated its layout tag
    /// already; this only checks the input width.
    pub fn new(model: Arc<dyn PhishingModel>) -> Result<Self, LoadError> {
        if model.feature_count() != FEATURE_COUNT {
            return Err(LoadError::FeatureCount {
                expected: FEATURE_COUNT,
                actual: model.feature_count(),
            });
        }

        log::info!(
            "Classifier ready: model={} backend={} layout=v{} ({:08x})",
            model.name(),
            model.backend(),
            FEATURE_VERSION,
            layout_hash()
        );

        Ok(Self {
            model,
            feature_version: FEATURE_VERSION,
            layout_hash: layout_hash(),
            loaded_at: Utc::now(),
            inference_count: AtomicU64::new(0),
            latency_sum_us: AtomicU64::new(0),
        })
    }

    pub fn classify(&self, vector: &FeatureVector) -> Result<ClassificationResult, ClassifyError> {
        if vector.version != self.feature_version || vector.layout_hash != self.layout_hash {
            let err = LayoutMismatchError {
                expected_version: self.feature_version,
                expected_hash: self.layout_hash,
                actual_version: vector.version,
                actual_hash: vector.layout_hash,
            };
            log::warn!("Rejected feature vector: {}", err);
            return Err(err.into());
        }

        let expected = self.model.feature_count();
        if vector.len() != expected {
            return Err(ClassifyError::FeatureCount {
                expected,
                actual: vector.len(),
            });
        }

        let start_time = Instant::now();
        let prediction = self.model.predict(vector.as_slice())?;
        let probabilities = validate_distribution(prediction.probabilities)?;

        self.latency_sum_us
            .fetch_add(start_time.elapsed().as_micros() as u64, Ordering::Relaxed);
        self.inference_count.fetch_add(1, Ordering::Relaxed);

        Ok(ClassificationResult {
            label: prediction.label,
            probabilities,
        })
    }

    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    pub fn info(&self) -> ModelInfo {
        let count = self.inference_count.load(Ordering::Relaxed);
        let sum = self.latency_sum_us.load(Ordering::Relaxed);

        ModelInfo {
            name: self.model.name().to_string(),
            backend: self.model.backend().to_string(),
            feature_version: self.feature_version,
            layout_hash: self.layout_hash,
            feature_count: self.model.feature_count(),
            loaded_at: self.loaded_at,
            inference_count: count,
            avg_latency_us: if count > 0 { sum as f64 / count as f64 } else { 0.0 },
        }
    }
}

/// Reject anything that is not a two-class distribution, then renormalize
/// away the float drift that is left.
fn validate_distribution(raw: [f32; 2]) -> Result<ClassProbabilities, ClassifyError> {
    let [legitimate, phishing] = raw.map(f64::from);

    if !legitimate.is_finite() || !phishing.is_finite() {
        return Err(ClassifyError::InvalidOutput(format!("non-finite probabilities {raw:?}")));
    }
    if legitimate < -PROBABILITY_SUM_TOLERANCE || phishing < -PROBABILITY_SUM_TOLERANCE {
        return Err(ClassifyError::InvalidOutput(format!("negative probability {raw:?}")));
    }

    let sum = legitimate + phishing;
    if (sum - 1.0).abs() > PROBABILITY_SUM_TOLERANCE {
        return Err(ClassifyError::InvalidOutput(format!(
            "probabilities sum to {sum:.6}"
        )));
    }

    let legitimate = legitimate.max(0.0) / sum;
    Ok(ClassProbabilities {
        legitimate,
        phishing: 1.0 - legitimate,
    })
}

// ============================================================================
// TESTS
// ============================================================================
