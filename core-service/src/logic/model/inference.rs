//! Inference - model capability shared by every backend
//!
//! A backend only has to turn one feature row into a label and a two-class
//! probability distribution. The classifier never looks past this trait, so
//! swapping logistic regression for an ONNX graph needs no pipeline change.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// LABEL
// ============================================================================

/// Class predicted for a URL. Class index 0 is legitimate, 1 is phishing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Label {
    Legitimate,
    Phishing,
}

impl Label {
    pub fn from_class_index(index: i64) -> Option<Self> {
        match index {
            0 => Some(Label::Legitimate),
            1 => Some(Label::Phishing),
            _ => None,
        }
    }

    pub fn class_index(self) -> usize {
        match self {
            Label::Legitimate => 0,
            Label::Phishing => 1,
        }
    }

    /// Result string shown to users and stored in the history
    pub fn headline(self) -> &'static str {
        match self {
            Label::Legitimate => "✅ Legitimate Website",
            Label::Phishing => "❌ Phishing Website Detected",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Legitimate => write!(f, "Legitimate"),
            Label::Phishing => write!(f, "Phishing"),
        }
    }
}

// ============================================================================
// PREDICTION
// ============================================================================

/// Raw backend output, before any validation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    pub label: Label,
    /// `[legitimate, phishing]`
    pub probabilities: [f32; 2],
}

// ============================================================================
// ERROR HANDLING
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("InferenceError: {0}")]
pub struct InferenceError(pub String);

// ============================================================================
// MODEL TRAIT
// ============================================================================

/// A loaded, read-only phishing model
///
/// Implementations are shared between request threads and must not need
/// `&mut self` to score.
pub trait PhishingModel: Send + Sync {
    /// Human-readable model name (from the manifest)
    fn name(&self) -> &str;

    /// Backend identifier, e.g. "linear" or "onnx"
    fn backend(&self) -> &'static str;

    /// Width of the input row the model was trained on
    fn feature_count(&self) -> usize;

    fn predict_label(&self, features: &[f32]) -> Result<Label, InferenceError>;

    /// `[legitimate, phishing]`
    fn predict_probabilities(&self, features: &[f32]) -> Result<[f32; 2], InferenceError>;

    /// Label and probabilities together. Backends that produce both in one
    /// pass should override this.
    fn predict(&self, features: &[f32]) -> Result<Prediction, InferenceError> {
        Ok(Prediction {
            label: self.predict_label(features)?,
            probabilities: self.predict_probabilities(features)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_class_index_round_trip() {
        for label in [Label::Legitimate, Label::Phishing] {
            assert_eq!(Label::from_class_index(label.class_index() as i64), Some(label));
        }
        assert_eq!(Label::from_class_index(2), None);
        assert_eq!(Label::from_class_index(-1), None);
    }

    #[test]
    fn test_label_rendering() {
        assert_eq!(Label::Phishing.to_string(), "Phishing");
        assert_eq!(Label::Legitimate.headline(), "✅ Legitimate Website");
        assert_eq!(serde_json::to_string(&Label::Phishing).unwrap(), "\"phishing\"");
    }
}
