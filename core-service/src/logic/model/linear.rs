//! Linear backend - logistic regression stored inline in the manifest
//!
//! `p(phishing) = sigmoid(w · x + b)`, with optional min/max scaling of each
//! feature using the statistics recorded at training time.

use serde::{Deserialize, Serialize};

use super::inference::{InferenceError, Label, PhishingModel, Prediction};

/// Normalization parameters from training
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizationParams {
    pub min_vals: Vec<f32>,
    pub max_vals: Vec<f32>,
}

impl NormalizationParams {
    /// Scale one value into [0, 1]
    fn scale(&self, index: usize, value: f32) -> f32 {
        let min_val = self.min_vals.get(index).copied().unwrap_or(0.0);
        let max_val = self.max_vals.get(index).copied().unwrap_or(1.0);
        let range = (max_val - min_val).max(1e-8);

        ((value - min_val) / range).clamp(0.0, 1.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    #[serde(skip)]
    name: String,
    pub weights: Vec<f32>,
    pub intercept: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normalization: Option<NormalizationParams>,
}

impl LinearModel {
    pub fn new(weights: Vec<f32>, intercept: f32) -> Self {
        Self {
            name: "linear".to_string(),
            weights,
            intercept,
            normalization: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_normalization(mut self, normalization: NormalizationParams) -> Self {
        self.normalization = Some(normalization);
        self
    }

    /// Check internal consistency against the expected input width
    pub fn check(&self, feature_count: usize) -> Result<(), String> {
        if self.weights.len() != feature_count {
            return Err(format!(
                "expected {} weights, found {}",
                feature_count,
                self.weights.len()
            ));
        }
        if let Some(norm) = &self.normalization {
            if norm.min_vals.len() != feature_count || norm.max_vals.len() != feature_count {
                return Err(format!(
                    "normalization must have {} min/max values, found {}/{}",
                    feature_count,
                    norm.min_vals.len(),
                    norm.max_vals.len()
                ));
            }
        }
        if !self.intercept.is_finite() || self.weights.iter().any(|w| !w.is_finite()) {
            return Err("weights and intercept must be finite".to_string());
        }
        Ok(())
    }

    fn phishing_probability(&self, features: &[f32]) -> Result<f32, InferenceError> {
        if features.len() != self.weights.len() {
            return Err(InferenceError(format!(
                "expected {} features, got {}",
                self.weights.len(),
                features.len()
            )));
        }

        let logit = features
            .iter()
            .enumerate()
            .map(|(i, &x)| {
                let x = match &self.normalization {
                    Some(norm) => norm.scale(i, x),
                    None => x,
                };
                f64::from(self.weights[i]) * f64::from(x)
            })
            .sum::<f64>()
            + f64::from(self.intercept);

        Ok(sigmoid(logit) as f32)
    }
}

// Ties go to class 0, same as an argmax over [legit, phishing].
fn label_for(p: f32) -> Label {
    if p > 0.5 {
        Label::Phishing
    } else {
        Label::Legitimate
    }
}

impl PhishingModel for LinearModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn backend(&self) -> &'static str {
        "linear"
    }

    fn feature_count(&self) -> usize {
        self.weights.len()
    }

    fn predict_label(&self, features: &[f32]) -> Result<Label, InferenceError> {
        Ok(label_for(self.phishing_probability(features)?))
    }

    fn predict_probabilities(&self, features: &[f32]) -> Result<[f32; 2], InferenceError> {
        let p = self.phishing_probability(features)?;
        Ok([1.0 - p, p])
    }

    /// One logit per call
    fn predict(&self, features: &[f32]) -> Result<Prediction, InferenceError> {
        let p = self.phishing_probability(features)?;
        Ok(Prediction {
            label: label_for(p),
            probabilities: [1.0 - p, p],
        })
    }
}

/// Overflow-safe logistic function
fn sigmoid(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}
