//! Detector - extraction, classification and history in one call
//!
//! Order per call is fixed: extract, classify, then record. A failed
//! classification records nothing.

use serde::Serialize;

use super::config::DetectorConfig;
use super::features::{FeatureExtractor, FeatureVector, LayoutInfo, UrlFeatureExtractor};
use super::history::{HistoryEntry, HistoryStore};
use super::model::{self, ClassificationResult, Classifier, ClassifyError, Label, LoadError, ModelInfo};

/// One named feature value, in layout order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedFeature {
    pub name: &'static str,
    pub value: f32,
}

/// Presentation-ready result of analyzing one URL
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analysis {
    pub url: String,
    pub label: Label,
    /// "✅ Legitimate Website" / "❌ Phishing Website Detected"
    pub headline: String,
    /// Percent, two decimals
    pub confidence: f64,
    /// Percent, two decimals
    pub legitimate_probability: f64,
    /// Percent, two decimals
    pub phishing_probability: f64,
    pub features: Vec<NamedFeature>,
}

impl Analysis {
    pub fn new(url: &str, vector: &FeatureVector, result: &ClassificationResult) -> Self {
        let legitimate_probability = to_percent(result.probabilities.legitimate);
        let phishing_probability = to_percent(result.probabilities.phishing);

        Self {
            url: url.to_string(),
            label: result.label,
            headline: result.label.headline().to_string(),
            confidence: to_percent(result.confidence()),
            legitimate_probability,
            phishing_probability,
            features: vector
                .named_values()
                .into_iter()
                .map(|(name, value)| NamedFeature { name, value })
                .collect(),
        }
    }
}

/// Probability in [0, 1] to a percentage rounded to two decimals
pub fn to_percent(probability: f64) -> f64 {
    (probability * 10_000.0).round() / 100.0
}

pub struct Detector {
    extractor: UrlFeatureExtractor,
    classifier: Classifier,
    history: HistoryStore,
}

impl Detector {
    pub fn new(extractor: UrlFeatureExtractor, classifier: Classifier, history: HistoryStore) -> Self {
        Self {
            extractor,
            classifier,
            history,
        }
    }

    /// Load the model once and assemble the pipeline
    pub fn from_config(config: &DetectorConfig) -> Result<Self, LoadError> {
        let classifier = model::load(&config.model_path)?;

        log::info!(
            "Detector ready: {} suspicious words, {} shorteners, history capacity {}",
            config.heuristics.suspicious_words.len(),
            config.heuristics.shorteners.len(),
            config
                .history_capacity
                .map_or_else(|| "unbounded".to_string(), |c| c.to_string())
        );

        Ok(Self::new(
            UrlFeatureExtractor::new(&config.heuristics),
            classifier,
            HistoryStore::with_capacity(config.history_capacity),
        ))
    }

    pub fn analyze(&self, url: &str) -> Result<Analysis, ClassifyError> {
        let vector = self.extractor.extract(url);
        log::debug!("Features for {:?}: {}", url, vector.to_log_entry());

        let result = self.classifier.classify(&vector)?;

        self.history.record(url, result.label.headline());

        let analysis = Analysis::new(url, &vector, &result);
        log::debug!(
            "Classified {:?} as {} ({:.2}%)",
            url,
            analysis.label,
            analysis.confidence
        );

        Ok(analysis)
    }

    pub fn history(&self) -> Vec<HistoryEntry> {
        self.history.all()
    }

    pub fn layout(&self) -> LayoutInfo {
        LayoutInfo::current()
    }

    pub fn model_info(&self) -> ModelInfo {
        self.classifier.info()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::config::HeuristicsConfig;
    use crate::logic::features::layout::{FEAT_HAS_IP, FEAT_IS_SHORTENED};
    use crate::logic::features::FEATURE_COUNT;
    use crate::logic::model::{InferenceError, LinearModel, ModelManifest, PhishingModel};
    use std::sync::Arc;

    /// Backend whose probabilities never form a distribution
    struct OverconfidentModel;

    impl PhishingModel for OverconfidentModel {
        fn name(&self) -> &str {
            "overconfident"
        }

        fn backend(&self) -> &'static str {
            "test"
        }

        fn feature_count(&self) -> usize {
            FEATURE_COUNT
        }

        fn predict_label(&self, _features: &[f32]) -> Result<Label, InferenceError> {
            Ok(Label::Phishing)
        }

        fn predict_probabilities(&self, _features: &[f32]) -> Result<[f32; 2], InferenceError> {
            Ok([0.9, 0.9])
        }
    }

    fn detector() -> Detector {
        let mut weights = vec![0.0; FEATURE_COUNT];
        weights[FEAT_IS_SHORTENED] = 4.0;
        weights[FEAT_HAS_IP] = 4.0;
        let classifier = Classifier::new(Arc::new(LinearModel::new(weights, -2.0))).unwrap();
        Detector::new(UrlFeatureExtractor::default(), classifier, HistoryStore::new())
    }

    #[test]
    fn test_analyze_records_history_in_order() {
        let detector = detector();

        let first = detector.analyze("https://example.com").unwrap();
        let second = detector.analyze("http://bit.ly/xyz").unwrap();

        assert_eq!(first.label, Label::Legitimate);
        assert_eq!(second.label, Label::Phishing);

        let history = detector.history();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].url, "https://example.com");
        assert_eq!(history[0].label, "✅ Legitimate Website");
        assert_eq!(history[1].url, "http://bit.ly/xyz");
        assert_eq!(history[1].label, "❌ Phishing Website Detected");
    }

    #[test]
    fn test_percentages_sum_to_hundred() {
        let detector = detector();
        for url in ["", "https://example.com", "http://192.168.1.1/login", "http://bit.ly/x"] {
            let analysis = detector.analyze(url).unwrap();
            let total = analysis.legitimate_probability + analysis.phishing_probability;
            assert!((total - 100.0).abs() <= 0.01 + 1e-9, "{url}: {total}");
            assert!(analysis.confidence >= 50.0);
            assert_eq!(
                analysis.confidence,
                analysis.legitimate_probability.max(analysis.phishing_probability)
            );
        }
    }

    #[test]
    fn test_analysis_carries_named_features() {
        let analysis = detector().analyze("http://bit.ly/xyz").unwrap();
        assert_eq!(analysis.features.len(), FEATURE_COUNT);
        assert_eq!(analysis.features[0].name, "url_length");
        let shortened = analysis
            .features
            .iter()
            .find(|f| f.name == "is_shortened")
            .unwrap();
        assert_eq!(shortened.value, 1.0);
    }

    #[test]
    fn test_failed_classification_records_nothing() {
        let classifier = Classifier::new(Arc::new(OverconfidentModel)).unwrap();
        let detector =
            Detector::new(UrlFeatureExtractor::default(), classifier, HistoryStore::new());

        for url in ["https://example.com", "http://bit.ly/xyz"] {
            let err = detector.analyze(url).unwrap_err();
            assert!(matches!(err, ClassifyError::InvalidOutput(_)), "{err}");
        }
        assert!(detector.history().is_empty());
        assert_eq!(detector.model_info().inference_count, 0);
    }

    #[test]
    fn test_to_percent_rounds_two_decimals() {
        assert_eq!(to_percent(0.123456), 12.35);
        assert_eq!(to_percent(1.0), 100.0);
        assert_eq!(to_percent(0.0), 0.0);
    }

    #[test]
    fn test_from_config_uses_heuristics_and_capacity() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        let mut weights = vec![0.0; FEATURE_COUNT];
        weights[FEAT_IS_SHORTENED] = 4.0;
        ModelManifest::linear("cfg", LinearModel::new(weights, -2.0))
            .write_to(&path)
            .unwrap();

        let config = DetectorConfig {
            model_path: path,
            history_capacity: Some(1),
            heuristics: HeuristicsConfig {
                suspicious_words: vec!["paypal".to_string()],
                shorteners: vec!["t.co".to_string()],
            },
        };
        let detector = Detector::from_config(&config).unwrap();

        assert_eq!(detector.analyze("https://t.co/abc").unwrap().label, Label::Phishing);
        assert_eq!(detector.analyze("http://bit.ly/xyz").unwrap().label, Label::Legitimate);
        assert_eq!(detector.history().len(), 1);
        assert_eq!(detector.model_info().inference_count, 2);
    }

    #[test]
    fn test_missing_model_is_fatal() {
        let config = DetectorConfig {
            model_path: "/nonexistent/model.json".into(),
            ..DetectorConfig::default()
        };
        assert!(Detector::from_config(&config).is_err());
    }
}
