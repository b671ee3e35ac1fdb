//! Model Manifest - the on-disk description of a trained model
//!
//! A manifest is a JSON file carrying the feature layout tag the model was
//! trained against and the backend that scores it:
//!
//! ```json
//! {
//!   "name": "phishing-lr",
//!   "feature_version": 1,
//!   "layout_hash": 1072412432,
//!   "feature_names": ["url_length", "dot_count", "..."],
//!   "model": { "backend": "linear", "weights": [...], "intercept": -1.5 }
//! }
//! ```
//!
//! Loading is the only I/O in the crate and happens once at startup.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::logic::features::{
    layout_hash, layout::validate_layout, LayoutMismatchError, FEATURE_COUNT, FEATURE_LAYOUT,
    FEATURE_VERSION,
};

use super::classifier::Classifier;
use super::inference::PhishingModel;
use super::linear::LinearModel;

// ============================================================================
// ERRORS
// ============================================================================

/// Startup failure; the process must not serve without a model
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid model manifest: {0}")]
    Parse(#[from] serde_json::Error),

    #[error(transparent)]
    Layout(#[from] LayoutMismatchError),

    #[error("feature names differ from layout at position {index}: expected {expected:?}, found {found:?}")]
    FeatureNames {
        index: usize,
        expected: String,
        found: String,
    },

    #[error("model expects {actual} features, layout has {expected}")]
    FeatureCount { expected: usize, actual: usize },

    #[error("checksum mismatch for {path}: expected {expected}, got {actual}")]
    Checksum {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    #[error("invalid model: {0}")]
    Invalid(String),

    #[error("model backend error: {0}")]
    Backend(String),
}

// ============================================================================
// MANIFEST
// ============================================================================

/// ONNX backend parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OnnxBackend {
    /// Graph file, relative to the manifest directory unless absolute
    pub path: PathBuf,
    /// Hex SHA-256 of the graph file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,
    /// Output holding the predicted class (defaults to the output named like "label")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_output: Option<String>,
    /// Output holding the `[1, 2]` probabilities (defaults to the output named like "prob")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub probability_output: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "snake_case")]
pub enum ModelBackend {
    Linear(LinearModel),
    Onnx(OnnxBackend),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelManifest {
    pub name: String,
    pub feature_version: u8,
    pub layout_hash: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_names: Option<Vec<String>>,
    pub model: ModelBackend,
}

impl ModelManifest {
    /// Manifest for a linear model tagged with the current layout
    pub fn linear(name: impl Into<String>, model: LinearModel) -> Self {
        Self {
            name: name.into(),
            feature_version: FEATURE_VERSION,
            layout_hash: layout_hash(),
            feature_names: Some(FEATURE_LAYOUT.iter().map(|s| s.to_string()).collect()),
            model: ModelBackend::Linear(model),
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, LoadError> {
        let raw = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn write_to(&self, path: &Path) -> Result<(), LoadError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Check the layout tag against the compiled feature layout
    pub fn validate(&self) -> Result<(), LoadError> {
        validate_layout(self.feature_version, self.layout_hash)?;

        if let Some(names) = &self.feature_names {
            if names.len() != FEATURE_COUNT {
                return Err(LoadError::FeatureCount {
                    expected: FEATURE_COUNT,
                    actual: names.len(),
                });
            }
            if let Some((index, (expected, found))) = FEATURE_LAYOUT
                .iter()
                .zip(names.iter())
                .enumerate()
                .find(|(_, (expected, found))| **expected != found.as_str())
            {
                return Err(LoadError::FeatureNames {
                    index,
                    expected: expected.to_string(),
                    found: found.clone(),
                });
            }
        }

        Ok(())
    }

    /// Instantiate the backend. `base_dir` resolves relative artifact paths.
    pub fn into_model(self, base_dir: &Path) -> Result<Arc<dyn PhishingModel>, LoadError> {
        self.validate()?;

        match self.model {
            ModelBackend::Linear(model) => {
                model.check(FEATURE_COUNT).map_err(LoadError::Invalid)?;
                Ok(Arc::new(model.with_name(self.name)))
            }
            ModelBackend::Onnx(onnx) => {
                let path = resolve(base_dir, &onnx.path);
                if let Some(expected) = &onnx.sha256 {
                    verify_checksum(&path, expected)?;
                }
                load_onnx(self.name, path, &onnx)
            }
        }
    }
}

/// Load a manifest, validate it and bind the model to a classifier
pub fn load(path: &Path) -> Result<Classifier, LoadError> {
    log::info!("Loading model manifest from: {}", path.display());

    let manifest = ModelManifest::from_path(path)?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    let model = manifest.into_model(base_dir)?;

    Classifier::new(model)
}

fn resolve(base_dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}

/// Compare the SHA-256 of a file with an expected hex digest
pub fn verify_checksum(path: &Path, expected: &str) -> Result<(), LoadError> {
    let io_err = |source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    };

    let mut file = fs::File::open(path).map_err(io_err)?;
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 8192];

    loop {
        let bytes_read = file.read(&mut buffer).map_err(io_err)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    let actual = hex::encode(hasher.finalize());
    if !actual.eq_ignore_ascii_case(expected.trim()) {
        return Err(LoadError::Checksum {
            path: path.to_path_buf(),
            expected: expected.to_string(),
            actual,
        });
    }

    Ok(())
}

#[cfg(feature = "onnx")]
fn load_onnx(
    name: String,
    path: PathBuf,
    onnx: &OnnxBackend,
) -> Result<Arc<dyn PhishingModel>, LoadError> {
    let model = super::onnx::OnnxModel::load(name, &path, onnx)?;
    Ok(Arc::new(model))
}

#[cfg(not(feature = "onnx"))]
fn load_onnx(
    name: String,
    path: PathBuf,
    _onnx: &OnnxBackend,
) -> Result<Arc<dyn PhishingModel>, LoadError> {
    Err(LoadError::Backend(format!(
        "model {} ({}) needs the `onnx` feature, which this build does not include",
        name,
        path.display()
    )))
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::features::extract;
    use crate::logic::model::Label;
    use tempfile::tempdir;

    fn sample_model() -> LinearModel {
        let mut weights = vec![0.0; FEATURE_COUNT];
        weights[crate::logic::features::layout::FEAT_IS_SHORTENED] = 6.0;
        LinearModel::new(weights, -3.0)
    }

    #[test]
    fn test_write_then_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("model.json");
        ModelManifest::linear("sample", sample_model()).write_to(&path).unwrap();

        let classifier = load(&path).unwrap();
        assert_eq!(classifier.model_name(), "sample");

        let short = classifier.classify(&extract("http://bit.ly/xyz")).unwrap();
        assert_eq!(short.label, Label::Phishing);
        let plain = classifier.classify(&extract("https://example.com")).unwrap();
        assert_eq!(plain.label, Label::Legitimate);
    }

    #[test]
    fn test_missing_file() {
        let err = load(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }

    #[test]
    fn test_corrupt_manifest() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("model.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(load(&path).unwrap_err(), LoadError::Parse(_)));
    }

    #[test]
    fn test_stale_layout_tag_is_refused() {
        let mut manifest = ModelManifest::linear("stale", sample_model());
        manifest.layout_hash ^= 0xDEAD;
        assert!(matches!(manifest.validate().unwrap_err(), LoadError::Layout(_)));

        let mut manifest = ModelManifest::linear("old", sample_model());
        manifest.feature_version = 0;
        assert!(matches!(manifest.validate().unwrap_err(), LoadError::Layout(_)));
    }

    #[test]
    fn test_reordered_feature_names_are_refused() {
        let mut manifest = ModelManifest::linear("swapped", sample_model());
        if let Some(names) = manifest.feature_names.as_mut() {
            names.swap(1, 2);
        }

        match manifest.validate().unwrap_err() {
            LoadError::FeatureNames { index, expected, found } => {
                assert_eq!(index, 1);
                assert_eq!(expected, "dot_count");
                assert_eq!(found, "hyphen_count");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_wrong_weight_count_is_refused() {
        let manifest = ModelManifest::linear("short", LinearModel::new(vec![1.0; 10], 0.0));
        let err = manifest
            .into_model(Path::new("."))
            .err()
            .expect("weight count must be checked");
        assert!(matches!(err, LoadError::Invalid(_)));
    }

    #[test]
    fn test_manifest_json_shape() {
        let json = r#"{
            "name": "hand-written",
            "feature_version": 1,
            "layout_hash": 1072412432,
            "model": {
                "backend": "linear",
                "weights": [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
                "intercept": 0.5
            }
        }"#;
        let manifest: ModelManifest = serde_json::from_str(json).unwrap();
        assert!(manifest.feature_names.is_none());
        assert!(manifest.validate().is_ok());
        let model = manifest.into_model(Path::new(".")).unwrap();
        assert_eq!(model.name(), "hand-written");
    }

    #[test]
    fn test_onnx_backend_parses() {
        let json = r#"{
            "name": "rf",
            "feature_version": 1,
            "layout_hash": 1072412432,
            "model": { "backend": "onnx", "path": "rf.onnx", "sha256": "ABCDEF" }
        }"#;
        let manifest: ModelManifest = serde_json::from_str(json).unwrap();
        match manifest.model {
            ModelBackend::Onnx(onnx) => {
                assert_eq!(onnx.path, PathBuf::from("rf.onnx"));
                assert_eq!(onnx.sha256.as_deref(), Some("ABCDEF"));
                assert!(onnx.label_output.is_none());
            }
            other => panic!("unexpected backend: {other:?}"),
        }
    }

    #[test]
    fn test_checksum_verification() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("blob.bin");
        fs::write(&path, b"abc").unwrap();

        let digest = "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad";
        assert!(verify_checksum(&path, digest).is_ok());
        assert!(verify_checksum(&path, &digest.to_uppercase()).is_ok());
        assert!(matches!(
            verify_checksum(&path, "00").unwrap_err(),
            LoadError::Checksum { .. }
        ));
    }

    #[test]
    fn test_shipped_model_matches_layout() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../models/phishing_model.json");
        let classifier = load(&path).unwrap();

        let result = classifier
            .classify(&extract("http://secure-login.verify-bank.com@10.0.0.1/update"))
            .unwrap();
        assert_eq!(result.label, Label::Phishing);
        let result = classifier.classify(&extract("https://www.wikipedia.org")).unwrap();
        assert_eq!(result.label, Label::Legitimate);
    }

    #[cfg(not(feature = "onnx"))]
    #[test]
    fn test_onnx_backend_requires_feature() {
        let manifest = ModelManifest {
            name: "rf".to_string(),
            feature_version: FEATURE_VERSION,
            layout_hash: layout_hash(),
            feature_names: None,
            model: ModelBackend::Onnx(OnnxBackend {
                path: PathBuf::from("rf.onnx"),
                sha256: None,
                label_output: None,
                probability_output: None,
            }),
        };
        let err = manifest
            .into_model(Path::new("."))
            .err()
            .expect("onnx backend is compiled out");
        assert!(matches!(err, LoadError::Backend(_)));
    }
}
