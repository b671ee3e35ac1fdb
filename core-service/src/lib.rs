//! PhishGuard Core
//!
//! URL feature extraction, model-backed phishing classification and the
//! in-process classification history.
//!
//! ```text
//! URL ──► UrlFeatureExtractor ──► FeatureVector ──► Classifier ──► ClassificationResult
//!                                                                     │
//!                                                   HistoryStore ◄────┘
//! ```

pub mod constants;
pub mod logic;

pub use logic::config::{DetectorConfig, HeuristicsConfig};
pub use logic::detector::{Analysis, Detector};
pub use logic::features::{
    FeatureExtractor, FeatureVector, LayoutInfo, UrlFeatureExtractor, FEATURE_COUNT,
    FEATURE_LAYOUT, FEATURE_VERSION,
};
pub use logic::history::{HistoryEntry, HistoryStore};
pub use logic::model::{
    ClassificationResult, Classifier, ClassifyError, Label, LinearModel, LoadError,
    ModelManifest, PhishingModel,
};
