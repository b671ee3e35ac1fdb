//! Features Module - Feature Extraction Engine
//!
//! Turns a raw URL into the versioned vector the model was trained on.
//! Layout (names, order, version) lives in `layout.rs`; the per-feature
//! scans live in `url.rs`.

pub mod layout;
pub mod url;
pub mod vector;


// Re-export common types
pub use layout::{
    layout_hash, LayoutInfo, LayoutMismatchError, FEATURE_COUNT,
    FEATURE_LAYOUT, FEATURE_VERSION,
};
pub use url::{extract, UrlFeatureExtractor};
pub use vector::{FeatureExtractor, FeatureVector, FeatureVectorBuilder};
