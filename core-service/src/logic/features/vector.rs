//! Feature Vector - Core data structure for model input
//!
//! **Versioned feature vector with layout validation**
//!
//! Uses centralized layout from `layout.rs` for:
//! - Consistent feature ordering
//! - Version tracking
//! - Layout hash for compatibility checks

use serde::{Deserialize, Serialize};

use super::layout::{
    self, layout_hash, validate_layout, LayoutMismatchError, FEATURE_COUNT, FEATURE_LAYOUT,
    FEATURE_VERSION,
};

// ============================================================================
// VERSIONED FEATURE VECTOR
// ============================================================================

/// Versioned Feature Vector with layout metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Feature layout version
    pub version: u8,
    /// CRC32 hash of the feature layout (for mismatch detection)
    pub layout_hash: u32,
    /// Feature values in order defined by FEATURE_LAYOUT
    pub values: [f32; FEATURE_COUNT],
}

impl FeatureVector {
    /// Create a new zeroed feature vector with current version
    pub fn new() -> Self {
        Self::from_values([0.0; FEATURE_COUNT])
    }

    /// Create from raw values with current version
    pub fn from_values(values: [f32; FEATURE_COUNT]) -> Self {
        Self {
            version: FEATURE_VERSION,
            layout_hash: layout_hash(),
            values,
        }
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Set feature by index (out-of-range indices are ignored)
    pub fn set(&mut self, index: usize, value: f32) {
        if let Some(slot) = self.values.get_mut(index) {
            *slot = value;
        }
    }

    /// Validate that this vector is compatible with current layout
    pub fn validate(&self) -> Result<(), LayoutMismatchError> {
        validate_layout(self.version, self.layout_hash)
    }

    /// `(name, value)` pairs in layout order
    pub fn named_values(&self) -> Vec<(&'static str, f32)> {
        FEATURE_LAYOUT
            .iter()
            .copied()
            .zip(self.values.iter().copied())
            .collect()
    }

    /// Convert to JSON-serializable format for logging
    pub fn to_log_entry(&self) -> serde_json::Value {
        serde_json::json!({
            "feature_version": self.version,
            "layout_hash": self.layout_hash,
            "values": self.values,
            "named_values": self.named_values()
                .into_iter()
                .map(|(name, value)| (name.to_string(), serde_json::json!(value)))
                .collect::<serde_json::Map<_, _>>(),
        })
    }
}

impl Default for FeatureVector {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// FEATURE EXTRACTOR TRAIT
// ============================================================================

/// Turns a raw URL into a feature vector.
///
/// Implementations must be total: every input string, including empty and
/// malformed ones, yields a vector of the current layout.
pub trait FeatureExtractor {
    fn extract(&self, url: &str) -> FeatureVector;
}

// ============================================================================
// BUILDER PATTERN
// ============================================================================

/// Builder for creating FeatureVector with named setters
pub struct FeatureVectorBuilder {
    vector: FeatureVector,
}

impl FeatureVectorBuilder {
    pub fn new() -> Self {
        Self { vector: FeatureVector::new() }
    }

    fn count(mut self, index: usize, value: usize) -> Self {
        self.vector.set(index, value as f32);
        self
    }

    fn flag(mut self, index: usize, value: bool) -> Self {
        self.vector.set(index, if value { 1.0 } else { 0.0 });
        self
    }

    pub fn url_length(self, value: usize) -> Self {
        self.count(layout::FEAT_URL_LENGTH, value)
    }

    pub fn dot_count(self, value: usize) -> Self {
        self.count(layout::FEAT_DOT_COUNT, value)
    }

    pub fn hyphen_count(self, value: usize) -> Self {
        self.count(layout::FEAT_HYPHEN_COUNT, value)
    }

    pub fn at_count(self, value: usize) -> Self {
        self.count(layout::FEAT_AT_COUNT, value)
    }

    pub fn has_https(self, value: bool) -> Self {
        self.flag(layout::FEAT_HAS_HTTPS, value)
    }

    pub fn has_ip(self, value: bool) -> Self {
        self.flag(layout::FEAT_HAS_IP, value)
    }

    pub fn suspicious_word_count(self, value: usize) -> Self {
        self.count(layout::FEAT_SUSPICIOUS_WORD_COUNT, value)
    }

    pub fn subdomain_count(self, value: usize) -> Self {
        self.count(layout::FEAT_SUBDOMAIN_COUNT, value)
    }

    pub fn is_shortened(self, value: bool) -> Self {
        self.flag(layout::FEAT_IS_SHORTENED, value)
    }

    pub fn special_char_count(self, value: usize) -> Self {
        self.count(layout::FEAT_SPECIAL_CHAR_COUNT, value)
    }

    pub fn digit_count(self, value: usize) -> Self {
        self.count(layout::FEAT_DIGIT_COUNT, value)
    }

    pub fn build(self) -> FeatureVector {
        self.vector
    }
}

impl Default for FeatureVectorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================
