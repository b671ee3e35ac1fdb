//! Feature Layout - Centralized Feature Definition
//!
//! **CRITICAL: This file controls the feature schema**
//!
//! ## Rules (NEVER break these):
//! 1. Add feature → increment FEATURE_VERSION
//! 2. Change order → increment FEATURE_VERSION
//! 3. Remove feature → increment FEATURE_VERSION
//!
//! Every model manifest records the version and layout hash it was trained
//! against; loading refuses a manifest whose tag differs from this file.

use crc32fast::Hasher;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// FEATURE VERSION
// ============================================================================

/// Current feature layout version
/// MUST be incremented when layout changes
pub const FEATURE_VERSION: u8 = 1;

// ============================================================================
// FEATURE LAYOUT (Authoritative source)
// ============================================================================

/// Feature names in exact order they appear in the vector
///
/// Slots 0-9 are the classic lexical phishing heuristics. `digit_count`
/// (slot 10) goes beyond that set: datasets built with only the ten classic
/// columns need a digit-count column added before training a model for
/// this layout.
pub const FEATURE_LAYOUT: &[&str] = &[
    // === Raw string shape (0-3) ===
    "url_length",            // 0: Character count
    "dot_count",             // 1: Count of '.'
    "hyphen_count",          // 2: Count of '-'
    "at_count",              // 3: Count of '@'

    // === Transport / host (4-5) ===
    "has_https",             // 4: Starts with "https" (case-sensitive)
    "has_ip",                // 5: Contains a dotted quad

    // === Heuristics (6-9) ===
    "suspicious_word_count", // 6: Occurrences of suspicious words
    "subdomain_count",       // 7: Dots in the authority component
    "is_shortened",          // 8: Mentions a known shortener
    "special_char_count",    // 9: Punctuation from SPECIAL_CHARS ('@' included)

    // === Character classes (10) ===
    "digit_count",           // 10: ASCII digits
];

/// Total number of features
pub const FEATURE_COUNT: usize = 11;

const _: () = assert!(FEATURE_LAYOUT.len() == FEATURE_COUNT);

// Index constants, kept in sync with FEATURE_LAYOUT by the tests below
pub const FEAT_URL_LENGTH: usize = 0;
pub const FEAT_DOT_COUNT: usize = 1;
pub const FEAT_HYPHEN_COUNT: usize = 2;
pub const FEAT_AT_COUNT: usize = 3;
pub const FEAT_HAS_HTTPS: usize = 4;
pub const FEAT_HAS_IP: usize = 5;
pub const FEAT_SUSPICIOUS_WORD_COUNT: usize = 6;
pub const FEAT_SUBDOMAIN_COUNT: usize = 7;
pub const FEAT_IS_SHORTENED: usize = 8;
pub const FEAT_SPECIAL_CHAR_COUNT: usize = 9;
pub const FEAT_DIGIT_COUNT: usize = 10;

// ============================================================================
// LAYOUT HASH
// ============================================================================

static LAYOUT_HASH: Lazy<u32> = Lazy::new(compute_layout_hash);

/// Compute CRC32 hash of the feature layout
/// Used to detect layout mismatches at runtime
pub fn compute_layout_hash() -> u32 {
    let mut hasher = Hasher::new();

    // Include version in hash
    hasher.update(&[FEATURE_VERSION]);

    for name in FEATURE_LAYOUT {
        hasher.update(name.as_bytes());
        hasher.update(&[0]); // Separator
    }

    hasher.finalize()
}

/// Get layout hash (computed once)
pub fn layout_hash() -> u32 {
    *LAYOUT_HASH
}

// ============================================================================
// LAYOUT INFO
// ============================================================================

/// Complete layout information for serialization/logging
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutInfo {
    pub version: u8,
    pub hash: u32,
    pub feature_count: usize,
    pub feature_names: Vec<String>,
}

impl LayoutInfo {
    pub fn current() -> Self {
        Self {
            version: FEATURE_VERSION,
            hash: layout_hash(),
            feature_count: FEATURE_COUNT,
            feature_names: FEATURE_LAYOUT.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Default for LayoutInfo {
    fn default() -> Self {
        Self::current()
    }
}

// ============================================================================
// LAYOUT VALIDATION
// ============================================================================

/// Error when feature layout doesn't match expected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "Feature layout mismatch: expected v{expected_version} (hash: {expected_hash:08x}), \
     got v{actual_version} (hash: {actual_hash:08x})"
)]
pub struct LayoutMismatchError {
    pub expected_version: u8,
    pub expected_hash: u32,
    pub actual_version: u8,
    pub actual_hash: u32,
}

/// Validate that incoming data matches current layout
pub fn validate_layout(incoming_version: u8, incoming_hash: u32) -> Result<(), LayoutMismatchError> {
    let current_hash = layout_hash();

    if incoming_version != FEATURE_VERSION || incoming_hash != current_hash {
        return Err(LayoutMismatchError {
            expected_version: FEATURE_VERSION,
            expected_hash: current_hash,
            actual_version: incoming_version,
            actual_hash: incoming_hash,
        });
    }

    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_count() {
        assert_eq!(FEATURE_COUNT, 11);
        assert_eq!(FEATURE_LAYOUT.len(), FEATURE_COUNT);
    }

    #[test]
    fn test_index_constants_match_layout() {
        let pairs = [
            ("url_length", FEAT_URL_LENGTH),
            ("dot_count", FEAT_DOT_COUNT),
            ("hyphen_count", FEAT_HYPHEN_COUNT),
            ("at_count", FEAT_AT_COUNT),
            ("has_https", FEAT_HAS_HTTPS),
            ("has_ip", FEAT_HAS_IP),
            ("suspicious_word_count", FEAT_SUSPICIOUS_WORD_COUNT),
            ("subdomain_count", FEAT_SUBDOMAIN_COUNT),
            ("is_shortened", FEAT_IS_SHORTENED),
            ("special_char_count", FEAT_SPECIAL_CHAR_COUNT),
            ("digit_count", FEAT_DIGIT_COUNT),
        ];
        for (name, index) in pairs {
            assert_eq!(FEATURE_LAYOUT[index], name);
        }
    }

    #[test]
    fn test_layout_hash_consistency() {
        assert_eq!(compute_layout_hash(), compute_layout_hash());
        assert_eq!(layout_hash(), compute_layout_hash());
    }

    #[test]
    fn test_layout_hash_pinned() {
        // Shipped model manifests carry this value; changing it orphans them.
        assert_eq!(layout_hash(), 1_072_412_432);
    }

    #[test]
    fn test_validate_layout_success() {
        assert!(validate_layout(FEATURE_VERSION, layout_hash()).is_ok());
    }

    #[test]
    fn test_validate_layout_version_mismatch() {
        let err = validate_layout(FEATURE_VERSION + 1, layout_hash()).unwrap_err();
        assert_eq!(err.actual_version, FEATURE_VERSION + 1);
        assert_eq!(err.expected_version, FEATURE_VERSION);
    }

    #[test]
    fn test_validate_layout_hash_mismatch() {
        let result = validate_layout(FEATURE_VERSION, layout_hash().wrapping_add(1));
        assert!(result.is_err());
    }

    #[test]
    fn test_layout_info() {
        let info = LayoutInfo::current();
        assert_eq!(info.version, FEATURE_VERSION);
        assert_eq!(info.hash, layout_hash());
        assert_eq!(info.feature_names.len(), FEATURE_COUNT);
    }
}
