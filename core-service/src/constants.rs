//! Central Configuration Constants
//!
//! Single source of truth for all configuration defaults.

/// Default model manifest path (relative to the working directory)
pub const DEFAULT_MODEL_PATH: &str = "models/phishing_model.json";

/// Words whose presence hints at credential harvesting
pub const DEFAULT_SUSPICIOUS_WORDS: &[&str] = &["login", "verify", "bank", "secure", "update"];

/// Known URL-shortening services
pub const DEFAULT_SHORTENERS: &[&str] = &["bit.ly", "tinyurl", "goo.gl"];

/// Punctuation counted by `special_char_count`
pub const SPECIAL_CHARS: &str = "!@#$%^&*(),?\":{}|<>";

/// Allowed deviation of a model's class probabilities from 1.0
pub const PROBABILITY_SUM_TOLERANCE: f64 = 1e-3;

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "PhishGuard";

// ============================================
// Environment variable names
// ============================================

pub const ENV_MODEL_PATH: &str = "PHISHGUARD_MODEL";
pub const ENV_SUSPICIOUS_WORDS: &str = "PHISHGUARD_SUSPICIOUS_WORDS";
pub const ENV_SHORTENERS: &str = "PHISHGUARD_SHORTENERS";
pub const ENV_HISTORY_CAPACITY: &str = "PHISHGUARD_HISTORY_CAPACITY";
