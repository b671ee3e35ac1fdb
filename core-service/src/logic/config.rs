//! Detector configuration
//!
//! Everything is read from environment variables with constant defaults.
//! Heuristic word lists are data, not code: changing them never touches the
//! extraction control flow.

use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_MODEL_PATH, DEFAULT_SHORTENERS, DEFAULT_SUSPICIOUS_WORDS, ENV_HISTORY_CAPACITY,
    ENV_MODEL_PATH, ENV_SHORTENERS, ENV_SUSPICIOUS_WORDS,
};

/// Word lists used by the lexical heuristics
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeuristicsConfig {
    pub suspicious_words: Vec<String>,
    pub shorteners: Vec<String>,
}

impl Default for HeuristicsConfig {
    fn default() -> Self {
        Self {
            suspicious_words: DEFAULT_SUSPICIOUS_WORDS.iter().map(|s| s.to_string()).collect(),
            shorteners: DEFAULT_SHORTENERS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl HeuristicsConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (environment, `.env` map, tests)
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            suspicious_words: lookup(ENV_SUSPICIOUS_WORDS)
                .map(|raw| parse_list(&raw))
                .unwrap_or(defaults.suspicious_words),
            shorteners: lookup(ENV_SHORTENERS)
                .map(|raw| parse_list(&raw))
                .unwrap_or(defaults.shorteners),
        }
    }
}

/// Full detector configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Model manifest path
    pub model_path: PathBuf,

    /// Keep at most this many history entries (None = unbounded)
    pub history_capacity: Option<usize>,

    pub heuristics: HeuristicsConfig,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            history_capacity: None,
            heuristics: HeuristicsConfig::default(),
        }
    }
}

impl DetectorConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let history_capacity = match lookup(ENV_HISTORY_CAPACITY) {
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(0) => None,
                Ok(n) => Some(n),
                Err(_) => {
                    log::warn!("Ignoring invalid {}={:?}", ENV_HISTORY_CAPACITY, raw);
                    None
                }
            },
            None => None,
        };

        Self {
            model_path: lookup(ENV_MODEL_PATH)
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_MODEL_PATH)),
            history_capacity,
            heuristics: HeuristicsConfig::from_lookup(&lookup),
        }
    }
}

/// Split a comma-separated list, trimming entries and dropping empty ones
pub fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = DetectorConfig::from_lookup(|_| None);
        assert_eq!(config, DetectorConfig::default());
        assert_eq!(config.heuristics.suspicious_words.len(), 5);
        assert_eq!(config.heuristics.shorteners, vec!["bit.ly", "tinyurl", "goo.gl"]);
        assert_eq!(config.history_capacity, None);
    }

    #[test]
    fn test_overrides() {
        let config = DetectorConfig::from_lookup(lookup_from(&[
            (ENV_MODEL_PATH, "/srv/model.json"),
            (ENV_SUSPICIOUS_WORDS, " paypal, ,signin "),
            (ENV_SHORTENERS, "t.co"),
            (ENV_HISTORY_CAPACITY, "100"),
        ]));

        assert_eq!(config.model_path, PathBuf::from("/srv/model.json"));
        assert_eq!(config.heuristics.suspicious_words, vec!["paypal", "signin"]);
        assert_eq!(config.heuristics.shorteners, vec!["t.co"]);
        assert_eq!(config.history_capacity, Some(100));
    }

    #[test]
    fn test_invalid_or_zero_capacity_is_unbounded() {
        let zero = DetectorConfig::from_lookup(lookup_from(&[(ENV_HISTORY_CAPACITY, "0")]));
        assert_eq!(zero.history_capacity, None);

        let junk = DetectorConfig::from_lookup(lookup_from(&[(ENV_HISTORY_CAPACITY, "lots")]));
        assert_eq!(junk.history_capacity, None);
    }

    #[test]
    fn test_heuristics_deserialize_with_defaults() {
        let config: HeuristicsConfig =
            serde_json::from_str(r#"{"shorteners": ["is.gd"]}"#).unwrap();
        assert_eq!(config.shorteners, vec!["is.gd"]);
        assert_eq!(config.suspicious_words, HeuristicsConfig::default().suspicious_words);
    }
}
