//! Configuration module

use std::env;

use phishguard_core::DetectorConfig;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,

    /// Environment (development, production)
    pub environment: String,

    /// Emit JSON log lines instead of human-readable ones
    pub json_logs: bool,

    /// Model, heuristics and history settings
    pub detector: DetectorConfig,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            port: lookup("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(5000),

            environment: lookup("ENVIRONMENT")
                .unwrap_or_else(|| "development".to_string()),

            json_logs: lookup("LOG_FORMAT")
                .map(|f| f.eq_ignore_ascii_case("json"))
                .unwrap_or(false),

            detector: DetectorConfig::from_lookup(&lookup),
        }
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Default tracing filter when RUST_LOG is unset
    pub fn default_log_filter(&self) -> &'static str {
        if self.is_production() {
            "phishguard_web=info,phishguard_core=info,tower_http=info"
        } else {
            "phishguard_web=debug,phishguard_core=debug,tower_http=debug"
        }
    }
}
