//! URL Features - lexical features of a raw URL string
//!
//! Every feature is a single scan over the input. Nothing here parses the URL
//! strictly: malformed input still produces a vector.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::constants::SPECIAL_CHARS;
use crate::logic::config::HeuristicsConfig;

use super::vector::{FeatureExtractor, FeatureVector, FeatureVectorBuilder};

/// Dotted quad, no octet range check, no anchoring.
static IP_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d+\.\d+\.\d+\.\d+").expect("static IP pattern"));

/// Lexical URL feature extractor
///
/// Holds the heuristic word lists; everything else is fixed by the layout.
#[derive(Debug, Clone)]
pub struct UrlFeatureExtractor {
    suspicious_words: Vec<String>,
    shorteners: Vec<String>,
}

impl UrlFeatureExtractor {
    pub fn new(heuristics: &HeuristicsConfig) -> Self {
        Self {
            suspicious_words: heuristics
                .suspicious_words
                .iter()
                .filter(|w| !w.is_empty())
                .map(|w| w.to_lowercase())
                .collect(),
            shorteners: heuristics
                .shorteners
                .iter()
                .filter(|s| !s.is_empty())
                .cloned()
                .collect(),
        }
    }

    pub fn suspicious_words(&self) -> &[String] {
        &self.suspicious_words
    }

    pub fn shorteners(&self) -> &[String] {
        &self.shorteners
    }

    /// Occurrences of every suspicious word, case-insensitive
    pub fn suspicious_word_count(&self, url: &str) -> usize {
        let lowered = url.to_lowercase();
        self.suspicious_words
            .iter()
            .map(|word| count_overlapping(&lowered, word))
            .sum()
    }

    pub fn is_shortened(&self, url: &str) -> bool {
        self.shorteners.iter().any(|s| url.contains(s.as_str()))
    }
}

impl Default for UrlFeatureExtractor {
    fn default() -> Self {
        Self::new(&HeuristicsConfig::default())
    }
}

impl FeatureExtractor for UrlFeatureExtractor {
    fn extract(&self, url: &str) -> FeatureVector {
        FeatureVectorBuilder::new()
            .url_length(url.chars().count())
            .dot_count(count_char(url, '.'))
            .hyphen_count(count_char(url, '-'))
            .at_count(count_char(url, '@'))
            .has_https(has_https(url))
            .has_ip(has_ip(url))
            .suspicious_word_count(self.suspicious_word_count(url))
            .subdomain_count(count_char(&authority(url), '.'))
            .is_shortened(self.is_shortened(url))
            .special_char_count(special_char_count(url))
            .digit_count(url.chars().filter(char::is_ascii_digit).count())
            .build()
    }
}

/// Extract features with the default heuristic lists
pub fn extract(url: &str) -> FeatureVector {
    static DEFAULT: Lazy<UrlFeatureExtractor> = Lazy::new(UrlFeatureExtractor::default);
    DEFAULT.extract(url)
}

// ============================================================================
// SINGLE FEATURES
// ============================================================================

pub fn count_char(url: &str, needle: char) -> usize {
    url.chars().filter(|&c| c == needle).count()
}

/// Case-sensitive: "HTTPS://" does not count.
pub fn has_https(url: &str) -> bool {
    url.starts_with("https")
}

pub fn has_ip(url: &str) -> bool {
    IP_PATTERN.is_match(url)
}

pub fn special_char_count(url: &str) -> usize {
    url.chars().filter(|c| SPECIAL_CHARS.contains(*c)).count()
}

/// Count occurrences of `needle`, restarting one character after each hit.
fn count_overlapping(haystack: &str, needle: &str) -> usize {
    if needle.is_empty() {
        return 0;
    }

    let mut count = 0;
    let mut start = 0;
    while let Some(pos) = haystack[start..].find(needle) {
        count += 1;
        let hit = start + pos;
        start = hit + haystack[hit..].chars().next().map_or(1, char::len_utf8);
    }
    count
}

/// Authority (host, port and userinfo) of a URL, empty if there is none.
///
/// Mirrors the generic split: optional `scheme:` prefix, then an authority
/// only when the rest starts with `//`, ending at the first `/`, `?` or `#`.
pub fn authority(url: &str) -> String {
    let cleaned: String = url
        .trim_start_matches(|c: char| c <= ' ')
        .chars()
        .filter(|c| !matches!(c, '\t' | '\r' | '\n'))
        .collect();

    let rest = strip_scheme(&cleaned);
    match rest.strip_prefix("//") {
        Some(after) => {
            let end = after
                .find(|c: char| matches!(c, '/' | '?' | '#'))
                .unwrap_or(after.len());
            after[..end].to_string()
        }
        None => String::new(),
    }
}

fn strip_scheme(url: &str) -> &str {
    let Some(colon) = url.find(':') else {
        return url;
    };

    let mut scheme = url[..colon].chars();
    let valid = scheme.next().is_some_and(|c| c.is_ascii_alphabetic())
        && scheme.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));

    if valid {
        &url[colon + 1..]
    } else {
        url
    }
}
