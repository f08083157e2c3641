//! Key-phrase extraction from free text.
//!
//! The `KeyPhraseExtractor` unions three pattern families, in order:
//!
//! 1. Capitalized multi-word spans ("Albert Einstein", "General Relativity")
//! 2. Known domain abbreviations and terms ("AI", "machine learning")
//! 3. Subject phrases of up to three words preceding a copula or modal verb
//!
//! Results are deduplicated preserving first-seen order.

use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;

/// Capitalized word runs on a single line.
pub const CAPITALIZED_PHRASE_PATTERN: &str = r"\b[A-Z][a-z]+(?:[ \t]+[A-Z][a-z]+)*\b";

/// Upper-case abbreviations matched case-sensitively, multi-word domain
/// terms matched case-insensitively.
pub const DOMAIN_TERM_PATTERN: &str = r"\b(?:AI|ML|API|CPU|GPU|IoT|VR|AR|5G|HTTP|JSON|XML|SQL|NoSQL)\b|(?i:\b(?:artificial intelligence|machine learning|deep learning|neural networks?|natural language processing|computer vision|quantum computing|cloud computing|big data|internet of things)\b)";

const SUBJECT_PHRASE_PATTERN: &str =
    r"(?i)\b(\w+(?:[ \t]+\w+){0,2})[ \t]+(?:is|are|was|were|can|will|should|could)\b";

/// Configuration for key-phrase extraction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyPhraseConfig {
    /// Maximum number of phrases returned by [`KeyPhraseExtractor::extract`].
    pub max_phrases: usize,

    /// Phrases at or below this many characters are discarded.
    pub min_phrase_len: usize,
}

impl Default for KeyPhraseConfig {
    fn default() -> Self {
        Self {
            max_phrases: 10,
            min_phrase_len: 3,
        }
    }
}

/// Extracts key phrases using the three pattern families.
pub struct KeyPhraseExtractor {
    config: KeyPhraseConfig,
    capitalized: Regex,
    domain_terms: Regex,
    subject_phrases: Regex,
}

impl KeyPhraseExtractor {
    /// Create an extractor with default configuration.
    pub fn new() -> Result<Self> {
        Self::with_config(KeyPhraseConfig::default())
    }

    /// Create an extractor with custom configuration.
    pub fn with_config(config: KeyPhraseConfig) -> Result<Self> {
        Ok(Self {
            config,
            capitalized: Regex::new(CAPITALIZED_PHRASE_PATTERN)?,
            domain_terms: Regex::new(DOMAIN_TERM_PATTERN)?,
            subject_phrases: Regex::new(SUBJECT_PHRASE_PATTERN)?,
        })
    }

    /// Extract up to `max_phrases` key phrases.
    pub fn extract(&self, text: &str) -> Vec<String> {
        self.extract_limited(text, self.config.max_phrases)
    }

    /// Extract up to `limit` key phrases.
    pub fn extract_limited(&self, text: &str, limit: usize) -> Vec<String> {
        let mut phrases: Vec<String> = Vec::new();

        let candidates = self
            .capitalized
            .find_iter(text)
            .map(|m| m.as_str())
            .chain(self.domain_terms.find_iter(text).map(|m| m.as_str()))
            .chain(
                self.subject_phrases
                    .captures_iter(text)
                    .filter_map(|cap| cap.get(1).map(|m| m.as_str())),
            );

        for candidate in candidates {
            if phrases.len() >= limit {
                break;
            }
            let candidate = candidate.trim();
            if candidate.chars().count() <= self.config.min_phrase_len {
                continue;
            }
            if !phrases.iter().any(|p| p == candidate) {
                phrases.push(candidate.to_string());
            }
        }

        debug!("Extracted {} key phrases", phrases.len());
        phrases
    }

    /// Every capitalized span in the text, duplicates included, in order.
    pub fn capitalized_terms(&self, text: &str) -> Vec<String> {
        self.capitalized
            .find_iter(text)
            .map(|m| m.as_str().to_string())
            .collect()
    }
}
