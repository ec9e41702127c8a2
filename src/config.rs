use std::path::Path;

use serde::Deserialize;

use crate::error::IndexError;

/// Bounds of the covering search run for every phrase.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct ExpansionLimits {
    /// Longest source window, in tokens, looked up in the replacement table.
    pub max_window_tokens: usize,
    /// How many start positions before a window's end may be extended.
    pub lookback_positions: usize,
    /// Cap on `prefix + target` length in chars when extending a covering.
    pub max_rendering_chars: usize,
    /// Exclusive lower bound on a covering's accumulated log-probability.
    pub min_log_prob: f64,
}

impl ExpansionLimits {
    pub const DEFAULT_MAX_WINDOW_TOKENS: usize = 4;
    pub const DEFAULT_LOOKBACK_POSITIONS: usize = 5;
    pub const DEFAULT_MAX_RENDERING_CHARS: usize = 10;
    pub const DEFAULT_MIN_LOG_PROB: f64 = -4.0;
}

impl Default for ExpansionLimits {
    fn default() -> Self {
        Self {
            max_window_tokens: Self::DEFAULT_MAX_WINDOW_TOKENS,
            lookback_positions: Self::DEFAULT_LOOKBACK_POSITIONS,
            max_rendering_chars: Self::DEFAULT_MAX_RENDERING_CHARS,
            min_log_prob: Self::DEFAULT_MIN_LOG_PROB,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    pub vocab_path: String,
    pub limits: ExpansionLimits,
    pub max_postings_per_ngram: usize,
}

impl IndexConfig {
    pub const DEFAULT_MAX_POSTINGS_PER_NGRAM: usize = 100;

    pub fn load(path: &Path) -> Result<Self, IndexError> {
        let data =
            std::fs::read_to_string(path).map_err(|e| IndexError::io("read index config", e))?;
        serde_json::from_str(&data).map_err(|e| IndexError::json("parse index config", e))
    }

    pub fn validate(&self) -> Result<(), IndexError> {
        if self.limits.max_window_tokens == 0 {
            return Err(IndexError::invalid_input("max_window_tokens must be >= 1"));
        }
        if self.limits.lookback_positions == 0 {
            return Err(IndexError::invalid_input("lookback_positions must be >= 1"));
        }
        if !self.limits.min_log_prob.is_finite() {
            return Err(IndexError::invalid_input(format!(
                "min_log_prob must be finite, got {}",
                self.limits.min_log_prob
            )));
        }
        if self.max_postings_per_ngram == 0 {
            return Err(IndexError::invalid_input(
                "max_postings_per_ngram must be >= 1",
            ));
        }
        Ok(())
    }
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            vocab_path: String::new(),
            limits: ExpansionLimits::default(),
            max_postings_per_ngram: Self::DEFAULT_MAX_POSTINGS_PER_NGRAM,
        }
    }
}

/// Settings for counting replacement fragments out of alignment triples.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    pub max_fragment_tokens: usize,
    /// Word-fragment rows at or below this joint/source ratio are not written.
    pub min_misspell_probability: f64,
}

impl ExtractionConfig {
    pub const DEFAULT_MAX_FRAGMENT_TOKENS: usize = 4;
    pub const DEFAULT_MIN_MISSPELL_PROBABILITY: f64 = 1.0 / 200.0;
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            max_fragment_tokens: Self::DEFAULT_MAX_FRAGMENT_TOKENS,
            min_misspell_probability: Self::DEFAULT_MIN_MISSPELL_PROBABILITY,
        }
    }
}
