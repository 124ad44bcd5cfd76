//! Catalog of (civilian, imposter) word pairs.

use crate::types::WordPair;
use rand::Rng;
use std::path::Path;

/// Built-in pairs used when no catalog file is configured
const DEFAULT_PAIRS: &[(&str, &str)] = &[
    ("CAT", "DOG"),
    ("APPLE", "ORANGE"),
    ("CAR", "BIKE"),
    ("COFFEE", "TEA"),
    ("BEACH", "DESERT"),
    ("PIANO", "GUITAR"),
    ("TRAIN", "BUS"),
    ("CASTLE", "PALACE"),
    ("PIZZA", "BURGER"),
    ("RIVER", "LAKE"),
    ("SNOW", "RAIN"),
    ("DOCTOR", "NURSE"),
];

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Failed to read word catalog: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse word catalog: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Word catalog needs at least 2 pairs (found {0})")]
    TooFewPairs(usize),

    #[error("Invalid word pair at index {index}: {reason}")]
    InvalidPair { index: usize, reason: &'static str },
}

#[derive(Debug, Clone)]
pub struct WordCatalog {
    pairs: Vec<WordPair>,
}

impl Default for WordCatalog {
    fn default() -> Self {
        Self {
            pairs: DEFAULT_PAIRS
                .iter()
                .map(|(civilian, imposter)| WordPair::new(*civilian, *imposter))
                .collect(),
        }
    }
}

impl WordCatalog {
    /// Build a catalog, rejecting blank or identical words
    pub fn new(pairs: Vec<WordPair>) -> Result<Self, CatalogError> {
        if pairs.len() < 2 {
            return Err(CatalogError::TooFewPairs(pairs.len()));
        }

        for (index, pair) in pairs.iter().enumerate() {
            let civilian = pair.civilian.trim();
            let imposter = pair.imposter.trim();
            if civilian.is_empty() || imposter.is_empty() {
                return Err(CatalogError::InvalidPair {
                    index,
                    reason: "words must not be blank",
                });
            }
            if civilian.eq_ignore_ascii_case(imposter) {
                return Err(CatalogError::InvalidPair {
                    index,
                    reason: "civilian and imposter words must differ",
                });
            }
        }

        Ok(Self { pairs })
    }

    /// Load pairs from a JSON file shaped like `[["CAT", "DOG"], ...]`
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let raw = std::fs::read_to_string(path)?;
        let entries: Vec<(String, String)> = serde_json::from_str(&raw)?;
        Self::new(
            entries
                .into_iter()
                .map(|(civilian, imposter)| WordPair::new(civilian, imposter))
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn pairs(&self) -> &[WordPair] {
        &self.pairs
    }

    /// Pick one pair uniformly at random
    pub fn choose<R: Rng>(&self, rng: &mut R) -> &WordPair {
        // new() guarantees at least two pairs
        &self.pairs[rng.random_range(0..self.pairs.len())]
    }
}
