//! Probability-annotated vocabulary scanned by the correction engine

use std::collections::HashSet;
use std::sync::{PoisonError, RwLock};

/// Probability given to words the frequency corpus never mentions
pub const DEFAULT_PROBABILITY: f64 = 0.000001;

#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    pub word: String,
    pub prob: f64,
}

/// Collects entries during ingestion; lowercases and keeps the first entry per word
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    entries: Vec<CatalogEntry>,
    seen: HashSet<String>,
}

impl CatalogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `word` unless already present. Returns whether it was added.
    pub fn add(&mut self, word: &str, prob: f64) -> bool {
        let word = word.to_ascii_lowercase();
        if self.seen.contains(&word) {
            return false;
        }
        self.seen.insert(word.clone());
        self.entries.push(CatalogEntry { word, prob });
        true
    }

    /// Freeze into a catalog sorted by word
    pub fn build(self) -> WordCatalog {
        let mut entries = self.entries;
        entries.sort_by(|a, b| a.word.cmp(&b.word));
        WordCatalog {
            entries: RwLock::new(entries),
        }
    }
}

/// Frozen vocabulary; only ever read through [`WordCatalog::snapshot`]
#[derive(Debug, Default)]
pub struct WordCatalog {
    entries: RwLock<Vec<CatalogEntry>>,
}

impl WordCatalog {
    /// Copy of all entries, taken under the shared lock so the caller can scan lock-free
    pub fn snapshot(&self) -> Vec<CatalogEntry> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }
}

impl FromIterator<(String, f64)> for WordCatalog {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        let mut builder = CatalogBuilder::new();
        for (word, prob) in iter {
            builder.add(&word, prob);
        }
        builder.build()
    }
}
