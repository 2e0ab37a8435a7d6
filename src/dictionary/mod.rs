//! In-memory dictionary: word index, catalog and spelling correction
//!
//! A [`Dictionary`] is built once at startup from [`WordRecord`]s and only read
//! afterwards. Share it behind an `Arc`.

pub mod alphabet;
pub mod catalog;
pub mod correction;
pub mod ingest;
pub mod search;
pub mod trie;

pub use search::{define, Answer, SearchOutcome};

use crate::error::DictionaryError;
use catalog::{CatalogBuilder, WordCatalog};
use correction::Corrector;
use trie::Trie;

/// One (word, definition, probability) triple delivered by ingestion
#[derive(Debug, Clone, PartialEq)]
pub struct WordRecord {
    pub word: String,
    pub definition: String,
    pub prob: f64,
}

impl WordRecord {
    pub fn new(word: impl Into<String>, definition: impl Into<String>, prob: f64) -> Self {
        Self {
            word: word.into(),
            definition: definition.into(),
            prob,
        }
    }
}

/// The word index together with the vocabulary used to correct misses
#[derive(Debug, Default)]
pub struct Dictionary {
    trie: Trie,
    catalog: WordCatalog,
    corrector: Corrector,
}

impl Dictionary {
    pub fn builder() -> DictionaryBuilder {
        DictionaryBuilder::default()
    }

    pub fn catalog(&self) -> &WordCatalog {
        &self.catalog
    }

    /// Number of distinct words
    pub fn word_count(&self) -> usize {
        self.trie.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trie.is_empty()
    }

    pub fn word_count_display(&self) -> String {
        self.trie.word_count_display()
    }
}

impl FromIterator<WordRecord> for Dictionary {
    fn from_iter<I: IntoIterator<Item = WordRecord>>(iter: I) -> Self {
        let mut builder = Dictionary::builder();
        for record in iter {
            // Rejected words are simply left out
            let _ = builder.add(record);
        }
        builder.build()
    }
}

/// Accumulates records during ingestion
#[derive(Debug, Default)]
pub struct DictionaryBuilder {
    trie: Trie,
    catalog: CatalogBuilder,
    definitions: usize,
    skipped: usize,
}

impl DictionaryBuilder {
    /// Insert one record. Words the alphabet cannot represent are counted as skipped
    /// and never reach the catalog.
    pub fn add(&mut self, record: WordRecord) -> Result<bool, DictionaryError> {
        match self.trie.insert(record.word.as_bytes(), record.definition) {
            Ok(new_word) => {
                self.definitions += 1;
                self.catalog.add(record.word.trim_matches(' '), record.prob);
                Ok(new_word)
            }
            Err(e) => {
                self.skipped += 1;
                Err(e)
            }
        }
    }

    pub fn definitions(&self) -> usize {
        self.definitions
    }

    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn build(self) -> Dictionary {
        Dictionary {
            trie: self.trie,
            catalog: self.catalog.build(),
            corrector: Corrector::default(),
        }
    }
}


#[cfg(test)]
mod property_tests {
    use super::alphabet::encode;
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn word() -> impl Strategy<Value = String> {
        "[a-z][a-z0-9' -]{0,10}[a-z]"
    }

    proptest! {
        #[test]
        fn stored_words_are_found_in_any_case(words in proptest::collection::vec(word(), 1..20)) {
            let dictionary: Dictionary = words
                .iter()
                .map(|w| WordRecord::new(w.clone(), format!("(n.) {}", w), 0.01))
                .collect();

            for w in &words {
                let term = format!("  {}  ", w.to_ascii_uppercase());
                match dictionary.search(term.as_bytes(), false) {
                    SearchOutcome::Exact { word, definitions } => {
                        prop_assert_eq!(&word, w);
                        let expected = format!("(n.) {}", w);
                        prop_assert!(definitions.contains(&expected));
                    }
                    other => prop_assert!(false, "expected exact match for {:?}, got {:?}", w, other),
                }
            }
        }

        #[test]
        fn word_count_matches_distinct_words(words in proptest::collection::vec(word(), 0..30)) {
            let dictionary: Dictionary = words
                .iter()
                .map(|w| WordRecord::new(w.to_ascii_uppercase(), "(n.) x", 0.01))
                .collect();
            let distinct: HashSet<&String> = words.iter().collect();
            prop_assert_eq!(dictionary.word_count(), distinct.len());
            prop_assert_eq!(dictionary.catalog().len(), distinct.len());
        }

        #[test]
        fn encodable_bytes_form_a_closed_alphabet(byte in any::<u8>()) {
            let expected = byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'\'' | b' ');
            match encode(byte) {
                Ok(symbol) => {
                    prop_assert!(expected);
                    prop_assert!(symbol < alphabet::ALPHABET_SIZE);
                }
                Err(e) => {
                    prop_assert!(!expected);
                    prop_assert_eq!(e, DictionaryError::UnsupportedCharacter(byte));
                }
            }
        }

        #[test]
        fn words_with_foreign_bytes_are_rejected(prefix in word(), byte in 128u8..=255) {
            let mut builder = Dictionary::builder();
            let mut raw = prefix.into_bytes();
            raw.push(byte);
            let text = String::from_utf8_lossy(&raw).into_owned();
            prop_assert!(builder.add(WordRecord::new(text, "(n.) x", 0.01)).is_err());
            let dictionary = builder.build();
            prop_assert_eq!(dictionary.word_count(), 0);
            prop_assert_eq!(dictionary.catalog().len(), 0);
        }
    }
}
