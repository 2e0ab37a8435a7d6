//! Search orchestration: exact lookup, then correction, then one outcome
//!
//! [`Dictionary::search`] is synchronous. Front ends that must not block use
//! [`spawn_search`], which runs the search on the blocking pool and hands the single
//! outcome back over a oneshot channel.

use super::trie::{trim_spaces, Lookup};
use super::Dictionary;
use crate::error::DictionaryError;
use anyhow::{Context, Result};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::oneshot;
use tracing::debug;

/// The one result a search produces
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    Exact {
        word: String,
        definitions: Vec<String>,
    },
    Corrected {
        word: String,
        definitions: Vec<String>,
        message: String,
    },
    Failure(DictionaryError),
}

impl SearchOutcome {
    pub fn kind(&self) -> &'static str {
        match self {
            SearchOutcome::Exact { .. } => "exact",
            SearchOutcome::Corrected { .. } => "corrected",
            SearchOutcome::Failure(_) => "failure",
        }
    }

    /// Presentation form shared by the HTTP and CLI front ends
    pub fn into_answer(self) -> Result<Answer, DictionaryError> {
        match self {
            SearchOutcome::Exact { word, definitions } => Ok(Answer {
                message: format!("{}:\n", word),
                word,
                definitions,
            }),
            SearchOutcome::Corrected {
                word,
                definitions,
                message,
            } => Ok(Answer {
                word,
                message,
                definitions,
            }),
            SearchOutcome::Failure(e) => Err(e),
        }
    }
}

/// Definitions of a word together with a human-readable header
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    /// Word whose definitions are returned
    pub word: String,
    /// Header line, or the correction notice when the word was misspelled
    pub message: String,
    /// Definitions in dictionary order
    pub definitions: Vec<String>,
}

impl Answer {
    /// Plain-text rendering used by the terminal front ends
    pub fn render(&self) -> String {
        let mut out = String::from("---\n");
        out.push_str(&self.message);
        if !self.message.ends_with('\n') {
            out.push('\n');
        }
        for definition in &self.definitions {
            out.push_str(definition);
            out.push('\n');
        }
        out
    }
}

impl Dictionary {
    /// Look `term` up, falling back to spelling correction when it is not stored
    pub fn search(&self, term: &[u8], explain: bool) -> SearchOutcome {
        let outcome = self.search_inner(term, explain);
        debug!(
            "Search for {:?} finished: {}",
            String::from_utf8_lossy(term),
            outcome.kind()
        );
        outcome
    }

    fn search_inner(&self, term: &[u8], explain: bool) -> SearchOutcome {
        let term = trim_spaces(term);
        if term.is_empty() {
            return SearchOutcome::Failure(DictionaryError::EmptySearchTerm);
        }

        let traversal = match self.trie.lookup(term) {
            Ok(Lookup::Found(definitions)) => {
                return SearchOutcome::Exact {
                    word: String::from_utf8_lossy(term).to_ascii_lowercase(),
                    definitions,
                }
            }
            Ok(Lookup::Missing(traversal)) => traversal,
            Err(e) => return SearchOutcome::Failure(e),
        };

        // Every byte passed the codec, so the term is plain ASCII
        let text = String::from_utf8_lossy(term).into_owned();
        let prefix = &text[..traversal.verified_len()];

        let correction = match self.corrector.correct(&self.catalog, &text, prefix, explain) {
            Some(correction) => correction,
            None => return SearchOutcome::Failure(DictionaryError::NoCandidateFound(text)),
        };
        debug!(
            "Candidate '{}' ({:?}, prob {})",
            correction.word, correction.tier, correction.prob
        );

        match self
            .trie
            .lookup(correction.word.as_bytes())
            .and_then(Lookup::into_definitions)
        {
            Ok(definitions) => SearchOutcome::Corrected {
                message: correction_notice(correction.rationale.as_deref(), &text, &correction.word),
                word: correction.word,
                definitions,
            },
            Err(e) => {
                debug!("Candidate '{}' is not definable: {}", correction.word, e);
                SearchOutcome::Failure(DictionaryError::NoCandidateDefinable(text))
            }
        }
    }
}

fn correction_notice(rationale: Option<&str>, term: &str, replacement: &str) -> String {
    let mut message = String::new();
    if let Some(rationale) = rationale {
        message.push_str(rationale);
        message.push('\n');
    }
    message.push_str(&format!(
        "Couldn't find '{}'\nUsing '{}' instead.\n",
        term, replacement
    ));
    message
}

/// Run a search on the blocking pool; the receiver yields exactly one outcome
pub fn spawn_search(
    dictionary: Arc<Dictionary>,
    term: impl Into<Vec<u8>>,
    explain: bool,
) -> oneshot::Receiver<SearchOutcome> {
    let (tx, rx) = oneshot::channel();
    let term = term.into();
    tokio::task::spawn_blocking(move || {
        let outcome = dictionary.search(&term, explain);
        // The caller may have stopped waiting; the search still ran to completion
        let _ = tx.send(outcome);
    });
    rx
}

/// Search and wait for the outcome
pub async fn define(
    dictionary: Arc<Dictionary>,
    term: impl Into<Vec<u8>>,
    explain: bool,
) -> Result<SearchOutcome> {
    spawn_search(dictionary, term, explain)
        .await
        .context("Search task ended without an outcome")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::catalog::DEFAULT_PROBABILITY;
    use crate::dictionary::WordRecord;

    fn sample() -> Dictionary {
        vec![
            WordRecord::new("Dog", "(n.) A quadruped of the genus Canis.", 0.004),
            WordRecord::new("Dog", "(v. t.) To hunt; to follow insidiously.", 0.004),
            WordRecord::new("Dogma", "(n.) That which is held as an opinion.", 0.0002),
            WordRecord::new("Superb", "(a.) Grand; magnificent.", 0.0003),
            WordRecord::new("Superlative", "(a.) Lifted above others.", 0.0001),
            WordRecord::new("Supercilious", "(a.) Lofty with pride.", 0.0002),
            WordRecord::new("Ice planet", "(n.) A frozen world.", DEFAULT_PROBABILITY),
            WordRecord::new("Zebra", "(n.) A striped animal.", 0.0001),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_exact_match() {
        let dictionary = sample();
        let outcome = dictionary.search(b"  DOG ", false);
        assert_eq!(
            outcome,
            SearchOutcome::Exact {
                word: "dog".to_string(),
                definitions: vec![
                    "(n.) A quadruped of the genus Canis.".to_string(),
                    "(v. t.) To hunt; to follow insidiously.".to_string(),
                ],
            }
        );
    }

    #[test]
    fn test_exact_match_with_interior_space() {
        let dictionary = sample();
        assert_eq!(dictionary.search(b"ice planet", false).kind(), "exact");
    }

    #[test]
    fn test_single_edit_correction() {
        let dictionary = sample();
        match dictionary.search(b"dogz", false) {
            SearchOutcome::Corrected {
                word,
                definitions,
                message,
            } => {
                assert_eq!(word, "dog");
                assert_eq!(definitions.len(), 2);
                assert_eq!(message, "Couldn't find 'dogz'\nUsing 'dog' instead.\n");
            }
            other => panic!("expected correction, got {other:?}"),
        }
    }

    #[test]
    fn test_replacement_correction_with_rationale() {
        let dictionary = sample();
        match dictionary.search(b"superlitive", true) {
            SearchOutcome::Corrected { word, message, .. } => {
                assert_eq!(word, "superlative");
                assert!(message.starts_with("Debug Message: Solved by manipulating one character."));
                assert!(message.ends_with("Using 'superlative' instead.\n"));
            }
            other => panic!("expected correction, got {other:?}"),
        }
    }

    #[test]
    fn test_prefix_fallback() {
        let dictionary = sample();
        match dictionary.search(b"superduper", true) {
            SearchOutcome::Corrected { word, message, .. } => {
                assert_eq!(word, "superb");
                assert!(message.contains("Solved using prefix: 'super'"));
            }
            other => panic!("expected correction, got {other:?}"),
        }
    }

    #[test]
    fn test_unsupported_character_skips_correction() {
        let dictionary = sample();
        assert_eq!(
            dictionary.search(b"dog!", false),
            SearchOutcome::Failure(DictionaryError::UnsupportedCharacter(b'!'))
        );
        assert_eq!(
            dictionary.search("dög".as_bytes(), false),
            SearchOutcome::Failure(DictionaryError::UnsupportedCharacter(0xC3))
        );
    }

    #[test]
    fn test_no_candidate_found() {
        let dictionary = sample();
        assert_eq!(
            dictionary.search(b"quixotic", false),
            SearchOutcome::Failure(DictionaryError::NoCandidateFound("quixotic".to_string()))
        );
    }

    #[test]
    fn test_candidate_without_definition() {
        use crate::dictionary::catalog::WordCatalog;
        use crate::dictionary::correction::Corrector;
        use crate::dictionary::trie::Trie;

        let trie = Trie::new();
        trie.insert(b"dog", "(n.) A quadruped.").unwrap();
        let catalog: WordCatalog = vec![("dogs".to_string(), 0.5)].into_iter().collect();
        let dictionary = Dictionary {
            trie,
            catalog,
            corrector: Corrector::default(),
        };

        assert_eq!(
            dictionary.search(b"dogz", false),
            SearchOutcome::Failure(DictionaryError::NoCandidateDefinable("dogz".to_string()))
        );
    }

    #[test]
    fn test_empty_term() {
        let dictionary = sample();
        assert_eq!(
            dictionary.search(b"   ", false),
            SearchOutcome::Failure(DictionaryError::EmptySearchTerm)
        );
    }

    #[test]
    fn test_empty_dictionary_reports_no_candidate() {
        let dictionary = Dictionary::default();
        assert_eq!(
            dictionary.search(b"dog", false),
            SearchOutcome::Failure(DictionaryError::NoCandidateFound("dog".to_string()))
        );
    }

    #[test]
    fn test_answer_render() {
        let answer = SearchOutcome::Exact {
            word: "dog".to_string(),
            definitions: vec!["(n.) One.".to_string(), "(v.) Two.".to_string()],
        }
        .into_answer()
        .unwrap();
        assert_eq!(answer.render(), "---\ndog:\n(n.) One.\n(v.) Two.\n");

        let answer = Answer {
            word: "dog".to_string(),
            message: "no newline".to_string(),
            definitions: vec![],
        };
        assert_eq!(answer.render(), "---\nno newline\n");
    }

    #[test]
    fn test_failure_into_answer_is_error() {
        let outcome = SearchOutcome::Failure(DictionaryError::NoCandidateFound("x".into()));
        assert_eq!(
            outcome.into_answer(),
            Err(DictionaryError::NoCandidateFound("x".into()))
        );
    }

    #[tokio::test]
    async fn test_define_delivers_one_outcome() {
        let dictionary = Arc::new(sample());
        let outcome = define(dictionary.clone(), "dogz", false).await.unwrap();
        assert_eq!(outcome.kind(), "corrected");

        let outcome = define(dictionary, b"zebra".to_vec(), false).await.unwrap();
        assert_eq!(outcome.kind(), "exact");
    }

    #[tokio::test]
    async fn test_repeated_searches_are_stable_under_concurrency() {
        let dictionary = Arc::new(sample());
        let expected = dictionary.search(b"dog", false);

        let mut receivers = Vec::new();
        for i in 0..32 {
            let term = if i % 2 == 0 { "dog" } else { "superduper" };
            receivers.push((term, spawn_search(dictionary.clone(), term, i % 3 == 0)));
        }
        for (term, rx) in receivers {
            let outcome = rx.await.unwrap();
            if term == "dog" {
                assert_eq!(outcome, expected);
            } else {
                assert_eq!(outcome.kind(), "corrected");
            }
        }
    }
}
