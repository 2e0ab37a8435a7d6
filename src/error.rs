//! Error types for the dictionary core and its ingestion step

use std::path::PathBuf;
use thiserror::Error;

/// Failures a search (or an insert) can report
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DictionaryError {
    /// Byte outside the 39-symbol alphabet
    #[error("Dictionary can't handle this character: {}", describe_byte(*.0))]
    UnsupportedCharacter(u8),
    /// Internal signal from the exact-match path; triggers correction
    #[error("Word not found")]
    NotFound,
    #[error("Couldn't find '{0}' and no similar word was found")]
    NoCandidateFound(String),
    #[error("Couldn't find '{0}' and the closest word has no definition")]
    NoCandidateDefinable(String),
    #[error("Search term is empty")]
    EmptySearchTerm,
}

impl DictionaryError {
    /// Stable code used in HTTP error bodies
    pub fn error_code(&self) -> &'static str {
        match self {
            DictionaryError::UnsupportedCharacter(_) => "unsupported_character",
            DictionaryError::NotFound => "not_found",
            DictionaryError::NoCandidateFound(_) => "no_candidate_found",
            DictionaryError::NoCandidateDefinable(_) => "no_candidate_definable",
            DictionaryError::EmptySearchTerm => "empty_search_term",
        }
    }

    /// Get the error message
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Process exit code for the one-shot CLI
    pub fn exit_code(&self) -> i32 {
        match self {
            DictionaryError::UnsupportedCharacter(_) | DictionaryError::EmptySearchTerm => 1,
            DictionaryError::NotFound
            | DictionaryError::NoCandidateFound(_)
            | DictionaryError::NoCandidateDefinable(_) => 3,
        }
    }
}

fn describe_byte(b: u8) -> String {
    if b.is_ascii_graphic() {
        format!("'{}'", b as char)
    } else {
        format!("0x{:02x}", b)
    }
}

/// Corpus loading failures; logged and degraded, never fatal
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("I/O error: {0}")]
    Other(#[from] std::io::Error),
}

impl IngestError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        IngestError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Reject terms no search could ever answer
pub fn validate_search_term(term: &str) -> Result<(), DictionaryError> {
    if term.trim_matches(' ').is_empty() {
        return Err(DictionaryError::EmptySearchTerm);
    }
    Ok(())
}
