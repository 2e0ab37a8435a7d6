//! One-time corpus ingestion
//!
//! Two inputs: a plain-text book used to estimate word frequencies, and a directory of
//! dictionary files with one `Word (pos.) definition` entry per line. Missing or
//! unreadable inputs are logged and degrade to an empty table or index.

use super::catalog::DEFAULT_PROBABILITY;
use super::{Dictionary, DictionaryBuilder, WordRecord};
use crate::error::IngestError;
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Word counts from the frequency corpus
#[derive(Debug, Default)]
pub struct FrequencyTable {
    counts: HashMap<String, u64>,
    total: u64,
}

impl FrequencyTable {
    /// Tokenize `reader`: letters (case-folded), `'` and `-` build words; space and line
    /// ends separate them; every other byte is dropped.
    pub fn from_reader(mut reader: impl BufRead) -> std::io::Result<Self> {
        let mut table = FrequencyTable::default();
        let mut token = Vec::new();
        let mut line = Vec::new();

        loop {
            line.clear();
            if reader.read_until(b'\n', &mut line)? == 0 {
                break;
            }
            for &b in &line {
                match b {
                    b'a'..=b'z' | b'\'' | b'-' => token.push(b),
                    b'A'..=b'Z' => token.push(b.to_ascii_lowercase()),
                    b' ' | b'\n' => table.flush(&mut token),
                    _ => {}
                }
            }
            // Last line without a trailing newline
            table.flush(&mut token);
        }

        Ok(table)
    }

    pub fn from_path(path: &Path) -> Result<Self, IngestError> {
        let file = File::open(path).map_err(|e| IngestError::io(path, e))?;
        Ok(Self::from_reader(BufReader::new(file))?)
    }

    fn flush(&mut self, token: &mut Vec<u8>) {
        if token.is_empty() {
            return;
        }
        // Only ASCII bytes are ever pushed
        let word = String::from_utf8_lossy(token).into_owned();
        *self.counts.entry(word).or_insert(0) += 1;
        self.total += 1;
        token.clear();
    }

    /// Share of all tokens that were `word`, or the default for unseen words
    pub fn probability(&self, word: &str) -> f64 {
        match self.counts.get(word) {
            Some(&count) if self.total > 0 => count as f64 / self.total as f64,
            _ => DEFAULT_PROBABILITY,
        }
    }

    pub fn distinct(&self) -> usize {
        self.counts.len()
    }

    pub fn total(&self) -> u64 {
        self.total
    }
}

/// Split one dictionary line into its word and definition.
///
/// Accepts an optional pair of surrounding double quotes and LF or CRLF endings. The
/// definition starts at the first `(`.
pub fn parse_entry(line: &str) -> Option<(&str, &str)> {
    let line = line.trim_end_matches(['\n', '\r']);
    if line.len() < 3 {
        return None;
    }
    let line = line.strip_prefix('"').unwrap_or(line);
    let line = line.strip_suffix('"').unwrap_or(line);

    let open = line.find('(')?;
    let word = line[..open].trim();
    if word.is_empty() {
        return None;
    }
    Some((word, &line[open..]))
}

/// Totals reported once ingestion finishes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestReport {
    pub files: usize,
    pub words: usize,
    pub definitions: usize,
    pub skipped: usize,
    pub catalog_entries: usize,
    pub frequency_tokens: u64,
}

/// Build the dictionary from the corpus. Never fails; problems are logged.
pub fn load_dictionary(dictionary_dir: &Path, frequency_corpus: &Path) -> (Dictionary, IngestReport) {
    let frequencies = match FrequencyTable::from_path(frequency_corpus) {
        Ok(table) => {
            info!(
                "Loaded frequency corpus {}: {} tokens, {} distinct words",
                frequency_corpus.display(),
                table.total(),
                table.distinct()
            );
            table
        }
        Err(e) => {
            warn!("Frequency corpus unavailable, using default probabilities: {}", e);
            FrequencyTable::default()
        }
    };

    let mut builder = Dictionary::builder();
    let mut report = IngestReport {
        frequency_tokens: frequencies.total(),
        ..IngestReport::default()
    };

    match dictionary_files(dictionary_dir) {
        Ok(files) => {
            for path in files {
                match ingest_file(&path, &frequencies, &mut builder) {
                    Ok(entries) => {
                        report.files += 1;
                        debug!("Ingested {} entries from {}", entries, path.display());
                    }
                    Err(e) => warn!("Skipping dictionary file: {}", e),
                }
            }
        }
        Err(e) => warn!("Dictionary directory unavailable, starting with an empty index: {}", e),
    }

    report.definitions = builder.definitions();
    report.skipped = builder.skipped();
    let dictionary = builder.build();
    report.words = dictionary.word_count();
    report.catalog_entries = dictionary.catalog().len();

    info!(
        "Dictionary ready: {} words, {} definitions, {} skipped, {} catalog entries from {} files",
        report.words, report.definitions, report.skipped, report.catalog_entries, report.files
    );
    if dictionary.is_empty() {
        warn!("Dictionary is empty; every search will fail");
    }

    (dictionary, report)
}

/// Regular files of `dir`, in file-name order
fn dictionary_files(dir: &Path) -> Result<Vec<PathBuf>, IngestError> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| IngestError::io(dir, e))? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            files.push(entry.path());
        }
    }
    files.sort();
    Ok(files)
}

fn ingest_file(
    path: &Path,
    frequencies: &FrequencyTable,
    builder: &mut DictionaryBuilder,
) -> Result<usize, IngestError> {
    let file = File::open(path).map_err(|e| IngestError::io(path, e))?;
    let mut reader = BufReader::new(file);
    let mut raw = Vec::new();
    let mut entries = 0;

    loop {
        raw.clear();
        let read = reader
            .read_until(b'\n', &mut raw)
            .map_err(|e| IngestError::io(path, e))?;
        if read == 0 {
            break;
        }

        let line = String::from_utf8_lossy(&raw);
        let Some((word, definition)) = parse_entry(&line) else {
            continue;
        };

        let prob = frequencies.probability(&word.to_ascii_lowercase());
        match builder.add(WordRecord::new(word, definition, prob)) {
            Ok(_) => entries += 1,
            Err(e) => debug!("Dropped '{}': {}", word, e),
        }
    }

    Ok(entries)
}
