//! Single-edit spelling correction over the word catalog
//!
//! Candidates must share the input's first letter. Three tiers are tracked in one pass
//! over a catalog snapshot and resolved in order:
//!
//! 1. one edit away (deletion, adjacent transposition, replacement, insertion or
//!    trailing append), highest probability wins
//! 2. starts with the verified prefix, highest probability wins
//! 3. inside the length window but not one edit away, highest probability wins

use super::catalog::{CatalogEntry, WordCatalog};
use tracing::debug;

/// Which rule produced a correction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    SingleEdit,
    Prefix,
    SameInitial,
}

/// Replacement word chosen for a failed lookup
#[derive(Debug, Clone, PartialEq)]
pub struct Correction {
    pub word: String,
    pub prob: f64,
    pub tier: Tier,
    /// Human-readable explanation, only produced when asked for
    pub rationale: Option<String>,
}

/// Correction engine settings
#[derive(Debug, Clone)]
pub struct Corrector {
    /// Largest length difference a tier 1 or tier 3 candidate may have
    pub max_length_delta: usize,
}

impl Default for Corrector {
    fn default() -> Self {
        Self { max_length_delta: 2 }
    }
}

impl Corrector {
    /// Find the best replacement for `input` given the `prefix` the trie verified
    pub fn correct(
        &self,
        catalog: &WordCatalog,
        input: &str,
        prefix: &str,
        explain: bool,
    ) -> Option<Correction> {
        let input = input.to_ascii_lowercase();
        let prefix = prefix.to_ascii_lowercase();
        let first = *input.as_bytes().first()?;

        let low = input.len().saturating_sub(self.max_length_delta);
        let high = input.len() + self.max_length_delta;

        let snapshot = catalog.snapshot();

        let mut single_edit: Option<&CatalogEntry> = None;
        let mut by_prefix: Option<&CatalogEntry> = None;
        let mut same_initial: Option<&CatalogEntry> = None;

        for entry in &snapshot {
            let word = entry.word.as_bytes();
            if word.first() != Some(&first) {
                continue;
            }

            if (low..=high).contains(&word.len()) {
                if is_single_edit(input.as_bytes(), word) {
                    // Ties go to the later word in catalog order
                    if single_edit.map_or(true, |best| entry.prob >= best.prob) {
                        single_edit = Some(entry);
                    }
                } else if same_initial.map_or(true, |best| entry.prob > best.prob) {
                    same_initial = Some(entry);
                }
            }

            if word.starts_with(prefix.as_bytes())
                && by_prefix.map_or(true, |best| entry.prob > best.prob)
            {
                by_prefix = Some(entry);
            }
        }

        let (entry, tier) = single_edit
            .map(|e| (e, Tier::SingleEdit))
            .or_else(|| by_prefix.map(|e| (e, Tier::Prefix)))
            .or_else(|| same_initial.map(|e| (e, Tier::SameInitial)))?;

        debug!(
            "Corrected '{}' to '{}' via {:?} (scanned {} entries)",
            input,
            entry.word,
            tier,
            snapshot.len()
        );

        let rationale = explain.then(|| describe(tier, entry.prob, &prefix, first));
        Some(Correction {
            word: entry.word.clone(),
            prob: entry.prob,
            tier,
            rationale,
        })
    }
}

fn describe(tier: Tier, prob: f64, prefix: &str, first: u8) -> String {
    let percent = format_percent(prob);
    match tier {
        Tier::SingleEdit => format!(
            "Debug Message: Solved by manipulating one character. Prob: {}%",
            percent
        ),
        Tier::Prefix => format!(
            "Debug Message: Solved using prefix: '{}'. Prob: {}%",
            prefix, percent
        ),
        Tier::SameInitial => format!(
            "Debug Message: Best guess using all '{}' words. Prob: {}%",
            first as char, percent
        ),
    }
}

fn format_percent(prob: f64) -> String {
    let formatted = format!("{:.6}", prob * 100.0);
    formatted
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}

/// Whether `word` is exactly one edit away from `input`.
///
/// Edits never touch the first character; transpositions only swap pairs starting at
/// the second character. Insertions and replacements only introduce `a`-`z`.
pub fn is_single_edit(input: &[u8], word: &[u8]) -> bool {
    if input == word {
        return false;
    }
    if word.len() + 1 == input.len() {
        is_deletion(input, word)
    } else if word.len() == input.len() {
        is_replacement(input, word) || is_transposition(input, word)
    } else if word.len() == input.len() + 1 {
        is_insertion(input, word)
    } else {
        false
    }
}

fn is_deletion(input: &[u8], word: &[u8]) -> bool {
    (1..input.len()).any(|i| word[..i] == input[..i] && word[i..] == input[i + 1..])
}

fn is_replacement(input: &[u8], word: &[u8]) -> bool {
    let mut diffs = input.iter().zip(word).enumerate().filter(|(_, (a, b))| a != b);
    match (diffs.next(), diffs.next()) {
        (Some((i, (_, &b))), None) => i >= 1 && b.is_ascii_lowercase(),
        _ => false,
    }
}

fn is_transposition(input: &[u8], word: &[u8]) -> bool {
    let diffs: Vec<usize> = (0..input.len()).filter(|&i| input[i] != word[i]).collect();
    match diffs.as_slice() {
        &[a, b] => a >= 1 && b == a + 1 && input[a] == word[b] && input[b] == word[a],
        _ => false,
    }
}

fn is_insertion(input: &[u8], word: &[u8]) -> bool {
    (1..=input.len()).any(|i| {
        word[..i] == input[..i] && word[i].is_ascii_lowercase() && word[i + 1..] == input[i..]
    })
}
