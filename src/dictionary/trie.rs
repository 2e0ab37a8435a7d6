//! Fixed-alphabet trie holding the vocabulary and its definitions
//!
//! Every node owns one optional child per alphabet symbol. A node is terminal when a
//! stored word ends on it; terminal nodes carry the word's definitions in ingestion
//! order. Words are encoded in full before the tree is touched, so a rejected word
//! never leaves a dangling path behind.

use super::alphabet::{self, ALPHABET_SIZE};
use crate::error::DictionaryError;
use std::sync::{PoisonError, RwLock};

#[derive(Debug)]
pub struct TrieNode {
    children: [Option<Box<TrieNode>>; ALPHABET_SIZE],
    terminal: bool,
    definitions: Vec<String>,
}

impl Default for TrieNode {
    fn default() -> Self {
        Self::new()
    }
}

impl TrieNode {
    pub fn new() -> Self {
        Self {
            children: std::array::from_fn(|_| None),
            terminal: false,
            definitions: Vec::new(),
        }
    }

    fn child(&self, symbol: usize) -> Option<&TrieNode> {
        self.children[symbol].as_deref()
    }

    /// Walk `symbols`, stopping before the first symbol without a child
    fn walk(&self, symbols: &[usize]) -> (&TrieNode, Option<usize>) {
        let mut node = self;
        let mut last_matched = None;
        for (idx, &symbol) in symbols.iter().enumerate() {
            match node.child(symbol) {
                Some(child) => {
                    node = child;
                    last_matched = Some(idx);
                }
                None => break,
            }
        }
        (node, last_matched)
    }
}

/// Where a traversal stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Traversal {
    /// Index of the last character that matched a path, `None` if not even the first did
    pub last_matched: Option<usize>,
    /// Whether the deepest node reached ends a stored word
    pub terminal: bool,
}

impl Traversal {
    /// Length of the verified prefix
    pub fn verified_len(&self) -> usize {
        self.last_matched.map_or(0, |idx| idx + 1)
    }

    /// Terminal node reached by consuming all `len` characters
    pub fn is_exact(&self, len: usize) -> bool {
        self.terminal && len > 0 && self.last_matched == Some(len - 1)
    }
}

/// Result of the exact-match path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    /// All definitions of the word, in insertion order
    Found(Vec<String>),
    /// Not stored; the traversal tells how much of the word is a valid prefix
    Missing(Traversal),
}

impl Lookup {
    /// Definitions of a found word, `NotFound` otherwise
    pub fn into_definitions(self) -> Result<Vec<String>, DictionaryError> {
        match self {
            Lookup::Found(definitions) => Ok(definitions),
            Lookup::Missing(_) => Err(DictionaryError::NotFound),
        }
    }
}

#[derive(Debug)]
struct TrieInner {
    root: TrieNode,
    count: usize,
}

/// The shared word index
#[derive(Debug)]
pub struct Trie {
    inner: RwLock<TrieInner>,
}

impl Default for Trie {
    fn default() -> Self {
        Self::new()
    }
}

impl Trie {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(TrieInner {
                root: TrieNode::new(),
                count: 0,
            }),
        }
    }

    /// Store `definition` under `word`, creating the path on demand.
    ///
    /// Surrounding spaces are dropped, as they are on lookup. Returns `Ok(true)` the
    /// first time `word` becomes a stored word and `Ok(false)` when the definition was
    /// appended to an existing one. A word containing a byte outside the alphabet is
    /// rejected whole with `UnsupportedCharacter`.
    pub fn insert(&self, word: &[u8], definition: impl Into<String>) -> Result<bool, DictionaryError> {
        let word = trim_spaces(word);
        if word.is_empty() {
            return Err(DictionaryError::EmptySearchTerm);
        }
        let symbols = encode_all(word)?;

        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let mut node = &mut inner.root;
        for symbol in symbols {
            node = node.children[symbol].get_or_insert_with(Box::default).as_mut();
        }

        let newly_terminal = !node.terminal;
        node.terminal = true;
        node.definitions.push(definition.into());

        if newly_terminal {
            inner.count += 1;
        }
        Ok(newly_terminal)
    }

    /// Walk `word` as far as the stored paths allow
    pub fn traverse(&self, word: &[u8]) -> Result<Traversal, DictionaryError> {
        self.visit(word, |node, last_matched| Traversal {
            last_matched,
            terminal: node.terminal,
        })
    }

    /// Exact-match lookup; surrounding spaces are ignored
    pub fn lookup(&self, word: &[u8]) -> Result<Lookup, DictionaryError> {
        let word = trim_spaces(word);
        let traversal = self.traverse(word)?;
        if !traversal.is_exact(word.len()) {
            return Ok(Lookup::Missing(traversal));
        }
        // Paths are never removed, so the node found above is still terminal
        let definitions = self.visit(word, |node, _| node.definitions.clone())?;
        Ok(Lookup::Found(definitions))
    }

    /// Encode `word`, walk it under the shared lock and hand the reached node to `f`
    fn visit<R>(
        &self,
        word: &[u8],
        f: impl FnOnce(&TrieNode, Option<usize>) -> R,
    ) -> Result<R, DictionaryError> {
        let symbols = encode_all(word)?;
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        let (node, last_matched) = inner.root.walk(&symbols);
        Ok(f(node, last_matched))
    }

    /// Number of distinct stored words
    pub fn len(&self) -> usize {
        self.inner.read().unwrap_or_else(PoisonError::into_inner).count
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Word count for diagnostic display, e.g. `1,234 words in dictionary`
    pub fn word_count_display(&self) -> String {
        format!("{} words in dictionary", group_thousands(self.len()))
    }
}

fn encode_all(word: &[u8]) -> Result<Vec<usize>, DictionaryError> {
    word.iter().map(|&b| alphabet::encode(b)).collect()
}

/// Strip leading and trailing spaces (only `b' '`)
pub fn trim_spaces(word: &[u8]) -> &[u8] {
    let start = word.iter().position(|&b| b != b' ').unwrap_or(word.len());
    let end = word.iter().rposition(|&b| b != b' ').map_or(start, |idx| idx + 1);
    &word[start..end]
}

fn group_thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
