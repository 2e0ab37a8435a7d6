//! Alphabet codec shared by trie construction and traversal
//!
//! 39 symbols: `a`-`z`, hyphen, apostrophe, interior space and `0`-`9`.

use crate::error::DictionaryError;

/// Number of distinct symbols, and so the fan-out of every trie node
pub const ALPHABET_SIZE: usize = 39;

/// Map one input byte to its dense index, folding ASCII uppercase first
#[inline]
pub fn encode(byte: u8) -> Result<usize, DictionaryError> {
    match byte.to_ascii_lowercase() {
        b @ b'a'..=b'z' => Ok((b - b'a') as usize),
        b'-' => Ok(26),
        b'\'' => Ok(27),
        b' ' => Ok(28),
        b @ b'0'..=b'9' => Ok((b - b'0') as usize + 29),
        _ => Err(DictionaryError::UnsupportedCharacter(byte)),
    }
}
