//! Codeword alphabets and the indexes built over them.
//!
//! An [`Alphabet`] is the validated, immutable list of elementary codewords a
//! check runs against. Two read-only indexes are derived from it for every
//! check:
//!
//! - [`BitSuffixIndex`](suffix_index::BitSuffixIndex) enumerates every distinct
//!   trailing bit pattern of every codeword.
//! - [`CodeTrie`](code_trie::CodeTrie) answers prefix relations between a bit
//!   string and the codewords.

pub mod code_trie;
pub mod suffix_index;

use serde::{Deserialize, Serialize};

use crate::error::{BicodeError, Result};

pub use code_trie::{CodeTrie, TrieNode, TrieWalk};
pub use suffix_index::{BitSuffixIndex, EMPTY_SUFFIX, Suffix, SuffixId};

/// Identifier of a codeword: its position in the alphabet.
pub type CodewordId = usize;

/// One elementary codeword of the alphabet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Codeword {
    /// Position of the codeword in its alphabet.
    pub id: CodewordId,
    /// Bit pattern, a non-empty string over `{0, 1}`.
    pub bits: String,
}

impl Codeword {
    /// Length of the codeword in bits.
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// Always false for codewords of a validated alphabet.
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Bit at `position` as a child index (0 or 1).
    pub fn bit(&self, position: usize) -> usize {
        bit_index(self.bits.as_bytes()[position])
    }
}

/// Converts an ASCII `'0'`/`'1'` byte into a child index.
#[inline]
pub(crate) fn bit_index(byte: u8) -> usize {
    (byte - b'0') as usize
}

/// A validated codeword alphabet.
///
/// Construction rejects the inputs the checker cannot reason about: an empty
/// alphabet, zero-length codewords and characters other than `0`/`1`.
/// Duplicate codewords are accepted; they make the code trivially
/// non-bijective and the checker reports them as such.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    codewords: Vec<Codeword>,
}

impl Alphabet {
    /// Validate and wrap a list of bit strings.
    ///
    /// # Examples
    ///
    /// ```
    /// use bicode::code::Alphabet;
    ///
    /// let alphabet = Alphabet::new(["0", "10", "11"]).unwrap();
    /// assert_eq!(alphabet.len(), 3);
    /// assert_eq!(alphabet.encode(&[1, 0, 2]).unwrap(), "10011");
    ///
    /// assert!(Alphabet::new(Vec::<String>::new()).is_err());
    /// assert!(Alphabet::new(["0", ""]).is_err());
    /// assert!(Alphabet::new(["0", "12"]).is_err());
    /// ```
    pub fn new<I, S>(codewords: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut validated = Vec::new();
        for (id, bits) in codewords.into_iter().enumerate() {
            let bits = bits.as_ref();
            if bits.is_empty() {
                return Err(BicodeError::EmptyCodeword { id });
            }
            if let Some(found) = bits.chars().find(|c| *c != '0' && *c != '1') {
                return Err(BicodeError::InvalidBit { id, found });
            }
            validated.push(Codeword {
                id,
                bits: bits.to_string(),
            });
        }

        if validated.is_empty() {
            return Err(BicodeError::EmptyAlphabet);
        }

        Ok(Alphabet {
            codewords: validated,
        })
    }

    /// Number of codewords.
    pub fn len(&self) -> usize {
        self.codewords.len()
    }

    /// Always false: empty alphabets are rejected by [`Alphabet::new`].
    pub fn is_empty(&self) -> bool {
        self.codewords.is_empty()
    }

    /// Codeword by id.
    pub fn get(&self, id: CodewordId) -> Option<&Codeword> {
        self.codewords.get(id)
    }

    /// Codeword by id, panicking on ids outside the alphabet.
    pub(crate) fn codeword(&self, id: CodewordId) -> &Codeword {
        &self.codewords[id]
    }

    /// Iterate over the codewords in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Codeword> {
        self.codewords.iter()
    }

    /// Total number of bits over all codewords.
    pub fn total_length(&self) -> usize {
        self.codewords.iter().map(Codeword::len).sum()
    }

    /// Length of the longest codeword.
    pub fn max_length(&self) -> usize {
        self.codewords.iter().map(Codeword::len).max().unwrap_or(0)
    }

    /// Concatenate the bit patterns of a codeword sequence.
    ///
    /// Returns `None` if the sequence refers to an id outside the alphabet.
    pub fn encode(&self, word: &[CodewordId]) -> Option<String> {
        let mut encoded = String::new();
        for &id in word {
            encoded.push_str(&self.get(id)?.bits);
        }
        Some(encoded)
    }

    /// True if no codeword is a prefix of another one.
    pub fn is_prefix_free(&self) -> bool {
        self.codewords.iter().all(|a| {
            self.codewords
                .iter()
                .all(|b| a.id == b.id || !b.bits.starts_with(&a.bits))
        })
    }
}
