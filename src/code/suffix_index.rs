//! Index of all codeword suffixes.
//!
//! Every trailing bit pattern of every codeword becomes one [`Suffix`]. Codewords
//! sharing a trailing pattern share the suffix, so a suffix id identifies a bit
//! string rather than a (codeword, offset) pair. The empty suffix is owned by
//! every codeword and always has id [`EMPTY_SUFFIX`], which lets deficit ids use
//! `0` for the identity deficit.
//!
//! Construction inserts every suffix into a binary trie keyed by the suffix
//! bits. This is quadratic in the total code length, which is negligible next
//! to the synonymy search.

use serde::{Deserialize, Serialize};

use crate::code::{Alphabet, CodewordId, bit_index};

/// Identifier of a distinct suffix.
pub type SuffixId = usize;

/// Id of the empty suffix.
pub const EMPTY_SUFFIX: SuffixId = 0;

/// A trailing bit pattern shared by one or more codewords.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suffix {
    /// Stable id, dense from 0.
    pub id: SuffixId,
    /// Length of the suffix in bits.
    pub length: usize,
    /// Codewords ending with this suffix, in insertion order.
    pub owners: Vec<CodewordId>,
}

impl Suffix {
    /// Bit pattern of this suffix, borrowed from its first owner.
    pub fn bits<'a>(&self, alphabet: &'a Alphabet) -> &'a str {
        let owner = &alphabet.codeword(self.owners[0]).bits;
        &owner[owner.len() - self.length..]
    }
}

/// All suffixes of an alphabet, plus each codeword's suffix chain.
#[derive(Debug, Clone)]
pub struct BitSuffixIndex {
    suffixes: Vec<Suffix>,
    /// For each codeword, suffix ids from the full word down to the empty suffix.
    chains: Vec<Vec<SuffixId>>,
}

impl BitSuffixIndex {
    /// Build the index for an alphabet.
    pub fn build(alphabet: &Alphabet) -> Self {
        let mut suffixes = vec![Suffix {
            id: EMPTY_SUFFIX,
            length: 0,
            owners: Vec::with_capacity(alphabet.len()),
        }];
        let mut chains = Vec::with_capacity(alphabet.len());

        // Trie over suffix bits: children[node] = [child on 0, child on 1].
        let mut children: Vec<[Option<usize>; 2]> = vec![[None, None]];
        let mut content: Vec<Option<SuffixId>> = vec![Some(EMPTY_SUFFIX)];

        for codeword in alphabet.iter() {
            let bytes = codeword.bits.as_bytes();
            let mut chain = Vec::with_capacity(bytes.len() + 1);

            for split in 0..bytes.len() {
                let mut node = 0;
                for &byte in &bytes[split..] {
                    let bit = bit_index(byte);
                    node = match children[node][bit] {
                        Some(child) => child,
                        None => {
                            children.push([None, None]);
                            content.push(None);
                            let child = children.len() - 1;
                            children[node][bit] = Some(child);
                            child
                        }
                    };
                }

                let suffix_id = match content[node] {
                    Some(id) => {
                        suffixes[id].owners.push(codeword.id);
                        id
                    }
                    None => {
                        let id = suffixes.len();
                        suffixes.push(Suffix {
                            id,
                            length: bytes.len() - split,
                            owners: vec![codeword.id],
                        });
                        content[node] = Some(id);
                        id
                    }
                };
                chain.push(suffix_id);
            }

            chain.push(EMPTY_SUFFIX);
            suffixes[EMPTY_SUFFIX].owners.push(codeword.id);
            chains.push(chain);
        }

        BitSuffixIndex { suffixes, chains }
    }

    /// Number of distinct suffixes, the empty one included.
    pub fn len(&self) -> usize {
        self.suffixes.len()
    }

    /// Never true: the empty suffix is always present.
    pub fn is_empty(&self) -> bool {
        self.suffixes.is_empty()
    }

    /// Suffix by id.
    pub fn suffix(&self, id: SuffixId) -> &Suffix {
        &self.suffixes[id]
    }

    /// All suffixes in id order.
    pub fn suffixes(&self) -> &[Suffix] {
        &self.suffixes
    }

    /// Suffix chain of a codeword, longest first, ending with the empty suffix.
    pub fn chain(&self, codeword: CodewordId) -> &[SuffixId] {
        &self.chains[codeword]
    }

    /// Suffix of `codeword` left after dropping its first `offset` bits.
    pub fn suffix_at(&self, codeword: CodewordId, offset: usize) -> SuffixId {
        self.chains[codeword][offset]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bits_of(index: &BitSuffixIndex, alphabet: &Alphabet, id: SuffixId) -> String {
        index.suffix(id).bits(alphabet).to_string()
    }

    #[test]
    fn test_suffixes_are_shared() {
        let alphabet = Alphabet::new(["0", "01", "10"]).unwrap();
        let index = BitSuffixIndex::build(&alphabet);

        // "", "0", "01", "1", "10"
        assert_eq!(index.len(), 5);
        assert_eq!(index.suffix(EMPTY_SUFFIX).length, 0);
        assert_eq!(index.suffix(EMPTY_SUFFIX).owners, vec![0, 1, 2]);

        // "0" is the whole of codeword 0 and the tail of codeword 2.
        let zero = index.chain(0)[0];
        assert_eq!(index.chain(2)[1], zero);
        assert_eq!(index.suffix(zero).owners, vec![0, 2]);
        assert_eq!(bits_of(&index, &alphabet, zero), "0");
    }

    #[test]
    fn test_chain_order() {
        let alphabet = Alphabet::new(["01011", "11"]).unwrap();
        let index = BitSuffixIndex::build(&alphabet);

        let chain: Vec<String> = index
            .chain(0)
            .iter()
            .map(|&id| bits_of(&index, &alphabet, id))
            .collect();
        assert_eq!(chain, vec!["01011", "1011", "011", "11", "1", ""]);

        for (offset, &id) in index.chain(0).iter().enumerate() {
            assert_eq!(index.suffix(id).length, 5 - offset);
            assert_eq!(index.suffix_at(0, offset), id);
        }

        // "11" and "1" are shared with the second codeword.
        assert_eq!(index.chain(1)[0], index.chain(0)[3]);
        assert_eq!(index.chain(1)[1], index.chain(0)[4]);
    }

    #[test]
    fn test_ids_are_dense_and_unique() {
        let alphabet = Alphabet::new(["110", "0110", "10", "1"]).unwrap();
        let index = BitSuffixIndex::build(&alphabet);

        for (position, suffix) in index.suffixes().iter().enumerate() {
            assert_eq!(suffix.id, position);
        }

        let mut seen: Vec<String> = index
            .suffixes()
            .iter()
            .map(|s| s.bits(&alphabet).to_string())
            .collect();
        let total = seen.len();
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), total);
    }
}
