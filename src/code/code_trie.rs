//! Binary trie over codeword bit patterns.
//!
//! Nodes live in a single arena and are addressed by index. Each node records
//! the codewords terminating at it and, once the trie is complete, a range
//! into a shared pre-order table listing every codeword terminating in its
//! subtree (its *lower* codewords). The *upper* codewords of a bit string,
//! the codewords that are prefixes of it, are collected while walking.

use std::ops::Range;

use crate::code::{Alphabet, CodewordId, bit_index};

/// Index of a node in the trie arena.
pub type NodeId = usize;

const ROOT: NodeId = 0;

/// A node of the code trie.
#[derive(Debug, Clone, Default)]
pub struct TrieNode {
    children: [Option<NodeId>; 2],
    terminals: Vec<CodewordId>,
    lower: Range<usize>,
}

impl TrieNode {
    /// Child reached by `bit` (0 or 1).
    pub fn child(&self, bit: usize) -> Option<NodeId> {
        self.children[bit]
    }

    /// Codewords whose bit pattern ends exactly at this node.
    pub fn terminals(&self) -> &[CodewordId] {
        &self.terminals
    }
}

/// Result of walking a bit string down the trie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrieWalk {
    /// Node matching the whole bit string, if the path exists.
    pub node: Option<NodeId>,
    /// Codewords that are prefixes of the bit string, shortest first.
    pub upper_codewords: Vec<CodewordId>,
}

/// Binary trie over the codewords of an alphabet.
#[derive(Debug, Clone)]
pub struct CodeTrie {
    nodes: Vec<TrieNode>,
    lower_order: Vec<CodewordId>,
}

impl CodeTrie {
    /// Build the trie and its lower-codeword table.
    pub fn build(alphabet: &Alphabet) -> Self {
        let mut trie = CodeTrie {
            nodes: vec![TrieNode::default()],
            lower_order: Vec::with_capacity(alphabet.len()),
        };
        for codeword in alphabet.iter() {
            trie.insert(&codeword.bits, codeword.id);
        }
        trie.index_lower_codewords();
        trie
    }

    fn insert(&mut self, bits: &str, id: CodewordId) {
        let mut node = ROOT;
        for &byte in bits.as_bytes() {
            let bit = bit_index(byte);
            node = match self.nodes[node].children[bit] {
                Some(child) => child,
                None => {
                    self.nodes.push(TrieNode::default());
                    let child = self.nodes.len() - 1;
                    self.nodes[node].children[bit] = Some(child);
                    child
                }
            };
        }
        self.nodes[node].terminals.push(id);
    }

    /// Lay out terminals in pre-order and record each subtree's range.
    ///
    /// A node's range opens before its subtree is emitted and closes after,
    /// so the table is filled in one iterative depth-first pass.
    fn index_lower_codewords(&mut self) {
        self.lower_order.clear();
        let mut stack = vec![(ROOT, false)];
        while let Some((node, closing)) = stack.pop() {
            if closing {
                self.nodes[node].lower.end = self.lower_order.len();
                continue;
            }

            self.nodes[node].lower.start = self.lower_order.len();
            self.lower_order
                .extend_from_slice(&self.nodes[node].terminals);
            stack.push((node, true));
            for child in self.nodes[node].children.iter().rev().flatten() {
                stack.push((*child, false));
            }
        }
    }

    /// Node by id.
    pub fn node(&self, id: NodeId) -> &TrieNode {
        &self.nodes[id]
    }

    /// Number of nodes, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Never true: the root always exists.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node whose path spells exactly `bits`, or `None` if no codeword
    /// continues along that path.
    pub fn find_exact(&self, bits: &str) -> Option<NodeId> {
        bits.as_bytes().iter().try_fold(ROOT, |node, &byte| {
            self.nodes[node].children[bit_index(byte)]
        })
    }

    /// Walk `bits` from the root, collecting every codeword met on the way.
    pub fn find(&self, bits: &str) -> TrieWalk {
        let mut upper_codewords = Vec::new();
        let mut node = Some(ROOT);
        for &byte in bits.as_bytes() {
            node = node.and_then(|n| self.nodes[n].children[bit_index(byte)]);
            match node {
                Some(n) => upper_codewords.extend_from_slice(&self.nodes[n].terminals),
                None => break,
            }
        }
        TrieWalk {
            node,
            upper_codewords,
        }
    }

    /// Codewords that have the path of `node` as a prefix, the node's own
    /// terminals included.
    pub fn lower_codewords(&self, node: NodeId) -> &[CodewordId] {
        &self.lower_order[self.nodes[node].lower.clone()]
    }
}
