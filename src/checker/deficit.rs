//! Deficit automaton construction.
//!
//! While two decompositions of the same bit string are compared codeword by
//! codeword, one of them is usually a few bits ahead. The bits it is ahead by
//! are always a suffix of the codeword it read last, so the whole mismatch is
//! captured by a signed suffix id, the *deficit*:
//!
//! - `0` is the identity deficit: both decompositions end at the same bit.
//! - `-i`: the lower decomposition is ahead by suffix `i`.
//! - `+i`: the upper decomposition is ahead by suffix `i`.
//!
//! The side that is behind reads the next codeword; at the identity deficit
//! the lower side reads. Reading codeword `c` while behind by `alpha` either
//! stays behind (`alpha = c + beta`, the *isotropic* case) or overtakes
//! (`c = alpha + beta`, the *antitropic* case, which flips the sign).
//!
//! The builder closes these rules over a work queue starting from the
//! identity deficit. The space is finite, `2S - 1` deficits for `S` suffixes,
//! so the closure always terminates.

use std::collections::VecDeque;

use bit_vec::BitVec;
use log::debug;

use crate::automaton::{Automaton, StateId};
use crate::code::{Alphabet, BitSuffixIndex, CodeTrie, CodewordId, EMPTY_SUFFIX, SuffixId};

/// Signed deficit value.
pub type Deficit = isize;

/// Maps signed deficits to dense automaton state ids and back.
///
/// Deficit `d` lives in state `d + (S - 1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeficitSpace {
    n_suffixes: usize,
}

impl DeficitSpace {
    /// Space for an index of `n_suffixes` suffixes, the empty one included.
    pub fn new(n_suffixes: usize) -> Self {
        DeficitSpace {
            n_suffixes: n_suffixes.max(1),
        }
    }

    /// Number of deficits, `2S - 1`.
    pub fn len(&self) -> usize {
        2 * self.n_suffixes - 1
    }

    /// Never true: the identity deficit always exists.
    pub fn is_empty(&self) -> bool {
        false
    }

    fn offset(&self) -> usize {
        self.n_suffixes - 1
    }

    /// State of the identity deficit.
    pub fn identity(&self) -> StateId {
        self.offset()
    }

    /// State holding deficit `deficit`.
    pub fn state(&self, deficit: Deficit) -> StateId {
        (deficit + self.offset() as isize) as StateId
    }

    /// Deficit held by `state`.
    pub fn deficit(&self, state: StateId) -> Deficit {
        state as isize - self.offset() as isize
    }

    /// Signed deficit for a suffix, `positive` selecting the upper side.
    pub fn signed(&self, suffix: SuffixId, positive: bool) -> StateId {
        let deficit = suffix as isize;
        self.state(if positive { deficit } else { -deficit })
    }
}

/// Human-readable deficit: `0`, `+3`, `-2`.
pub fn deficit_name(deficit: Deficit) -> String {
    if deficit == 0 {
        "0".to_string()
    } else {
        format!("{deficit:+}")
    }
}

/// The deficit automaton. Transitions are labeled by the codeword read.
#[derive(Debug, Clone)]
pub struct DeficitAutomaton {
    space: DeficitSpace,
    automaton: Automaton<CodewordId>,
    discovered: usize,
    pruned: usize,
}

impl DeficitAutomaton {
    /// Deficit/state mapping.
    pub fn space(&self) -> DeficitSpace {
        self.space
    }

    /// Underlying automaton. Every deficit has a state slot; unreached or
    /// pruned deficits are tombstoned.
    pub fn automaton(&self) -> &Automaton<CodewordId> {
        &self.automaton
    }

    /// State of the identity deficit.
    pub fn identity(&self) -> StateId {
        self.space.identity()
    }

    /// Deficit held by `state`.
    pub fn deficit(&self, state: StateId) -> Deficit {
        self.space.deficit(state)
    }

    /// Number of deficits reached by the closure, before pruning.
    pub fn discovered(&self) -> usize {
        self.discovered
    }

    /// Number of deficits removed by pruning.
    pub fn pruned(&self) -> usize {
        self.pruned
    }

    /// Deficits reachable by reading `codeword` at `deficit`.
    pub fn successors(&self, deficit: Deficit, codeword: CodewordId) -> Vec<Deficit> {
        self.automaton
            .forward(self.space.state(deficit))
            .filter(|t| t.event == codeword)
            .map(|t| self.space.deficit(t.to))
            .collect()
    }

    /// Graphviz rendering, states named by signed deficit.
    pub fn to_dot(&self) -> String {
        self.automaton.to_dot(
            "deficits",
            |state| deficit_name(self.space.deficit(state)),
            |codeword| codeword.to_string(),
        )
    }
}

/// Builds the [`DeficitAutomaton`] of an alphabet.
///
/// # Examples
///
/// ```
/// use bicode::checker::deficit::DeficitAutomatonBuilder;
/// use bicode::code::{Alphabet, BitSuffixIndex, CodeTrie};
///
/// let alphabet = Alphabet::new(["0", "01", "10"]).unwrap();
/// let index = BitSuffixIndex::build(&alphabet);
/// let trie = CodeTrie::build(&alphabet);
///
/// let deficits = DeficitAutomatonBuilder::new(&alphabet, &index, &trie).build();
/// // Reading "0" at the identity puts the lower side one suffix ahead.
/// let zero = index.chain(0)[0] as isize;
/// assert_eq!(deficits.successors(0, 0), vec![-zero]);
/// ```
pub struct DeficitAutomatonBuilder<'a> {
    alphabet: &'a Alphabet,
    index: &'a BitSuffixIndex,
    trie: &'a CodeTrie,
    prune: bool,
}

impl<'a> DeficitAutomatonBuilder<'a> {
    /// Builder over prebuilt indexes of `alphabet`. Pruning is on by default.
    pub fn new(alphabet: &'a Alphabet, index: &'a BitSuffixIndex, trie: &'a CodeTrie) -> Self {
        DeficitAutomatonBuilder {
            alphabet,
            index,
            trie,
            prune: true,
        }
    }

    /// Enable or disable removal of deficits that cannot return to identity.
    pub fn with_pruning(mut self, prune: bool) -> Self {
        self.prune = prune;
        self
    }

    /// Run the closure.
    pub fn build(self) -> DeficitAutomaton {
        let space = DeficitSpace::new(self.index.len());
        let mut automaton = Automaton::new();
        automaton.add_states(space.len());

        let identity = space.identity();
        let mut discovered = BitVec::from_elem(space.len(), false);
        discovered.set(identity, true);
        let mut queue = VecDeque::from([identity]);

        while let Some(state) = queue.pop_front() {
            for (target, codeword) in self.derive(space, state) {
                automaton.add_transition(state, target, codeword);
                if !discovered[target] {
                    discovered.set(target, true);
                    queue.push_back(target);
                }
            }
        }

        let reached = discovered.iter().filter(|d| *d).count();
        for state in 0..space.len() {
            if !discovered[state] {
                automaton.del_state(state);
            }
        }
        debug!(
            "Deficit closure reached {} of {} deficits with {} transitions",
            reached,
            space.len(),
            automaton.number_transitions()
        );

        let pruned = if self.prune {
            let pruned = automaton.remove_unreachable_states(identity);
            debug!(
                "Pruned {} deficits, {} remain with {} transitions",
                pruned,
                automaton.number_states(),
                automaton.number_transitions()
            );
            pruned
        } else {
            0
        };

        DeficitAutomaton {
            space,
            automaton,
            discovered: reached,
            pruned,
        }
    }

    /// Outgoing `(target state, codeword)` pairs of a deficit.
    fn derive(&self, space: DeficitSpace, state: StateId) -> Vec<(StateId, CodewordId)> {
        let deficit = space.deficit(state);
        if deficit == 0 {
            return self.seed(space);
        }

        let alpha = deficit.unsigned_abs();
        let positive = deficit > 0;
        let mut targets = self.isotropic(space, alpha, positive);
        targets.extend(self.antitropic(space, alpha, positive));
        targets
    }

    /// Identity: the lower side reads any codeword and gets ahead by all of it.
    fn seed(&self, space: DeficitSpace) -> Vec<(StateId, CodewordId)> {
        self.alphabet
            .iter()
            .map(|codeword| {
                let full = self.index.suffix_at(codeword.id, 0);
                (space.signed(full, false), codeword.id)
            })
            .collect()
    }

    /// `alpha = c + beta`: the reading side is still behind by `beta`.
    fn isotropic(
        &self,
        space: DeficitSpace,
        alpha: SuffixId,
        positive: bool,
    ) -> Vec<(StateId, CodewordId)> {
        let suffix = self.index.suffix(alpha);
        let owner = suffix.owners[0];
        let start = self.alphabet.codeword(owner).len() - suffix.length;

        self.trie
            .find(suffix.bits(self.alphabet))
            .upper_codewords
            .into_iter()
            .map(|codeword| {
                let beta = self
                    .index
                    .suffix_at(owner, start + self.alphabet.codeword(codeword).len());
                (space.signed(beta, positive), codeword)
            })
            .collect()
    }

    /// `c = alpha + beta`: the reading side overtakes by `beta`.
    fn antitropic(
        &self,
        space: DeficitSpace,
        alpha: SuffixId,
        positive: bool,
    ) -> Vec<(StateId, CodewordId)> {
        let suffix = self.index.suffix(alpha);
        let Some(node) = self.trie.find_exact(suffix.bits(self.alphabet)) else {
            return Vec::new();
        };

        self.trie
            .lower_codewords(node)
            .iter()
            .filter_map(|&codeword| {
                let beta = self.index.suffix_at(codeword, suffix.length);
                // An exact match is already the isotropic return to identity.
                (beta != EMPTY_SUFFIX).then(|| (space.signed(beta, !positive), codeword))
            })
            .collect()
    }
}
