//! Width-bounded search for a non-trivial synonymy loop.
//!
//! Paths are explored breadth first from `(identity, start, start)`, so the
//! first violation found is a shortest one. A path is *trivial* while its
//! events pair up as `Lower(c), Upper(c)`: both copies are reading the same
//! message. Trivial paths must be simple and carry their own trace of visited
//! states. Once a path breaks the pairing it stays non-trivial forever, and
//! non-trivial paths share one global set of claimed states, since what can
//! follow a state no longer depends on how it was reached.
//!
//! Reaching the target on a non-trivial path is a violation. The two
//! witnesses are read back from the path: lower events form the first
//! message, upper events the second.

use std::collections::VecDeque;

use bit_vec::BitVec;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::automaton::StateId;
use crate::checker::synonymy::{SynonymyAutomaton, SynonymyEvent};
use crate::code::CodewordId;

/// Two distinct legal messages with the same encoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WitnessPair {
    pub witness_a: Vec<CodewordId>,
    pub witness_b: Vec<CodewordId>,
}

/// Outcome of a bijectivity check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    /// Every legal message decodes uniquely.
    IsBijective,
    /// Two legal messages share an encoding.
    NotBijective(WitnessPair),
    /// The search frontier outgrew the width limit. Inconclusive.
    WidthOut,
}

impl Verdict {
    /// Stable uppercase name, as printed by the CLI.
    pub fn name(&self) -> &'static str {
        match self {
            Verdict::IsBijective => "IS_BIJECTIVE",
            Verdict::NotBijective(_) => "NOT_BIJECTIVE",
            Verdict::WidthOut => "WIDTH_OUT",
        }
    }

    /// Witnesses of a violation, if any.
    pub fn witnesses(&self) -> Option<&WitnessPair> {
        match self {
            Verdict::NotBijective(pair) => Some(pair),
            _ => None,
        }
    }
}

/// Counters collected during the search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoopSearchStats {
    /// Paths popped from the frontier.
    pub paths_expanded: usize,
    /// Largest frontier size seen.
    pub frontier_peak: usize,
    /// Path steps recorded.
    pub steps: usize,
}

#[derive(Debug, Clone, Copy)]
struct PathStep {
    parent: Option<usize>,
    event: SynonymyEvent,
}

#[derive(Debug, Clone)]
enum PathKind {
    Trivial {
        pending: Option<SynonymyEvent>,
        trace: BitVec,
    },
    NonTrivial,
}

#[derive(Debug, Clone)]
struct PathHead {
    state: StateId,
    step: Option<usize>,
    kind: PathKind,
}

/// Searches a [`SynonymyAutomaton`] for a bijectivity violation.
///
/// # Examples
///
/// ```
/// use bicode::checker::SynonymyLoopFinder;
/// use bicode::checker::deficit::DeficitAutomatonBuilder;
/// use bicode::checker::synonymy::SynonymyAutomatonBuilder;
/// use bicode::code::{Alphabet, BitSuffixIndex, CodeTrie};
/// use bicode::grammar::{CodeStateMachine, GrammarTable};
///
/// let alphabet = Alphabet::new(["0", "01", "10"]).unwrap();
/// let index = BitSuffixIndex::build(&alphabet);
/// let trie = CodeTrie::build(&alphabet);
/// let deficits = DeficitAutomatonBuilder::new(&alphabet, &index, &trie).build();
/// let table = GrammarTable::build(&CodeStateMachine::all_words(3), 3).unwrap();
/// let synonymy = SynonymyAutomatonBuilder::new(&deficits, &table).build();
///
/// let (verdict, _) = SynonymyLoopFinder::new(&synonymy, 1000).run();
/// let pair = verdict.witnesses().unwrap();
/// assert_eq!(alphabet.encode(&pair.witness_a), alphabet.encode(&pair.witness_b));
/// ```
pub struct SynonymyLoopFinder<'a> {
    synonymy: &'a SynonymyAutomaton,
    width_limit: usize,
}

impl<'a> SynonymyLoopFinder<'a> {
    pub fn new(synonymy: &'a SynonymyAutomaton, width_limit: usize) -> Self {
        SynonymyLoopFinder {
            synonymy,
            width_limit,
        }
    }

    /// Run the search to a verdict.
    pub fn run(&self) -> (Verdict, LoopSearchStats) {
        let mut stats = LoopSearchStats::default();
        let Some(target) = self.synonymy.target() else {
            debug!("Loop target unreachable, nothing to search");
            return (Verdict::IsBijective, stats);
        };

        let automaton = self.synonymy.automaton();
        let capacity = automaton.state_capacity();
        let initial = self.synonymy.initial();

        let mut steps: Vec<PathStep> = Vec::new();
        let mut claimed = BitVec::from_elem(capacity, false);
        let mut trace = BitVec::from_elem(capacity, false);
        trace.set(initial, true);

        let mut frontier = VecDeque::from([PathHead {
            state: initial,
            step: None,
            kind: PathKind::Trivial {
                pending: None,
                trace,
            },
        }]);
        stats.frontier_peak = 1;

        while let Some(head) = frontier.pop_front() {
            stats.paths_expanded += 1;

            for transition in automaton.forward(head.state) {
                let to = transition.to;
                let event = transition.event;

                let kind = match &head.kind {
                    PathKind::Trivial { pending, trace } => {
                        let still_trivial = match pending {
                            None => Some(Some(event)),
                            Some(first) if first.cancels(event) => Some(None),
                            Some(_) => None,
                        };
                        match still_trivial {
                            Some(pending) => {
                                // Simple paths only; the trace holds the initial state.
                                if trace[to] {
                                    continue;
                                }
                                let mut trace = trace.clone();
                                trace.set(to, true);
                                PathKind::Trivial { pending, trace }
                            }
                            None => PathKind::NonTrivial,
                        }
                    }
                    PathKind::NonTrivial => PathKind::NonTrivial,
                };

                if matches!(kind, PathKind::NonTrivial) {
                    if to == target {
                        steps.push(PathStep {
                            parent: head.step,
                            event,
                        });
                        stats.steps = steps.len();
                        let pair = witnesses(&steps, steps.len() - 1);
                        debug!(
                            "Found violation after {} paths: {:?} / {:?}",
                            stats.paths_expanded, pair.witness_a, pair.witness_b
                        );
                        return (Verdict::NotBijective(pair), stats);
                    }
                    if claimed[to] {
                        continue;
                    }
                    claimed.set(to, true);
                }

                if frontier.len() >= self.width_limit {
                    stats.steps = steps.len();
                    debug!(
                        "Frontier reached width limit {} after {} paths",
                        self.width_limit, stats.paths_expanded
                    );
                    return (Verdict::WidthOut, stats);
                }

                steps.push(PathStep {
                    parent: head.step,
                    event,
                });
                frontier.push_back(PathHead {
                    state: to,
                    step: Some(steps.len() - 1),
                    kind,
                });
                stats.frontier_peak = stats.frontier_peak.max(frontier.len());
            }
        }

        stats.steps = steps.len();
        (Verdict::IsBijective, stats)
    }
}

/// Split the events of the path ending at `last` into the two messages.
fn witnesses(steps: &[PathStep], last: usize) -> WitnessPair {
    let mut events = Vec::new();
    let mut cursor = Some(last);
    while let Some(index) = cursor {
        events.push(steps[index].event);
        cursor = steps[index].parent;
    }
    events.reverse();

    let mut pair = WitnessPair {
        witness_a: Vec::new(),
        witness_b: Vec::new(),
    };
    for event in events {
        match event {
            SynonymyEvent::Lower(c) => pair.witness_a.push(c),
            SynonymyEvent::Upper(c) => pair.witness_b.push(c),
        }
    }
    pair
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::deficit::DeficitAutomatonBuilder;
    use crate::checker::synonymy::SynonymyAutomatonBuilder;
    use crate::code::{Alphabet, BitSuffixIndex, CodeTrie};
    use crate::grammar::{CodeStateMachine, Grammar, GrammarTable};

    fn search(
        codewords: &[&str],
        grammar: &CodeStateMachine,
        width_limit: usize,
    ) -> (Verdict, LoopSearchStats) {
        let alphabet = Alphabet::new(codewords).unwrap();
        let index = BitSuffixIndex::build(&alphabet);
        let trie = CodeTrie::build(&alphabet);
        let deficits = DeficitAutomatonBuilder::new(&alphabet, &index, &trie).build();
        let table = GrammarTable::build(grammar, alphabet.len()).unwrap();
        let synonymy = SynonymyAutomatonBuilder::new(&deficits, &table).build();
        SynonymyLoopFinder::new(&synonymy, width_limit).run()
    }

    #[test]
    fn test_shortest_witness() {
        let (verdict, stats) = search(&["0", "01", "10"], &CodeStateMachine::all_words(3), 100);
        assert_eq!(
            verdict,
            Verdict::NotBijective(WitnessPair {
                witness_a: vec![0, 2],
                witness_b: vec![1, 0],
            })
        );
        assert!(stats.paths_expanded > 0);
    }

    #[test]
    fn test_prefix_code_is_bijective() {
        let (verdict, _) = search(&["0", "10", "11"], &CodeStateMachine::all_words(3), 100);
        assert_eq!(verdict, Verdict::IsBijective);
        assert!(verdict.witnesses().is_none());
    }

    #[test]
    fn test_duplicate_codewords() {
        let (verdict, _) = search(&["1", "1"], &CodeStateMachine::all_words(2), 100);
        let pair = verdict.witnesses().unwrap();
        assert_eq!(pair.witness_a.len(), 1);
        assert_eq!(pair.witness_b.len(), 1);
        assert_ne!(pair.witness_a, pair.witness_b);
    }

    #[test]
    fn test_width_out() {
        let (verdict, stats) = search(&["0", "01", "10"], &CodeStateMachine::all_words(3), 1);
        assert_eq!(verdict, Verdict::WidthOut);
        assert_eq!(verdict.name(), "WIDTH_OUT");
        assert!(stats.frontier_peak <= 1);
    }

    #[test]
    fn test_zero_width_without_transitions() {
        // No codeword is legal, so there is nothing to explore.
        let grammar = CodeStateMachine::from_transitions(1, []).unwrap();
        let (verdict, _) = search(&["0", "01"], &grammar, 0);
        assert_eq!(verdict, Verdict::IsBijective);
    }

    #[test]
    fn test_single_codeword_messages_are_bijective() {
        // Messages are exactly one codeword long, so "0 10" / "01 0" is illegal.
        let grammar =
            CodeStateMachine::from_transitions(2, [(0, 1, 0), (0, 1, 1), (0, 1, 2)]).unwrap();
        let (verdict, _) = search(&["0", "01", "10"], &grammar, 1000);
        assert_eq!(verdict, Verdict::IsBijective);
    }

    #[test]
    fn test_witnesses_are_complete_messages() {
        // Non-empty sequences: the accepting state differs from the start.
        let transitions = (0..3).flat_map(|c| [(0, 1, c), (1, 1, c)]);
        let grammar = CodeStateMachine::from_transitions(2, transitions).unwrap();
        let (verdict, _) = search(&["0", "01", "10"], &grammar, 1000);

        let alphabet = Alphabet::new(["0", "01", "10"]).unwrap();
        let pair = verdict.witnesses().unwrap();
        assert_ne!(pair.witness_a, pair.witness_b);
        assert!(grammar.is_recognized(&pair.witness_a));
        assert!(grammar.is_recognized(&pair.witness_b));
        assert_eq!(alphabet.encode(&pair.witness_a), alphabet.encode(&pair.witness_b));
    }
}
