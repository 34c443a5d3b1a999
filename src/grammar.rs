//! Message grammars over codeword sequences.
//!
//! A grammar decides which sequences of codeword ids are legal messages. The
//! checker only ever reads it through the [`Grammar`] trait: a start state, a
//! single accepting end state and a deterministic transition per
//! (state, codeword) pair. [`CodeStateMachine`] is the concrete grammar used
//! by the encoding scheme, the generators and the CLI.
//!
//! Before a check runs, the grammar is flattened into a [`GrammarTable`]. The
//! table is validated once, which is where a grammar without a start or end
//! state is rejected, and the product construction then looks transitions up
//! by index.

use crate::automaton::{Automaton, StateId};
use crate::code::CodewordId;
use crate::error::{BicodeError, Result};

/// Read-only view of a deterministic message grammar.
///
/// State ids are dense in `0..state_count()`.
pub trait Grammar {
    /// Number of state ids, including any that are unused.
    fn state_count(&self) -> usize;

    /// State every message starts from.
    fn start_state(&self) -> Option<StateId>;

    /// The unique accepting state.
    fn end_state(&self) -> Option<StateId>;

    /// Target of the transition leaving `state` on `codeword`, if any.
    fn transition(&self, state: StateId, codeword: CodewordId) -> Option<StateId>;

    /// Whether `word` leads from the start state to the end state.
    fn is_recognized(&self, word: &[CodewordId]) -> bool {
        let (Some(start), Some(end)) = (self.start_state(), self.end_state()) else {
            return false;
        };
        word.iter()
            .try_fold(start, |state, &codeword| self.transition(state, codeword))
            .is_some_and(|state| state == end)
    }
}

/// Grammar stored as an [`Automaton`] labeled with codeword ids.
///
/// State 0 is the start state and the last-added state is the accepting one,
/// the same convention [`Automaton::is_recognized`] uses.
///
/// # Examples
///
/// ```
/// use bicode::grammar::{CodeStateMachine, Grammar};
///
/// // Messages are "0 1", "0 1 0 1", ...
/// let grammar = CodeStateMachine::from_transitions(2, [(0, 1, 0), (1, 0, 1)]).unwrap();
/// assert_eq!(grammar.end_state(), Some(1));
/// assert!(grammar.is_recognized(&[0]));
/// assert!(!grammar.is_recognized(&[0, 1]));
///
/// let any = CodeStateMachine::all_words(3);
/// assert!(any.is_recognized(&[2, 0, 1, 1]));
/// assert!(any.is_recognized(&[]));
/// ```
#[derive(Debug, Clone, Default)]
pub struct CodeStateMachine {
    automaton: Automaton<CodewordId>,
}

impl CodeStateMachine {
    /// Create a grammar with no states.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing automaton.
    pub fn from_automaton(automaton: Automaton<CodewordId>) -> Self {
        CodeStateMachine { automaton }
    }

    /// The unrestricted grammar: one state looping on every codeword.
    pub fn all_words(n_codewords: usize) -> Self {
        let mut automaton = Automaton::new();
        let state = automaton.add_state();
        for codeword in 0..n_codewords {
            automaton.add_transition(state, state, codeword);
        }
        CodeStateMachine { automaton }
    }

    /// Build a grammar from `(from, to, codeword)` triples.
    ///
    /// States `0..n_states` are created up front, so `n_states - 1` is the
    /// accepting state. Triples referring to missing states and two
    /// transitions leaving the same state on the same codeword are rejected.
    pub fn from_transitions<I>(n_states: usize, transitions: I) -> Result<Self>
    where
        I: IntoIterator<Item = (StateId, StateId, CodewordId)>,
    {
        if n_states == 0 {
            return Err(BicodeError::invalid_grammar("grammar has no states"));
        }

        let mut automaton = Automaton::new();
        automaton.add_states(n_states);
        for (from, to, codeword) in transitions {
            if automaton.next(from, &codeword).is_some() {
                return Err(BicodeError::invalid_grammar(format!(
                    "state {from} has more than one transition on codeword {codeword}"
                )));
            }
            if automaton.add_transition(from, to, codeword).is_none() {
                return Err(BicodeError::invalid_grammar(format!(
                    "transition {from} -> {to} refers to a state outside 0..{n_states}"
                )));
            }
        }
        Ok(CodeStateMachine { automaton })
    }

    /// Underlying automaton.
    pub fn automaton(&self) -> &Automaton<CodewordId> {
        &self.automaton
    }

    /// All transitions as `(from, to, codeword)` triples, in id order.
    pub fn transition_triples(&self) -> Vec<(StateId, StateId, CodewordId)> {
        self.automaton
            .transitions()
            .map(|t| (t.from, t.to, t.event))
            .collect()
    }
}

impl Grammar for CodeStateMachine {
    fn state_count(&self) -> usize {
        self.automaton.state_capacity()
    }

    fn start_state(&self) -> Option<StateId> {
        self.automaton.has_state(0).then_some(0)
    }

    fn end_state(&self) -> Option<StateId> {
        self.automaton.last_state()
    }

    fn transition(&self, state: StateId, codeword: CodewordId) -> Option<StateId> {
        self.automaton.next(state, &codeword)
    }
}

/// Dense `state × codeword` transition table built once per check.
#[derive(Debug, Clone)]
pub struct GrammarTable {
    n_states: usize,
    n_codewords: usize,
    start: StateId,
    end: StateId,
    next: Vec<Option<StateId>>,
}

impl GrammarTable {
    /// Validate `grammar` and tabulate its transitions on codewords
    /// `0..n_codewords`. Transitions on larger ids are ignored.
    pub fn build<G: Grammar + ?Sized>(grammar: &G, n_codewords: usize) -> Result<Self> {
        let n_states = grammar.state_count();
        if n_states == 0 {
            return Err(BicodeError::invalid_grammar("grammar has no states"));
        }
        let start = grammar
            .start_state()
            .ok_or_else(|| BicodeError::invalid_grammar("grammar has no start state"))?;
        let end = grammar
            .end_state()
            .ok_or_else(|| BicodeError::invalid_grammar("grammar has no end state"))?;
        for (role, state) in [("start", start), ("end", end)] {
            if state >= n_states {
                return Err(BicodeError::invalid_grammar(format!(
                    "{role} state {state} is outside 0..{n_states}"
                )));
            }
        }

        let mut next = Vec::with_capacity(n_states * n_codewords);
        for state in 0..n_states {
            for codeword in 0..n_codewords {
                let target = grammar.transition(state, codeword);
                if let Some(target) = target
                    && target >= n_states
                {
                    return Err(BicodeError::invalid_grammar(format!(
                        "transition from state {state} on codeword {codeword} leads to state {target} outside 0..{n_states}"
                    )));
                }
                next.push(target);
            }
        }

        Ok(GrammarTable {
            n_states,
            n_codewords,
            start,
            end,
            next,
        })
    }

    /// Number of grammar states.
    pub fn state_count(&self) -> usize {
        self.n_states
    }

    /// Number of codewords the table covers.
    pub fn codeword_count(&self) -> usize {
        self.n_codewords
    }

    /// Start state.
    pub fn start(&self) -> StateId {
        self.start
    }

    /// Accepting state.
    pub fn end(&self) -> StateId {
        self.end
    }

    /// Transition lookup.
    #[inline]
    pub fn next(&self, state: StateId, codeword: CodewordId) -> Option<StateId> {
        if codeword >= self.n_codewords {
            return None;
        }
        self.next
            .get(state * self.n_codewords + codeword)
            .copied()
            .flatten()
    }
}
