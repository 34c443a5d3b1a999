//! Synonymy automaton: deficits × two copies of the grammar.
//!
//! A synonymy state records where two candidate messages stand after being
//! read in lockstep: the deficit between their bit strings and the grammar
//! state of each copy. Each transition is one deficit transition played on
//! the copy that is behind, so a path from `(identity, start, start)` to
//! `(identity, end, end)` spells two legal messages with the same encoding.

use std::collections::VecDeque;
use std::fmt;

use ahash::AHashMap;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::automaton::{Automaton, StateId};
use crate::checker::deficit::{Deficit, DeficitAutomaton, deficit_name};
use crate::code::CodewordId;
use crate::grammar::GrammarTable;

/// A codeword read by one of the two grammar copies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SynonymyEvent {
    /// Read by the lower copy; contributes to the first witness.
    Lower(CodewordId),
    /// Read by the upper copy; contributes to the second witness.
    Upper(CodewordId),
}

impl SynonymyEvent {
    /// Signed tag: `+(c + 1)` for the lower copy, `-(c + 1)` for the upper.
    pub fn tag(self) -> i64 {
        match self {
            SynonymyEvent::Lower(c) => c as i64 + 1,
            SynonymyEvent::Upper(c) => -(c as i64) - 1,
        }
    }

    /// Codeword read.
    pub fn codeword(self) -> CodewordId {
        match self {
            SynonymyEvent::Lower(c) | SynonymyEvent::Upper(c) => c,
        }
    }

    /// Whether `next` re-reads on the upper copy what this event read on the
    /// lower one.
    pub fn cancels(self, next: SynonymyEvent) -> bool {
        matches!((self, next), (SynonymyEvent::Lower(a), SynonymyEvent::Upper(b)) if a == b)
    }
}

impl fmt::Display for SynonymyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:+}", self.tag())
    }
}

/// A product state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SynonymyState {
    /// Deficit automaton state.
    pub deficit: StateId,
    /// Grammar state of the upper copy.
    pub upper: StateId,
    /// Grammar state of the lower copy.
    pub lower: StateId,
}

/// The reachable part of the product automaton.
#[derive(Debug, Clone)]
pub struct SynonymyAutomaton {
    automaton: Automaton<SynonymyEvent>,
    states: Vec<SynonymyState>,
    deficits: Vec<Deficit>,
    initial: StateId,
    target: Option<StateId>,
    pruned: usize,
}

impl SynonymyAutomaton {
    /// Underlying automaton.
    pub fn automaton(&self) -> &Automaton<SynonymyEvent> {
        &self.automaton
    }

    /// `(identity, start, start)`.
    pub fn initial(&self) -> StateId {
        self.initial
    }

    /// `(identity, end, end)`, if it is reachable at all.
    pub fn target(&self) -> Option<StateId> {
        self.target
    }

    /// Product components of a state.
    pub fn state(&self, id: StateId) -> SynonymyState {
        self.states[id]
    }

    /// Signed deficit of a state.
    pub fn deficit(&self, id: StateId) -> Deficit {
        self.deficits[id]
    }

    /// Number of states removed by pruning.
    pub fn pruned(&self) -> usize {
        self.pruned
    }

    /// Graphviz rendering, states named `(deficit, upper, lower)`.
    pub fn to_dot(&self) -> String {
        self.automaton.to_dot(
            "synonymy",
            |id| {
                let state = self.states[id];
                format!(
                    "({}, {}, {})",
                    deficit_name(self.deficits[id]),
                    state.upper,
                    state.lower
                )
            },
            SynonymyEvent::to_string,
        )
    }
}

/// Builds a [`SynonymyAutomaton`] eagerly by breadth-first search.
pub struct SynonymyAutomatonBuilder<'a> {
    deficits: &'a DeficitAutomaton,
    grammar: &'a GrammarTable,
    prune: bool,
}

impl<'a> SynonymyAutomatonBuilder<'a> {
    /// Builder over a deficit automaton and a validated grammar.
    pub fn new(deficits: &'a DeficitAutomaton, grammar: &'a GrammarTable) -> Self {
        SynonymyAutomatonBuilder {
            deficits,
            grammar,
            prune: true,
        }
    }

    /// Enable or disable removal of states that cannot reach the target.
    pub fn with_pruning(mut self, prune: bool) -> Self {
        self.prune = prune;
        self
    }

    fn key(&self, state: SynonymyState) -> usize {
        let g = self.grammar.state_count();
        (state.deficit * g + state.upper) * g + state.lower
    }

    /// Play one deficit transition on the copy that is behind.
    fn step(
        &self,
        from: SynonymyState,
        to_deficit: StateId,
        codeword: CodewordId,
    ) -> Option<(SynonymyState, SynonymyEvent)> {
        if self.deficits.deficit(from.deficit) >= 0 {
            let lower = self.grammar.next(from.lower, codeword)?;
            Some((
                SynonymyState {
                    deficit: to_deficit,
                    lower,
                    ..from
                },
                SynonymyEvent::Lower(codeword),
            ))
        } else {
            let upper = self.grammar.next(from.upper, codeword)?;
            Some((
                SynonymyState {
                    deficit: to_deficit,
                    upper,
                    ..from
                },
                SynonymyEvent::Upper(codeword),
            ))
        }
    }

    /// Explore every product state reachable from `(identity, start, start)`.
    pub fn build(self) -> SynonymyAutomaton {
        let identity = self.deficits.identity();
        let initial_state = SynonymyState {
            deficit: identity,
            upper: self.grammar.start(),
            lower: self.grammar.start(),
        };

        let mut automaton = Automaton::new();
        let mut states = Vec::new();
        let mut ids: AHashMap<usize, StateId> = AHashMap::new();

        let initial = automaton.add_state();
        states.push(initial_state);
        ids.insert(self.key(initial_state), initial);
        let mut queue = VecDeque::from([initial]);

        let deficit_automaton = self.deficits.automaton();
        while let Some(id) = queue.pop_front() {
            let from = states[id];
            for transition in deficit_automaton.forward(from.deficit) {
                let Some((next, event)) = self.step(from, transition.to, transition.event) else {
                    continue;
                };
                let next_id = match ids.get(&self.key(next)) {
                    Some(&existing) => existing,
                    None => {
                        let created = automaton.add_state();
                        states.push(next);
                        ids.insert(self.key(next), created);
                        queue.push_back(created);
                        created
                    }
                };
                automaton.add_transition(id, next_id, event);
            }
        }

        let target_state = SynonymyState {
            deficit: identity,
            upper: self.grammar.end(),
            lower: self.grammar.end(),
        };
        let target = ids.get(&self.key(target_state)).copied();
        debug!(
            "Synonymy automaton has {} states and {} transitions, target {}",
            automaton.number_states(),
            automaton.number_transitions(),
            if target.is_some() { "reachable" } else { "unreachable" }
        );

        let mut pruned = 0;
        if self.prune
            && let Some(target) = target
        {
            pruned = automaton.remove_unreachable_states(target);
            debug!(
                "Pruned {} synonymy states, {} remain with {} transitions",
                pruned,
                automaton.number_states(),
                automaton.number_transitions()
            );
        }

        let deficits = states
            .iter()
            .map(|state| self.deficits.deficit(state.deficit))
            .collect();

        SynonymyAutomaton {
            automaton,
            states,
            deficits,
            initial,
            target,
            pruned,
        }
    }
}
