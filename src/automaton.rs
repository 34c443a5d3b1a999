//! Generic labeled finite-state machine.
//!
//! An [`Automaton`] is a directed multigraph whose edges carry an event label.
//! States and transitions are slots in dense vectors; their ids are vector
//! indices and stay stable for the whole lifetime of the automaton. Deleting a
//! state or transition tombstones its slot instead of compacting.
//!
//! The transition vector is the single authoritative edge list. Per-state
//! forward/backward lists are indexes over it: they only ever grow, and
//! enumeration skips ids whose transition has been tombstoned, so the two
//! directions can never disagree. [`Automaton::compact_adjacency`] rebuilds
//! both indexes from the edge list after heavy deletion.
//!
//! The same type backs the grammar, the deficit automaton and the synonymy
//! automaton.

pub mod dot;

use std::collections::VecDeque;
use std::ops::Range;

use bit_vec::BitVec;

/// Index of a state slot.
pub type StateId = usize;

/// Index of a transition slot.
pub type TransitionId = usize;

/// A labeled edge between two states.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition<E> {
    pub id: TransitionId,
    pub from: StateId,
    pub to: StateId,
    pub event: E,
}

#[derive(Debug, Clone, Default)]
struct StateSlot {
    forward: Vec<TransitionId>,
    backward: Vec<TransitionId>,
}

/// Directed labeled multigraph with tombstoned deletion.
#[derive(Debug, Clone)]
pub struct Automaton<E> {
    states: Vec<Option<StateSlot>>,
    transitions: Vec<Option<Transition<E>>>,
    n_states: usize,
    n_transitions: usize,
    last_added: Option<StateId>,
}

impl<E> Default for Automaton<E> {
    fn default() -> Self {
        Automaton {
            states: Vec::new(),
            transitions: Vec::new(),
            n_states: 0,
            n_transitions: 0,
            last_added: None,
        }
    }
}

impl<E> Automaton<E> {
    /// Create an empty automaton.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `n` states and return their id range.
    pub fn add_states(&mut self, n: usize) -> Range<StateId> {
        let first = self.states.len();
        self.states.resize_with(first + n, || Some(StateSlot::default()));
        self.n_states += n;
        if n > 0 {
            self.last_added = Some(first + n - 1);
        }
        first..first + n
    }

    /// Append one state and return its id.
    pub fn add_state(&mut self) -> StateId {
        self.add_states(1).start
    }

    /// Add a transition between two live states.
    ///
    /// Returns `None` if either endpoint does not exist.
    pub fn add_transition(&mut self, from: StateId, to: StateId, event: E) -> Option<TransitionId> {
        if !self.has_state(from) || !self.has_state(to) {
            return None;
        }

        let id = self.transitions.len();
        self.transitions.push(Some(Transition {
            id,
            from,
            to,
            event,
        }));
        self.n_transitions += 1;
        if let Some(Some(slot)) = self.states.get_mut(from) {
            slot.forward.push(id);
        }
        if let Some(Some(slot)) = self.states.get_mut(to) {
            slot.backward.push(id);
        }
        Some(id)
    }

    /// Tombstone a transition. Returns false if it was already gone.
    pub fn del_transition(&mut self, id: TransitionId) -> bool {
        match self.transitions.get_mut(id) {
            Some(slot) if slot.is_some() => {
                *slot = None;
                self.n_transitions -= 1;
                true
            }
            _ => false,
        }
    }

    /// Tombstone a state together with every incident transition.
    pub fn del_state(&mut self, id: StateId) -> bool {
        let Some(slot) = self.states.get_mut(id).and_then(Option::take) else {
            return false;
        };
        for transition in slot.forward.iter().chain(slot.backward.iter()) {
            self.del_transition(*transition);
        }
        self.n_states -= 1;
        true
    }

    /// Whether `id` names a live state.
    pub fn has_state(&self, id: StateId) -> bool {
        matches!(self.states.get(id), Some(Some(_)))
    }

    /// Live transition by id.
    pub fn transition(&self, id: TransitionId) -> Option<&Transition<E>> {
        self.transitions.get(id).and_then(Option::as_ref)
    }

    /// Live outgoing transitions of a state, in insertion order.
    pub fn forward(&self, state: StateId) -> impl Iterator<Item = &Transition<E>> + '_ {
        self.adjacency(state, |slot| &slot.forward)
    }

    /// Live incoming transitions of a state, in insertion order.
    pub fn backward(&self, state: StateId) -> impl Iterator<Item = &Transition<E>> + '_ {
        self.adjacency(state, |slot| &slot.backward)
    }

    fn adjacency<'a>(
        &'a self,
        state: StateId,
        list: fn(&StateSlot) -> &Vec<TransitionId>,
    ) -> impl Iterator<Item = &'a Transition<E>> + 'a {
        self.states
            .get(state)
            .and_then(Option::as_ref)
            .map(|slot| list(slot).as_slice())
            .unwrap_or(&[])
            .iter()
            .filter_map(|&id| self.transition(id))
    }

    /// Live state ids in ascending order.
    pub fn states(&self) -> impl Iterator<Item = StateId> + '_ {
        self.states
            .iter()
            .enumerate()
            .filter_map(|(id, slot)| slot.as_ref().map(|_| id))
    }

    /// Live transitions in id order.
    pub fn transitions(&self) -> impl Iterator<Item = &Transition<E>> {
        self.transitions.iter().flatten()
    }

    /// Number of live states.
    pub fn number_states(&self) -> usize {
        self.n_states
    }

    /// Number of live transitions.
    pub fn number_transitions(&self) -> usize {
        self.n_transitions
    }

    /// Number of state slots ever allocated, tombstones included.
    pub fn state_capacity(&self) -> usize {
        self.states.len()
    }

    /// Most recently added state, if it is still alive.
    pub fn last_state(&self) -> Option<StateId> {
        self.last_added.filter(|&id| self.has_state(id))
    }

    /// Rebuild the forward/backward indexes from the edge list, dropping
    /// tombstoned ids.
    pub fn compact_adjacency(&mut self) {
        for slot in self.states.iter_mut().flatten() {
            slot.forward.clear();
            slot.backward.clear();
        }
        for transition in self.transitions.iter().flatten() {
            if let Some(Some(from)) = self.states.get_mut(transition.from) {
                from.forward.push(transition.id);
            }
            if let Some(Some(to)) = self.states.get_mut(transition.to) {
                to.backward.push(transition.id);
            }
        }
    }

    /// Delete every state from which `target` cannot be reached.
    ///
    /// Runs a backward breadth-first search over incoming transitions and
    /// returns the number of deleted states. If `target` itself is not a live
    /// state, every state is deleted.
    pub fn remove_unreachable_states(&mut self, target: StateId) -> usize {
        let mut reaches = BitVec::from_elem(self.states.len(), false);
        if self.has_state(target) {
            let mut queue = VecDeque::from([target]);
            reaches.set(target, true);
            while let Some(state) = queue.pop_front() {
                for transition in self.backward(state) {
                    if !reaches[transition.from] {
                        reaches.set(transition.from, true);
                        queue.push_back(transition.from);
                    }
                }
            }
        }

        let doomed: Vec<StateId> = self.states().filter(|&id| !reaches[id]).collect();
        for &state in &doomed {
            self.del_state(state);
        }
        if !doomed.is_empty() {
            self.compact_adjacency();
        }
        doomed.len()
    }
}

impl<E: PartialEq> Automaton<E> {
    /// Follow the first live transition of `state` labeled `event`.
    pub fn next(&self, state: StateId, event: &E) -> Option<StateId> {
        self.forward(state)
            .find(|transition| transition.event == *event)
            .map(|transition| transition.to)
    }

    /// Deterministic walk from state 0; accepts if it ends at the last-added
    /// state.
    pub fn is_recognized(&self, word: &[E]) -> bool {
        let Some(accepting) = self.last_state() else {
            return false;
        };
        if !self.has_state(0) {
            return false;
        }
        word.iter()
            .try_fold(0, |state, event| self.next(state, event))
            .is_some_and(|state| state == accepting)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> Automaton<char> {
        let mut automaton = Automaton::new();
        automaton.add_states(3);
        automaton.add_transition(0, 1, 'a');
        automaton.add_transition(1, 2, 'b');
        automaton.add_transition(2, 0, 'c');
        automaton.add_transition(0, 2, 'd');
        automaton
    }

    #[test]
    fn test_add_and_enumerate() {
        let automaton = triangle();
        assert_eq!(automaton.number_states(), 3);
        assert_eq!(automaton.number_transitions(), 4);

        let forward: Vec<char> = automaton.forward(0).map(|t| t.event).collect();
        assert_eq!(forward, vec!['a', 'd']);
        let backward: Vec<StateId> = automaton.backward(2).map(|t| t.from).collect();
        assert_eq!(backward, vec![1, 0]);

        assert_eq!(automaton.next(0, &'d'), Some(2));
        assert_eq!(automaton.next(0, &'b'), None);
    }

    #[test]
    fn test_add_transition_to_missing_state() {
        let mut automaton: Automaton<u8> = Automaton::new();
        automaton.add_states(1);
        assert!(automaton.add_transition(0, 1, 7).is_none());
        assert_eq!(automaton.number_transitions(), 0);
    }

    #[test]
    fn test_deletion_keeps_ids_stable() {
        let mut automaton = triangle();
        assert!(automaton.del_transition(0));
        assert!(!automaton.del_transition(0));
        assert_eq!(automaton.number_transitions(), 3);
        assert_eq!(automaton.transition(1).unwrap().event, 'b');

        assert!(automaton.del_state(1));
        assert!(!automaton.has_state(1));
        assert_eq!(automaton.number_states(), 2);
        // 'b' left with state 1; 'c' and 'd' survive with their ids.
        assert_eq!(automaton.number_transitions(), 2);
        assert!(automaton.transition(1).is_none());
        assert_eq!(automaton.transition(3).unwrap().event, 'd');
        assert_eq!(automaton.backward(2).count(), 1);
        assert_eq!(automaton.states().collect::<Vec<_>>(), vec![0, 2]);
        assert_eq!(automaton.state_capacity(), 3);

        // New states get fresh ids.
        assert_eq!(automaton.add_state(), 3);
    }

    #[test]
    fn test_compact_adjacency_matches_edge_list() {
        let mut automaton = triangle();
        automaton.del_transition(3);
        automaton.compact_adjacency();
        let forward: Vec<TransitionId> = automaton.forward(0).map(|t| t.id).collect();
        assert_eq!(forward, vec![0]);
        let backward: Vec<TransitionId> = automaton.backward(2).map(|t| t.id).collect();
        assert_eq!(backward, vec![1]);
    }

    #[test]
    fn test_remove_unreachable_states() {
        let mut automaton = triangle();
        let dead_end = automaton.add_state();
        automaton.add_transition(1, dead_end, 'x');
        let orphan = automaton.add_state();

        let removed = automaton.remove_unreachable_states(0);
        assert_eq!(removed, 2);
        assert!(!automaton.has_state(dead_end));
        assert!(!automaton.has_state(orphan));
        assert_eq!(automaton.number_states(), 3);
        assert_eq!(automaton.number_transitions(), 4);
    }

    #[test]
    fn test_is_recognized() {
        let automaton = triangle();
        // Last-added state is 2.
        assert!(automaton.is_recognized(&['a', 'b']));
        assert!(automaton.is_recognized(&['d']));
        assert!(automaton.is_recognized(&['d', 'c', 'a', 'b']));
        assert!(!automaton.is_recognized(&['a']));
        assert!(!automaton.is_recognized(&['b']));
        assert!(!automaton.is_recognized(&[]));
    }
}
