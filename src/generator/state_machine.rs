//! Random message grammars.

use rand::Rng;

use crate::code::CodewordId;
use crate::error::{BicodeError, Result};
use crate::grammar::CodeStateMachine;

/// Random deterministic grammar over `n_codewords` codewords.
///
/// Every state is reachable from the start state 0: each state `i > 0` first
/// gets an incoming transition from some earlier state on one of that
/// state's unused codewords. The remaining (state, codeword) pairs then get a
/// transition to a random state with probability one half. State
/// `n_states - 1` is the accepting one.
///
/// # Examples
///
/// ```
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
/// use bicode::generator::generate_grammar;
/// use bicode::grammar::Grammar;
///
/// let grammar = generate_grammar(3, 4, &mut StdRng::seed_from_u64(1)).unwrap();
/// assert_eq!(grammar.state_count(), 4);
/// assert_eq!(grammar.end_state(), Some(3));
/// ```
pub fn generate_grammar<R: Rng + ?Sized>(
    n_codewords: usize,
    n_states: usize,
    rng: &mut R,
) -> Result<CodeStateMachine> {
    if n_codewords == 0 || n_states == 0 {
        return Err(BicodeError::invalid_argument(format!(
            "a grammar needs at least one codeword and one state, got {n_codewords} and {n_states}"
        )));
    }

    // used[s][c]: state s already has a transition on codeword c.
    let mut used = vec![vec![false; n_codewords]; n_states];
    let mut transitions: Vec<(usize, usize, CodewordId)> = Vec::new();

    for state in 1..n_states {
        let parents: Vec<usize> = (0..state)
            .filter(|&p| used[p].iter().any(|u| !u))
            .collect();
        let parent = parents[rng.random_range(0..parents.len())];
        let free: Vec<CodewordId> = (0..n_codewords).filter(|&c| !used[parent][c]).collect();
        let codeword = free[rng.random_range(0..free.len())];
        used[parent][codeword] = true;
        transitions.push((parent, state, codeword));
    }

    for (state, row) in used.iter().enumerate() {
        for (codeword, &taken) in row.iter().enumerate() {
            if !taken && rng.random_bool(0.5) {
                transitions.push((state, rng.random_range(0..n_states), codeword));
            }
        }
    }

    CodeStateMachine::from_transitions(n_states, transitions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::Grammar;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::VecDeque;

    fn reachable(grammar: &CodeStateMachine, n_codewords: usize) -> Vec<bool> {
        let mut seen = vec![false; grammar.state_count()];
        seen[0] = true;
        let mut queue = VecDeque::from([0]);
        while let Some(state) = queue.pop_front() {
            for codeword in 0..n_codewords {
                if let Some(next) = grammar.transition(state, codeword)
                    && !seen[next]
                {
                    seen[next] = true;
                    queue.push_back(next);
                }
            }
        }
        seen
    }

    #[test]
    fn test_all_states_reachable() {
        let mut rng = StdRng::seed_from_u64(11);
        for n_codewords in 1..=4 {
            for n_states in 1..=8 {
                let grammar = generate_grammar(n_codewords, n_states, &mut rng).unwrap();
                assert_eq!(grammar.state_count(), n_states);
                assert!(reachable(&grammar, n_codewords).iter().all(|&r| r));
            }
        }
    }

    #[test]
    fn test_rejects_empty_shapes() {
        let mut rng = StdRng::seed_from_u64(0);
        assert!(generate_grammar(0, 3, &mut rng).is_err());
        assert!(generate_grammar(3, 0, &mut rng).is_err());
    }
}
