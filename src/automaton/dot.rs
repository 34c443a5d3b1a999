//! Graphviz export.
//!
//! Parallel transitions between the same pair of states are merged into one
//! edge whose label lists every event, so the output stays readable for the
//! dense deficit and synonymy automata.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::automaton::{Automaton, StateId};
use crate::error::Result;

impl<E> Automaton<E> {
    /// Render the automaton as a `strict digraph`.
    ///
    /// # Examples
    ///
    /// ```
    /// use bicode::automaton::Automaton;
    ///
    /// let mut automaton = Automaton::new();
    /// automaton.add_states(2);
    /// automaton.add_transition(0, 1, 'a');
    /// automaton.add_transition(0, 1, 'b');
    ///
    /// let dot = automaton.to_dot("demo", |s| format!("s{s}"), |e| e.to_string());
    /// assert!(dot.contains("s0 -> s1 [label=\"a, b\"];"));
    /// ```
    pub fn to_dot<S, V>(&self, graph_name: &str, state_name: S, event_name: V) -> String
    where
        S: Fn(StateId) -> String,
        V: Fn(&E) -> String,
    {
        let mut edges: BTreeMap<(StateId, StateId), Vec<String>> = BTreeMap::new();
        for transition in self.transitions() {
            edges
                .entry((transition.from, transition.to))
                .or_default()
                .push(event_name(&transition.event));
        }

        let mut dot = format!("strict digraph {graph_name} {{\n");
        for state in self.states() {
            dot.push_str(&format!("  {};\n", quote(&state_name(state))));
        }
        for ((from, to), labels) in edges {
            dot.push_str(&format!(
                "  {} -> {} [label=\"{}\"];\n",
                quote(&state_name(from)),
                quote(&state_name(to)),
                labels.join(", ")
            ));
        }
        dot.push_str("}\n");
        dot
    }

    /// Write [`Automaton::to_dot`] output to a file.
    pub fn write_dot<P, S, V>(
        &self,
        path: P,
        graph_name: &str,
        state_name: S,
        event_name: V,
    ) -> Result<()>
    where
        P: AsRef<Path>,
        S: Fn(StateId) -> String,
        V: Fn(&E) -> String,
    {
        fs::write(path, self.to_dot(graph_name, state_name, event_name))?;
        Ok(())
    }
}

/// Quote identifiers that are not plain alphanumerics.
fn quote(name: &str) -> String {
    if !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        name.to_string()
    } else {
        format!("\"{}\"", name.replace('"', "\\\""))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merges_parallel_edges() {
        let mut automaton = Automaton::new();
        automaton.add_states(3);
        automaton.add_transition(0, 1, 1);
        automaton.add_transition(1, 2, 2);
        automaton.add_transition(0, 1, 3);

        let dot = automaton.to_dot("g", |s| format!("q{s}"), |e| format!("e{e}"));
        assert!(dot.starts_with("strict digraph g {"));
        assert!(dot.contains("q0 -> q1 [label=\"e1, e3\"];"));
        assert!(dot.contains("q1 -> q2 [label=\"e2\"];"));
        assert_eq!(dot.matches("->").count(), 2);
    }

    #[test]
    fn test_quotes_signed_names() {
        let mut automaton = Automaton::new();
        automaton.add_states(2);
        automaton.add_transition(1, 0, 'x');

        let dot = automaton.to_dot("g", |s| format!("({s}, -1)"), |e| e.to_string());
        assert!(dot.contains("\"(1, -1)\" -> \"(0, -1)\" [label=\"x\"];"));
    }
}
