//! Bijectivity checking.
//!
//! A check runs four stages, each rebuilt from scratch on every call:
//!
//! 1. index the alphabet ([`BitSuffixIndex`], [`CodeTrie`]) and tabulate the
//!    grammar ([`GrammarTable`]);
//! 2. close the deficit automaton ([`DeficitAutomatonBuilder`]);
//! 3. build the product with two grammar copies ([`SynonymyAutomatonBuilder`]);
//! 4. search it for a non-trivial loop ([`SynonymyLoopFinder`]).
//!
//! [`BijectiveChecker`] runs the pipeline and keeps the automata of its most
//! recent check for inspection. Nothing else survives between checks, so
//! concurrent checks need one checker each.
//!
//! # Examples
//!
//! ```
//! use bicode::checker::{BijectiveChecker, Verdict};
//! use bicode::code::Alphabet;
//! use bicode::grammar::CodeStateMachine;
//!
//! let mut checker = BijectiveChecker::default();
//!
//! let alphabet = Alphabet::new(["0", "10", "11"]).unwrap();
//! let report = checker.check(&alphabet, &CodeStateMachine::all_words(3)).unwrap();
//! assert_eq!(report.verdict, Verdict::IsBijective);
//!
//! let alphabet = Alphabet::new(["0", "01", "10"]).unwrap();
//! let report = checker.check(&alphabet, &CodeStateMachine::all_words(3)).unwrap();
//! let pair = report.verdict.witnesses().unwrap();
//! assert_eq!(alphabet.encode(&pair.witness_a), alphabet.encode(&pair.witness_b));
//! ```

pub mod config;
pub mod deficit;
pub mod loop_finder;
pub mod synonymy;

use std::time::Instant;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::code::{Alphabet, BitSuffixIndex, CodeTrie};
use crate::error::Result;
use crate::grammar::{Grammar, GrammarTable};

pub use config::CheckerConfig;
pub use deficit::{DeficitAutomaton, DeficitAutomatonBuilder};
pub use loop_finder::{LoopSearchStats, SynonymyLoopFinder, Verdict, WitnessPair};
pub use synonymy::{SynonymyAutomaton, SynonymyAutomatonBuilder, SynonymyEvent};

/// Sizes and counters of one check.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CheckStats {
    pub codewords: usize,
    pub suffixes: usize,
    pub trie_nodes: usize,
    pub grammar_states: usize,
    pub deficits_discovered: usize,
    pub deficits_pruned: usize,
    pub deficit_states: usize,
    pub deficit_transitions: usize,
    pub synonymy_states: usize,
    pub synonymy_transitions: usize,
    pub synonymy_pruned: usize,
    pub search: LoopSearchStats,
    pub elapsed_ms: f64,
}

/// Verdict of a check plus its statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckReport {
    pub verdict: Verdict,
    pub stats: CheckStats,
}

impl CheckReport {
    /// True only for a conclusive bijective verdict.
    pub fn is_bijective(&self) -> bool {
        matches!(self.verdict, Verdict::IsBijective)
    }
}

#[derive(Debug, Clone)]
struct CheckArtifacts {
    deficits: DeficitAutomaton,
    synonymy: SynonymyAutomaton,
}

/// Runs bijectivity checks with a fixed configuration.
#[derive(Debug, Clone, Default)]
pub struct BijectiveChecker {
    config: CheckerConfig,
    last: Option<CheckArtifacts>,
}

impl BijectiveChecker {
    /// Create a checker.
    pub fn new(config: CheckerConfig) -> Self {
        BijectiveChecker { config, last: None }
    }

    /// Current configuration.
    pub fn config(&self) -> &CheckerConfig {
        &self.config
    }

    /// Decide whether every message of `grammar` over `alphabet` has a unique
    /// decomposition.
    ///
    /// Fails only on a malformed grammar; every well-formed input yields a
    /// [`Verdict`].
    pub fn check<G: Grammar + ?Sized>(
        &mut self,
        alphabet: &Alphabet,
        grammar: &G,
    ) -> Result<CheckReport> {
        self.last = None;
        let start = Instant::now();

        let table = GrammarTable::build(grammar, alphabet.len())?;
        let index = BitSuffixIndex::build(alphabet);
        let trie = CodeTrie::build(alphabet);
        debug!(
            "Indexed {} codewords: {} suffixes, {} trie nodes, {} grammar states",
            alphabet.len(),
            index.len(),
            trie.len(),
            table.state_count()
        );

        let deficits = DeficitAutomatonBuilder::new(alphabet, &index, &trie)
            .with_pruning(self.config.prune_deficits)
            .build();
        let synonymy = SynonymyAutomatonBuilder::new(&deficits, &table)
            .with_pruning(self.config.prune_synonymy)
            .build();
        let (verdict, search) = SynonymyLoopFinder::new(&synonymy, self.config.width_limit).run();
        debug!(
            "Loop search expanded {} paths, frontier peak {}",
            search.paths_expanded, search.frontier_peak
        );

        let elapsed = start.elapsed();
        match &verdict {
            Verdict::WidthOut => warn!(
                "Width limit {} reached after {} paths; verdict is inconclusive",
                self.config.width_limit, search.paths_expanded
            ),
            verdict => info!("{} in {:?}", verdict.name(), elapsed),
        }

        let stats = CheckStats {
            codewords: alphabet.len(),
            suffixes: index.len(),
            trie_nodes: trie.len(),
            grammar_states: table.state_count(),
            deficits_discovered: deficits.discovered(),
            deficits_pruned: deficits.pruned(),
            deficit_states: deficits.automaton().number_states(),
            deficit_transitions: deficits.automaton().number_transitions(),
            synonymy_states: synonymy.automaton().number_states(),
            synonymy_transitions: synonymy.automaton().number_transitions(),
            synonymy_pruned: synonymy.pruned(),
            search,
            elapsed_ms: elapsed.as_secs_f64() * 1000.0,
        };
        self.last = Some(CheckArtifacts { deficits, synonymy });

        Ok(CheckReport { verdict, stats })
    }

    /// Deficit automaton of the most recent successful check.
    pub fn deficits(&self) -> Option<&DeficitAutomaton> {
        self.last.as_ref().map(|last| &last.deficits)
    }

    /// Synonymy automaton of the most recent successful check.
    pub fn synonymy(&self) -> Option<&SynonymyAutomaton> {
        self.last.as_ref().map(|last| &last.synonymy)
    }

    /// Graphviz rendering of the most recent deficit automaton.
    pub fn deficits_dot(&self) -> Option<String> {
        self.deficits().map(DeficitAutomaton::to_dot)
    }

    /// Graphviz rendering of the most recent synonymy automaton.
    pub fn synonymy_dot(&self) -> Option<String> {
        self.synonymy().map(SynonymyAutomaton::to_dot)
    }
}

/// One-shot check of a list of bit strings against a grammar.
///
/// # Examples
///
/// ```
/// use bicode::checker::{is_bijective, Verdict};
/// use bicode::grammar::CodeStateMachine;
///
/// let grammar = CodeStateMachine::all_words(3);
/// let verdict = is_bijective(["1", "01", "00"], &grammar, 1 << 10).unwrap();
/// assert_eq!(verdict, Verdict::IsBijective);
/// ```
pub fn is_bijective<I, S, G>(codewords: I, grammar: &G, width_limit: usize) -> Result<Verdict>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
    G: Grammar + ?Sized,
{
    let alphabet = Alphabet::new(codewords)?;
    let mut checker = BijectiveChecker::new(CheckerConfig::default().with_width_limit(width_limit));
    Ok(checker.check(&alphabet, grammar)?.verdict)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::CodeStateMachine;

    #[test]
    fn test_check_keeps_last_automata() {
        let mut checker = BijectiveChecker::default();
        assert!(checker.deficits_dot().is_none());

        let alphabet = Alphabet::new(["0", "01", "10"]).unwrap();
        let report = checker.check(&alphabet, &CodeStateMachine::all_words(3)).unwrap();
        assert!(!report.is_bijective());
        assert_eq!(report.stats.codewords, 3);
        assert_eq!(report.stats.suffixes, 5);
        assert_eq!(report.stats.deficits_discovered, 7);

        let dot = checker.deficits_dot().unwrap();
        assert!(dot.starts_with("strict digraph deficits {"));
        assert!(dot.contains("0 -> \"-1\" [label=\"0\"];"));
        let dot = checker.synonymy_dot().unwrap();
        assert!(dot.contains("\"(0, 0, 0)\""));
    }

    #[test]
    fn test_failed_check_clears_artifacts() {
        let mut checker = BijectiveChecker::default();
        let alphabet = Alphabet::new(["0", "1"]).unwrap();
        checker.check(&alphabet, &CodeStateMachine::all_words(2)).unwrap();
        assert!(checker.synonymy().is_some());

        assert!(checker.check(&alphabet, &CodeStateMachine::new()).is_err());
        assert!(checker.synonymy().is_none());
    }

    #[test]
    fn test_is_bijective_rejects_bad_alphabet() {
        let grammar = CodeStateMachine::all_words(1);
        assert!(is_bijective(Vec::<String>::new(), &grammar, 10).is_err());
        assert!(is_bijective(["0", ""], &grammar, 10).is_err());
    }

    #[test]
    fn test_pruning_does_not_change_verdicts() {
        let codes: [&[&str]; 4] = [
            &["0", "01", "10"],
            &["0", "10", "11"],
            &["1", "011", "01110", "1110", "10011"],
            &["00", "01", "0100", "1"],
        ];
        for code in codes {
            let alphabet = Alphabet::new(code).unwrap();
            let grammar = CodeStateMachine::all_words(alphabet.len());
            let pruned = BijectiveChecker::default().check(&alphabet, &grammar).unwrap();
            let unpruned = BijectiveChecker::new(CheckerConfig::default().with_pruning(false))
                .check(&alphabet, &grammar)
                .unwrap();
            assert_eq!(pruned.verdict.name(), unpruned.verdict.name(), "{code:?}");
        }
    }
}
