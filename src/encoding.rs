//! Encoding schemes: an alphabet and its grammar, persisted together.
//!
//! The plain text format is a whitespace-separated list of numbers and bit
//! strings:
//!
//! ```text
//! <alphabet size>
//! <codeword 0> ... <codeword n-1>
//! <number of states>
//! <number of transitions>
//! <from> <to> <codeword id>
//! ...
//! ```
//!
//! State 0 is the start state and the last state is the accepting one.
//! Files ending in `.json` use the serde representation instead.

use std::fs;
use std::path::Path;
use std::str::{FromStr, SplitWhitespace};

use serde::{Deserialize, Serialize};

use crate::automaton::StateId;
use crate::code::{Alphabet, CodewordId};
use crate::error::{BicodeError, Result};
use crate::grammar::{CodeStateMachine, Grammar};

/// An alphabet and a grammar over it.
///
/// # Examples
///
/// ```
/// use bicode::encoding::EncodingScheme;
///
/// let scheme = EncodingScheme::from_text("3\n0 01 10\n1\n3\n0 0 0\n0 0 1\n0 0 2\n").unwrap();
/// assert_eq!(scheme.alphabet, vec!["0", "01", "10"]);
/// assert_eq!(scheme.transitions.len(), 3);
///
/// let again = EncodingScheme::from_text(&scheme.to_text()).unwrap();
/// assert_eq!(again, scheme);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodingScheme {
    /// Codeword bit strings, in id order.
    pub alphabet: Vec<String>,
    /// Number of grammar states.
    pub states: usize,
    /// Grammar transitions as `(from, to, codeword)`.
    pub transitions: Vec<(StateId, StateId, CodewordId)>,
}

impl EncodingScheme {
    /// Capture an alphabet and a grammar.
    pub fn new(alphabet: &Alphabet, grammar: &CodeStateMachine) -> Self {
        EncodingScheme {
            alphabet: alphabet.iter().map(|c| c.bits.clone()).collect(),
            states: grammar.state_count(),
            transitions: grammar.transition_triples(),
        }
    }

    /// A scheme accepting every sequence of the given codewords.
    pub fn all_words<I, S>(codewords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let alphabet: Vec<String> = codewords.into_iter().map(Into::into).collect();
        let transitions = (0..alphabet.len()).map(|c| (0, 0, c)).collect();
        EncodingScheme {
            alphabet,
            states: 1,
            transitions,
        }
    }

    /// Validated alphabet.
    pub fn alphabet(&self) -> Result<Alphabet> {
        Alphabet::new(&self.alphabet)
    }

    /// Grammar built from the transition triples.
    pub fn grammar(&self) -> Result<CodeStateMachine> {
        check_state_count(self.states, self.transitions.len())?;
        CodeStateMachine::from_transitions(self.states, self.transitions.iter().copied())
    }

    /// Parse the plain text format.
    pub fn from_text(text: &str) -> Result<Self> {
        let mut tokens = Tokens {
            inner: text.split_whitespace(),
        };

        let size: usize = tokens.parse("alphabet size")?;
        let mut alphabet = Vec::new();
        for id in 0..size {
            alphabet.push(tokens.next(&format!("codeword {id}"))?.to_string());
        }

        let states: usize = tokens.parse("number of states")?;
        let count: usize = tokens.parse("number of transitions")?;
        let mut transitions = Vec::new();
        for _ in 0..count {
            let from = tokens.parse("transition source")?;
            let to = tokens.parse("transition target")?;
            let codeword = tokens.parse("transition codeword")?;
            transitions.push((from, to, codeword));
        }

        if let Some(extra) = tokens.inner.next() {
            return Err(BicodeError::parse(format!("unexpected trailing token {extra:?}")));
        }
        check_state_count(states, transitions.len())?;

        Ok(EncodingScheme {
            alphabet,
            states,
            transitions,
        })
    }

    /// Render the plain text format.
    pub fn to_text(&self) -> String {
        let mut text = format!(
            "{}\n{}\n{}\n{}\n",
            self.alphabet.len(),
            self.alphabet.join(" "),
            self.states,
            self.transitions.len()
        );
        for (from, to, codeword) in &self.transitions {
            text.push_str(&format!("{from} {to} {codeword}\n"));
        }
        text
    }

    /// Parse the JSON representation.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Render the JSON representation.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a scheme, choosing the format by file extension.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        if is_json(path) {
            Self::from_json(&content)
        } else {
            Self::from_text(&content)
        }
    }

    /// Save a scheme, choosing the format by file extension.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = if is_json(path) {
            self.to_json()?
        } else {
            self.to_text()
        };
        fs::write(path, content)?;
        Ok(())
    }
}

/// Reachable grammars need at least `states - 1` transitions, which also
/// keeps the declared state count proportional to the file size.
fn check_state_count(states: usize, transitions: usize) -> Result<()> {
    if states > transitions.saturating_add(1) {
        return Err(BicodeError::parse(format!(
            "{states} states cannot all be reached with {transitions} transitions"
        )));
    }
    Ok(())
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

struct Tokens<'a> {
    inner: SplitWhitespace<'a>,
}

impl<'a> Tokens<'a> {
    fn next(&mut self, what: &str) -> Result<&'a str> {
        self.inner
            .next()
            .ok_or_else(|| BicodeError::parse(format!("missing {what}")))
    }

    fn parse<T: FromStr>(&mut self, what: &str) -> Result<T> {
        let token = self.next(what)?;
        token
            .parse()
            .map_err(|_| BicodeError::parse(format!("invalid {what}: {token:?}")))
    }
}
