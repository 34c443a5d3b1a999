//! Random test-input synthesis.
//!
//! Generators produce alphabets and grammars with known properties: codes of
//! a prescribed shape, prefix codes (always bijective), random reachable
//! grammars and codes built around a known ambiguity. They are used by the
//! integration tests, the benches and the `generate`/`sweep` commands.
//!
//! Every generator takes the random source explicitly, so a seeded
//! [`StdRng`](rand::rngs::StdRng) reproduces its output.

pub mod code;
pub mod state_machine;
pub mod unbijective;

use crate::code::Alphabet;

pub use code::{
    generate_code, generate_prefix_code, max_code_length, max_number_codewords, min_code_length,
};
pub use state_machine::generate_grammar;
pub use unbijective::{UnbijectiveCode, generate_unbijective};

/// Kraft sum `Σ 2^-len` over the codewords.
pub fn kraft_sum(alphabet: &Alphabet) -> f64 {
    alphabet
        .iter()
        .map(|codeword| (-(codeword.len() as f64)).exp2())
        .sum()
}

/// McMillan's inequality: necessary for unique decodability when every
/// sequence of codewords is a legal message.
///
/// # Examples
///
/// ```
/// use bicode::code::Alphabet;
/// use bicode::generator::satisfies_mcmillan;
///
/// assert!(satisfies_mcmillan(&Alphabet::new(["0", "10", "11"]).unwrap()));
/// assert!(!satisfies_mcmillan(&Alphabet::new(["0", "1", "00"]).unwrap()));
/// ```
pub fn satisfies_mcmillan(alphabet: &Alphabet) -> bool {
    kraft_sum(alphabet) <= 1.0
}
