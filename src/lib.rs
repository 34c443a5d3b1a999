//! # bicode
//!
//! Decides whether a variable-length binary code is bijective under a
//! grammar: whether every legal sequence of codewords has an encoding no
//! other legal sequence shares.
//!
//! ## Features
//!
//! - Deficit automaton over codeword suffixes
//! - Synonymy automaton pairing two copies of the grammar
//! - Width-bounded breadth-first loop search with shortest witnesses
//! - Plain text and JSON encoding schemes
//! - Random code, prefix code, grammar and ambiguity generators
//! - Graphviz export of every automaton

pub mod automaton;
pub mod checker;
pub mod cli;
pub mod code;
pub mod encoding;
pub mod error;
pub mod generator;
pub mod grammar;

pub mod prelude {
    pub use crate::checker::{BijectiveChecker, CheckReport, CheckerConfig, Verdict, WitnessPair};
    pub use crate::code::Alphabet;
    pub use crate::encoding::EncodingScheme;
    pub use crate::error::{BicodeError, Result};
    pub use crate::grammar::{CodeStateMachine, Grammar};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
