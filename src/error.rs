//! Error types for the bicode library.
//!
//! Every fallible operation returns [`Result`], whose error side is the
//! [`BicodeError`] enum. Note that a non-bijective code is *not* an error:
//! the checker reports it through [`Verdict`](crate::checker::Verdict).
//! Errors are reserved for malformed input (rejected before any automaton is
//! built) and for I/O around encoding schemes.
//!
//! # Examples
//!
//! ```
//! use bicode::error::{BicodeError, Result};
//!
//! fn example_operation() -> Result<()> {
//!     Err(BicodeError::invalid_argument("Invalid input"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use thiserror::Error;

/// The main error type for bicode operations.
#[derive(Error, Debug)]
pub enum BicodeError {
    /// The alphabet contains no codewords.
    #[error("Alphabet is empty")]
    EmptyAlphabet,

    /// A codeword has zero length.
    #[error("Codeword {id} is empty")]
    EmptyCodeword { id: usize },

    /// A codeword contains something other than '0' and '1'.
    #[error("Codeword {id} contains invalid bit {found:?}")]
    InvalidBit { id: usize, found: char },

    /// The grammar automaton has no usable start or end state.
    #[error("Invalid grammar: {0}")]
    InvalidGrammar(String),

    /// Invalid argument passed to a generator or command.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Malformed encoding scheme text.
    #[error("Parse error: {0}")]
    Parse(String),

    /// I/O errors (reading schemes, writing dot files, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// An error wrapped with context by the CLI; displays the whole chain.
    #[error("{0:#}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with BicodeError.
pub type Result<T> = std::result::Result<T, BicodeError>;

impl BicodeError {
    /// Create a new invalid grammar error.
    pub fn invalid_grammar<S: Into<String>>(msg: S) -> Self {
        BicodeError::InvalidGrammar(msg.into())
    }

    /// Create a new invalid argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        BicodeError::InvalidArgument(msg.into())
    }

    /// Create a new parse error.
    pub fn parse<S: Into<String>>(msg: S) -> Self {
        BicodeError::Parse(msg.into())
    }
}
