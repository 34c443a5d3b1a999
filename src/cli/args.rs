//! Command line argument parsing for the bicode CLI using clap.

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// bicode - bijectivity checker for variable-length binary codes
#[derive(Parser, Debug, Clone)]
#[command(name = "bicode")]
#[command(about = "Decide whether a binary code decodes uniquely under a grammar")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct BicodeArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human")]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl BicodeArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Check an encoding scheme for bijectivity
    Check(CheckArgs),

    /// Write a randomly generated encoding scheme
    Generate(GenerateArgs),

    /// Check batches of random codes under the all-words grammar
    Sweep(SweepArgs),
}

/// Arguments for checking a scheme
#[derive(Parser, Debug, Clone)]
pub struct CheckArgs {
    /// Encoding scheme file (`.json` or plain text)
    #[arg(value_name = "SCHEME")]
    pub scheme: PathBuf,

    /// Write deficits.dot, synonymy.dot and grammar.dot into this directory
    #[arg(long, value_name = "DIR")]
    pub dot_dir: Option<PathBuf>,

    /// Checker configuration file (JSON)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Maximum number of live paths in the loop search
    #[arg(short, long)]
    pub width_limit: Option<usize>,

    /// Keep states that cannot take part in a returning cycle
    #[arg(long)]
    pub no_prune: bool,
}

/// Arguments for generating a scheme
#[derive(Parser, Debug, Clone)]
pub struct GenerateArgs {
    /// Output file; `.json` selects the JSON format
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,

    /// Kind of code to generate
    #[arg(short, long, default_value = "code")]
    pub kind: GenerateKind,

    /// Length of the longest codeword
    #[arg(short = 'm', long, default_value = "4")]
    pub max_length: usize,

    /// Number of codewords
    #[arg(short = 'n', long, default_value = "4")]
    pub count: usize,

    /// Total number of bits over all codewords (default: the shortest feasible)
    #[arg(short = 'l', long)]
    pub total_length: Option<usize>,

    /// Number of grammar states; 1 accepts every sequence of codewords
    #[arg(short, long, default_value = "1")]
    pub states: usize,

    /// Random seed
    #[arg(long)]
    pub seed: Option<u64>,
}

/// Kinds of generated codes
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerateKind {
    /// Distinct codewords of a prescribed shape
    Code,
    /// Prefix-free code
    Prefix,
    /// Code built around a known ambiguity, with a grammar accepting it
    Unbijective,
}

/// Arguments for a sweep over code shapes
#[derive(Parser, Debug, Clone)]
pub struct SweepArgs {
    /// Smallest maximum codeword length
    #[arg(long, default_value = "1")]
    pub min_max_length: usize,

    /// Largest maximum codeword length
    #[arg(long, default_value = "3")]
    pub max_max_length: usize,

    /// Codes generated per (length, count, total) shape
    #[arg(short, long, default_value = "10")]
    pub generations: usize,

    /// Maximum number of live paths in the loop search
    #[arg(short, long)]
    pub width_limit: Option<usize>,

    /// Random seed
    #[arg(long)]
    pub seed: Option<u64>,
}

/// Output formats for CLI
#[derive(ValueEnum, Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}
