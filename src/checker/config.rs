//! Configuration for bijectivity checks.
//!
//! # Examples
//!
//! ```
//! use bicode::checker::config::CheckerConfig;
//!
//! // Use default configuration
//! let config = CheckerConfig::default();
//! assert_eq!(config.width_limit, 1 << 20);
//! assert!(config.prune_deficits);
//!
//! // Narrow search without pruning
//! let config = CheckerConfig::default()
//!     .with_width_limit(64)
//!     .with_pruning(false);
//! assert!(!config.prune_synonymy);
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Default cap on the loop finder frontier.
pub const DEFAULT_WIDTH_LIMIT: usize = 1 << 20;

/// Tunables of a [`BijectiveChecker`](crate::checker::BijectiveChecker).
///
/// Pruning never changes a verdict; it only removes automaton states that
/// cannot take part in a returning cycle. The width limit bounds the memory
/// of the loop search and is the only setting that can turn a decision into
/// [`Verdict::WidthOut`](crate::checker::Verdict::WidthOut).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckerConfig {
    /// Maximum number of live paths in the loop finder frontier.
    pub width_limit: usize,
    /// Drop deficits that cannot lead back to the identity deficit.
    pub prune_deficits: bool,
    /// Drop synonymy states that cannot lead to the loop target.
    pub prune_synonymy: bool,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            width_limit: DEFAULT_WIDTH_LIMIT,
            prune_deficits: true,
            prune_synonymy: true,
        }
    }
}

impl CheckerConfig {
    /// Set the frontier cap.
    pub fn with_width_limit(mut self, width_limit: usize) -> Self {
        self.width_limit = width_limit;
        self
    }

    /// Enable or disable both pruning passes.
    pub fn with_pruning(mut self, enabled: bool) -> Self {
        self.prune_deficits = enabled;
        self.prune_synonymy = enabled;
        self
    }

    /// Load a configuration from a JSON file. Missing fields take their
    /// default values.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}
