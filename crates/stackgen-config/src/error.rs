//! Error types for configuration loading and validation.
//!
//! Read failures, decode failures, and validation failures are distinct
//! variants so callers can branch on the failure class. Validation failures
//! carry the full list of violations found in one pass.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Error raised while loading a stack description.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The description file could not be read.
    #[error("read config {path}: {source}")]
    Read {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The description file is not valid YAML for the expected shape.
    #[error("parse config: {source}")]
    Parse {
        /// Underlying decode error.
        #[from]
        source: serde_yaml::Error,
    },

    /// One or more constraints on the decoded configuration were violated.
    #[error("validate config: {0}")]
    Validation(#[from] ValidationErrors),
}

/// Convenience alias for configuration results.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Accumulator of independent validation failures.
///
/// Checks append to this collector and never short-circuit, so a single
/// validation pass reports every problem in the input at once. Per-service
/// collectors are folded into the top-level one with [`Self::merge`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    messages: Vec<String>,
}

impl ValidationErrors {
    /// Creates an empty collector.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            messages: Vec::new(),
        }
    }

    /// Records one failure description. Duplicates are kept as-is.
    pub fn add(&mut self, message: impl Into<String>) {
        self.messages.push(message.into());
    }

    /// Appends all entries from another collector, preserving order.
    pub fn merge(&mut self, other: Self) {
        self.messages.extend(other.messages);
    }

    /// Returns `true` if no failure has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Returns the recorded failure messages in insertion order.
    #[must_use]
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// Converts the collector into an error when non-empty.
    #[must_use]
    pub fn into_option(self) -> Option<Self> {
        if self.is_empty() { None } else { Some(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.messages.join("\n"))
    }
}

impl std::error::Error for ValidationErrors {}
