//! Error types for join runs.

use std::fmt;

use tablejoin_core::{SinkError, SourceError};
use thiserror::Error;

/// Result type for join operations.
pub type JoinResult<T> = Result<T, JoinError>;

/// The two inputs of a join.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// The outer table (A), whose windows are turned into lookups.
    Left,
    /// The inner table (B), scanned once per left window.
    Right,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Left => f.write_str("left"),
            Self::Right => f.write_str("right"),
        }
    }
}

/// Errors that abort a join run.
#[derive(Debug, Error)]
pub enum JoinError {
    /// Reading one of the inputs failed.
    #[error("{side} input: {source}")]
    Source {
        /// Which input failed.
        side: Side,
        /// The underlying source error.
        #[source]
        source: SourceError,
    },

    /// Writing the result failed.
    #[error("output: {0}")]
    Sink(#[from] SinkError),

    /// More malformed lines were skipped than the configured limit allows.
    #[error("skipped {skipped} malformed lines, more than the limit of {limit}")]
    MalformedLimitExceeded {
        /// Distinct lines skipped so far.
        skipped: usize,
        /// The configured limit.
        limit: usize,
    },

    /// The join was configured with invalid options.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl JoinError {
    /// Wraps a source error with the side it came from.
    #[must_use]
    pub const fn input(side: Side, source: SourceError) -> Self {
        Self::Source { side, source }
    }

    /// Returns true if the run failed because of bad input lines.
    #[must_use]
    pub const fn is_malformed_input(&self) -> bool {
        match self {
            Self::Source { source, .. } => source.is_malformed(),
            Self::MalformedLimitExceeded { .. } => true,
            Self::Sink(_) | Self::InvalidConfig(_) => false,
        }
    }
}
