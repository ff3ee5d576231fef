//! Error types for the core crate.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::codec::ParseFailure;

/// Maximum length for line content shown in error messages.
pub(crate) const MAX_LINE_DISPLAY_LEN: usize = 100;

/// Result type for line source operations.
pub type SourceResult<T> = Result<T, SourceError>;

/// Result type for record sink operations.
pub type SinkResult<T> = Result<T, SinkError>;

/// Errors raised while reading a window from a line source.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The underlying file could not be opened or read.
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        /// The file being read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A line could not be split into a key and a value.
    #[error("malformed record in {source_name} at line {line_number}: {reason} ({content:?})")]
    Malformed {
        /// Name of the source that produced the line.
        source_name: String,
        /// 1-based physical line number.
        line_number: usize,
        /// Why the line was rejected.
        reason: ParseFailure,
        /// The offending line (truncated for display).
        content: String,
    },
}

impl SourceError {
    /// Creates an I/O error for the given path.
    pub fn io(path: impl AsRef<Path>, source: io::Error) -> Self {
        Self::Io { path: path.as_ref().to_path_buf(), source }
    }

    /// Creates a malformed record error, truncating the line for display.
    pub fn malformed(
        source_name: impl Into<String>,
        line_number: usize,
        reason: ParseFailure,
        content: &str,
    ) -> Self {
        Self::Malformed {
            source_name: source_name.into(),
            line_number,
            reason,
            content: truncate_for_display(content),
        }
    }

    /// Returns true if this error was caused by bad input rather than I/O.
    pub const fn is_malformed(&self) -> bool {
        matches!(self, Self::Malformed { .. })
    }
}

/// Errors raised while writing joined records.
#[derive(Debug, Error)]
pub enum SinkError {
    /// The output file could not be opened, written, or synced.
    #[error("failed to write {}: {source}", .path.display())]
    Io {
        /// The file being written.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },
}

impl SinkError {
    /// Creates an I/O error for the given path.
    pub fn io(path: impl AsRef<Path>, source: io::Error) -> Self {
        Self::Io { path: path.as_ref().to_path_buf(), source }
    }
}

/// Truncates a line to [`MAX_LINE_DISPLAY_LEN`] characters.
pub(crate) fn truncate_for_display(line: &str) -> String {
    if line.chars().count() > MAX_LINE_DISPLAY_LEN {
        let head: String = line.chars().take(MAX_LINE_DISPLAY_LEN).collect();
        format!("{head}...")
    } else {
        line.to_string()
    }
}
