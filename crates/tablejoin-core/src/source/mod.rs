//! Windowed line sources.
//!
//! A [`LineSource`] reads one [`Window`] at a time from a delimited text source. Reads
//! are independent: each call re-positions from the start of the source, so a source
//! never holds more than the window it returns.
//!
//! - [`FileLineSource`] - reads windows from a file on disk
//! - [`MemoryLineSource`] - the same contract over owned lines

mod cursor;
mod file;
mod memory;

pub use file::FileLineSource;
pub use memory::MemoryLineSource;

use crate::error::SourceResult;
use crate::types::{Window, WindowSpec};

/// A sequential, resumable reader of key-value records.
///
/// # Contract
///
/// - Skip `spec.start_line` physical lines, then read at most `spec.max_lines` lines.
/// - Return a window with fewer lines than `max_lines` only when the source is exhausted.
/// - Retain nothing between calls.
///
/// Malformed lines are handled according to the source's [`MalformedPolicy`].
pub trait LineSource {
    /// A short name for the source, used in errors and logs.
    fn name(&self) -> &str;

    /// Reads the window described by `spec`.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Io`](crate::SourceError::Io) if the source cannot be read,
    /// or [`SourceError::Malformed`](crate::SourceError::Malformed) on the first bad
    /// line when the policy is [`MalformedPolicy::Abort`].
    fn read_window(&mut self, spec: WindowSpec) -> SourceResult<Window>;
}

impl<S: LineSource + ?Sized> LineSource for &mut S {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn read_window(&mut self, spec: WindowSpec) -> SourceResult<Window> {
        (**self).read_window(spec)
    }
}

impl<S: LineSource + ?Sized> LineSource for Box<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn read_window(&mut self, spec: WindowSpec) -> SourceResult<Window> {
        (**self).read_window(spec)
    }
}

/// What to do with a line that cannot be split into a key and a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MalformedPolicy {
    /// Fail the read on the first malformed line (default)
    #[default]
    Abort,

    /// Skip malformed lines and report them in the window
    Skip,

    /// Skip malformed lines, but fail the run once more than this many distinct
    /// lines have been skipped
    SkipUpTo(usize),
}

impl MalformedPolicy {
    /// Returns true if malformed lines are skipped rather than fatal.
    #[must_use]
    pub const fn skips(&self) -> bool {
        !matches!(self, Self::Abort)
    }

    /// The maximum number of skipped lines tolerated per run, if any.
    #[must_use]
    pub const fn limit(&self) -> Option<usize> {
        match self {
            Self::SkipUpTo(limit) => Some(*limit),
            Self::Abort | Self::Skip => None,
        }
    }
}
