//! Windows: bounded slices of a source.

use std::num::NonZeroUsize;

use super::Record;

/// Which slice of a source to read.
///
/// `start_line` physical lines are skipped, then at most `max_lines` lines are read.
/// `max_lines: None` reads the whole remainder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WindowSpec {
    /// Number of leading lines to skip (0-based offset).
    pub start_line: usize,
    /// Upper bound on lines read, or `None` for the rest of the source.
    pub max_lines: Option<NonZeroUsize>,
}

impl WindowSpec {
    /// A window covering the whole source.
    #[must_use]
    pub const fn all() -> Self {
        Self { start_line: 0, max_lines: None }
    }

    /// A window of at most `max_lines` lines starting at `start_line`.
    #[must_use]
    pub const fn bounded(start_line: usize, max_lines: NonZeroUsize) -> Self {
        Self { start_line, max_lines: Some(max_lines) }
    }

    /// Sets the starting offset.
    #[must_use]
    pub const fn starting_at(mut self, start_line: usize) -> Self {
        self.start_line = start_line;
        self
    }

    /// Sets the line bound.
    #[must_use]
    pub const fn with_max_lines(mut self, max_lines: Option<NonZeroUsize>) -> Self {
        self.max_lines = max_lines;
        self
    }

    /// The window immediately after this one, or `None` if this window is unbounded.
    #[must_use]
    pub fn next(&self) -> Option<Self> {
        self.max_lines.map(|max| Self {
            start_line: self.start_line.saturating_add(max.get()),
            max_lines: self.max_lines,
        })
    }

    /// Returns true if a window that has read `lines_read` lines may read another.
    #[must_use]
    pub fn admits(&self, lines_read: usize) -> bool {
        self.max_lines.map_or(true, |max| lines_read < max.get())
    }
}

/// A line that was skipped because it could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedLine {
    /// 1-based physical line number.
    pub line_number: usize,
    /// The line content (truncated for display).
    pub content: String,
}

/// The records read for one [`WindowSpec`].
///
/// End of data is signalled only by a short window: [`Window::is_exhausted`] is true
/// when fewer physical lines were read than the spec allowed. Physical lines include
/// malformed lines that were skipped, so skipping never looks like end of data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Window {
    spec: WindowSpec,
    records: Vec<Record>,
    lines_read: usize,
    malformed: Vec<MalformedLine>,
}

impl Window {
    /// Creates an empty window for the given spec.
    #[must_use]
    pub fn new(spec: WindowSpec) -> Self {
        let capacity = spec.max_lines.map_or(0, |max| max.get().min(4096));
        Self { spec, records: Vec::with_capacity(capacity), lines_read: 0, malformed: Vec::new() }
    }

    /// Appends a parsed record, counting one physical line.
    pub fn push(&mut self, record: Record) {
        self.records.push(record);
        self.lines_read += 1;
    }

    /// Records a skipped line, counting one physical line.
    pub fn push_malformed(&mut self, line: MalformedLine) {
        self.malformed.push(line);
        self.lines_read += 1;
    }

    /// The spec this window was read for.
    #[must_use]
    pub const fn spec(&self) -> WindowSpec {
        self.spec
    }

    /// Offset of the first line in this window.
    #[must_use]
    pub const fn start_line(&self) -> usize {
        self.spec.start_line
    }

    /// The parsed records, in file order.
    #[must_use]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Consumes the window, returning its records.
    #[must_use]
    pub fn into_records(self) -> Vec<Record> {
        self.records
    }

    /// Number of parsed records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if the window holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of physical lines consumed, malformed ones included.
    #[must_use]
    pub const fn lines_read(&self) -> usize {
        self.lines_read
    }

    /// Lines skipped because they could not be parsed.
    #[must_use]
    pub fn malformed(&self) -> &[MalformedLine] {
        &self.malformed
    }

    /// Returns true if the window read as many lines as its spec allows.
    ///
    /// The source may continue past a full window.
    #[must_use]
    pub fn is_full(&self) -> bool {
        !self.spec.admits(self.lines_read)
    }

    /// Returns true if the source ran out before the window was filled.
    ///
    /// Unbounded windows are always exhausted.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        !self.is_full()
    }

    /// Returns true if the window started at or past the end of the source.
    #[must_use]
    pub const fn is_past_end(&self) -> bool {
        self.lines_read == 0
    }
}
