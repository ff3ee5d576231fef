//! Shared window collection over a line cursor.

use std::io::{self, BufRead};

use tracing::trace;

use crate::codec::RecordCodec;
use crate::error::{truncate_for_display, SourceError, SourceResult};
use crate::source::MalformedPolicy;
use crate::types::{MalformedLine, Window, WindowSpec};

/// Sequential access to raw lines.
pub(crate) trait LineCursor {
    /// Advances past one line without decoding it. Returns false at end of input.
    fn skip_line(&mut self) -> io::Result<bool>;

    /// Reads the next line without its `\n` terminator.
    fn next_line(&mut self) -> io::Result<Option<&str>>;
}

/// Cursor over a buffered reader.
pub(crate) struct ReaderCursor<R> {
    reader: R,
    line: String,
    skipped: Vec<u8>,
}

impl<R: BufRead> ReaderCursor<R> {
    pub(crate) fn new(reader: R) -> Self {
        Self { reader, line: String::new(), skipped: Vec::new() }
    }
}

impl<R: BufRead> LineCursor for ReaderCursor<R> {
    fn skip_line(&mut self) -> io::Result<bool> {
        self.skipped.clear();
        Ok(self.reader.read_until(b'\n', &mut self.skipped)? > 0)
    }

    fn next_line(&mut self) -> io::Result<Option<&str>> {
        self.line.clear();
        if self.reader.read_line(&mut self.line)? == 0 {
            return Ok(None);
        }
        let line = self.line.strip_suffix('\n').unwrap_or(&self.line);
        Ok(Some(line))
    }
}

/// Cursor over lines already held in memory.
pub(crate) struct SliceCursor<'a> {
    lines: std::slice::Iter<'a, String>,
}

impl<'a> SliceCursor<'a> {
    pub(crate) fn new(lines: &'a [String]) -> Self {
        Self { lines: lines.iter() }
    }
}

impl LineCursor for SliceCursor<'_> {
    fn skip_line(&mut self) -> io::Result<bool> {
        Ok(self.lines.next().is_some())
    }

    fn next_line(&mut self) -> io::Result<Option<&str>> {
        Ok(self.lines.next().map(String::as_str))
    }
}

/// Reads the window described by `spec` from `cursor`.
///
/// Skipped leading lines are never parsed. `on_io` attaches the source's location to
/// I/O failures.
pub(crate) fn collect_window<C, F>(
    cursor: &mut C,
    spec: WindowSpec,
    codec: &RecordCodec,
    policy: MalformedPolicy,
    source_name: &str,
    on_io: F,
) -> SourceResult<Window>
where
    C: LineCursor,
    F: Fn(io::Error) -> SourceError,
{
    let mut window = Window::new(spec);

    for _ in 0..spec.start_line {
        if !cursor.skip_line().map_err(&on_io)? {
            trace!(source = source_name, start_line = spec.start_line, "window starts past end");
            return Ok(window);
        }
    }

    while window.spec().admits(window.lines_read()) {
        let Some(line) = cursor.next_line().map_err(&on_io)? else {
            break;
        };
        let line_number = spec.start_line + window.lines_read() + 1;

        match codec.parse(line) {
            Ok(record) => window.push(record),
            Err(reason) if policy.skips() => {
                trace!(source = source_name, line_number, %reason, "skipping malformed line");
                window.push_malformed(MalformedLine {
                    line_number,
                    content: truncate_for_display(line),
                });
            }
            Err(reason) => {
                return Err(SourceError::malformed(source_name, line_number, reason, line));
            }
        }
    }

    Ok(window)
}
