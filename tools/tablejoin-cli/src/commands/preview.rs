//! The `preview` command.

use std::num::NonZeroUsize;
use std::path::Path;

use anyhow::{Context, Result};
use tablejoin_core::{FileLineSource, LineSource, MalformedPolicy, RecordCodec, WindowSpec};

/// Prints one window of `file`, marking lines that would not parse.
pub fn run(file: &Path, start: usize, count: usize, separator: char) -> Result<()> {
    let count = NonZeroUsize::new(count).context("--count must be at least 1")?;
    if !RecordCodec::is_valid_separator(separator) {
        anyhow::bail!("separator {separator:?} cannot be a line terminator");
    }
    let first = start.checked_add(1).context("--start is out of range")?;

    let mut source = FileLineSource::new(file)
        .with_codec(RecordCodec::new(separator))
        .with_policy(MalformedPolicy::Skip);
    let window = source.read_window(WindowSpec::bounded(start, count))?;

    let mut records = window.records().iter();
    let mut malformed = window.malformed().iter().peekable();
    let last = start.saturating_add(window.lines_read());
    for line_number in first..=last {
        if malformed.peek().is_some_and(|m| m.line_number == line_number) {
            if let Some(line) = malformed.next() {
                println!("{line_number:>8}  !  {}", line.content);
            }
        } else if let Some(record) = records.next() {
            println!("{line_number:>8}     {}  =>  {}", record.key, record.value);
        }
    }

    if window.is_past_end() {
        println!("(no lines at or after line {first})");
    } else if window.is_exhausted() {
        println!("(end of file after line {last})");
    }
    Ok(())
}
