//! In-memory record sink.

use super::RecordSink;
use crate::codec::RecordCodec;
use crate::error::SinkResult;
use crate::types::Record;

/// Captures rendered lines in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryRecordSink {
    codec: RecordCodec,
    lines: Vec<String>,
    clears: usize,
    appends: usize,
}

impl MemoryRecordSink {
    /// Creates an empty sink with the default codec.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the codec used to render records.
    #[must_use]
    pub fn with_codec(mut self, codec: RecordCodec) -> Self {
        self.codec = codec;
        self
    }

    /// The lines written since the last clear.
    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Consumes the sink, returning its lines.
    #[must_use]
    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }

    /// Number of times the sink has been cleared.
    #[must_use]
    pub const fn clears(&self) -> usize {
        self.clears
    }

    /// Number of non-empty batches appended.
    #[must_use]
    pub const fn appends(&self) -> usize {
        self.appends
    }
}

impl RecordSink for MemoryRecordSink {
    fn name(&self) -> &str {
        "memory"
    }

    fn clear(&mut self) -> SinkResult<()> {
        self.lines.clear();
        self.clears += 1;
        Ok(())
    }

    fn append(&mut self, records: &[Record]) -> SinkResult<()> {
        if records.is_empty() {
            return Ok(());
        }
        self.lines.extend(records.iter().map(|r| self.codec.format(r)));
        self.appends += 1;
        Ok(())
    }
}
