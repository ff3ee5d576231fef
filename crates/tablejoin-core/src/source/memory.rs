//! In-memory line source.

use super::cursor::{collect_window, SliceCursor};
use super::{LineSource, MalformedPolicy};
use crate::codec::RecordCodec;
use crate::error::{SourceError, SourceResult};
use crate::types::{Record, Window, WindowSpec};

/// A [`LineSource`] over raw lines held in memory.
///
/// Lines go through the same codec and policy as [`FileLineSource`](super::FileLineSource),
/// which makes this source a drop-in stand-in for tests and benchmarks.
#[derive(Debug, Clone)]
pub struct MemoryLineSource {
    name: String,
    lines: Vec<String>,
    codec: RecordCodec,
    policy: MalformedPolicy,
    reads: usize,
}

impl MemoryLineSource {
    /// Creates a source over raw lines (without terminators).
    pub fn from_lines<I, S>(name: impl Into<String>, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            lines: lines.into_iter().map(Into::into).collect(),
            codec: RecordCodec::default(),
            policy: MalformedPolicy::default(),
            reads: 0,
        }
    }

    /// Creates a source whose lines are `records` rendered with `codec`.
    pub fn from_records<'a, I>(name: impl Into<String>, records: I, codec: RecordCodec) -> Self
    where
        I: IntoIterator<Item = &'a Record>,
    {
        let lines: Vec<String> = records.into_iter().map(|r| codec.format(r)).collect();
        Self::from_lines(name, lines).with_codec(codec)
    }

    /// Sets the codec used to split lines.
    #[must_use]
    pub fn with_codec(mut self, codec: RecordCodec) -> Self {
        self.codec = codec;
        self
    }

    /// Sets the malformed line policy.
    #[must_use]
    pub fn with_policy(mut self, policy: MalformedPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Number of physical lines in the source.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Number of windows read so far.
    #[must_use]
    pub const fn reads(&self) -> usize {
        self.reads
    }
}

impl LineSource for MemoryLineSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn read_window(&mut self, spec: WindowSpec) -> SourceResult<Window> {
        self.reads += 1;
        let mut cursor = SliceCursor::new(&self.lines);
        // Slice cursors cannot fail; the mapping only satisfies the shared signature
        collect_window(&mut cursor, spec, &self.codec, self.policy, &self.name, |e| {
            SourceError::io(&self.name, e)
        })
    }
}
