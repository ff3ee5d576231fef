//! Result sinks.
//!
//! A [`RecordSink`] receives joined records in batches. The first call of a run is
//! always [`RecordSink::clear`], which discards any previous result; every later
//! batch is appended. Each call is complete (flushed and closed for files) when it
//! returns, so an interrupted run leaves a valid prefix of results behind.

mod file;
mod memory;

pub use file::{FileRecordSink, SyncMode};
pub use memory::MemoryRecordSink;

use crate::error::SinkResult;
use crate::types::Record;

/// Destination for joined records.
pub trait RecordSink {
    /// A short name for the sink, used in errors and logs.
    fn name(&self) -> &str;

    /// Discards any existing content.
    ///
    /// # Errors
    ///
    /// Returns an error if the destination cannot be truncated.
    fn clear(&mut self) -> SinkResult<()>;

    /// Appends a batch of records after existing content.
    ///
    /// # Errors
    ///
    /// Returns an error if the batch cannot be written in full.
    fn append(&mut self, records: &[Record]) -> SinkResult<()>;
}

impl<S: RecordSink + ?Sized> RecordSink for &mut S {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn clear(&mut self) -> SinkResult<()> {
        (**self).clear()
    }

    fn append(&mut self, records: &[Record]) -> SinkResult<()> {
        (**self).append(records)
    }
}
