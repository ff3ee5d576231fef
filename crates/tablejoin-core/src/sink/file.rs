//! File-backed record sink.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use super::RecordSink;
use crate::codec::RecordCodec;
use crate::error::{SinkError, SinkResult};
use crate::types::Record;

/// Default write buffer size (64KB).
const DEFAULT_BUFFER_SIZE: usize = 64 * 1024;

/// Durability applied after each write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncMode {
    /// Flush buffers to the OS before closing (default)
    #[default]
    Flush,
    /// Flush and `fsync` the file data before closing
    Fsync,
}

/// Writes records as delimited lines to a file.
///
/// Every write opens the file, writes the batch through a buffer, flushes it and
/// closes the handle before returning.
#[derive(Debug, Clone)]
pub struct FileRecordSink {
    path: PathBuf,
    name: String,
    codec: RecordCodec,
    sync: SyncMode,
    buffer_size: usize,
    records_written: u64,
}

impl FileRecordSink {
    /// Creates a sink writing to `path` with the default codec.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path.display().to_string();
        Self {
            path,
            name,
            codec: RecordCodec::default(),
            sync: SyncMode::default(),
            buffer_size: DEFAULT_BUFFER_SIZE,
            records_written: 0,
        }
    }

    /// Sets the codec used to render records.
    #[must_use]
    pub const fn with_codec(mut self, codec: RecordCodec) -> Self {
        self.codec = codec;
        self
    }

    /// Sets the sync mode.
    #[must_use]
    pub const fn with_sync(mut self, sync: SyncMode) -> Self {
        self.sync = sync;
        self
    }

    /// The file this sink writes.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Records written since the sink was created.
    #[must_use]
    pub const fn records_written(&self) -> u64 {
        self.records_written
    }

    /// Writes `records` to the file, truncating it first unless `append` is set.
    ///
    /// The file is created if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`SinkError::Io`] if the file cannot be opened, written, flushed, or synced.
    pub fn write_lines(&mut self, records: &[Record], append: bool) -> SinkResult<()> {
        debug!(path = %self.path.display(), records = records.len(), append, "writing records");

        let file = self.open(append).map_err(|e| SinkError::io(&self.path, e))?;
        let mut writer = BufWriter::with_capacity(self.buffer_size, file);

        for record in records {
            writeln!(writer, "{}", self.codec.format(record))
                .map_err(|e| SinkError::io(&self.path, e))?;
        }

        let file = writer.into_inner().map_err(|e| SinkError::io(&self.path, e.into_error()))?;
        if self.sync == SyncMode::Fsync {
            file.sync_data().map_err(|e| SinkError::io(&self.path, e))?;
        }

        self.records_written += records.len() as u64;
        Ok(())
    }

    fn open(&self, append: bool) -> std::io::Result<File> {
        let mut options = OpenOptions::new();
        options.create(true);
        if append {
            options.append(true);
        } else {
            options.write(true).truncate(true);
        }
        options.open(&self.path)
    }
}

impl RecordSink for FileRecordSink {
    fn name(&self) -> &str {
        &self.name
    }

    fn clear(&mut self) -> SinkResult<()> {
        self.write_lines(&[], false)
    }

    fn append(&mut self, records: &[Record]) -> SinkResult<()> {
        if records.is_empty() {
            return Ok(());
        }
        self.write_lines(records, true)
    }
}
