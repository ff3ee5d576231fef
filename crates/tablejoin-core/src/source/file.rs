//! File-backed line source.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::cursor::{collect_window, ReaderCursor};
use super::{LineSource, MalformedPolicy};
use crate::codec::RecordCodec;
use crate::error::{SourceError, SourceResult};
use crate::types::{Window, WindowSpec};

/// Default read buffer size (64KB).
const DEFAULT_BUFFER_SIZE: usize = 64 * 1024;

/// Reads windows of records from a delimited text file.
///
/// The file is opened for every window and closed before [`read_window`] returns,
/// on success and on error alike. Lines before the window are skipped without being
/// decoded, so a window far into the file costs a sequential scan but no allocation
/// per skipped line.
///
/// [`read_window`]: LineSource::read_window
#[derive(Debug, Clone)]
pub struct FileLineSource {
    path: PathBuf,
    name: String,
    codec: RecordCodec,
    policy: MalformedPolicy,
    buffer_size: usize,
}

impl FileLineSource {
    /// Creates a source over the file at `path` with the default codec and policy.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path.display().to_string();
        Self {
            path,
            name,
            codec: RecordCodec::default(),
            policy: MalformedPolicy::default(),
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }

    /// Sets the codec used to split lines.
    #[must_use]
    pub const fn with_codec(mut self, codec: RecordCodec) -> Self {
        self.codec = codec;
        self
    }

    /// Sets the malformed line policy.
    #[must_use]
    pub const fn with_policy(mut self, policy: MalformedPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Sets the read buffer size.
    #[must_use]
    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size.max(1);
        self
    }

    /// The file this source reads.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The malformed line policy.
    #[must_use]
    pub const fn policy(&self) -> MalformedPolicy {
        self.policy
    }
}

impl LineSource for FileLineSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn read_window(&mut self, spec: WindowSpec) -> SourceResult<Window> {
        debug!(
            path = %self.path.display(),
            start_line = spec.start_line,
            max_lines = spec.max_lines.map(|n| n.get()),
            "reading window"
        );

        let file = File::open(&self.path).map_err(|e| SourceError::io(&self.path, e))?;
        let mut cursor = ReaderCursor::new(BufReader::with_capacity(self.buffer_size, file));

        let window = collect_window(&mut cursor, spec, &self.codec, self.policy, &self.name, |e| {
            SourceError::io(&self.path, e)
        })?;

        debug!(
            path = %self.path.display(),
            records = window.len(),
            lines_read = window.lines_read(),
            malformed = window.malformed().len(),
            "window read"
        );
        Ok(window)
    }
}
