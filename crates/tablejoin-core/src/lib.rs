//! `tablejoin` Core
//!
//! This crate provides the primitives the join engine is built on: records, windows,
//! the line codec, and the source and sink abstractions over delimited text files.
//!
//! # Overview
//!
//! - **Records**: [`Record`] is a `(key, value)` pair read from one line of input
//! - **Windows**: [`WindowSpec`] describes a slice of a file (skip N lines, take at most M);
//!   [`Window`] is the slice that was actually read
//! - **Codec**: [`RecordCodec`] splits a line into a record and renders a record back
//! - **Sources**: [`LineSource`] produces windows; [`FileLineSource`] reads them from disk
//!   without buffering more than one window
//! - **Sinks**: [`RecordSink`] receives joined records; [`FileRecordSink`] truncates on
//!   [`RecordSink::clear`] and appends on [`RecordSink::append`]
//!
//! # Example
//!
//! ```
//! use std::num::NonZeroUsize;
//! use tablejoin_core::{LineSource, MemoryLineSource, WindowSpec};
//!
//! let mut source = MemoryLineSource::from_lines("A", ["x,1", "y,2", "z,3"]);
//!
//! let spec = WindowSpec::bounded(1, NonZeroUsize::new(5).unwrap());
//! let window = source.read_window(spec).unwrap();
//!
//! assert_eq!(window.len(), 2);
//! assert_eq!(window.records()[0].key, "y");
//! // Asked for five, got two: the source ran out
//! assert!(window.is_exhausted());
//! ```
//!
//! # Modules
//!
//! - [`types`] - [`Record`], [`WindowSpec`], [`Window`], [`MalformedLine`]
//! - [`codec`] - Line parsing and formatting ([`RecordCodec`])
//! - [`source`] - Windowed readers ([`LineSource`], [`FileLineSource`], [`MemoryLineSource`])
//! - [`sink`] - Result writers ([`RecordSink`], [`FileRecordSink`], [`MemoryRecordSink`])
//! - [`error`] - Error types ([`SourceError`], [`SinkError`])

// Deny unwrap in library code to ensure proper error handling
#![deny(clippy::unwrap_used)]

pub mod codec;
pub mod error;
pub mod sink;
pub mod source;
pub mod types;


pub use codec::{ParseFailure, RecordCodec, DEFAULT_SEPARATOR};
pub use error::{SinkError, SinkResult, SourceError, SourceResult};
pub use sink::{FileRecordSink, MemoryRecordSink, RecordSink, SyncMode};
pub use source::{FileLineSource, LineSource, MalformedPolicy, MemoryLineSource};
pub use types::{MalformedLine, Record, Window, WindowSpec};
