//! `tablejoin`
//!
//! Inner join of two key-value text tables under a fixed memory bound.
//!
//! # Overview
//!
//! Both inputs are read in windows of at most `W` lines. For every window of the left
//! table (A) a fresh [`WindowLookup`] is built; the right table (B) is then scanned from
//! its first line, one window at a time, and every B record whose key is in the lookup
//! is written to the sink before the next B window is read. When B runs out the engine
//! moves on to the next A window and scans B again.
//!
//! At most one A window and one B window are in memory at once, so memory stays
//! proportional to `W` whatever the input sizes. The price is that B is read once per A
//! window: `O(|A| * |B| / W)` row work. [`InMemoryJoin`] is the same algorithm with an
//! unbounded window, which reads each side exactly once.
//!
//! # Example
//!
//! ```
//! use tablejoin::{BoundedJoin, JoinOptions, JoinStrategy, NoopObserver, WindowBound};
//! use tablejoin_core::{MemoryLineSource, MemoryRecordSink};
//!
//! let mut a = MemoryLineSource::from_lines("A", ["x,1", "y,2"]);
//! let mut b = MemoryLineSource::from_lines("B", ["y,9", "z,3", "x,8"]);
//! let mut sink = MemoryRecordSink::new();
//!
//! let options = JoinOptions::default().with_window(WindowBound::rows(2).unwrap());
//! let stats = BoundedJoin::new(options)
//!     .execute(&mut a, &mut b, &mut sink, &mut NoopObserver)
//!     .unwrap();
//!
//! assert_eq!(sink.lines(), &["y,2,9", "x,1,8"]);
//! assert_eq!(stats.matches, 2);
//! ```
//!
//! # Modules
//!
//! - [`strategy`] - The [`JoinStrategy`] capability, [`BoundedJoin`] and [`InMemoryJoin`]
//! - [`lookup`] - Per-window key lookup ([`WindowLookup`])
//! - [`observer`] - Window boundary callbacks ([`JoinObserver`], [`TracingObserver`])
//! - [`options`] - Join configuration ([`JoinOptions`], [`WindowBound`])
//! - [`pipeline`] - File-to-file runs ([`JoinPlan`])
//! - [`stats`] - Run statistics ([`JoinStats`])
//! - [`error`] - Error types ([`JoinError`])

// Deny unwrap in library code to ensure proper error handling
#![deny(clippy::unwrap_used)]

pub mod error;
pub mod lookup;
pub mod observer;
pub mod options;
pub mod pipeline;
pub mod stats;
pub mod strategy;

pub use error::{JoinError, JoinResult, Side};
pub use lookup::WindowLookup;
pub use observer::{JoinObserver, NoopObserver, TracingObserver, WindowSummary};
pub use options::{JoinOptions, StrategyKind, WindowBound, DEFAULT_WINDOW_ROWS};
pub use pipeline::{run_join, JoinPlan};
pub use stats::JoinStats;
pub use strategy::{BoundedJoin, InMemoryJoin, JoinStrategy};
