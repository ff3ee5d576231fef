//! Join strategies.
//!
//! Both strategies share one contract: read two [`LineSource`]s, write joined records to
//! a [`RecordSink`], report progress to a [`JoinObserver`]. They differ only in how much
//! of each input they hold at once.
//!
//! - [`BoundedJoin`] - windows of at most `W` lines per side
//! - [`InMemoryJoin`] - each side read in a single window

mod bounded;

pub use bounded::BoundedJoin;

use tablejoin_core::{LineSource, RecordSink};

use crate::error::JoinResult;
use crate::observer::JoinObserver;
use crate::options::{JoinOptions, WindowBound};
use crate::stats::JoinStats;

/// The capability shared by every join strategy.
pub trait JoinStrategy {
    /// A short name for logs.
    fn name(&self) -> &'static str;

    /// Joins `left` with `right`, writing matches to `sink`.
    ///
    /// The sink is cleared before the first write. Output order follows left windows in
    /// file order, then right rows in file order.
    ///
    /// # Errors
    ///
    /// Returns the first read, parse, or write error; earlier batches stay written.
    fn execute(
        &self,
        left: &mut dyn LineSource,
        right: &mut dyn LineSource,
        sink: &mut dyn RecordSink,
        observer: &mut dyn JoinObserver,
    ) -> JoinResult<JoinStats>;
}

/// Loads each side whole: the baseline for inputs that fit in memory.
///
/// This is [`BoundedJoin`] with [`WindowBound::Unbounded`]; the configured window is
/// ignored.
#[derive(Debug, Clone)]
pub struct InMemoryJoin {
    inner: BoundedJoin,
}

impl InMemoryJoin {
    /// Creates an in-memory join.
    #[must_use]
    pub fn new(options: JoinOptions) -> Self {
        Self { inner: BoundedJoin::new(options.with_window(WindowBound::Unbounded)) }
    }
}

impl JoinStrategy for InMemoryJoin {
    fn name(&self) -> &'static str {
        "in-memory"
    }

    fn execute(
        &self,
        left: &mut dyn LineSource,
        right: &mut dyn LineSource,
        sink: &mut dyn RecordSink,
        observer: &mut dyn JoinObserver,
    ) -> JoinResult<JoinStats> {
        self.inner.run(self.name(), left, right, sink, observer)
    }
}
