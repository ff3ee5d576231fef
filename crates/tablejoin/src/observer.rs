//! Window boundary callbacks.
//!
//! The engine reports progress only through a [`JoinObserver`]. Every method has an
//! empty default, so an observer implements just the events it cares about.

use tablejoin_core::MalformedLine;
use tracing::{debug, info, warn};

use crate::error::Side;
use crate::stats::JoinStats;

/// What happened in one window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowSummary {
    /// Offset of the window's first line.
    pub start_line: usize,
    /// Physical lines consumed, malformed ones included.
    pub lines_read: usize,
    /// Records parsed.
    pub records: usize,
    /// Joined records produced while this window was resident.
    pub matches: usize,
}

/// Receives events at window boundaries of a join run.
///
/// Indices are 0-based. Right window indices restart at 0 for every left window.
#[allow(unused_variables)]
pub trait JoinObserver {
    /// A run of `strategy` is starting.
    fn run_started(&mut self, strategy: &str) {}

    /// A left window was loaded into a lookup of `keys` distinct keys.
    fn left_window_started(&mut self, index: usize, start_line: usize, keys: usize) {}

    /// The pass over the right table for a left window is complete.
    fn left_window_finished(&mut self, index: usize, summary: &WindowSummary) {}

    /// A right window was read and is about to be probed.
    fn right_window_started(&mut self, left_index: usize, index: usize, start_line: usize) {}

    /// A right window was probed and its matches were written.
    fn right_window_finished(&mut self, left_index: usize, index: usize, summary: &WindowSummary) {}

    /// A malformed line was skipped. Reported once per distinct line.
    fn malformed_skipped(&mut self, side: Side, line: &MalformedLine) {}

    /// The run completed.
    fn run_finished(&mut self, stats: &JoinStats) {}
}

impl<O: JoinObserver + ?Sized> JoinObserver for &mut O {
    fn run_started(&mut self, strategy: &str) {
        (**self).run_started(strategy);
    }

    fn left_window_started(&mut self, index: usize, start_line: usize, keys: usize) {
        (**self).left_window_started(index, start_line, keys);
    }

    fn left_window_finished(&mut self, index: usize, summary: &WindowSummary) {
        (**self).left_window_finished(index, summary);
    }

    fn right_window_started(&mut self, left_index: usize, index: usize, start_line: usize) {
        (**self).right_window_started(left_index, index, start_line);
    }

    fn right_window_finished(&mut self, left_index: usize, index: usize, summary: &WindowSummary) {
        (**self).right_window_finished(left_index, index, summary);
    }

    fn malformed_skipped(&mut self, side: Side, line: &MalformedLine) {
        (**self).malformed_skipped(side, line);
    }

    fn run_finished(&mut self, stats: &JoinStats) {
        (**self).run_finished(stats);
    }
}

/// Ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl JoinObserver for NoopObserver {}

/// Emits `tracing` events for run progress.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl JoinObserver for TracingObserver {
    fn run_started(&mut self, strategy: &str) {
        info!(strategy, "join started");
    }

    fn left_window_started(&mut self, index: usize, start_line: usize, keys: usize) {
        debug!(index, start_line, keys, "left window loaded");
    }

    fn left_window_finished(&mut self, index: usize, summary: &WindowSummary) {
        debug!(
            index,
            start_line = summary.start_line,
            records = summary.records,
            matches = summary.matches,
            "left window joined"
        );
    }

    fn right_window_finished(&mut self, left_index: usize, index: usize, summary: &WindowSummary) {
        debug!(
            left_index,
            index,
            start_line = summary.start_line,
            records = summary.records,
            matches = summary.matches,
            "right window probed"
        );
    }

    fn malformed_skipped(&mut self, side: Side, line: &MalformedLine) {
        warn!(%side, line_number = line.line_number, content = %line.content, "skipped malformed line");
    }

    fn run_finished(&mut self, stats: &JoinStats) {
        if stats.malformed_skipped() > 0 {
            warn!(
                matches = stats.matches,
                malformed_left = stats.malformed_left,
                malformed_right = stats.malformed_right,
                "join completed with malformed lines skipped"
            );
        } else {
            info!(
                matches = stats.matches,
                left_windows = stats.left_windows,
                right_windows = stats.right_windows,
                peak_resident_records = stats.peak_resident_records,
                "join completed"
            );
        }
    }
}
