//! Windowed nested-loop join.

use tablejoin_core::{LineSource, MalformedLine, Record, RecordCodec, RecordSink, WindowSpec};

use crate::error::{JoinError, JoinResult, Side};
use crate::lookup::WindowLookup;
use crate::observer::{JoinObserver, WindowSummary};
use crate::options::JoinOptions;
use crate::stats::JoinStats;
use crate::strategy::JoinStrategy;

/// Inner join holding at most one window of each side in memory.
///
/// ```text
/// skip_a = 0
/// loop:
///     A = left[skip_a .. skip_a + W]        stop if empty and skip_a > 0
///     lookup = map(A)                       rebuilt for every A window
///     skip_b = 0
///     loop:
///         B = right[skip_b .. skip_b + W]
///         write every b in B with b.key in lookup
///         break if |B| < W
///         skip_b += W
///     stop if |A| < W
///     skip_a += W
/// ```
///
/// The right table is read once per left window. A key repeated inside one left
/// window keeps its last value; the same key in two different left windows joins
/// in both.
#[derive(Debug, Clone)]
pub struct BoundedJoin {
    options: JoinOptions,
}

impl BoundedJoin {
    /// Creates a bounded join with the given options.
    #[must_use]
    pub const fn new(options: JoinOptions) -> Self {
        Self { options }
    }

    pub(crate) fn run(
        &self,
        strategy: &str,
        left: &mut dyn LineSource,
        right: &mut dyn LineSource,
        sink: &mut dyn RecordSink,
        observer: &mut dyn JoinObserver,
    ) -> JoinResult<JoinStats> {
        self.options.validate()?;

        let codec = self.options.codec();
        let bound = self.options.window.max_lines();
        let mut stats = JoinStats::default();
        let tally = MalformedTally::new(self.options.malformed.limit());

        observer.run_started(strategy);
        sink.clear()?;

        let mut left_spec = WindowSpec::all().with_max_lines(bound);
        let mut left_index = 0;

        loop {
            let left_window =
                left.read_window(left_spec).map_err(|e| JoinError::input(Side::Left, e))?;
            if left_window.is_past_end() && left_spec.start_line > 0 {
                break;
            }

            tally.record(Side::Left, left_window.malformed(), &mut stats, observer)?;
            let left_exhausted = left_window.is_exhausted();
            let mut left_summary = WindowSummary {
                start_line: left_window.start_line(),
                lines_read: left_window.lines_read(),
                records: left_window.len(),
                matches: 0,
            };
            stats.left_windows += 1;
            stats.left_records += left_window.len();

            let lookup = WindowLookup::from_window(left_window);
            observer.left_window_started(left_index, left_spec.start_line, lookup.len());

            left_summary.matches = self.scan_right(
                left_index,
                &lookup,
                &codec,
                right,
                sink,
                observer,
                &mut stats,
                &tally,
            )?;
            observer.left_window_finished(left_index, &left_summary);

            if left_exhausted {
                break;
            }
            let Some(next) = left_spec.next() else {
                break;
            };
            left_spec = next;
            left_index += 1;
        }

        observer.run_finished(&stats);
        Ok(stats)
    }

    /// One full pass over the right table against the current lookup.
    #[allow(clippy::too_many_arguments)]
    fn scan_right(
        &self,
        left_index: usize,
        lookup: &WindowLookup,
        codec: &RecordCodec,
        right: &mut dyn LineSource,
        sink: &mut dyn RecordSink,
        observer: &mut dyn JoinObserver,
        stats: &mut JoinStats,
        tally: &MalformedTally,
    ) -> JoinResult<usize> {
        let mut right_spec = WindowSpec::all().with_max_lines(self.options.window.max_lines());
        let mut right_index = 0;
        let mut pass_matches = 0;

        loop {
            let right_window =
                right.read_window(right_spec).map_err(|e| JoinError::input(Side::Right, e))?;
            observer.right_window_started(left_index, right_index, right_spec.start_line);

            // The right table is re-read for every left window; count its bad lines once
            if left_index == 0 {
                tally.record(Side::Right, right_window.malformed(), stats, observer)?;
            }
            stats.right_windows += 1;
            stats.right_records += right_window.len();
            stats.observe_resident(lookup.len() + right_window.len());

            let joined: Vec<Record> = right_window
                .records()
                .iter()
                .filter_map(|row| {
                    let left_value = lookup.probe(&row.key)?;
                    Some(codec.join(&row.key, left_value, &row.value))
                })
                .collect();
            sink.append(&joined)?;

            stats.matches += joined.len();
            pass_matches += joined.len();
            observer.right_window_finished(
                left_index,
                right_index,
                &WindowSummary {
                    start_line: right_window.start_line(),
                    lines_read: right_window.lines_read(),
                    records: right_window.len(),
                    matches: joined.len(),
                },
            );

            if right_window.is_exhausted() {
                break;
            }
            let Some(next) = right_spec.next() else {
                break;
            };
            right_spec = next;
            right_index += 1;
        }

        Ok(pass_matches)
    }
}

impl JoinStrategy for BoundedJoin {
    fn name(&self) -> &'static str {
        "bounded"
    }

    fn execute(
        &self,
        left: &mut dyn LineSource,
        right: &mut dyn LineSource,
        sink: &mut dyn RecordSink,
        observer: &mut dyn JoinObserver,
    ) -> JoinResult<JoinStats> {
        self.run(self.name(), left, right, sink, observer)
    }
}

/// Counts skipped lines against the run-wide limit.
struct MalformedTally {
    limit: Option<usize>,
}

impl MalformedTally {
    const fn new(limit: Option<usize>) -> Self {
        Self { limit }
    }

    fn record(
        &self,
        side: Side,
        lines: &[MalformedLine],
        stats: &mut JoinStats,
        observer: &mut dyn JoinObserver,
    ) -> JoinResult<()> {
        for line in lines {
            match side {
                Side::Left => stats.malformed_left += 1,
                Side::Right => stats.malformed_right += 1,
            }
            observer.malformed_skipped(side, line);
        }

        match self.limit {
            Some(limit) if stats.malformed_skipped() > limit => {
                Err(JoinError::MalformedLimitExceeded { skipped: stats.malformed_skipped(), limit })
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use tablejoin_core::{MalformedPolicy, MemoryLineSource, MemoryRecordSink};

    use super::*;
    use crate::observer::NoopObserver;
    use crate::options::WindowBound;

    fn options(rows: usize) -> JoinOptions {
        JoinOptions::default().with_window(WindowBound::rows(rows).unwrap())
    }

    fn join(rows: usize, a: &[&str], b: &[&str]) -> (Vec<String>, JoinStats) {
        let mut left = MemoryLineSource::from_lines("A", a.iter().copied());
        let mut right = MemoryLineSource::from_lines("B", b.iter().copied());
        let mut sink = MemoryRecordSink::new();
        let stats = BoundedJoin::new(options(rows))
            .execute(&mut left, &mut right, &mut sink, &mut NoopObserver)
            .unwrap();
        (sink.into_lines(), stats)
    }

    #[test]
    fn test_example_in_right_order() {
        for rows in 2..=4 {
            let (lines, _) = join(rows, &["x,1", "y,2"], &["y,9", "z,3", "x,8"]);
            assert_eq!(lines, vec!["y,2,9", "x,1,8"], "window of {rows}");
        }
    }

    #[test]
    fn test_outer_order_is_left_windows() {
        // With W = 1 every left record is its own pass over B
        let (lines, stats) = join(1, &["x,1", "y,2"], &["y,9", "x,8"]);
        assert_eq!(lines, vec!["x,1,8", "y,2,9"]);
        assert_eq!(stats.left_windows, 2);
    }

    #[test]
    fn test_stops_on_empty_window_after_exact_multiple() {
        let mut left = MemoryLineSource::from_lines("A", ["a,1", "b,2"]);
        let mut right = MemoryLineSource::from_lines("B", ["a,x"]);
        let mut sink = MemoryRecordSink::new();

        let stats = BoundedJoin::new(options(2))
            .execute(&mut left, &mut right, &mut sink, &mut NoopObserver)
            .unwrap();

        // Second left read comes back empty and ends the run without scanning B
        assert_eq!(left.reads(), 2);
        assert_eq!(right.reads(), 1);
        assert_eq!(stats.left_windows, 1);
    }

    #[test]
    fn test_short_left_window_ends_run() {
        let mut left = MemoryLineSource::from_lines("A", ["a,1", "b,2", "c,3"]);
        let mut right = MemoryLineSource::from_lines("B", ["c,x"]);
        let mut sink = MemoryRecordSink::new();

        BoundedJoin::new(options(2))
            .execute(&mut left, &mut right, &mut sink, &mut NoopObserver)
            .unwrap();

        assert_eq!(left.reads(), 2);
        assert_eq!(right.reads(), 2);
        assert_eq!(sink.lines(), &["c,3,x"]);
    }

    #[test]
    fn test_limit_counts_right_lines_once() {
        let mut left = MemoryLineSource::from_lines("A", ["a,1", "b,2", "c,3"]);
        let mut right =
            MemoryLineSource::from_lines("B", ["bad", "a,x"]).with_policy(MalformedPolicy::Skip);
        let mut sink = MemoryRecordSink::new();

        let stats = BoundedJoin::new(options(1).with_malformed(MalformedPolicy::SkipUpTo(1)))
            .execute(&mut left, &mut right, &mut sink, &mut NoopObserver)
            .unwrap();

        assert_eq!(stats.left_windows, 3);
        assert_eq!(stats.malformed_right, 1);
        assert_eq!(sink.lines(), &["a,1,x"]);
    }
}
