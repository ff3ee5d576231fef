//! Integration tests for bounded and in-memory joins.

mod fixtures;

use std::fs;
use std::num::NonZeroUsize;

use tablejoin::{
    BoundedJoin, InMemoryJoin, JoinError, JoinOptions, JoinPlan, JoinStrategy, NoopObserver, Side,
    StrategyKind, WindowBound,
};
use tablejoin_core::{
    MalformedPolicy, MemoryLineSource, MemoryRecordSink, Record, SourceError, WindowSpec,
};
use tempfile::tempdir;

use fixtures::{
    mixed_right, parse_output, reference_join, sorted, to_lines, unique_left, windowed_order,
    write_table, CountingSource, Event, RecordingObserver,
};

fn bounded(rows: usize) -> BoundedJoin {
    BoundedJoin::new(JoinOptions::default().with_window(WindowBound::rows(rows).unwrap()))
}

fn run_memory(
    strategy: &dyn JoinStrategy,
    left: &[Record],
    right: &[Record],
) -> (Vec<String>, tablejoin::JoinStats) {
    let mut a = MemoryLineSource::from_lines("A", to_lines(left));
    let mut b = MemoryLineSource::from_lines("B", to_lines(right));
    let mut sink = MemoryRecordSink::new();
    let stats = strategy.execute(&mut a, &mut b, &mut sink, &mut NoopObserver).unwrap();
    (sink.into_lines(), stats)
}

// ============================================================================
// Correctness
// ============================================================================

#[test]
fn test_example_output_for_every_window() {
    let left = vec![Record::new("x", "1"), Record::new("y", "2")];
    let right = vec![Record::new("y", "9"), Record::new("z", "3"), Record::new("x", "8")];

    for rows in [2, 3, 5, 1000] {
        let (lines, _) = run_memory(&bounded(rows), &left, &right);
        assert_eq!(lines, vec!["y,2,9", "x,1,8"], "window of {rows}");
    }

    let (lines, _) = run_memory(&InMemoryJoin::new(JoinOptions::default()), &left, &right);
    assert_eq!(lines, vec!["y,2,9", "x,1,8"]);
}

#[test]
fn test_result_independent_of_window() {
    let left = unique_left(23);
    let right = mixed_right(41, 31);
    let expected = sorted(reference_join(&left, &right));
    assert!(!expected.is_empty());

    for rows in [1, 2, 3, 5, 1000] {
        let (lines, stats) = run_memory(&bounded(rows), &left, &right);
        assert_eq!(sorted(parse_output(&lines)), expected, "window of {rows}");
        assert_eq!(stats.matches, expected.len());
    }

    let (lines, _) = run_memory(&InMemoryJoin::new(JoinOptions::default()), &left, &right);
    assert_eq!(sorted(parse_output(&lines)), expected);
}

#[test]
fn test_output_order_follows_windows() {
    let left = unique_left(10);
    let right = mixed_right(25, 12);

    for rows in [1, 3, 4, 10] {
        let (lines, _) = run_memory(&bounded(rows), &left, &right);
        assert_eq!(parse_output(&lines), windowed_order(&left, &right, rows), "window of {rows}");
    }
}

#[test]
fn test_duplicate_key_within_window_keeps_last() {
    let left = vec![Record::new("k", "1"), Record::new("k", "2")];
    let right = vec![Record::new("k", "x")];

    let (lines, _) = run_memory(&bounded(2), &left, &right);
    assert_eq!(lines, vec!["k,2,x"]);
}

#[test]
fn test_duplicate_key_across_windows_joins_each() {
    let left = vec![Record::new("k", "1"), Record::new("k", "2")];
    let right = vec![Record::new("k", "x")];

    let (lines, _) = run_memory(&bounded(1), &left, &right);
    assert_eq!(lines, vec!["k,1,x", "k,2,x"]);
}

#[test]
fn test_repeated_right_keys_all_join() {
    let left = vec![Record::new("k", "1")];
    let right = vec![Record::new("k", "a"), Record::new("j", "b"), Record::new("k", "c")];

    let (lines, _) = run_memory(&bounded(2), &left, &right);
    assert_eq!(lines, vec!["k,1,a", "k,1,c"]);
}

#[test]
fn test_no_match_no_output() {
    let left = vec![Record::new("a", "1"), Record::new("b", "2")];
    let right = vec![Record::new("c", "3"), Record::new("d", "4")];

    let (lines, stats) = run_memory(&bounded(1), &left, &right);
    assert!(lines.is_empty());
    assert_eq!(stats.matches, 0);
    assert_eq!(stats.right_records, 4);
}

#[test]
fn test_empty_left_scans_right_once() {
    let mut a = MemoryLineSource::from_lines("A", Vec::<String>::new());
    let mut b = MemoryLineSource::from_lines("B", ["x,1", "y,2", "z,3"]);
    let mut sink = MemoryRecordSink::new();

    let stats = bounded(2).execute(&mut a, &mut b, &mut sink, &mut NoopObserver).unwrap();

    assert!(sink.lines().is_empty());
    assert_eq!(sink.clears(), 1);
    assert_eq!(stats.left_windows, 1);
    assert_eq!(a.reads(), 1);
    assert_eq!(b.reads(), 2);
}

#[test]
fn test_empty_right() {
    let (lines, stats) = run_memory(&bounded(2), &unique_left(5), &[]);
    assert!(lines.is_empty());
    assert_eq!(stats.left_windows, 3);
    assert_eq!(stats.right_windows, 3);
}

// ============================================================================
// Memory bound and pagination
// ============================================================================

#[test]
fn test_windows_never_exceed_bound() {
    let rows = 4;
    let left = unique_left(37);
    let right = mixed_right(53, 40);
    let bound = NonZeroUsize::new(rows).unwrap();

    let mut a = CountingSource::new(MemoryLineSource::from_lines("A", to_lines(&left)));
    let mut b = CountingSource::new(MemoryLineSource::from_lines("B", to_lines(&right)));
    let mut sink = MemoryRecordSink::new();

    let stats = bounded(rows).execute(&mut a, &mut b, &mut sink, &mut NoopObserver).unwrap();

    assert!(a.requests.iter().chain(&b.requests).all(|spec| spec.max_lines == Some(bound)));
    assert!(a.largest_window <= rows);
    assert!(b.largest_window <= rows);
    assert!(stats.peak_resident_records <= 2 * rows);
    assert_eq!(stats.peak_resident_records, 2 * rows);
}

#[test]
fn test_right_rescanned_once_per_left_window() {
    let rows = 3;
    // 10 left lines: windows at 0, 3, 6 and a short one at 9
    let left = unique_left(10);
    // 7 right lines: windows at 0, 3 and a short one at 6
    let right = mixed_right(7, 10);

    let mut a = CountingSource::new(MemoryLineSource::from_lines("A", to_lines(&left)));
    let mut b = CountingSource::new(MemoryLineSource::from_lines("B", to_lines(&right)));
    let mut sink = MemoryRecordSink::new();

    let stats = bounded(rows).execute(&mut a, &mut b, &mut sink, &mut NoopObserver).unwrap();

    let left_starts: Vec<usize> = a.requests.iter().map(|s| s.start_line).collect();
    assert_eq!(left_starts, vec![0, 3, 6, 9]);
    assert_eq!(stats.left_windows, 4);
    assert_eq!(b.requests.len(), 4 * 3);
    assert_eq!(stats.right_records, 4 * 7);

    let first_pass: Vec<usize> = b.requests[..3].iter().map(|s| s.start_line).collect();
    assert_eq!(first_pass, vec![0, 3, 6]);
}

#[test]
fn test_exact_multiple_ends_on_empty_left_window() {
    let rows = 3;
    let mut a = CountingSource::new(MemoryLineSource::from_lines("A", to_lines(&unique_left(9))));
    let mut b = CountingSource::new(MemoryLineSource::from_lines("B", to_lines(&mixed_right(6, 9))));
    let mut sink = MemoryRecordSink::new();

    let stats = bounded(rows).execute(&mut a, &mut b, &mut sink, &mut NoopObserver).unwrap();

    // Three full left windows, then an empty read that ends the run
    assert_eq!(a.requests.len(), 4);
    assert_eq!(a.requests[3], WindowSpec::bounded(9, NonZeroUsize::new(rows).unwrap()));
    assert_eq!(stats.left_windows, 3);
    // Each pass: two full right windows and the empty one that proves exhaustion
    assert_eq!(b.requests.len(), 3 * 3);
}

#[test]
fn test_in_memory_reads_each_side_once() {
    let mut a = CountingSource::new(MemoryLineSource::from_lines("A", to_lines(&unique_left(50))));
    let mut b = CountingSource::new(MemoryLineSource::from_lines("B", to_lines(&mixed_right(80, 60))));
    let mut sink = MemoryRecordSink::new();

    let strategy = JoinOptions::default().with_strategy(StrategyKind::InMemory).build_strategy();
    let stats = strategy.execute(&mut a, &mut b, &mut sink, &mut NoopObserver).unwrap();

    assert_eq!(strategy.name(), "in-memory");
    assert_eq!(a.requests, vec![WindowSpec::all()]);
    assert_eq!(b.requests, vec![WindowSpec::all()]);
    assert_eq!(stats.peak_resident_records, 50 + 80);
}

// ============================================================================
// Observer
// ============================================================================

#[test]
fn test_observer_sees_window_boundaries_in_order() {
    let mut a = MemoryLineSource::from_lines("A", ["x,1", "y,2"]);
    let mut b = MemoryLineSource::from_lines("B", ["y,9", "z,3", "x,8"]);
    let mut sink = MemoryRecordSink::new();
    let mut observer = RecordingObserver::default();

    bounded(2).execute(&mut a, &mut b, &mut sink, &mut observer).unwrap();

    assert_eq!(
        observer.events,
        vec![
            Event::RunStarted("bounded".to_string()),
            Event::LeftStarted { index: 0, start_line: 0, keys: 2 },
            Event::RightStarted { left: 0, index: 0, start_line: 0 },
            Event::RightFinished { left: 0, index: 0, records: 2, matches: 1 },
            Event::RightStarted { left: 0, index: 1, start_line: 2 },
            Event::RightFinished { left: 0, index: 1, records: 1, matches: 1 },
            Event::LeftFinished { index: 0, matches: 2 },
            Event::RunFinished { matches: 2 },
        ]
    );
}

// ============================================================================
// Malformed input
// ============================================================================

#[test]
fn test_malformed_right_line_aborts_by_default() {
    let mut a = MemoryLineSource::from_lines("A", ["a,1"]);
    let mut b = MemoryLineSource::from_lines("B", ["a,x", "broken"]);
    let mut sink = MemoryRecordSink::new();

    let err = bounded(1).execute(&mut a, &mut b, &mut sink, &mut NoopObserver).unwrap_err();

    match &err {
        JoinError::Source { side, source: SourceError::Malformed { line_number, .. } } => {
            assert_eq!(*side, Side::Right);
            assert_eq!(*line_number, 2);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.is_malformed_input());
    // The batch written before the bad window stays
    assert_eq!(sink.lines(), &["a,1,x"]);
}

#[test]
fn test_malformed_lines_skipped_and_counted_once() {
    let mut a = MemoryLineSource::from_lines("A", ["a,1", "oops", "b,2", "c,3"])
        .with_policy(MalformedPolicy::Skip);
    let mut b = MemoryLineSource::from_lines("B", ["b,x", "bad", "a,y", "c,"])
        .with_policy(MalformedPolicy::Skip);
    let mut sink = MemoryRecordSink::new();
    let mut observer = RecordingObserver::default();

    let options = JoinOptions::default()
        .with_window(WindowBound::rows(2).unwrap())
        .with_malformed(MalformedPolicy::Skip);
    let stats = BoundedJoin::new(options).execute(&mut a, &mut b, &mut sink, &mut observer).unwrap();

    assert_eq!(sink.lines(), &["a,1,y", "b,2,x"]);
    assert_eq!(stats.malformed_left, 1);
    assert_eq!(stats.malformed_right, 2);
    let malformed: Vec<&Event> =
        observer.events.iter().filter(|e| matches!(e, Event::Malformed { .. })).collect();
    assert_eq!(
        malformed,
        vec![
            &Event::Malformed { side: Side::Left, line_number: 2 },
            &Event::Malformed { side: Side::Right, line_number: 2 },
            &Event::Malformed { side: Side::Right, line_number: 4 },
        ]
    );
}

#[test]
fn test_malformed_limit_exceeded() {
    let mut a = MemoryLineSource::from_lines("A", ["a,1"]);
    let mut b = MemoryLineSource::from_lines("B", ["bad", "a,x", "worse"])
        .with_policy(MalformedPolicy::Skip);
    let mut sink = MemoryRecordSink::new();

    let options = JoinOptions::default().with_malformed(MalformedPolicy::SkipUpTo(1));
    let err = BoundedJoin::new(options).execute(&mut a, &mut b, &mut sink, &mut NoopObserver);

    assert!(matches!(err, Err(JoinError::MalformedLimitExceeded { skipped: 2, limit: 1 })));
}

#[test]
fn test_invalid_separator_rejected_before_io() {
    let mut a = CountingSource::new(MemoryLineSource::from_lines("A", ["a,1"]));
    let mut b = MemoryLineSource::from_lines("B", ["a,2"]);
    let mut sink = MemoryRecordSink::new();

    let options = JoinOptions::default().with_separator('\r');
    let err = BoundedJoin::new(options).execute(&mut a, &mut b, &mut sink, &mut NoopObserver);

    assert!(matches!(err, Err(JoinError::InvalidConfig(_))));
    assert!(a.requests.is_empty());
    assert_eq!(sink.clears(), 0);
}

// ============================================================================
// Files
// ============================================================================

#[test]
fn test_file_join_end_to_end() {
    let dir = tempdir().unwrap();
    let a = write_table(dir.path(), "input_A.csv", &["x,1", "y,2"]);
    let b = write_table(dir.path(), "input_B.csv", &["y,9", "z,3", "x,8"]);
    let out = dir.path().join("result.csv");

    let plan = JoinPlan::new(&a, &b, &out)
        .with_options(JoinOptions::default().with_window(WindowBound::rows(2).unwrap()));
    plan.run(&mut NoopObserver).unwrap();

    assert_eq!(fs::read_to_string(&out).unwrap(), "y,2,9\nx,1,8\n");
}

#[test]
fn test_file_join_single_row_window_follows_left_order() {
    let dir = tempdir().unwrap();
    let a = write_table(dir.path(), "input_A.csv", &["x,1", "y,2"]);
    let b = write_table(dir.path(), "input_B.csv", &["y,9", "z,3", "x,8"]);
    let out = dir.path().join("result.csv");

    let plan = JoinPlan::new(&a, &b, &out)
        .with_options(JoinOptions::default().with_window(WindowBound::rows(1).unwrap()));
    plan.run(&mut NoopObserver).unwrap();

    assert_eq!(fs::read_to_string(&out).unwrap(), "x,1,8\ny,2,9\n");
}

#[test]
fn test_rerun_is_idempotent() {
    let dir = tempdir().unwrap();
    let a = write_table(dir.path(), "input_A.csv", &to_lines(&unique_left(12)));
    let b = write_table(dir.path(), "input_B.csv", &to_lines(&mixed_right(30, 15)));
    let out = dir.path().join("result.csv");
    fs::write(&out, "left,over,row\n").unwrap();

    let plan = JoinPlan::new(&a, &b, &out)
        .with_options(JoinOptions::default().with_window(WindowBound::rows(5).unwrap()));

    plan.run(&mut NoopObserver).unwrap();
    let first = fs::read(&out).unwrap();
    plan.run(&mut NoopObserver).unwrap();
    let second = fs::read(&out).unwrap();

    assert_eq!(first, second);
    assert!(!String::from_utf8(first).unwrap().contains("left,over,row"));
}

#[test]
fn test_file_abort_leaves_valid_prefix() {
    let dir = tempdir().unwrap();
    let a = write_table(dir.path(), "input_A.csv", &["a,1"]);
    let b = write_table(dir.path(), "input_B.csv", &["a,x", "a"]);
    let out = dir.path().join("result.csv");

    let plan = JoinPlan::new(&a, &b, &out)
        .with_options(JoinOptions::default().with_window(WindowBound::rows(1).unwrap()));
    let err = plan.run(&mut NoopObserver).unwrap_err();

    assert!(err.is_malformed_input());
    assert_eq!(fs::read_to_string(&out).unwrap(), "a,1,x\n");
}

#[test]
fn test_missing_left_file_fails() {
    let dir = tempdir().unwrap();
    let b = write_table(dir.path(), "input_B.csv", &["a,x"]);
    let out = dir.path().join("result.csv");

    let err = JoinPlan::new(dir.path().join("missing.csv"), &b, &out)
        .run(&mut NoopObserver)
        .unwrap_err();

    assert!(matches!(err, JoinError::Source { side: Side::Left, source: SourceError::Io { .. } }));
    assert!(!err.is_malformed_input());
}

#[test]
fn test_file_join_with_tab_separator() {
    let dir = tempdir().unwrap();
    let a = write_table(dir.path(), "a.tsv", &["x\t1"]);
    let b = write_table(dir.path(), "b.tsv", &["x\t8"]);
    let out = dir.path().join("result.tsv");

    JoinPlan::new(&a, &b, &out)
        .with_options(JoinOptions::default().with_separator('\t'))
        .run(&mut NoopObserver)
        .unwrap();

    assert_eq!(fs::read_to_string(&out).unwrap(), "x\t1\t8\n");
}
