//! Shared helpers for join integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use tablejoin::{JoinObserver, JoinStats, Side, WindowSummary};
use tablejoin_core::{LineSource, MalformedLine, Record, SourceResult, Window, WindowSpec};

/// A joined row as `(key, left value, right value)`.
pub type Triple = (String, String, String);

/// Writes `lines` (newline terminated) to `dir/name`.
pub fn write_table<S: AsRef<str>>(dir: &Path, name: &str, lines: &[S]) -> PathBuf {
    let path = dir.join(name);
    let mut content = String::new();
    for line in lines {
        content.push_str(line.as_ref());
        content.push('\n');
    }
    fs::write(&path, content).expect("failed to write table");
    path
}

/// Renders records as `key,value` lines.
pub fn to_lines(records: &[Record]) -> Vec<String> {
    records.iter().map(|r| format!("{},{}", r.key, r.value)).collect()
}

/// Splits `key,left,right` output lines into triples.
pub fn parse_output(lines: &[String]) -> Vec<Triple> {
    lines
        .iter()
        .map(|line| {
            let mut fields = line.splitn(3, ',');
            let key = fields.next().expect("missing key").to_string();
            let left = fields.next().expect("missing left value").to_string();
            let right = fields.next().expect("missing right value").to_string();
            (key, left, right)
        })
        .collect()
}

/// Hash join over fully loaded inputs, in right-table order.
pub fn reference_join(left: &[Record], right: &[Record]) -> Vec<Triple> {
    let lookup: HashMap<&str, &str> =
        left.iter().map(|r| (r.key.as_str(), r.value.as_str())).collect();
    right
        .iter()
        .filter_map(|r| {
            lookup.get(r.key.as_str()).map(|a| (r.key.clone(), (*a).to_string(), r.value.clone()))
        })
        .collect()
}

/// The exact output order a window of `rows` produces: left chunks, then right rows.
pub fn windowed_order(left: &[Record], right: &[Record], rows: usize) -> Vec<Triple> {
    left.chunks(rows).flat_map(|chunk| reference_join(chunk, right)).collect()
}

/// Sorts triples so that multisets can be compared.
pub fn sorted(mut triples: Vec<Triple>) -> Vec<Triple> {
    triples.sort();
    triples
}

/// A left table with unique keys `k0..k{n}`.
pub fn unique_left(n: usize) -> Vec<Record> {
    (0..n).map(|i| Record::new(format!("k{i}"), format!("a{i}"))).collect()
}

/// A right table with repeated, matching and unmatched keys.
pub fn mixed_right(n: usize, key_space: usize) -> Vec<Record> {
    (0..n).map(|i| Record::new(format!("k{}", (i * 7) % key_space), format!("b{i}"))).collect()
}

/// Wraps a source and records every request and the size of every reply.
pub struct CountingSource<S> {
    inner: S,
    pub requests: Vec<WindowSpec>,
    pub largest_window: usize,
}

impl<S> CountingSource<S> {
    pub fn new(inner: S) -> Self {
        Self { inner, requests: Vec::new(), largest_window: 0 }
    }
}

impl<S: LineSource> LineSource for CountingSource<S> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn read_window(&mut self, spec: WindowSpec) -> SourceResult<Window> {
        self.requests.push(spec);
        let window = self.inner.read_window(spec)?;
        self.largest_window = self.largest_window.max(window.len());
        Ok(window)
    }
}

/// Observer events, flattened for comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    RunStarted(String),
    LeftStarted { index: usize, start_line: usize, keys: usize },
    LeftFinished { index: usize, matches: usize },
    RightStarted { left: usize, index: usize, start_line: usize },
    RightFinished { left: usize, index: usize, records: usize, matches: usize },
    Malformed { side: Side, line_number: usize },
    RunFinished { matches: usize },
}

/// Collects every observer event in order.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    pub events: Vec<Event>,
}

impl JoinObserver for RecordingObserver {
    fn run_started(&mut self, strategy: &str) {
        self.events.push(Event::RunStarted(strategy.to_string()));
    }

    fn left_window_started(&mut self, index: usize, start_line: usize, keys: usize) {
        self.events.push(Event::LeftStarted { index, start_line, keys });
    }

    fn left_window_finished(&mut self, index: usize, summary: &WindowSummary) {
        self.events.push(Event::LeftFinished { index, matches: summary.matches });
    }

    fn right_window_started(&mut self, left_index: usize, index: usize, start_line: usize) {
        self.events.push(Event::RightStarted { left: left_index, index, start_line });
    }

    fn right_window_finished(&mut self, left_index: usize, index: usize, summary: &WindowSummary) {
        self.events.push(Event::RightFinished {
            left: left_index,
            index,
            records: summary.records,
            matches: summary.matches,
        });
    }

    fn malformed_skipped(&mut self, side: Side, line: &MalformedLine) {
        self.events.push(Event::Malformed { side, line_number: line.line_number });
    }

    fn run_finished(&mut self, stats: &JoinStats) {
        self.events.push(Event::RunFinished { matches: stats.matches });
    }
}
