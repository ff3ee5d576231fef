//! File to file join runs.

use std::path::{Path, PathBuf};

use tablejoin_core::{FileLineSource, FileRecordSink, SyncMode};
use tracing::debug;

use crate::error::{JoinError, JoinResult};
use crate::observer::JoinObserver;
use crate::options::JoinOptions;
use crate::stats::JoinStats;

/// Everything needed to join two files into a third.
#[derive(Debug, Clone)]
pub struct JoinPlan {
    /// The left table (A).
    pub left: PathBuf,
    /// The right table (B).
    pub right: PathBuf,
    /// Where joined records are written. Truncated at the start of every run.
    pub output: PathBuf,
    /// Strategy, window, separator and malformed line policy.
    pub options: JoinOptions,
    /// Durability of each output write.
    pub sync: SyncMode,
}

impl JoinPlan {
    /// Creates a plan with default options.
    #[must_use]
    pub fn new(
        left: impl Into<PathBuf>,
        right: impl Into<PathBuf>,
        output: impl Into<PathBuf>,
    ) -> Self {
        Self {
            left: left.into(),
            right: right.into(),
            output: output.into(),
            options: JoinOptions::default(),
            sync: SyncMode::default(),
        }
    }

    /// Sets the join options.
    #[must_use]
    pub const fn with_options(mut self, options: JoinOptions) -> Self {
        self.options = options;
        self
    }

    /// Sets the output sync mode.
    #[must_use]
    pub const fn with_sync(mut self, sync: SyncMode) -> Self {
        self.sync = sync;
        self
    }

    /// Checks the options and that the output does not overwrite an input.
    ///
    /// # Errors
    ///
    /// Returns [`JoinError::InvalidConfig`] on invalid options or overlapping paths.
    pub fn validate(&self) -> JoinResult<()> {
        self.options.validate()?;
        for input in [&self.left, &self.right] {
            if same_file(input, &self.output) {
                return Err(JoinError::InvalidConfig(format!(
                    "output {} would overwrite input {}",
                    self.output.display(),
                    input.display()
                )));
            }
        }
        Ok(())
    }

    /// Runs the join.
    ///
    /// # Errors
    ///
    /// Returns the first configuration, read, parse, or write error.
    pub fn run(&self, observer: &mut dyn JoinObserver) -> JoinResult<JoinStats> {
        self.validate()?;

        let codec = self.options.codec();
        let policy = self.options.malformed;
        let mut left = FileLineSource::new(&self.left).with_codec(codec).with_policy(policy);
        let mut right = FileLineSource::new(&self.right).with_codec(codec).with_policy(policy);
        let mut sink = FileRecordSink::new(&self.output).with_codec(codec).with_sync(self.sync);

        let strategy = self.options.build_strategy();
        debug!(
            strategy = strategy.name(),
            window = %self.options.window,
            left = %self.left.display(),
            right = %self.right.display(),
            output = %self.output.display(),
            "running join plan"
        );

        strategy.execute(&mut left, &mut right, &mut sink, observer)
    }
}

/// Runs `plan`, reporting progress to `observer`.
///
/// # Errors
///
/// See [`JoinPlan::run`].
pub fn run_join(plan: &JoinPlan, observer: &mut dyn JoinObserver) -> JoinResult<JoinStats> {
    plan.run(observer)
}

/// Returns true if both paths name the same file.
///
/// Paths that do not exist yet are compared as written.
fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}
