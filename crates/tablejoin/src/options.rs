//! Join configuration.

use std::fmt;
use std::num::NonZeroUsize;

use tablejoin_core::{MalformedPolicy, RecordCodec, DEFAULT_SEPARATOR};

use crate::error::{JoinError, JoinResult};
use crate::strategy::{BoundedJoin, InMemoryJoin, JoinStrategy};

/// Window size used when none is configured.
pub const DEFAULT_WINDOW_ROWS: usize = 5;

/// Maximum number of lines held per side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowBound {
    /// At most this many lines per window.
    Rows(NonZeroUsize),
    /// Read each side in a single window.
    Unbounded,
}

impl WindowBound {
    /// A bound of `rows` lines, or `None` if `rows` is zero.
    #[must_use]
    pub fn rows(rows: usize) -> Option<Self> {
        NonZeroUsize::new(rows).map(Self::Rows)
    }

    /// The per-window line limit, `None` when unbounded.
    #[must_use]
    pub const fn max_lines(&self) -> Option<NonZeroUsize> {
        match self {
            Self::Rows(rows) => Some(*rows),
            Self::Unbounded => None,
        }
    }
}

impl Default for WindowBound {
    fn default() -> Self {
        Self::Rows(NonZeroUsize::new(DEFAULT_WINDOW_ROWS).unwrap_or(NonZeroUsize::MIN))
    }
}

impl fmt::Display for WindowBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rows(rows) => write!(f, "{rows} rows"),
            Self::Unbounded => f.write_str("unbounded"),
        }
    }
}

/// Which join strategy to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StrategyKind {
    /// Windowed join with bounded memory (default)
    #[default]
    Bounded,
    /// Load each side in one window
    InMemory,
}

/// Options shared by every join strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JoinOptions {
    /// Which strategy [`JoinOptions::build_strategy`] creates.
    pub strategy: StrategyKind,
    /// Lines per window for the bounded strategy.
    pub window: WindowBound,
    /// Field separator for inputs and output.
    pub separator: char,
    /// What to do with lines that have no value field.
    pub malformed: MalformedPolicy,
}

impl Default for JoinOptions {
    fn default() -> Self {
        Self {
            strategy: StrategyKind::default(),
            window: WindowBound::default(),
            separator: DEFAULT_SEPARATOR,
            malformed: MalformedPolicy::default(),
        }
    }
}

impl JoinOptions {
    /// Sets the strategy.
    #[must_use]
    pub const fn with_strategy(mut self, strategy: StrategyKind) -> Self {
        self.strategy = strategy;
        self
    }

    /// Sets the window bound.
    #[must_use]
    pub const fn with_window(mut self, window: WindowBound) -> Self {
        self.window = window;
        self
    }

    /// Sets the field separator.
    #[must_use]
    pub const fn with_separator(mut self, separator: char) -> Self {
        self.separator = separator;
        self
    }

    /// Sets the malformed line policy.
    #[must_use]
    pub const fn with_malformed(mut self, malformed: MalformedPolicy) -> Self {
        self.malformed = malformed;
        self
    }

    /// The codec implied by the separator.
    #[must_use]
    pub const fn codec(&self) -> RecordCodec {
        RecordCodec::new(self.separator)
    }

    /// Checks that the options describe a runnable join.
    ///
    /// # Errors
    ///
    /// Returns [`JoinError::InvalidConfig`] if the separator is a line terminator.
    pub fn validate(&self) -> JoinResult<()> {
        if !RecordCodec::is_valid_separator(self.separator) {
            return Err(JoinError::InvalidConfig(format!(
                "separator {:?} cannot be a line terminator",
                self.separator
            )));
        }
        Ok(())
    }

    /// Creates the configured strategy.
    #[must_use]
    pub fn build_strategy(&self) -> Box<dyn JoinStrategy> {
        match self.strategy {
            StrategyKind::Bounded => Box::new(BoundedJoin::new(*self)),
            StrategyKind::InMemory => Box::new(InMemoryJoin::new(*self)),
        }
    }
}
