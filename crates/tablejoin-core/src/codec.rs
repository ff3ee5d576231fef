//! Line codec for two-field delimited text.
//!
//! Every input line is `key<sep>value`. There is no header row and no quoting: the key
//! is everything before the first separator and the value is the second field. Fields
//! after the second are dropped. Output lines are written as `key<sep>value`, where a
//! joined value already carries its own inner separator.

use thiserror::Error;

use crate::types::Record;

/// Separator used when none is configured.
pub const DEFAULT_SEPARATOR: char = ',';

/// Why a line could not be turned into a [`Record`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ParseFailure {
    /// The line contains no separator at all.
    #[error("missing separator")]
    MissingSeparator,

    /// The line has a key but nothing after the separator.
    #[error("missing value field")]
    MissingValue,
}

/// Splits lines into records and renders records back into lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordCodec {
    separator: char,
}

impl Default for RecordCodec {
    fn default() -> Self {
        Self { separator: DEFAULT_SEPARATOR }
    }
}

impl RecordCodec {
    /// Creates a codec with the given separator.
    #[must_use]
    pub const fn new(separator: char) -> Self {
        Self { separator }
    }

    /// Returns the separator.
    #[must_use]
    pub const fn separator(&self) -> char {
        self.separator
    }

    /// Returns true if the separator can delimit fields within a single line.
    #[must_use]
    pub const fn is_valid_separator(separator: char) -> bool {
        !matches!(separator, '\n' | '\r')
    }

    /// Parses one line (without its line terminator) into a record.
    ///
    /// A trailing `\r` is ignored. A line whose second field and everything after it
    /// are empty (`"k,"`, `"k,,"`) has no value and is rejected.
    ///
    /// # Errors
    ///
    /// Returns [`ParseFailure`] if the line has no separator or no value.
    pub fn parse(&self, line: &str) -> Result<Record, ParseFailure> {
        let line = line.strip_suffix('\r').unwrap_or(line);

        let (key, rest) = line.split_once(self.separator).ok_or(ParseFailure::MissingSeparator)?;

        if rest.chars().all(|c| c == self.separator) {
            return Err(ParseFailure::MissingValue);
        }

        let value = rest.split(self.separator).next().unwrap_or(rest);
        Ok(Record::new(key, value))
    }

    /// Renders a record as a line, without a terminator.
    #[must_use]
    pub fn format(&self, record: &Record) -> String {
        let mut line = String::with_capacity(record.key.len() + record.value.len() + 1);
        line.push_str(&record.key);
        line.push(self.separator);
        line.push_str(&record.value);
        line
    }

    /// Builds the joined record for a key present on both sides.
    ///
    /// The value is `left + sep + right`, so the rendered line is
    /// `key<sep>left<sep>right`.
    #[must_use]
    pub fn join(&self, key: &str, left: &str, right: &str) -> Record {
        let mut value = String::with_capacity(left.len() + right.len() + 1);
        value.push_str(left);
        value.push(self.separator);
        value.push_str(right);
        Record::new(key, value)
    }
}
