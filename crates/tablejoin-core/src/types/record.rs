//! Key-value records.

/// One `(key, value)` pair read from a line of input.
///
/// Joined records reuse this type: their value is the left value, the separator and
/// the right value concatenated (see [`RecordCodec::join`](crate::RecordCodec::join)).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Record {
    /// The join key.
    pub key: String,
    /// The payload carried alongside the key.
    pub value: String,
}

impl Record {
    /// Creates a new record.
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self { key: key.into(), value: value.into() }
    }

    /// Splits the record into its key and value.
    #[must_use]
    pub fn into_parts(self) -> (String, String) {
        (self.key, self.value)
    }
}

