//! Per-window key lookup.

use std::collections::HashMap;

use tablejoin_core::{Record, Window};

/// Key to value map built from one left window.
///
/// A lookup lives for exactly one pass over the right table and never holds more
/// entries than the window it was built from. When a window repeats a key, the later
/// line wins.
#[derive(Debug, Default)]
pub struct WindowLookup {
    entries: HashMap<String, String>,
}

impl WindowLookup {
    /// Builds a lookup from a window, consuming its records.
    #[must_use]
    pub fn from_window(window: Window) -> Self {
        Self::from_records(window.into_records())
    }

    /// Builds a lookup from records in file order.
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = Record>,
    {
        let records = records.into_iter();
        let mut entries = HashMap::with_capacity(records.size_hint().0);
        for record in records {
            let (key, value) = record.into_parts();
            entries.insert(key, value);
        }
        Self { entries }
    }

    /// Returns the value stored for `key`.
    #[must_use]
    pub fn probe(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Number of distinct keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the lookup has no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
