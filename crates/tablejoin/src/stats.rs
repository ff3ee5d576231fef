//! Run statistics.

/// Counters collected over one join run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JoinStats {
    /// Left windows joined (one pass over the right table each).
    pub left_windows: usize,
    /// Right windows read, over all passes.
    pub right_windows: usize,
    /// Left records loaded into lookups.
    pub left_records: usize,
    /// Right records probed, over all passes.
    pub right_records: usize,
    /// Joined records written.
    pub matches: usize,
    /// Distinct malformed lines skipped in the left table.
    pub malformed_left: usize,
    /// Distinct malformed lines skipped in the right table.
    pub malformed_right: usize,
    /// Largest number of input records held at once (lookup plus right window).
    pub peak_resident_records: usize,
}

impl JoinStats {
    /// Distinct malformed lines skipped on both sides.
    #[must_use]
    pub const fn malformed_skipped(&self) -> usize {
        self.malformed_left + self.malformed_right
    }

    /// Updates the resident record high-water mark.
    pub fn observe_resident(&mut self, records: usize) {
        self.peak_resident_records = self.peak_resident_records.max(records);
    }
}
