// CalibrationRecord - the persisted calibration model
//
// The record is a fixed field set written in full on every mutation. It
// begins with a sentinel marker; a load that yields any other marker value
// is treated as uninitialized or corrupted storage and replaced by the
// factory defaults.

use serde::{Deserialize, Serialize};

/// Sentinel identifying a valid persisted record ("FSN1")
pub const RECORD_MARKER: u32 = 0x4653_4E31;

/// The persisted calibration model
///
/// Owned exclusively by `ModelStore`; mutated only through its operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalibrationRecord {
    /// Sentinel marker detecting uninitialized/corrupted storage
    pub marker: u32,
    /// Reference reading for the fresh class (microseconds)
    pub fresh_anchor: u32,
    /// Reference reading for the spoiled class (microseconds)
    pub spoil_anchor: u32,
    /// True once at least one training session has merged successfully
    pub trained: bool,
    /// True = completed sessions add to the running totals,
    /// false = each completed session replaces them
    pub accumulate: bool,
    /// Running sum of fresh-class samples across merged sessions
    pub total_sum_fresh: u64,
    /// Running sum of spoil-class samples
    pub total_sum_spoil: u64,
    /// Running count of fresh-class rows
    pub total_count_fresh: u32,
    /// Running count of spoil-class rows
    pub total_count_spoil: u32,
}

impl CalibrationRecord {
    /// Factory-default record: untrained, replace mode, zero totals
    pub fn new_default(fresh_anchor: u32, spoil_anchor: u32) -> Self {
        Self {
            marker: RECORD_MARKER,
            fresh_anchor,
            spoil_anchor,
            trained: false,
            accumulate: false,
            total_sum_fresh: 0,
            total_sum_spoil: 0,
            total_count_fresh: 0,
            total_count_spoil: 0,
        }
    }

    /// Whether the sentinel marker matches a validly persisted record
    pub fn marker_valid(&self) -> bool {
        self.marker == RECORD_MARKER
    }

    /// Mean fresh-class sample across the persisted totals (0 when empty)
    pub fn mean_fresh(&self) -> u32 {
        if self.total_count_fresh == 0 {
            0
        } else {
            (self.total_sum_fresh / self.total_count_fresh as u64) as u32
        }
    }

    /// Mean spoil-class sample across the persisted totals (0 when empty)
    pub fn mean_spoil(&self) -> u32 {
        if self.total_count_spoil == 0 {
            0
        } else {
            (self.total_sum_spoil / self.total_count_spoil as u64) as u32
        }
    }
}
