// TrainingSession - per-session accumulator for labeled trainer rows
//
// A session lives between BEGIN and END of one ingest interaction. Each fed
// line is a comma-delimited row `echo,label,fresh_anchor,spoil_anchor`;
// label 1 is the fresh class, anything else the spoil class. Malformed rows
// and the capture tool's header row are ignored without surfacing an error.
//
// The end-of-session gate refuses a merge unless both classes end up with at
// least one contributing row after the prospective merge, counting persisted
// totals only when they would survive (accumulate mode).

use crate::error::TrainingError;
use crate::model::{CalibrationRecord, SessionMerge};

/// First field of the header row written by the capture tool
const HEADER_TOKEN: &str = "echo_us";

/// A row accepted into the session, reported back to the trainer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AcceptedRow {
    /// 1-based index among accepted rows this session
    pub row_index: u32,
    /// Echo sample carried by the row (microseconds)
    pub echo_us: u32,
    /// True when the row was labeled fresh (label 1)
    pub fresh_label: bool,
}

/// Transient accumulator for one BEGIN..END training session
#[derive(Debug, Default, Clone)]
pub struct TrainingSession {
    rows_seen: u32,
    fresh_sum: u64,
    fresh_count: u32,
    spoil_sum: u64,
    spoil_count: u32,
    /// Candidate anchor pair from the most recent row carrying both hints
    candidate_anchors: Option<(u32, u32)>,
}

impl TrainingSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Zero all accumulators and drop any candidate anchors
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Rows accepted so far this session
    pub fn rows_seen(&self) -> u32 {
        self.rows_seen
    }

    /// Per-class row counts accumulated so far (fresh, spoil)
    pub fn class_counts(&self) -> (u32, u32) {
        (self.fresh_count, self.spoil_count)
    }

    /// Feed one raw line into the session
    ///
    /// # Returns
    /// * `Some(AcceptedRow)` - The row carried a positive sample and was
    ///   accumulated into its class
    /// * `None` - Header row, malformed row, or a row without a positive
    ///   sample; silently ignored (anchor hints are still taken)
    pub fn feed_row(&mut self, raw_line: &str) -> Option<AcceptedRow> {
        let fields: Vec<&str> = raw_line.split(',').map(str::trim).collect();
        if fields.len() < 4 {
            return None;
        }
        if fields[0].eq_ignore_ascii_case(HEADER_TOKEN) {
            return None;
        }

        let echo = parse_field(fields[0])?;
        let label = parse_field(fields[1])?;
        let fresh_hint = parse_field(fields[2])?;
        let spoil_hint = parse_field(fields[3])?;

        if fresh_hint > 0 && spoil_hint > 0 {
            self.candidate_anchors = Some((fresh_hint as u32, spoil_hint as u32));
        }

        if echo <= 0 {
            return None;
        }

        let fresh_label = label == 1;
        if fresh_label {
            self.fresh_sum += echo as u64;
            self.fresh_count += 1;
        } else {
            self.spoil_sum += echo as u64;
            self.spoil_count += 1;
        }
        self.rows_seen += 1;

        Some(AcceptedRow {
            row_index: self.rows_seen,
            echo_us: echo as u32,
            fresh_label,
        })
    }

    /// Validate the end-of-session gate and build the merge payload
    ///
    /// Class coverage counts this session's rows plus whatever persisted
    /// totals would survive the merge: in replace mode the prior totals are
    /// cleared first, so only the session's own rows count.
    ///
    /// # Returns
    /// * `Ok(SessionMerge)` - Both classes covered; safe to merge
    /// * `Err(TrainingError::MissingClass)` - Merge must be refused
    pub fn prepare_merge(
        &self,
        record: &CalibrationRecord,
        replace: bool,
    ) -> Result<SessionMerge, TrainingError> {
        let (base_fresh, base_spoil) = if replace {
            (0, 0)
        } else {
            (record.total_count_fresh, record.total_count_spoil)
        };

        let fresh_rows = base_fresh + self.fresh_count;
        let spoil_rows = base_spoil + self.spoil_count;
        if fresh_rows == 0 || spoil_rows == 0 {
            return Err(TrainingError::MissingClass {
                fresh_rows,
                spoil_rows,
            });
        }

        Ok(SessionMerge {
            fresh_sum: self.fresh_sum,
            fresh_count: self.fresh_count,
            spoil_sum: self.spoil_sum,
            spoil_count: self.spoil_count,
            anchors: self.candidate_anchors,
        })
    }
}

/// Parse one row field as an integer, tolerating a decimal suffix
/// (the capture tool writes values like "1300.000")
fn parse_field(field: &str) -> Option<i64> {
    if let Ok(value) = field.parse::<i64>() {
        return Some(value);
    }
    field.parse::<f64>().ok().map(|v| v as i64)
}
