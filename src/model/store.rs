// ModelStore - single owner of the persisted calibration record
//
// Every mutating operation updates the in-memory record and performs exactly
// one persist before returning, so readers never observe a torn record and a
// power cycle at any point recovers a consistent model. The marker check on
// load is the corruption recovery path: any mismatch reinitializes to the
// factory defaults and persists them immediately.

use crate::config::ModelConfig;
use crate::model::record::CalibrationRecord;
use crate::model::storage::RecordStorage;

/// Which anchor a live measurement should overwrite
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorKind {
    Fresh,
    Spoil,
}

impl AnchorKind {
    /// Protocol letter for log and response lines
    pub fn letter(&self) -> &'static str {
        match self {
            AnchorKind::Fresh => "F",
            AnchorKind::Spoil => "S",
        }
    }
}

/// Per-class payload of a completed training session
///
/// Built by `TrainingSession` once the end-of-session gate passes; the store
/// folds it into the persisted totals under the replace/accumulate policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionMerge {
    pub fresh_sum: u64,
    pub fresh_count: u32,
    pub spoil_sum: u64,
    pub spoil_count: u32,
    /// Candidate anchor pair carried by the session's rows, if any
    pub anchors: Option<(u32, u32)>,
}

/// ModelStore owns the calibration record and its storage backend
pub struct ModelStore<S: RecordStorage> {
    record: CalibrationRecord,
    storage: S,
}

impl<S: RecordStorage> ModelStore<S> {
    /// Load the persisted record, reinitializing defaults on first boot or
    /// marker mismatch (the defaults are persisted immediately in that case)
    pub fn load(mut storage: S, config: &ModelConfig) -> Self {
        let record = match storage.read_record() {
            Some(record) if record.marker_valid() => {
                log::info!(
                    "[Model] Loaded record: F={} S={} trained={} accumulate={}",
                    record.fresh_anchor,
                    record.spoil_anchor,
                    record.trained,
                    record.accumulate
                );
                record
            }
            Some(record) => {
                log::warn!(
                    "[Model] Marker mismatch (0x{:08X}); reinitializing defaults",
                    record.marker
                );
                let defaults = CalibrationRecord::new_default(
                    config.default_fresh_anchor,
                    config.default_spoil_anchor,
                );
                storage.write_record(&defaults);
                defaults
            }
            None => {
                log::info!("[Model] No persisted record; initializing defaults");
                let defaults = CalibrationRecord::new_default(
                    config.default_fresh_anchor,
                    config.default_spoil_anchor,
                );
                storage.write_record(&defaults);
                defaults
            }
        };
        Self { record, storage }
    }

    /// The current record (read-only)
    pub fn record(&self) -> &CalibrationRecord {
        &self.record
    }

    /// Overwrite one anchor and persist
    pub fn set_anchor(&mut self, which: AnchorKind, value_us: u32) {
        match which {
            AnchorKind::Fresh => self.record.fresh_anchor = value_us,
            AnchorKind::Spoil => self.record.spoil_anchor = value_us,
        }
        log::info!("[Model] Anchor {} set to {}us", which.letter(), value_us);
        self.persist();
    }

    /// Overwrite the trained flag and persist
    pub fn set_trained(&mut self, trained: bool) {
        self.record.trained = trained;
        self.persist();
    }

    /// Overwrite the accumulate/replace mode and persist
    pub fn set_accumulate(&mut self, accumulate: bool) {
        self.record.accumulate = accumulate;
        self.persist();
    }

    /// Zero the four totals fields and persist; anchors and trained flag
    /// are untouched
    pub fn clear_totals(&mut self) {
        self.record.total_sum_fresh = 0;
        self.record.total_sum_spoil = 0;
        self.record.total_count_fresh = 0;
        self.record.total_count_spoil = 0;
        self.persist();
    }

    /// Clear the trained flag and all totals; anchors are untouched
    pub fn reset_model(&mut self) {
        self.record.trained = false;
        self.record.total_sum_fresh = 0;
        self.record.total_sum_spoil = 0;
        self.record.total_count_fresh = 0;
        self.record.total_count_spoil = 0;
        log::info!("[Model] Reset: trained flag and totals cleared");
        self.persist();
    }

    /// Fold a completed session into the record and persist
    ///
    /// With `replace = true` the prior totals are zeroed first, so the new
    /// totals are exactly the session's values. The candidate anchors, when
    /// present, overwrite both anchors. This is the sole path by which the
    /// trained flag becomes true.
    pub fn merge_session(&mut self, merge: &SessionMerge, replace: bool) {
        if replace {
            self.record.total_sum_fresh = 0;
            self.record.total_sum_spoil = 0;
            self.record.total_count_fresh = 0;
            self.record.total_count_spoil = 0;
        }
        self.record.total_sum_fresh += merge.fresh_sum;
        self.record.total_sum_spoil += merge.spoil_sum;
        self.record.total_count_fresh += merge.fresh_count;
        self.record.total_count_spoil += merge.spoil_count;

        if let Some((fresh_anchor, spoil_anchor)) = merge.anchors {
            self.record.fresh_anchor = fresh_anchor;
            self.record.spoil_anchor = spoil_anchor;
        }

        self.record.trained = true;
        log::info!(
            "[Model] Session merged ({} mode): fresh cnt={} sum={}, spoil cnt={} sum={}",
            if replace { "replace" } else { "accumulate" },
            self.record.total_count_fresh,
            self.record.total_sum_fresh,
            self.record.total_count_spoil,
            self.record.total_sum_spoil
        );
        self.persist();
    }

    /// Write the full record to the backend
    fn persist(&mut self) {
        debug_assert!(self.record.marker_valid());
        self.storage.write_record(&self.record);
    }

    /// The storage backend (test inspection)
    #[cfg(test)]
    pub fn storage(&self) -> &S {
        &self.storage
    }
}
