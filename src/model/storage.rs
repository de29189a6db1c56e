// RecordStorage - capability interface for calibration persistence
//
// The device stores the record at a fixed location; the host harness keeps
// it in a JSON file. Either way the store only needs two operations: read
// the whole record, write the whole record. Write failures are logged and
// swallowed so a flaky medium can never take down the control loop.

use std::fs;
use std::path::{Path, PathBuf};

use crate::model::record::CalibrationRecord;

/// Capability for loading and persisting the calibration record
pub trait RecordStorage {
    /// Read the persisted record, if any
    ///
    /// Returns `None` when the medium is empty or unreadable; marker
    /// validation is the store's job, not the storage backend's.
    fn read_record(&mut self) -> Option<CalibrationRecord>;

    /// Persist the full record
    ///
    /// Failures are reported in the log; the in-memory record stays
    /// authoritative either way.
    fn write_record(&mut self, record: &CalibrationRecord);
}

/// JSON-file-backed storage used by the host harness
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecordStorage for FileStorage {
    fn read_record(&mut self) -> Option<CalibrationRecord> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) => {
                log::info!(
                    "[Storage] No readable record at {:?} ({}); starting fresh",
                    self.path,
                    err
                );
                return None;
            }
        };
        match serde_json::from_str(&contents) {
            Ok(record) => Some(record),
            Err(err) => {
                log::warn!(
                    "[Storage] Corrupt record at {:?}: {}. Reinitializing.",
                    self.path,
                    err
                );
                None
            }
        }
    }

    fn write_record(&mut self, record: &CalibrationRecord) {
        let json = match serde_json::to_string_pretty(record) {
            Ok(json) => json,
            Err(err) => {
                log::error!("[Storage] Failed to serialize record: {}", err);
                return;
            }
        };
        if let Err(err) = fs::write(&self.path, json) {
            log::error!("[Storage] Failed to write {:?}: {}", self.path, err);
        }
    }
}

/// In-memory storage for tests and throwaway harness runs
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    record: Option<CalibrationRecord>,
    writes: usize,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-seeded with a record, as after a previous power cycle
    pub fn with_record(record: CalibrationRecord) -> Self {
        Self {
            record: Some(record),
            writes: 0,
        }
    }

    /// Number of persist operations performed
    pub fn write_count(&self) -> usize {
        self.writes
    }

    /// The currently persisted record, if any
    pub fn persisted(&self) -> Option<&CalibrationRecord> {
        self.record.as_ref()
    }
}

impl RecordStorage for MemoryStorage {
    fn read_record(&mut self) -> Option<CalibrationRecord> {
        self.record.clone()
    }

    fn write_record(&mut self, record: &CalibrationRecord) {
        self.record = Some(record.clone());
        self.writes += 1;
    }
}
