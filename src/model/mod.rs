// Model module - the persisted calibration record and its store
//
// This module provides three main components:
// 1. CalibrationRecord: the only persisted entity (anchors, trained flag,
//    accumulate mode, per-class running totals) guarded by a sentinel marker
// 2. RecordStorage: narrow capability for reading/writing the record
// 3. ModelStore: the single owner of the record; every mutation persists
//    the full record before returning

pub mod record;
pub mod storage;
pub mod store;

pub use record::{CalibrationRecord, RECORD_MARKER};
pub use storage::{FileStorage, MemoryStorage, RecordStorage};
pub use store::{AnchorKind, ModelStore, SessionMerge};
