// Protocol state machine tests: mode transitions, command responses, and
// the full BEGIN/feed/END training flows.

use super::*;
use crate::acquisition::{ScriptedProbe, WindowFilter};
use crate::config::{AcquisitionConfig, FilterConfig, ModelConfig};
use crate::model::{MemoryStorage, ModelStore};

struct Harness {
    protocol: CommandProtocol,
    store: ModelStore<MemoryStorage>,
    filter: WindowFilter,
}

impl Harness {
    fn new() -> Self {
        let acquisition = AcquisitionConfig::default();
        Self {
            protocol: CommandProtocol::new(acquisition.min_anchor_samples),
            store: ModelStore::load(MemoryStorage::new(), &ModelConfig::default()),
            filter: WindowFilter::new(&acquisition, &FilterConfig::default()),
        }
    }

    /// Handle a line with a silent probe (commands that never acquire)
    fn handle(&mut self, line: &str) -> Vec<String> {
        self.handle_with_probe(line, ScriptedProbe::silent())
    }

    fn handle_with_probe(&mut self, line: &str, mut probe: ScriptedProbe) -> Vec<String> {
        let mut out = Vec::new();
        self.protocol
            .handle_line(line, &mut self.store, &self.filter, &mut probe, &mut out);
        out
    }

    fn run_session(&mut self, rows: &[&str]) -> Vec<String> {
        let mut all = self.handle("CSVTEST:BEGIN");
        for row in rows {
            all.extend(self.handle(row));
        }
        all.extend(self.handle("CSVTEST:END"));
        all
    }
}

#[test]
fn test_initial_mode_is_normal() {
    let harness = Harness::new();
    assert_eq!(harness.protocol.mode(), ProtocolMode::Normal);
    assert!(!harness.protocol.stream_enabled());
}

#[test]
fn test_unrecognized_input_is_ignored() {
    let mut harness = Harness::new();
    assert!(harness.handle("HELLO").is_empty());
    assert!(harness.handle("").is_empty());
    assert!(harness.handle("W:0.1,0.2").is_empty());
    assert_eq!(harness.protocol.mode(), ProtocolMode::Normal);
}

#[test]
fn test_status_report_untrained_defaults() {
    let mut harness = Harness::new();
    let out = harness.handle("R");
    assert_eq!(
        out,
        vec!["R: F=1400 S=2600 TRAINED=0 ACCUM=0 FRESH(cnt=0,sum=0) SPOIL(cnt=0,sum=0)"]
    );
}

#[test]
fn test_stream_toggle() {
    let mut harness = Harness::new();
    assert_eq!(harness.handle("TRAIN:ON"), vec!["TRAIN:ON OK"]);
    assert!(harness.protocol.stream_enabled());
    assert_eq!(harness.handle("TRAIN:OFF"), vec!["TRAIN:OFF OK"]);
    assert!(!harness.protocol.stream_enabled());
}

#[test]
fn test_snapshot_request_is_one_shot() {
    let mut harness = Harness::new();
    assert_eq!(harness.handle("SNAP"), vec!["SNAP:OK"]);
    assert!(harness.protocol.take_snapshot_request());
    assert!(!harness.protocol.take_snapshot_request());
}

#[test]
fn test_set_anchor_success() {
    let mut harness = Harness::new();
    // Nine tight readings, median 1402
    let probe = ScriptedProbe::from_values(&[
        1400, 1402, 1404, 1398, 1402, 1406, 1400, 1402, 1396,
    ]);
    let out = harness.handle_with_probe("F", probe);
    assert_eq!(out, vec!["F:OK 1402us (n=9)"]);
    assert_eq!(harness.store.record().fresh_anchor, 1402);
}

#[test]
fn test_set_anchor_insufficient_samples_leaves_state() {
    let mut harness = Harness::new();
    let probe = ScriptedProbe::from_values(&[2600, 2610, 2590]);
    let out = harness.handle_with_probe("S", probe);
    assert_eq!(
        out,
        vec!["S:ERR hold steady and retry (Insufficient samples: need 7, got 3)"]
    );
    assert_eq!(harness.store.record().spoil_anchor, 2600);
    assert_eq!(harness.protocol.mode(), ProtocolMode::Normal);
}

#[test]
fn test_tflag_query_and_force_set() {
    let mut harness = Harness::new();
    assert_eq!(harness.handle("TFLAG?"), vec!["TFLAG=0"]);
    assert_eq!(harness.handle("TFLAG:1"), vec!["TFLAG:1 OK"]);
    assert_eq!(harness.handle("TFLAG?"), vec!["TFLAG=1"]);
    assert_eq!(harness.handle("TFLAG:0"), vec!["TFLAG:0 OK"]);
    assert!(!harness.store.record().trained);
}

#[test]
fn test_begin_enters_ingest_and_suspends_streaming() {
    let mut harness = Harness::new();
    harness.handle("TRAIN:ON");
    let out = harness.handle("CSVTEST:BEGIN");
    assert_eq!(out, vec!["CSVTEST:READY"]);
    assert_eq!(harness.protocol.mode(), ProtocolMode::SessionIngest);
    assert!(!harness.protocol.stream_enabled());
}

#[test]
fn test_commands_are_data_rows_while_ingesting() {
    let mut harness = Harness::new();
    harness.handle("CSVTEST:BEGIN");
    // "R" is not a valid row; it is silently ignored, not answered
    assert!(harness.handle("R").is_empty());
    assert_eq!(harness.protocol.mode(), ProtocolMode::SessionIngest);
}

#[test]
fn test_session_rows_are_acknowledged() {
    let mut harness = Harness::new();
    harness.handle("CSVTEST:BEGIN");
    assert_eq!(harness.handle("1300,1,1300,2700"), vec!["ROW:1 OK"]);
    assert_eq!(harness.handle("2700,0,1300,2700"), vec!["ROW:2 OK"]);
    assert!(harness.handle("garbage,row").is_empty());
    assert!(harness
        .handle("echo_us,label,fresh_anchor,spoil_anchor")
        .is_empty());
    assert_eq!(harness.handle("2650,0,1300,2700"), vec!["ROW:3 OK"]);
}

#[test]
fn test_full_session_replace_mode() {
    let mut harness = Harness::new();
    let out = harness.run_session(&[
        "1300,1,1300,2700",
        "1350,1,1300,2700",
        "2700,0,1300,2700",
        "2650,0,1300,2700",
    ]);

    assert!(out.contains(&"CSVTEST:READY".to_string()));
    assert!(out.contains(&"CSVTEST:DONE rows=4".to_string()));
    assert!(out.contains(&"CSVTEST:FRESH cnt=2 sum=2650 mean=1325".to_string()));
    assert!(out.contains(&"CSVTEST:SPOIL cnt=2 sum=5350 mean=2675".to_string()));
    assert!(out.contains(&"CSVTEST:ANCHORS F=1300 S=2700".to_string()));

    let record = harness.store.record();
    assert!(record.trained);
    assert_eq!(record.total_count_fresh, 2);
    assert_eq!(record.total_sum_fresh, 2650);
    assert_eq!(record.total_count_spoil, 2);
    assert_eq!(record.total_sum_spoil, 5350);
    assert_eq!(record.fresh_anchor, 1300);
    assert_eq!(record.spoil_anchor, 2700);
    assert_eq!(harness.protocol.mode(), ProtocolMode::Normal);
}

#[test]
fn test_same_session_twice_accumulate_doubles_totals() {
    let mut harness = Harness::new();
    harness.handle("CSVACCUM:ON");
    let rows = [
        "1300,1,1300,2700",
        "1350,1,1300,2700",
        "2700,0,1300,2700",
        "2650,0,1300,2700",
    ];
    harness.run_session(&rows);
    harness.run_session(&rows);

    let record = harness.store.record();
    assert_eq!(record.total_count_fresh, 4);
    assert_eq!(record.total_sum_fresh, 5300);
    assert_eq!(record.total_count_spoil, 4);
    assert_eq!(record.total_sum_spoil, 10700);
}

#[test]
fn test_same_session_twice_replace_keeps_single_totals() {
    let mut harness = Harness::new();
    let rows = [
        "1300,1,1300,2700",
        "2700,0,1300,2700",
    ];
    harness.run_session(&rows);
    harness.run_session(&rows);

    let record = harness.store.record();
    assert_eq!(record.total_count_fresh, 1);
    assert_eq!(record.total_sum_fresh, 1300);
    assert_eq!(record.total_count_spoil, 1);
    assert_eq!(record.total_sum_spoil, 2700);
}

#[test]
fn test_single_class_session_is_refused() {
    let mut harness = Harness::new();
    let out = harness.run_session(&["1300,1,1300,2700", "1350,1,1300,2700"]);

    assert!(out.contains(&"CSVTEST:ERR Need both classes: fresh=2, spoil=0".to_string()));

    let record = harness.store.record();
    assert!(!record.trained);
    assert_eq!(record.total_count_fresh, 0);
    assert_eq!(record.total_count_spoil, 0);
    // Candidate anchors from the refused session are discarded too
    assert_eq!(record.fresh_anchor, 1400);
    assert_eq!(record.spoil_anchor, 2600);
    assert_eq!(harness.protocol.mode(), ProtocolMode::Normal);
}

#[test]
fn test_single_class_session_allowed_when_totals_cover_it() {
    let mut harness = Harness::new();
    harness.handle("CSVACCUM:ON");
    harness.run_session(&["1300,1,0,0", "2700,0,0,0"]);

    // Only fresh rows this time; persisted spoil totals cover the class
    let out = harness.run_session(&["1350,1,0,0"]);
    assert!(out.contains(&"CSVTEST:DONE rows=1".to_string()));

    let record = harness.store.record();
    assert_eq!(record.total_count_fresh, 2);
    assert_eq!(record.total_count_spoil, 1);
}

#[test]
fn test_end_without_begin_is_an_error() {
    let mut harness = Harness::new();
    let out = harness.handle("CSVTEST:END");
    assert_eq!(out, vec!["CSVTEST:ERR No training session active"]);
    assert!(!harness.store.record().trained);
}

#[test]
fn test_model_reset_clears_training_keeps_anchors() {
    let mut harness = Harness::new();
    harness.run_session(&["1300,1,1300,2700", "2700,0,1300,2700"]);
    assert!(harness.store.record().trained);

    let out = harness.handle("MODEL:RESET");
    assert_eq!(out, vec!["MODEL:RESET OK"]);

    let record = harness.store.record();
    assert!(!record.trained);
    assert_eq!(record.total_count_fresh, 0);
    assert_eq!(record.total_sum_spoil, 0);
    assert_eq!(record.fresh_anchor, 1300);
    assert_eq!(record.spoil_anchor, 2700);
}

#[test]
fn test_accum_clear_zeroes_totals_only() {
    let mut harness = Harness::new();
    harness.run_session(&["1300,1,1300,2700", "2700,0,1300,2700"]);

    let out = harness.handle("CSVACCUM:CLEAR");
    assert_eq!(out, vec!["CSVACCUM:CLEAR OK"]);

    let record = harness.store.record();
    assert!(record.trained);
    assert_eq!(record.total_count_fresh, 0);
    assert_eq!(record.total_sum_fresh, 0);
    assert_eq!(record.fresh_anchor, 1300);
}

#[test]
fn test_accumulate_mode_is_persisted() {
    let mut harness = Harness::new();
    assert_eq!(harness.handle("CSVACCUM:ON"), vec!["CSVACCUM:ON OK"]);
    assert!(harness.store.record().accumulate);
    assert_eq!(harness.handle("CSVACCUM:OFF"), vec!["CSVACCUM:OFF OK"]);
    assert!(!harness.store.record().accumulate);
}

#[test]
fn test_status_after_training() {
    let mut harness = Harness::new();
    harness.run_session(&[
        "1300,1,1300,2700",
        "1350,1,1300,2700",
        "2700,0,1300,2700",
        "2650,0,1300,2700",
    ]);
    let out = harness.handle("R");
    assert_eq!(
        out,
        vec!["R: F=1300 S=2700 TRAINED=1 ACCUM=0 FRESH(cnt=2,sum=2650) SPOIL(cnt=2,sum=5350)"]
    );
}
