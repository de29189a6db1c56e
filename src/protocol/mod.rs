// CommandProtocol - Normal/SessionIngest state machine over line input
//
// The protocol owns the transient training session and the two emission
// flags (streaming, pending snapshot). Each input line is handled to
// completion, including any model persist, before the caller reads the next
// line or starts the next acquisition. No handler panics; every failure is
// reported as a response line and leaves persisted state unchanged except
// where the command explicitly mutates it.

pub mod command;

pub use command::Command;

use crate::acquisition::{EchoProbe, WindowFilter};
use crate::error::{
    log_acquisition_error, log_training_error, AcquisitionError, ErrorCode, TrainingError,
};
use crate::model::{AnchorKind, ModelStore, RecordStorage};
use crate::session::TrainingSession;

/// Protocol mode
///
/// In `Normal` mode lines are commands; in `SessionIngest` every line except
/// `CSVTEST:END` is fed to the training session as a data row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolMode {
    Normal,
    SessionIngest,
}

/// The trainer-facing command protocol state machine
pub struct CommandProtocol {
    mode: ProtocolMode,
    session: TrainingSession,
    stream_enabled: bool,
    snap_pending: bool,
    /// Valid samples required before a live reading may set an anchor
    min_anchor_samples: usize,
}

impl CommandProtocol {
    pub fn new(min_anchor_samples: usize) -> Self {
        Self {
            mode: ProtocolMode::Normal,
            session: TrainingSession::new(),
            stream_enabled: false,
            snap_pending: false,
            min_anchor_samples,
        }
    }

    pub fn mode(&self) -> ProtocolMode {
        self.mode
    }

    /// Whether periodic telemetry emission is enabled
    pub fn stream_enabled(&self) -> bool {
        self.stream_enabled
    }

    /// Consume a pending one-shot snapshot request, if any
    pub fn take_snapshot_request(&mut self) -> bool {
        std::mem::take(&mut self.snap_pending)
    }

    /// Handle one input line, appending response lines to `out`
    pub fn handle_line<P: EchoProbe, S: RecordStorage>(
        &mut self,
        raw_line: &str,
        store: &mut ModelStore<S>,
        filter: &WindowFilter,
        probe: &mut P,
        out: &mut Vec<String>,
    ) {
        match self.mode {
            ProtocolMode::Normal => self.handle_normal(raw_line, store, filter, probe, out),
            ProtocolMode::SessionIngest => self.handle_ingest(raw_line, store, out),
        }
    }

    fn handle_normal<P: EchoProbe, S: RecordStorage>(
        &mut self,
        raw_line: &str,
        store: &mut ModelStore<S>,
        filter: &WindowFilter,
        probe: &mut P,
        out: &mut Vec<String>,
    ) {
        let Some(command) = Command::parse(raw_line) else {
            // Unrecognized input is ignored
            return;
        };

        match command {
            Command::Status => out.push(status_line(store)),
            Command::SetFreshAnchor => {
                self.set_anchor_from_reading(AnchorKind::Fresh, store, filter, probe, out)
            }
            Command::SetSpoilAnchor => {
                self.set_anchor_from_reading(AnchorKind::Spoil, store, filter, probe, out)
            }
            Command::StreamOn => {
                self.stream_enabled = true;
                out.push("TRAIN:ON OK".to_string());
            }
            Command::StreamOff => {
                self.stream_enabled = false;
                out.push("TRAIN:OFF OK".to_string());
            }
            Command::Snapshot => {
                self.snap_pending = true;
                out.push("SNAP:OK".to_string());
            }
            Command::ResetModel => {
                store.reset_model();
                out.push("MODEL:RESET OK".to_string());
            }
            Command::SessionBegin => {
                self.session.reset();
                // Ingest suspends live streaming; the trainer re-enables it
                self.stream_enabled = false;
                self.mode = ProtocolMode::SessionIngest;
                out.push("CSVTEST:READY".to_string());
            }
            Command::SessionEnd => {
                let err = TrainingError::NoSessionActive;
                log_training_error(&err, "handle_normal");
                out.push(format!("CSVTEST:ERR {}", err.message()));
            }
            Command::AccumulateOn => {
                store.set_accumulate(true);
                out.push("CSVACCUM:ON OK".to_string());
            }
            Command::AccumulateOff => {
                store.set_accumulate(false);
                out.push("CSVACCUM:OFF OK".to_string());
            }
            Command::ClearTotals => {
                store.clear_totals();
                out.push("CSVACCUM:CLEAR OK".to_string());
            }
            Command::QueryTrainedFlag => {
                out.push(format!("TFLAG={}", store.record().trained as u8));
            }
            Command::SetTrainedFlag(trained) => {
                store.set_trained(trained);
                out.push(format!("TFLAG:{} OK", trained as u8));
            }
        }
    }

    fn handle_ingest<S: RecordStorage>(
        &mut self,
        raw_line: &str,
        store: &mut ModelStore<S>,
        out: &mut Vec<String>,
    ) {
        if raw_line.trim().eq_ignore_ascii_case("CSVTEST:END") {
            self.end_session(store, out);
            return;
        }

        if let Some(row) = self.session.feed_row(raw_line) {
            out.push(format!("ROW:{} OK", row.row_index));
        }
        // Malformed rows and headers stay silent
    }

    /// Close the session: merge or refuse, report, return to Normal
    fn end_session<S: RecordStorage>(
        &mut self,
        store: &mut ModelStore<S>,
        out: &mut Vec<String>,
    ) {
        let replace = !store.record().accumulate;
        let rows_seen = self.session.rows_seen();

        match self.session.prepare_merge(store.record(), replace) {
            Ok(merge) => {
                store.merge_session(&merge, replace);
                let record = store.record();
                out.push(format!("CSVTEST:DONE rows={}", rows_seen));
                out.push(format!(
                    "CSVTEST:FRESH cnt={} sum={} mean={}",
                    record.total_count_fresh,
                    record.total_sum_fresh,
                    record.mean_fresh()
                ));
                out.push(format!(
                    "CSVTEST:SPOIL cnt={} sum={} mean={}",
                    record.total_count_spoil,
                    record.total_sum_spoil,
                    record.mean_spoil()
                ));
                out.push(format!(
                    "CSVTEST:ANCHORS F={} S={}",
                    record.fresh_anchor, record.spoil_anchor
                ));
            }
            Err(err) => {
                log_training_error(&err, "end_session");
                out.push(format!("CSVTEST:ERR {}", err.message()));
            }
        }

        self.session.reset();
        self.mode = ProtocolMode::Normal;
    }

    /// Take a live reading and set one anchor from it
    ///
    /// Requires `min_anchor_samples` valid echoes in the window; otherwise
    /// the anchor is left unchanged and a retry message is emitted.
    fn set_anchor_from_reading<P: EchoProbe, S: RecordStorage>(
        &mut self,
        which: AnchorKind,
        store: &mut ModelStore<S>,
        filter: &WindowFilter,
        probe: &mut P,
        out: &mut Vec<String>,
    ) {
        let stats = filter.acquire(probe);
        if stats.sample_count < self.min_anchor_samples {
            let err = AcquisitionError::InsufficientSamples {
                required: self.min_anchor_samples,
                collected: stats.sample_count,
            };
            log_acquisition_error(&err, "set_anchor_from_reading");
            out.push(format!(
                "{}:ERR hold steady and retry ({})",
                which.letter(),
                err.message()
            ));
            return;
        }

        store.set_anchor(which, stats.median_us);
        out.push(format!(
            "{}:OK {}us (n={})",
            which.letter(),
            stats.median_us,
            stats.sample_count
        ));
    }
}

/// Render the `R` status response
fn status_line<S: RecordStorage>(store: &ModelStore<S>) -> String {
    let record = store.record();
    format!(
        "R: F={} S={} TRAINED={} ACCUM={} FRESH(cnt={},sum={}) SPOIL(cnt={},sum={})",
        record.fresh_anchor,
        record.spoil_anchor,
        record.trained as u8,
        record.accumulate as u8,
        record.total_count_fresh,
        record.total_sum_fresh,
        record.total_count_spoil,
        record.total_sum_spoil
    )
}

#[cfg(test)]
mod tests;
