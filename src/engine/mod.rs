// SensorEngine - the single-threaded cooperative polling loop
//
// One tick processes at most one buffered input line (to completion,
// including any model persist), then performs at most one acquisition
// window and one telemetry emission. There is no parallelism: the store,
// session, and protocol state are only ever touched from this loop, so a
// command can never observe a torn model and command handling never
// overlaps an acquisition.

pub mod transport;

pub use transport::{LineTransport, QueueTransport};

use std::time::Instant;

use crate::acquisition::{EchoProbe, WindowFilter};
use crate::config::SensorConfig;
use crate::model::{ModelStore, RecordStorage};
use crate::protocol::CommandProtocol;
use crate::telemetry::TelemetryFrame;

/// The sensor control loop, generic over its three hardware capabilities
pub struct SensorEngine<P: EchoProbe, S: RecordStorage, T: LineTransport> {
    probe: P,
    transport: T,
    store: ModelStore<S>,
    protocol: CommandProtocol,
    filter: WindowFilter,
    started: Instant,
}

impl<P: EchoProbe, S: RecordStorage, T: LineTransport> SensorEngine<P, S, T> {
    /// Build the engine: loads (or initializes) the persisted model and
    /// starts the protocol in Normal mode with streaming off
    pub fn new(config: &SensorConfig, probe: P, storage: S, transport: T) -> Self {
        let store = ModelStore::load(storage, &config.model);
        let filter = WindowFilter::new(&config.acquisition, &config.filter);
        let protocol = CommandProtocol::new(config.acquisition.min_anchor_samples);
        log::info!("[Engine] Started");
        Self {
            probe,
            transport,
            store,
            protocol,
            filter,
            started: Instant::now(),
        }
    }

    /// Milliseconds since engine start (telemetry timestamps)
    pub fn now_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }

    /// Run one tick of the polling loop
    ///
    /// Order matters: the input line is handled first and fully, so its
    /// effects (anchor changes, merges, mode switches) are visible to the
    /// telemetry emitted in the same tick.
    pub fn tick(&mut self) {
        if let Some(line) = self.transport.poll_line() {
            let mut responses = Vec::new();
            self.protocol.handle_line(
                &line,
                &mut self.store,
                &self.filter,
                &mut self.probe,
                &mut responses,
            );
            for response in &responses {
                self.transport.send_line(response);
            }
        }

        let snap = self.protocol.take_snapshot_request();
        if self.protocol.stream_enabled() || snap {
            let stats = self.filter.acquire(&mut self.probe);
            let frame = TelemetryFrame::from_stats(
                self.now_ms(),
                &stats,
                self.store.record(),
                self.filter.stable_tolerance_us(),
            );
            self.transport.send_line(&frame.to_csv_line());
        }
    }

    /// Run ticks until no buffered input remains, then one more
    ///
    /// Harness convenience for feeding a scripted conversation through the
    /// loop; the trailing tick lets a queued snapshot emit.
    pub fn run_until_idle(&mut self, is_idle: impl Fn(&T) -> bool) {
        while !is_idle(&self.transport) {
            self.tick();
        }
        self.tick();
    }

    /// The protocol state (inspection)
    pub fn protocol(&self) -> &CommandProtocol {
        &self.protocol
    }

    /// The persisted model store (inspection)
    pub fn store(&self) -> &ModelStore<S> {
        &self.store
    }

    /// The transport (harness access to collected output)
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }
}
