// FreshSense Core - ultrasonic freshness sensor engine
// Echo window filtering, anchor classification, and the trainer protocol

// Module declarations
pub mod acquisition;
pub mod analysis;
pub mod config;
pub mod engine;
pub mod error;
pub mod model;
pub mod protocol;
pub mod session;
pub mod telemetry;

// Re-exports for convenience
pub use acquisition::{EchoProbe, EchoStats, ScriptedProbe, WindowFilter};
pub use config::SensorConfig;
pub use engine::{LineTransport, QueueTransport, SensorEngine};
pub use model::{CalibrationRecord, FileStorage, MemoryStorage, ModelStore};
pub use protocol::{Command, CommandProtocol, ProtocolMode};
pub use session::TrainingSession;
pub use telemetry::TelemetryFrame;

/// Initialize logging for host-side binaries
pub fn init_logging() {
    let _ = env_logger::Builder::from_default_env().try_init();
}
