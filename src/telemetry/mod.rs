//! Telemetry frames emitted over the line transport.
//!
//! One frame summarizes one acquisition window: timestamp, filtered echo,
//! spread, derived freshness/confidence, and the anchors in effect. The CSV
//! rendering is the wire format the host trainer tools parse:
//! `ts_ms,echo_us,mad_us,fresh_pct,conf_pct,fresh_anchor,spoil_anchor`.

use serde::{Deserialize, Serialize};

use crate::acquisition::EchoStats;
use crate::analysis::{confidence_percent, freshness_percent};
use crate::model::CalibrationRecord;

/// One telemetry emission (streaming tick or snapshot)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryFrame {
    /// Milliseconds since engine start
    pub ts_ms: u64,
    /// Window median echo (microseconds)
    pub echo_us: u32,
    /// Window spread (microseconds)
    pub mad_us: u32,
    /// Anchor-interpolated freshness estimate
    pub fresh_pct: u32,
    /// Spread-derived confidence estimate
    pub conf_pct: u32,
    /// Fresh anchor in effect when the frame was produced
    pub fresh_anchor: u32,
    /// Spoil anchor in effect
    pub spoil_anchor: u32,
}

impl TelemetryFrame {
    /// Build a frame from one window's statistics and the current model
    pub fn from_stats(
        ts_ms: u64,
        stats: &EchoStats,
        record: &CalibrationRecord,
        stable_tolerance_us: u32,
    ) -> Self {
        Self {
            ts_ms,
            echo_us: stats.median_us,
            mad_us: stats.mad_us,
            fresh_pct: freshness_percent(
                stats.median_us,
                record.fresh_anchor,
                record.spoil_anchor,
            ),
            conf_pct: confidence_percent(stats.mad_us, stable_tolerance_us),
            fresh_anchor: record.fresh_anchor,
            spoil_anchor: record.spoil_anchor,
        }
    }

    /// Render the CSV wire line (integers only, no padding)
    pub fn to_csv_line(&self) -> String {
        format!(
            "{},{},{},{},{},{},{}",
            self.ts_ms,
            self.echo_us,
            self.mad_us,
            self.fresh_pct,
            self.conf_pct,
            self.fresh_anchor,
            self.spoil_anchor
        )
    }
}
