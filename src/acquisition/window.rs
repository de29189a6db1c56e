// WindowFilter - robust center/spread estimation over one acquisition window
//
// Raw ultrasonic readings are noisy and occasionally drop out entirely, so
// the filter uses order statistics instead of a mean: the window median as
// the center and the median absolute deviation (MAD) as the spread. A window
// is stable when the MAD stays within the configured tolerance.

use crate::acquisition::probe::EchoProbe;
use crate::config::{AcquisitionConfig, FilterConfig};

/// Statistics derived from one acquisition window
///
/// Returned by value and consumed immediately; the raw window is discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct EchoStats {
    /// Valid (non-missed) samples in the window
    pub sample_count: usize,
    /// Window median in microseconds (0 when fewer than 2 valid samples)
    pub median_us: u32,
    /// Median absolute deviation in microseconds
    pub mad_us: u32,
    /// Whether the spread stayed within the stability tolerance
    pub stable: bool,
}

impl EchoStats {
    /// Stats for a window without enough valid samples
    fn unstable(sample_count: usize) -> Self {
        Self {
            sample_count,
            median_us: 0,
            mad_us: 0,
            stable: false,
        }
    }
}

/// WindowFilter collects one window of raw echoes and characterizes it
#[derive(Debug, Clone)]
pub struct WindowFilter {
    /// Maximum raw samples drawn per window
    window_samples: usize,
    /// MAD tolerance for the stability verdict (microseconds)
    stable_tolerance_us: u32,
}

impl WindowFilter {
    /// Create a filter from the acquisition and filter configuration
    pub fn new(acquisition: &AcquisitionConfig, filter: &FilterConfig) -> Self {
        Self {
            window_samples: acquisition.window_samples,
            stable_tolerance_us: filter.stable_tolerance_us,
        }
    }

    /// The configured stability tolerance in microseconds
    pub fn stable_tolerance_us(&self) -> u32 {
        self.stable_tolerance_us
    }

    /// Collect one window from the probe and compute its statistics
    ///
    /// Draws up to `window_samples` readings, discards missed echoes, and
    /// derives median and MAD from the valid remainder. Fewer than 2 valid
    /// samples yields `stable = false` with zeroed statistics.
    ///
    /// Deterministic: identical probe output produces identical stats.
    pub fn acquire<P: EchoProbe>(&self, probe: &mut P) -> EchoStats {
        let mut window: Vec<u32> = Vec::with_capacity(self.window_samples);
        for _ in 0..self.window_samples {
            if let Some(duration_us) = probe.poll_echo() {
                window.push(duration_us);
            }
        }
        self.stats_from_window(&mut window)
    }

    /// Compute statistics for an already-collected window
    fn stats_from_window(&self, window: &mut [u32]) -> EchoStats {
        if window.len() < 2 {
            return EchoStats::unstable(window.len());
        }

        window.sort_unstable();
        let median_us = median_of_sorted(window);

        let mut deviations: Vec<u32> =
            window.iter().map(|&v| v.abs_diff(median_us)).collect();
        deviations.sort_unstable();
        let mad_us = median_of_sorted(&deviations);

        EchoStats {
            sample_count: window.len(),
            median_us,
            mad_us,
            stable: mad_us <= self.stable_tolerance_us,
        }
    }
}

/// Median of a sorted slice; even counts average the two middle elements
fn median_of_sorted(sorted: &[u32]) -> u32 {
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        ((sorted[mid - 1] as u64 + sorted[mid] as u64) / 2) as u32
    } else {
        sorted[mid]
    }
}
