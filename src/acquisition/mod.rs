// Acquisition module - echo sampling and robust window statistics
//
// This module provides two main components:
// 1. EchoProbe: narrow capability for drawing one raw time-of-flight sample
// 2. WindowFilter: turns a window of raw samples into median/MAD/stability
//
// The acquisition flow:
// 1. Draw up to `window_samples` raw echoes from the probe
// 2. Discard missed echoes (no return signal)
// 3. Compute the median and the median absolute deviation of the rest

pub mod probe;
pub mod window;

pub use probe::{EchoProbe, ScriptedProbe};
pub use window::{EchoStats, WindowFilter};
