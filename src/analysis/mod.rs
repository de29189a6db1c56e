// Analysis module - anchor-based freshness classification
//
// Converts a filtered echo reading into a freshness percentage using the two
// calibration anchors, and a window spread into a confidence percentage.

pub mod classifier;

pub use classifier::{confidence_percent, freshness_percent};
