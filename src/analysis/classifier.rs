// Anchor classifier - two-point linear interpolation plus MAD confidence
//
// The two calibration anchors span a 1-D scale between the known-fresh and
// known-spoiled reference readings. A sample is clamped into that span and
// mapped linearly to 0-100, oriented so that proximity to the fresh anchor
// always reads toward 100 regardless of which anchor is numerically larger.
//
// Both functions are stateless, total, and clamp their output to [0, 100].

/// Freshness percentage for an echo reading given the two anchors
///
/// # Arguments
/// * `echo_us` - Filtered echo reading (window median) in microseconds
/// * `fresh_anchor` - Reference reading for the fresh class
/// * `spoil_anchor` - Reference reading for the spoiled class
///
/// # Returns
/// 0-100, where `echo_us == fresh_anchor` yields 100 and
/// `echo_us == spoil_anchor` yields 0. Equal anchors are treated as a span
/// of width 1 to avoid division by zero.
pub fn freshness_percent(echo_us: u32, fresh_anchor: u32, spoil_anchor: u32) -> u32 {
    let lo = fresh_anchor.min(spoil_anchor);
    let hi = fresh_anchor.max(spoil_anchor);
    let span = (hi - lo).max(1) as u64;

    let clamped = echo_us.clamp(lo, hi);
    let position = ((clamped - lo) as u64 * 100 / span) as u32;

    if fresh_anchor < spoil_anchor {
        100 - position
    } else {
        position
    }
}

/// Confidence percentage for a window spread
///
/// # Arguments
/// * `mad_us` - Median absolute deviation of the acquisition window
/// * `stable_tolerance_us` - The filter's stability tolerance
///
/// # Returns
/// 0-100: a spread of 0 yields 100, a spread at or above twice the
/// tolerance yields 0, linear in between.
pub fn confidence_percent(mad_us: u32, stable_tolerance_us: u32) -> u32 {
    let span = 2 * stable_tolerance_us.max(1) as u64;
    let penalty = mad_us as u64 * 100 / span;
    100u64.saturating_sub(penalty) as u32
}
