//! Curvature smoothing
//!
//! 5-point running median over the second difference, one segment at a time.

use super::median::median_of_five;
use crate::waveform::SegmentedSequence;

/// Width of the median window
pub const SMOOTHING_WINDOW: usize = 5;

/// Values at each segment edge that lack a full window
const EDGE: usize = SMOOTHING_WINDOW / 2;

/// Median-filter a second-difference sequence
///
/// Each interior value becomes the median of the five values centred on it.
/// The two outermost values on either side of a segment have no full window
/// inside the segment and are carried through unchanged; a segment shorter
/// than the window is carried through as is. Output segments have the same
/// length as input segments.
pub fn smooth_second_difference(second: &SegmentedSequence<i32>) -> SegmentedSequence<i32> {
    second.map_segments(smooth_segment)
}

fn smooth_segment(segment: &[i32]) -> Vec<i32> {
    let mut smoothed = segment.to_vec();
    if segment.len() < SMOOTHING_WINDOW {
        return smoothed;
    }

    for (i, w) in segment.windows(SMOOTHING_WINDOW).enumerate() {
        smoothed[i + EDGE] = median_of_five(w[0], w[1], w[2], w[3], w[4]);
    }
    smoothed
}
