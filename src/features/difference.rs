//! Segment-aware discrete derivatives
//!
//! Both stencils run inside one pulse segment at a time. Positions whose
//! neighbours would fall outside the segment are dropped, so a derived
//! segment is shorter than its amplitude segment by a fixed amount that
//! depends only on the segment length.

use crate::waveform::SegmentedSequence;

// ============================================================================
// Stencil geometry
// ============================================================================

/// Samples spanned by one first-difference value
pub const FIRST_DIFFERENCE_WIDTH: usize = 3;

/// Samples spanned by one second-difference value
pub const SECOND_DIFFERENCE_WIDTH: usize = 4;

/// First-difference value `j` is `s[j + 2] - s[j + 1]`
pub const FIRST_DIFFERENCE_LEAD: usize = 1;

/// Second-difference value `j` is centred on raw sample `j + 2`
pub const SECOND_DIFFERENCE_LEAD: usize = 2;

/// Number of first-difference values produced for a segment of `len` samples
pub fn first_difference_len(len: usize) -> usize {
    (len + 1).saturating_sub(FIRST_DIFFERENCE_WIDTH)
}

/// Number of second-difference values produced for a segment of `len` samples
pub fn second_difference_len(len: usize) -> usize {
    (len + 1).saturating_sub(SECOND_DIFFERENCE_WIDTH)
}

// ============================================================================
// Differencing
// ============================================================================

/// Forward difference `s[k + 1] - s[k]` at every interior sample `k`
///
/// A segment of `n` samples yields `n - 2` values (none when `n < 3`).
/// Values saturate at the `i32` range.
pub fn first_difference(wave: &SegmentedSequence<i32>) -> SegmentedSequence<i32> {
    wave.map_segments(|segment| {
        segment
            .windows(FIRST_DIFFERENCE_WIDTH)
            .map(|w| w[2].saturating_sub(w[1]))
            .collect()
    })
}

/// Curvature magnitude `|s[k - 1] - 2 s[k] + s[k + 1]|` for `k` in `2..=n-2`
///
/// Computed from the amplitude sequence itself, not from the first
/// difference. A segment of `n` samples yields `n - 3` values (none when
/// `n < 4`). The stencil is evaluated in `i64` and saturates at `i32::MAX`.
pub fn second_difference(wave: &SegmentedSequence<i32>) -> SegmentedSequence<i32> {
    wave.map_segments(|segment| {
        segment
            .windows(SECOND_DIFFERENCE_WIDTH)
            .map(|w| {
                let curvature = i64::from(w[1]) - 2 * i64::from(w[2]) + i64::from(w[3]);
                i32::try_from(curvature.abs()).unwrap_or(i32::MAX)
            })
            .collect()
    })
}
