//! Peak Detector
//!
//! Finds reflection peaks in an amplitude sequence. Detection is driven by a
//! derived signal (smoothed curvature or first difference) gated by a
//! caller-supplied noise level; the reported amplitude and location always
//! come from the raw amplitude sequence.

use log::debug;
use serde::{Deserialize, Serialize};

use super::difference::{
    first_difference, second_difference, FIRST_DIFFERENCE_LEAD, SECOND_DIFFERENCE_LEAD,
};
use super::smoothing::smooth_second_difference;
use crate::error::{FullwaveError, Result};
use crate::waveform::SegmentedSequence;

/// A detected reflection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Peak {
    /// Raw amplitude at `location`
    pub amplitude: i32,
    /// Index into the full amplitude sequence (not segment-local)
    pub location: usize,
}

/// How peak candidates are found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DetectionMethod {
    /// One peak per region where smoothed curvature exceeds the noise level
    #[default]
    CurvatureRegion,
    /// A peak at every rising-to-falling turn of the first difference whose
    /// raw amplitude exceeds the noise level
    FirstDifference,
}

impl DetectionMethod {
    /// Short name used in logs and reports
    pub fn name(&self) -> &'static str {
        match self {
            DetectionMethod::CurvatureRegion => "curvature-region",
            DetectionMethod::FirstDifference => "first-difference",
        }
    }
}

/// Noise-gated peak detector
///
/// The noise level is not validated: a non-positive level simply lets most
/// samples through.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeakDetector {
    /// Threshold a detection signal must exceed
    pub noise_level: f64,
    /// Detection method
    pub method: DetectionMethod,
}

impl PeakDetector {
    /// Create a detector
    pub fn new(noise_level: f64, method: DetectionMethod) -> Self {
        Self {
            noise_level,
            method,
        }
    }

    /// Find peaks in an amplitude sequence of `max_count`-sample segments
    ///
    /// Derived sequences are computed internally. Peaks come back in
    /// ascending location order and never span two segments.
    ///
    /// # Errors
    /// Returns `SegmentLengthMismatch` if any segment is not exactly
    /// `max_count` samples long. An empty sequence gives an empty result.
    pub fn find_peaks(
        &self,
        amplitudes: &SegmentedSequence<i32>,
        max_count: usize,
    ) -> Result<Vec<Peak>> {
        check_geometry(amplitudes, max_count)?;

        let peaks = match self.method {
            DetectionMethod::CurvatureRegion => {
                let smoothed = smooth_second_difference(&second_difference(amplitudes));
                self.scan_curvature(amplitudes, &smoothed)
            }
            DetectionMethod::FirstDifference => {
                self.scan_first_difference(amplitudes, &first_difference(amplitudes))
            }
        };

        debug!(
            "[PEAKS] {} peaks via {} (noise level {})",
            peaks.len(),
            self.method.name(),
            self.noise_level
        );
        Ok(peaks)
    }

    /// Region scan over a smoothed curvature sequence
    ///
    /// A region opens when curvature rises above the noise level and closes
    /// when it drops back to or below it, or when the segment ends. Each
    /// region yields the first raw sample holding the region's maximum.
    pub(crate) fn scan_curvature(
        &self,
        amplitudes: &SegmentedSequence<i32>,
        smoothed: &SegmentedSequence<i32>,
    ) -> Vec<Peak> {
        let mut peaks = Vec::new();

        for ((segment, raw), (_, curvature)) in amplitudes.segments().zip(smoothed.segments()) {
            let base = amplitudes.segment_start(segment).unwrap_or_default();
            let mut best: Option<usize> = None;

            for (j, &value) in curvature.iter().enumerate() {
                let offset = j + SECOND_DIFFERENCE_LEAD;
                if self.exceeds(value) {
                    best = match best {
                        Some(b) if raw[b] >= raw[offset] => Some(b),
                        _ => Some(offset),
                    };
                } else if let Some(b) = best.take() {
                    peaks.push(Peak::from_segment(raw, base, b));
                }
            }

            if let Some(b) = best {
                peaks.push(Peak::from_segment(raw, base, b));
            }
        }

        peaks
    }

    /// Turning-point scan over a first-difference sequence
    ///
    /// Sample `k` is a peak when the signal rises into it, does not rise out
    /// of it, and its raw amplitude exceeds the noise level. On a plateau the
    /// first sample of the plateau is reported.
    pub(crate) fn scan_first_difference(
        &self,
        amplitudes: &SegmentedSequence<i32>,
        first: &SegmentedSequence<i32>,
    ) -> Vec<Peak> {
        let mut peaks = Vec::new();

        for ((segment, raw), (_, diff)) in amplitudes.segments().zip(first.segments()) {
            let base = amplitudes.segment_start(segment).unwrap_or_default();

            for (j, pair) in diff.windows(2).enumerate() {
                let offset = j + FIRST_DIFFERENCE_LEAD + 1;
                if pair[0] > 0 && pair[1] <= 0 && self.exceeds(raw[offset]) {
                    peaks.push(Peak::from_segment(raw, base, offset));
                }
            }
        }

        peaks
    }

    fn exceeds(&self, value: i32) -> bool {
        f64::from(value) > self.noise_level
    }
}

impl Default for PeakDetector {
    fn default() -> Self {
        Self::new(5.0, DetectionMethod::default())
    }
}

impl Peak {
    fn from_segment(raw: &[i32], base: usize, offset: usize) -> Self {
        Self {
            amplitude: raw[offset],
            location: base + offset,
        }
    }
}

/// Every segment must be exactly `max_count` samples long
pub(crate) fn check_geometry(amplitudes: &SegmentedSequence<i32>, max_count: usize) -> Result<()> {
    match amplitudes.segment_lens().find(|&len| len != max_count) {
        Some(actual) => Err(FullwaveError::SegmentLengthMismatch {
            expected: max_count,
            actual,
        }),
        None => Ok(()),
    }
}
