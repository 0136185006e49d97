//! Per-class waveform analysis
//!
//! Owns one wave class's buffer together with every sequence derived from
//! it. Each stage can be run and inspected on its own.

use log::{debug, warn};
use serde::Serialize;

use super::difference::{first_difference, second_difference};
use super::peaks::{check_geometry, DetectionMethod, Peak, PeakDetector};
use super::refine::{PeakRefiner, RefinedPeak};
use super::smoothing::smooth_second_difference;
use crate::error::{FullwaveError, Result};
use crate::waveform::{SegmentedSequence, WaveClass, WaveformBuffer};

/// Peaks of one pulse
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PulsePeaks {
    /// Pulse index
    pub pulse: u64,
    /// Peaks in ascending location order
    pub peaks: Vec<Peak>,
}

/// Outcome of refining every detected peak
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Refinement {
    /// Successfully refined peaks, in detection order
    pub peaks: Vec<RefinedPeak>,
    /// Locations whose fit did not converge
    pub failed: Vec<usize>,
}

/// Buffer plus derived sequences for one wave class
#[derive(Debug, Clone)]
pub struct WaveformAnalysis {
    buffer: WaveformBuffer,
    first_difference: SegmentedSequence<i32>,
    second_difference: SegmentedSequence<i32>,
    smooth_second_difference: SegmentedSequence<i32>,
    peaks: Vec<Peak>,
}

impl WaveformAnalysis {
    /// Create an empty analysis for a wave class
    pub fn new(class: WaveClass) -> Self {
        Self {
            buffer: WaveformBuffer::new(class),
            first_difference: SegmentedSequence::new(),
            second_difference: SegmentedSequence::new(),
            smooth_second_difference: SegmentedSequence::new(),
            peaks: Vec::new(),
        }
    }

    /// Append one pulse (see [`WaveformBuffer::populate`])
    pub fn populate<I>(&mut self, raw_samples: I, max_count: usize, pulse_index: u64) -> Result<()>
    where
        I: IntoIterator<Item = i32>,
    {
        self.buffer.populate(raw_samples, max_count, pulse_index)
    }

    /// Append one pulse with sample times (see [`WaveformBuffer::populate_timed`])
    pub fn populate_timed<I>(
        &mut self,
        timed_samples: I,
        max_count: usize,
        pulse_index: u64,
    ) -> Result<()>
    where
        I: IntoIterator<Item = (f64, i32)>,
    {
        self.buffer.populate_timed(timed_samples, max_count, pulse_index)
    }

    /// Compute the first difference of the buffered wave
    pub fn calculate_first_difference(&mut self) -> &SegmentedSequence<i32> {
        self.first_difference = first_difference(self.buffer.wave());
        debug!(
            "[DIFF] {} first difference: {} values",
            self.class(),
            self.first_difference.len()
        );
        &self.first_difference
    }

    /// Compute the second difference of the buffered wave
    pub fn calculate_second_difference(&mut self) -> &SegmentedSequence<i32> {
        self.second_difference = second_difference(self.buffer.wave());
        debug!(
            "[DIFF] {} second difference: {} values",
            self.class(),
            self.second_difference.len()
        );
        &self.second_difference
    }

    /// Median-smooth the second difference, computing it first if needed
    pub fn calculate_smooth_second_difference(&mut self) -> &SegmentedSequence<i32> {
        if self.second_difference.num_segments() != self.buffer.wave().num_segments() {
            self.calculate_second_difference();
        }
        self.smooth_second_difference = smooth_second_difference(&self.second_difference);
        &self.smooth_second_difference
    }

    /// Detect peaks using the cached derived sequences
    ///
    /// Any derived sequence the method needs that is missing or stale is
    /// computed first.
    ///
    /// # Errors
    /// Returns `SegmentLengthMismatch` if the buffer's segments are not
    /// `max_count` samples long.
    pub fn find_peaks(&mut self, detector: &PeakDetector, max_count: usize) -> Result<&[Peak]> {
        check_geometry(self.buffer.wave(), max_count)?;

        let segments = self.buffer.wave().num_segments();
        self.peaks = match detector.method {
            DetectionMethod::CurvatureRegion => {
                if self.smooth_second_difference.num_segments() != segments {
                    self.calculate_smooth_second_difference();
                }
                detector.scan_curvature(self.buffer.wave(), &self.smooth_second_difference)
            }
            DetectionMethod::FirstDifference => {
                if self.first_difference.num_segments() != segments {
                    self.calculate_first_difference();
                }
                detector.scan_first_difference(self.buffer.wave(), &self.first_difference)
            }
        };

        debug!(
            "[PEAKS] {} wave: {} peaks via {}",
            self.class(),
            self.peaks.len(),
            detector.method.name()
        );
        Ok(&self.peaks)
    }

    /// Run every stage: differences, smoothing and peak detection
    pub fn analyze(&mut self, detector: &PeakDetector) -> Result<&[Peak]> {
        if self.buffer.is_empty() {
            warn!("[PEAKS] {} wave is empty, nothing to analyze", self.class());
        }
        let max_count = self.buffer.max_count().unwrap_or_default();

        self.calculate_first_difference();
        self.calculate_second_difference();
        self.calculate_smooth_second_difference();
        self.find_peaks(detector, max_count)
    }

    /// Refine every detected peak
    ///
    /// Fits that do not converge are logged and recorded in
    /// [`Refinement::failed`]; any other error aborts.
    pub fn refine_peaks(&self, refiner: &dyn PeakRefiner) -> Result<Refinement> {
        let mut refinement = Refinement::default();

        for peak in &self.peaks {
            match refiner.refine(peak, self.buffer.wave(), self.buffer.times()) {
                Ok(refined) => refinement.peaks.push(refined),
                Err(FullwaveError::FitDidNotConverge {
                    location,
                    iterations,
                }) => {
                    warn!(
                        "[REFINE] {} fit at {} gave up after {} iterations",
                        refiner.name(),
                        location,
                        iterations
                    );
                    refinement.failed.push(location);
                }
                Err(e) => return Err(e),
            }
        }

        Ok(refinement)
    }

    /// Detected peaks grouped by pulse, skipping pulses without peaks
    pub fn peaks_by_pulse(&self) -> Vec<PulsePeaks> {
        let mut grouped: Vec<PulsePeaks> = Vec::new();

        for peak in &self.peaks {
            let Some(pulse) = self.buffer.pulse_at(peak.location) else {
                continue;
            };
            match grouped.last_mut() {
                Some(last) if last.pulse == pulse => last.peaks.push(*peak),
                _ => grouped.push(PulsePeaks {
                    pulse,
                    peaks: vec![*peak],
                }),
            }
        }

        grouped
    }

    /// Wave class
    pub fn class(&self) -> WaveClass {
        self.buffer.class()
    }

    /// Underlying buffer
    pub fn buffer(&self) -> &WaveformBuffer {
        &self.buffer
    }

    /// Buffered amplitude sequence
    pub fn wave(&self) -> &SegmentedSequence<i32> {
        self.buffer.wave()
    }

    /// Last computed first difference
    pub fn first_difference(&self) -> &SegmentedSequence<i32> {
        &self.first_difference
    }

    /// Last computed second difference
    pub fn second_difference(&self) -> &SegmentedSequence<i32> {
        &self.second_difference
    }

    /// Last computed smoothed second difference
    pub fn smooth_second_difference(&self) -> &SegmentedSequence<i32> {
        &self.smooth_second_difference
    }

    /// Last detected peaks
    pub fn peaks(&self) -> &[Peak] {
        &self.peaks
    }
}
