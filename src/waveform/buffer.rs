//! Waveform Buffer
//!
//! Accumulates one wave class of many pulses into a single amplitude
//! sequence of fixed-length, zero-padded segments, with a parallel time
//! axis holding each sample's offset from the start of its sampling.

use log::debug;

use super::segmented::SegmentedSequence;
use super::source::WaveClass;
use crate::error::{FullwaveError, Result};

/// Amplitude sequence for one wave class
///
/// Segments are only ever appended. The first call to [`populate`] fixes
/// the segment length for the rest of the run.
///
/// [`populate`]: WaveformBuffer::populate
#[derive(Debug, Clone)]
pub struct WaveformBuffer {
    /// Wave class stored in this buffer
    class: WaveClass,
    /// Segment length fixed by the first populated pulse
    max_count: Option<usize>,
    /// Concatenated per-pulse segments
    wave: SegmentedSequence<i32>,
    /// Sample times, same geometry as `wave`
    times: SegmentedSequence<f64>,
    /// Pulse index of every segment, in append order
    pulse_indices: Vec<u64>,
}

impl WaveformBuffer {
    /// Create an empty buffer for a wave class
    pub fn new(class: WaveClass) -> Self {
        Self {
            class,
            max_count: None,
            wave: SegmentedSequence::new(),
            times: SegmentedSequence::new(),
            pulse_indices: Vec::new(),
        }
    }

    /// Append one pulse's samples as a segment of exactly `max_count` values
    ///
    /// Shorter input is zero-padded, longer input is truncated. An empty
    /// input yields an all-zero segment. Samples are taken to be evenly
    /// spaced from time 0; use [`populate_timed`] for gapped samplings.
    /// `pulse_index` is bookkeeping only; callers are responsible for
    /// calling in arrival order.
    ///
    /// # Errors
    /// - `SegmentLengthMismatch` if `max_count` differs from the length
    ///   used by earlier segments
    /// - `NegativeSample` if a kept sample is negative
    ///
    /// The buffer is left untouched on error.
    ///
    /// [`populate_timed`]: WaveformBuffer::populate_timed
    pub fn populate<I>(&mut self, raw_samples: I, max_count: usize, pulse_index: u64) -> Result<()>
    where
        I: IntoIterator<Item = i32>,
    {
        let timed = raw_samples
            .into_iter()
            .enumerate()
            .map(|(i, sample)| (i as f64, sample));
        self.populate_timed(timed, max_count, pulse_index)
    }

    /// Like [`populate`], with an explicit `(time, sample)` pair per sample
    ///
    /// Padding samples continue one time unit apart after the last kept
    /// sample.
    ///
    /// [`populate`]: WaveformBuffer::populate
    pub fn populate_timed<I>(
        &mut self,
        timed_samples: I,
        max_count: usize,
        pulse_index: u64,
    ) -> Result<()>
    where
        I: IntoIterator<Item = (f64, i32)>,
    {
        if let Some(expected) = self.max_count {
            if expected != max_count {
                return Err(FullwaveError::SegmentLengthMismatch {
                    expected,
                    actual: max_count,
                });
            }
        }

        let (mut times, mut segment): (Vec<f64>, Vec<i32>) =
            timed_samples.into_iter().take(max_count).unzip();
        if let Some(&value) = segment.iter().find(|&&v| v < 0) {
            return Err(FullwaveError::NegativeSample {
                pulse: pulse_index,
                value,
            });
        }

        let mut next = times.last().map_or(0.0, |t| t + 1.0);
        while times.len() < max_count {
            times.push(next);
            next += 1.0;
        }
        segment.resize(max_count, 0);

        self.max_count = Some(max_count);
        self.wave.push_segment(segment);
        self.times.push_segment(times);
        self.pulse_indices.push(pulse_index);
        Ok(())
    }

    /// Wave class held by this buffer
    pub fn class(&self) -> WaveClass {
        self.class
    }

    /// Segment length, once the first pulse has been populated
    pub fn max_count(&self) -> Option<usize> {
        self.max_count
    }

    /// The buffered amplitude sequence
    pub fn wave(&self) -> &SegmentedSequence<i32> {
        &self.wave
    }

    /// Time axis of the buffered sequence
    pub fn times(&self) -> &SegmentedSequence<f64> {
        &self.times
    }

    /// Time of a flat position of the amplitude sequence
    pub fn time_at(&self, location: usize) -> Option<f64> {
        self.times.values().get(location).copied()
    }

    /// Pulse index of each segment
    pub fn pulse_indices(&self) -> &[u64] {
        &self.pulse_indices
    }

    /// Number of buffered pulses
    pub fn num_pulses(&self) -> usize {
        self.pulse_indices.len()
    }

    /// True when no pulse has been populated
    pub fn is_empty(&self) -> bool {
        self.pulse_indices.is_empty()
    }

    /// Pulse index owning a flat position of the amplitude sequence
    pub fn pulse_at(&self, location: usize) -> Option<u64> {
        let segment = self.wave.segment_of(location)?;
        self.pulse_indices.get(segment).copied()
    }

    /// Log a one-line summary of the buffer contents
    pub fn log_summary(&self) {
        debug!(
            "[BUFFER] {} wave: {} pulses, {} samples, segment length {:?}",
            self.class,
            self.num_pulses(),
            self.wave.len(),
            self.max_count
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_populate_pads_short_input() {
        let mut buffer = WaveformBuffer::new(WaveClass::Outgoing);
        buffer.populate(vec![5, 6, 7], 5, 0).unwrap();
        assert_eq!(buffer.wave().values(), &[5, 6, 7, 0, 0]);
        assert_eq!(buffer.max_count(), Some(5));
    }

    #[test]
    fn test_populate_truncates_long_input() {
        let mut buffer = WaveformBuffer::new(WaveClass::Returning);
        buffer.populate(1..=10, 4, 0).unwrap();
        assert_eq!(buffer.wave().values(), &[1, 2, 3, 4]);
    }

    #[test]
    fn test_populate_empty_input_is_all_zero() {
        let mut buffer = WaveformBuffer::new(WaveClass::Returning);
        buffer.populate(Vec::<i32>::new(), 3, 0).unwrap();
        assert_eq!(buffer.wave().values(), &[0, 0, 0]);
        assert_eq!(buffer.num_pulses(), 1);
    }

    #[test]
    fn test_populate_appends_segments_in_order() {
        let mut buffer = WaveformBuffer::new(WaveClass::Outgoing);
        buffer.populate(vec![1, 1], 3, 10).unwrap();
        buffer.populate(vec![2, 2, 2, 2], 3, 12).unwrap();

        assert_eq!(buffer.wave().num_segments(), 2);
        assert_eq!(buffer.wave().values(), &[1, 1, 0, 2, 2, 2]);
        assert_eq!(buffer.pulse_indices(), &[10, 12]);
        assert_eq!(buffer.pulse_at(4), Some(12));
        assert_eq!(buffer.pulse_at(6), None);
    }

    #[test]
    fn test_populate_rejects_length_change() {
        let mut buffer = WaveformBuffer::new(WaveClass::Outgoing);
        buffer.populate(vec![1, 2, 3], 3, 0).unwrap();

        let err = buffer.populate(vec![1, 2, 3], 4, 1).unwrap_err();
        assert_eq!(err.error_code(), "SEGMENT_LENGTH_MISMATCH");
        assert_eq!(buffer.wave().len(), 3);
        assert_eq!(buffer.num_pulses(), 1);
    }

    #[test]
    fn test_populate_rejects_negative_samples() {
        let mut buffer = WaveformBuffer::new(WaveClass::Outgoing);
        let err = buffer.populate(vec![1, -2, 3], 3, 4).unwrap_err();
        assert_eq!(err.error_code(), "NEGATIVE_SAMPLE");
        assert!(buffer.is_empty());
        assert_eq!(buffer.max_count(), None);
    }

    #[test]
    fn test_default_time_axis_counts_samples() {
        let mut buffer = WaveformBuffer::new(WaveClass::Outgoing);
        buffer.populate(vec![5, 6], 4, 0).unwrap();
        buffer.populate(vec![1, 2, 3, 4, 5], 4, 1).unwrap();
        assert_eq!(
            buffer.times().values(),
            &[0.0, 1.0, 2.0, 3.0, 0.0, 1.0, 2.0, 3.0]
        );
        assert_eq!(buffer.time_at(6), Some(2.0));
        assert_eq!(buffer.time_at(8), None);
    }

    #[test]
    fn test_populate_timed_keeps_gaps() {
        let mut buffer = WaveformBuffer::new(WaveClass::Returning);
        let timed = vec![(0.0, 1), (1.0, 2), (40.0, 9), (41.0, 3)];
        buffer.populate_timed(timed, 6, 0).unwrap();

        assert_eq!(buffer.wave().values(), &[1, 2, 9, 3, 0, 0]);
        assert_eq!(buffer.times().values(), &[0.0, 1.0, 40.0, 41.0, 42.0, 43.0]);
    }

    #[test]
    fn test_negative_sample_past_max_count_is_ignored() {
        let mut buffer = WaveformBuffer::new(WaveClass::Outgoing);
        buffer.populate(vec![1, 2, -3], 2, 0).unwrap();
        assert_eq!(buffer.wave().values(), &[1, 2]);
    }
}
