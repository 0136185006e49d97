//! Segmented sequences
//!
//! A flat sequence of values split into consecutive per-pulse segments.
//! Every derived sequence in the pipeline (differences, smoothed curvature)
//! keeps a 1:1 segment correspondence with the amplitude sequence it came
//! from, so stencils are always applied inside one pulse.

use std::ops::Index;

use serde::Serialize;

use crate::error::{FullwaveError, Result};

/// Ordered values grouped into contiguous segments
///
/// Segments may have different lengths (a derived segment can even be
/// empty), but they always tile `values` exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SegmentedSequence<T> {
    /// Concatenated segment data
    values: Vec<T>,
    /// Segment boundaries: segment `i` spans `bounds[i]..bounds[i + 1]`
    bounds: Vec<usize>,
}

impl<T> SegmentedSequence<T> {
    /// Create an empty sequence with no segments
    pub fn new() -> Self {
        Self {
            values: Vec::new(),
            bounds: vec![0],
        }
    }

    /// Split a flat vector into segments of `segment_len` values each
    ///
    /// # Errors
    /// Returns `RaggedSequence` if the length is not a whole number of
    /// segments (or `segment_len` is zero for a non-empty vector).
    pub fn with_uniform_segments(values: Vec<T>, segment_len: usize) -> Result<Self> {
        if values.is_empty() {
            return Ok(Self::new());
        }
        if segment_len == 0 || values.len() % segment_len != 0 {
            return Err(FullwaveError::RaggedSequence {
                len: values.len(),
                segment_len,
            });
        }

        let bounds = (0..=values.len()).step_by(segment_len).collect();
        Ok(Self { values, bounds })
    }

    /// Append one segment
    pub fn push_segment<I>(&mut self, segment: I)
    where
        I: IntoIterator<Item = T>,
    {
        self.values.extend(segment);
        self.bounds.push(self.values.len());
    }

    /// Total number of values across all segments
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when no values are stored (there may still be empty segments)
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of segments
    pub fn num_segments(&self) -> usize {
        self.bounds.len() - 1
    }

    /// All values as one slice
    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// Consume the sequence, returning the flat values
    pub fn into_values(self) -> Vec<T> {
        self.values
    }

    /// Get segment `index`
    pub fn segment(&self, index: usize) -> Option<&[T]> {
        let start = *self.bounds.get(index)?;
        let end = *self.bounds.get(index + 1)?;
        Some(&self.values[start..end])
    }

    /// Index of the first value of segment `index` in the flat sequence
    pub fn segment_start(&self, index: usize) -> Option<usize> {
        if index < self.num_segments() {
            Some(self.bounds[index])
        } else {
            None
        }
    }

    /// Segment containing the flat position `position`
    ///
    /// Empty segments never contain a position.
    pub fn segment_of(&self, position: usize) -> Option<usize> {
        if position >= self.values.len() {
            return None;
        }
        // bounds is sorted; the last boundary <= position starts the segment.
        // partition_point skips over repeated boundaries of empty segments.
        Some(self.bounds.partition_point(|&b| b <= position) - 1)
    }

    /// Iterate over `(segment_index, segment)` pairs
    pub fn segments(&self) -> impl Iterator<Item = (usize, &[T])> + '_ {
        self.bounds
            .windows(2)
            .enumerate()
            .map(move |(i, w)| (i, &self.values[w[0]..w[1]]))
    }

    /// Length of every segment, in order
    pub fn segment_lens(&self) -> impl Iterator<Item = usize> + '_ {
        self.bounds.windows(2).map(|w| w[1] - w[0])
    }

    /// The common segment length, if every segment has the same one
    pub fn uniform_segment_len(&self) -> Option<usize> {
        let mut lens = self.segment_lens();
        let first = lens.next()?;
        lens.all(|l| l == first).then_some(first)
    }

    /// Build a new sequence by transforming each segment independently
    ///
    /// The output has exactly one segment per input segment.
    pub fn map_segments<U, F>(&self, mut f: F) -> SegmentedSequence<U>
    where
        F: FnMut(&[T]) -> Vec<U>,
    {
        let mut out = SegmentedSequence::new();
        for (_, segment) in self.segments() {
            out.push_segment(f(segment));
        }
        out
    }
}

impl<T> Default for SegmentedSequence<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Index<usize> for SegmentedSequence<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.values[index]
    }
}
