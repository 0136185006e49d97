//! Waveform sources
//!
//! A pulse carries an ordered list of samplings. Each sampling is tagged
//! with a wave class and split into one or more digitizer segments; the
//! pipeline only ever sees their concatenated sample trace.

use std::collections::VecDeque;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{FullwaveError, Result};

/// Which trace of a pulse a sampling holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaveClass {
    /// The emitted laser pulse as seen by the reference detector
    Outgoing,
    /// The backscattered return
    Returning,
    /// Any other sampling type tag found in the input
    Other(u8),
}

impl fmt::Display for WaveClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WaveClass::Outgoing => write!(f, "outgoing"),
            WaveClass::Returning => write!(f, "returning"),
            WaveClass::Other(tag) => write!(f, "other({})", tag),
        }
    }
}

/// One contiguous run of digitized samples
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaveSegment {
    /// Time from the pulse anchor to the first sample, in sampling units
    ///
    /// Only differences between the segments of one sampling matter: they
    /// place each segment on the sampling's time axis.
    #[serde(default)]
    pub duration_from_anchor: f64,
    /// Raw intensity samples
    pub samples: Vec<i32>,
}

/// A tagged sampling of one pulse
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sampling {
    /// Wave class tag
    pub class: WaveClass,
    /// Segments in acquisition order
    pub segments: Vec<WaveSegment>,
}

impl Sampling {
    /// Create a single-segment sampling
    pub fn new(class: WaveClass, samples: Vec<i32>) -> Self {
        Self {
            class,
            segments: vec![WaveSegment {
                duration_from_anchor: 0.0,
                samples,
            }],
        }
    }

    /// Number of segments
    pub fn num_segments(&self) -> usize {
        self.segments.len()
    }

    /// Total number of samples across all segments
    pub fn num_samples(&self) -> usize {
        self.segments.iter().map(|s| s.samples.len()).sum()
    }

    /// Sample `index` of the concatenated trace
    pub fn sample(&self, index: usize) -> Option<i32> {
        let mut offset = index;
        for segment in &self.segments {
            match segment.samples.get(offset) {
                Some(&value) => return Some(value),
                None => offset -= segment.samples.len(),
            }
        }
        None
    }

    /// Iterate over the concatenated trace
    pub fn samples(&self) -> impl Iterator<Item = i32> + '_ {
        self.segments.iter().flat_map(|s| s.samples.iter().copied())
    }

    /// Iterate over `(time, sample)` pairs of the concatenated trace
    ///
    /// Time is measured from the first segment's anchor offset and advances
    /// one unit per sample, so gaps between segments are kept.
    pub fn timed_samples(&self) -> impl Iterator<Item = (f64, i32)> + '_ {
        let start = self
            .segments
            .first()
            .map_or(0.0, |s| s.duration_from_anchor);

        self.segments.iter().flat_map(move |segment| {
            let base = segment.duration_from_anchor - start;
            segment
                .samples
                .iter()
                .enumerate()
                .map(move |(k, &value)| (base + k as f64, value))
        })
    }
}

/// One emitted laser shot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pulse {
    /// Pulse index in arrival order
    pub index: u64,
    /// Samplings: outgoing first, then an optional returning one
    pub samplings: Vec<Sampling>,
}

impl Pulse {
    /// Create a pulse from its samplings
    pub fn new(index: u64, samplings: Vec<Sampling>) -> Self {
        Self { index, samplings }
    }

    /// Split the pulse into its outgoing and (optional) returning sampling
    ///
    /// # Errors
    /// - `MissingOutgoing` if the pulse has no samplings
    /// - `UnexpectedWaveClass` if the first sampling is not outgoing, the
    ///   second is not returning, or there are more than two
    pub fn split_waves(&self) -> Result<(&Sampling, Option<&Sampling>)> {
        let mut samplings = self.samplings.iter().enumerate();

        let outgoing = match samplings.next() {
            Some((_, s)) if s.class == WaveClass::Outgoing => s,
            Some((position, s)) => return Err(self.unexpected(position, s.class)),
            None => return Err(FullwaveError::MissingOutgoing { pulse: self.index }),
        };

        let returning = match samplings.next() {
            Some((_, s)) if s.class == WaveClass::Returning => Some(s),
            Some((position, s)) => return Err(self.unexpected(position, s.class)),
            None => None,
        };

        if let Some((position, s)) = samplings.next() {
            return Err(self.unexpected(position, s.class));
        }

        Ok((outgoing, returning))
    }

    fn unexpected(&self, position: usize, class: WaveClass) -> FullwaveError {
        FullwaveError::UnexpectedWaveClass {
            pulse: self.index,
            position,
            found: class.to_string(),
        }
    }
}

/// Anything that can hand out pulses one at a time
pub trait WaveformSource {
    /// Read the next pulse, or `None` once the source is exhausted
    fn next_pulse(&mut self) -> Result<Option<Pulse>>;
}

/// A source backed by pulses already in memory
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    pulses: VecDeque<Pulse>,
}

impl MemorySource {
    /// Create a source from a list of pulses
    pub fn new(pulses: Vec<Pulse>) -> Self {
        Self {
            pulses: pulses.into(),
        }
    }

    /// Number of pulses not yet read
    pub fn remaining(&self) -> usize {
        self.pulses.len()
    }
}

impl FromIterator<Pulse> for MemorySource {
    fn from_iter<I: IntoIterator<Item = Pulse>>(iter: I) -> Self {
        Self {
            pulses: iter.into_iter().collect(),
        }
    }
}

impl WaveformSource for MemorySource {
    fn next_pulse(&mut self) -> Result<Option<Pulse>> {
        Ok(self.pulses.pop_front())
    }
}
