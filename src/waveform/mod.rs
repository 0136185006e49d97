//! Waveform input and buffering
//!
//! Pulses come in through a [`WaveformSource`], get split by wave class and
//! land in a [`WaveformBuffer`] as fixed-length segments of a
//! [`SegmentedSequence`].

mod buffer;
mod segmented;
mod source;

pub use buffer::WaveformBuffer;
pub use segmented::SegmentedSequence;
pub use source::{MemorySource, Pulse, Sampling, WaveClass, WaveSegment, WaveformSource};
