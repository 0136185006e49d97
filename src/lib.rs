//! Fullwave - Full-Waveform LiDAR Feature Extraction
//!
//! Turns digitized laser pulse waveforms into discrete reflection features.
//! Each pulse has an outgoing trace (the emitted pulse) and optionally a
//! returning trace (the backscatter). Both are buffered into fixed-length
//! segments, differenced, median-smoothed and scanned for peaks.
//!
//! # Architecture
//!
//! - [`waveform`]: pulse sources and the segmented amplitude buffer
//! - [`features`]: differencing, smoothing, peak detection and refinement
//! - [`pipeline`]: drives a source through every stage
//! - [`io`]: JSON pulse files and feature reports
//!
//! # Example
//!
//! ```
//! use fullwave::features::{PeakDetector, WaveformAnalysis};
//! use fullwave::waveform::WaveClass;
//!
//! let mut returning = WaveformAnalysis::new(WaveClass::Returning);
//! returning
//!     .populate(vec![0, 0, 0, 2, 10, 40, 80, 40, 10, 2, 0, 0, 0, 0], 14, 0)
//!     .unwrap();
//!
//! let peaks = returning.analyze(&PeakDetector::default()).unwrap();
//! assert_eq!(peaks.len(), 1);
//! assert_eq!(peaks[0].location, 6);
//! assert_eq!(peaks[0].amplitude, 80);
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod features;
pub mod io;
pub mod pipeline;
pub mod waveform;

pub use config::PipelineConfig;
pub use error::{FullwaveError, Result};
pub use features::{DetectionMethod, Peak, PeakDetector, WaveformAnalysis};
pub use pipeline::{FeatureExtractor, FlightLineFeatures};
pub use waveform::{SegmentedSequence, WaveClass, WaveformBuffer, WaveformSource};
