//! Feature extraction
//!
//! Differencing, median smoothing, peak detection and peak refinement over
//! buffered amplitude sequences. Every stage works one segment at a time and
//! never reads across a pulse boundary.

mod analysis;
mod difference;
mod median;
mod peaks;
mod refine;
mod smoothing;

pub use analysis::{PulsePeaks, Refinement, WaveformAnalysis};
pub use difference::{
    first_difference, first_difference_len, second_difference, second_difference_len,
};
pub use median::median_of_five;
pub use peaks::{DetectionMethod, Peak, PeakDetector};
pub use refine::{
    GaussianFitConfig, GaussianFitter, PeakRefiner, RawRefiner, RefinedPeak, RefinementMethod,
};
pub use smoothing::{smooth_second_difference, SMOOTHING_WINDOW};
