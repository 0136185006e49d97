//! Feature extraction pipeline
//!
//! Drains a [`WaveformSource`] into one outgoing and one returning
//! [`WaveformAnalysis`], then runs differencing, smoothing, peak detection
//! and refinement on each.

use log::{debug, info, warn};

use crate::config::PipelineConfig;
use crate::error::Result;
use crate::features::{Peak, Refinement, WaveformAnalysis};
use crate::waveform::{WaveClass, WaveformSource};

/// Everything extracted from one wave class
#[derive(Debug, Clone)]
pub struct ClassFeatures {
    /// Buffer and derived sequences
    pub analysis: WaveformAnalysis,
    /// Refined peaks and failed fits
    pub refinement: Refinement,
}

impl ClassFeatures {
    /// Detected peaks
    pub fn peaks(&self) -> &[Peak] {
        self.analysis.peaks()
    }
}

/// Features of a whole flight line
#[derive(Debug, Clone)]
pub struct FlightLineFeatures {
    /// Pulses read from the source
    pub num_pulses: usize,
    /// Outgoing wave features
    pub outgoing: ClassFeatures,
    /// Returning wave features
    pub returning: ClassFeatures,
}

/// Runs the full extraction over a waveform source
#[derive(Debug, Clone, Default)]
pub struct FeatureExtractor {
    config: PipelineConfig,
}

impl FeatureExtractor {
    /// Create an extractor
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Configuration in use
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Read every pulse from `source` and extract features
    ///
    /// # Arguments
    /// * `source` - Pulse source; it is drained completely
    ///
    /// # Returns
    /// Peaks and refined peaks for both wave classes. Pulses without a
    /// returning sampling contribute only to the outgoing wave.
    ///
    /// # Errors
    /// Fails on invalid configuration, malformed pulses (see
    /// [`crate::waveform::Pulse::split_waves`]), negative samples or any
    /// source error. Refinement fits that do not converge are not errors.
    pub fn extract<S: WaveformSource + ?Sized>(&self, source: &mut S) -> Result<FlightLineFeatures> {
        self.config.validate()?;
        let max_count = self.config.max_count;

        let mut outgoing = WaveformAnalysis::new(WaveClass::Outgoing);
        let mut returning = WaveformAnalysis::new(WaveClass::Returning);
        let mut num_pulses = 0;

        while let Some(pulse) = source.next_pulse()? {
            let (out, ret) = pulse.split_waves()?;

            if out.num_samples() > max_count {
                debug!(
                    "[PIPELINE] Pulse {}: outgoing truncated from {} to {} samples",
                    pulse.index,
                    out.num_samples(),
                    max_count
                );
            }
            outgoing.populate_timed(out.timed_samples(), max_count, pulse.index)?;

            if let Some(ret) = ret {
                returning.populate_timed(ret.timed_samples(), max_count, pulse.index)?;
            }
            num_pulses += 1;
        }

        if num_pulses == 0 {
            warn!("[PIPELINE] Source held no pulses");
        }
        outgoing.buffer().log_summary();
        returning.buffer().log_summary();

        let outgoing = self.finish(outgoing)?;
        let returning = self.finish(returning)?;

        info!(
            "[PIPELINE] {} pulses: {} outgoing peaks, {} returning peaks",
            num_pulses,
            outgoing.peaks().len(),
            returning.peaks().len()
        );

        Ok(FlightLineFeatures {
            num_pulses,
            outgoing,
            returning,
        })
    }

    fn finish(&self, mut analysis: WaveformAnalysis) -> Result<ClassFeatures> {
        analysis.analyze(&self.config.detector())?;

        let refiner = self.config.refiner();
        let refinement = analysis.refine_peaks(refiner.as_ref())?;
        if !refinement.failed.is_empty() {
            warn!(
                "[PIPELINE] {} wave: {} of {} peaks could not be refined",
                analysis.class(),
                refinement.failed.len(),
                analysis.peaks().len()
            );
        }

        Ok(ClassFeatures {
            analysis,
            refinement,
        })
    }
}
