//! Pipeline configuration
//!
//! Stored as JSON. Every field has a default, so a partial file (or `{}`)
//! is a valid configuration.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{FullwaveError, Result};
use crate::features::{
    DetectionMethod, GaussianFitConfig, PeakDetector, PeakRefiner, RefinementMethod,
};

/// Segment length used by the reference flight line
pub const DEFAULT_MAX_COUNT: usize = 61;

/// Noise level used by the reference flight line
pub const DEFAULT_NOISE_LEVEL: f64 = 5.0;

/// Feature extraction settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Samples per buffered segment; longer samplings are truncated,
    /// shorter ones zero-padded
    pub max_count: usize,
    /// Threshold the detection signal must exceed
    pub noise_level: f64,
    /// Peak detection method
    pub detection: DetectionMethod,
    /// Peak refinement method
    pub refinement: RefinementMethod,
    /// Gaussian fit settings, used when `refinement` is `gaussian`
    pub gaussian: GaussianFitConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_count: DEFAULT_MAX_COUNT,
            noise_level: DEFAULT_NOISE_LEVEL,
            detection: DetectionMethod::default(),
            refinement: RefinementMethod::default(),
            gaussian: GaussianFitConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Load a configuration from a JSON file
    ///
    /// # Errors
    /// `FileNotFound` if the file does not exist, `Serialization` if it is
    /// not a valid configuration, or any validation error.
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(FullwaveError::FileNotFound {
                path: path.display().to_string(),
                source: None,
            });
        }

        let content = fs::read_to_string(path)?;
        let config: PipelineConfig = serde_json::from_str(&content)?;
        config.validate()?;

        Ok(config)
    }

    /// Write the configuration as pretty-printed JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Check for settings no stage can work with
    ///
    /// A non-positive noise level or a very small `max_count` is allowed;
    /// both simply produce more peaks or fewer derived values.
    pub fn validate(&self) -> Result<()> {
        if !self.noise_level.is_finite() {
            return Err(FullwaveError::InvalidParameter {
                param: "noise_level".to_string(),
                value: self.noise_level.to_string(),
                expected: "a finite number".to_string(),
            });
        }

        self.gaussian.validate()
    }

    /// Peak detector for these settings
    pub fn detector(&self) -> PeakDetector {
        PeakDetector::new(self.noise_level, self.detection)
    }

    /// Peak refiner for these settings
    pub fn refiner(&self) -> Box<dyn PeakRefiner> {
        self.refinement.build(&self.gaussian)
    }
}
