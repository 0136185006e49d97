//! Peak refinement
//!
//! Turns a detected [`Peak`] into a sub-sample estimate of its centre,
//! amplitude and width. The detector never depends on which refiner runs.

use serde::{Deserialize, Serialize};

use super::peaks::Peak;
use crate::error::{FullwaveError, Result};
use crate::waveform::SegmentedSequence;

// ============================================================================
// Constants
// ============================================================================

/// FWHM of a Gaussian in units of its standard deviation (2·sqrt(2·ln 2))
const FWHM_PER_SIGMA: f64 = 2.354_820_045_030_949;

/// Smallest sigma used to seed a fit
const MIN_INITIAL_SIGMA: f64 = 0.5;

/// Pivot magnitude below which the normal equations are treated as singular
const SINGULAR_EPSILON: f64 = 1e-12;

// ============================================================================
// Types
// ============================================================================

/// A peak with sub-sample centre, amplitude and width estimates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RefinedPeak {
    /// Location of the detected peak in the full amplitude sequence
    pub location: usize,
    /// Segment (pulse slot) the peak belongs to
    pub segment: usize,
    /// Centre time relative to the first segment of the peak's sampling
    pub time: f64,
    /// Peak amplitude
    pub amplitude: f64,
    /// Gaussian standard deviation in samples
    pub width: f64,
}

/// Strategy that refines one detected peak
pub trait PeakRefiner: Send + Sync {
    /// Refine `peak` using the raw samples of its own segment
    ///
    /// `times` holds one sample time per amplitude, with the same segments.
    fn refine(
        &self,
        peak: &Peak,
        amplitudes: &SegmentedSequence<i32>,
        times: &SegmentedSequence<f64>,
    ) -> Result<RefinedPeak>;

    /// Identifier used in logs and reports
    fn name(&self) -> &'static str;
}

/// Which refiner a run uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefinementMethod {
    /// Take the raw sample as is and estimate width from the half maximum
    #[default]
    Raw,
    /// Least-squares Gaussian fit around the raw peak
    Gaussian,
}

impl RefinementMethod {
    /// Build the refiner for this method
    pub fn build(self, gaussian: &GaussianFitConfig) -> Box<dyn PeakRefiner> {
        match self {
            RefinementMethod::Raw => Box::new(RawRefiner),
            RefinementMethod::Gaussian => Box::new(GaussianFitter::new(gaussian.clone())),
        }
    }
}

/// A peak's own segment: samples, their times and the segment-local offset
struct PeakSegment<'a> {
    index: usize,
    samples: &'a [i32],
    times: &'a [f64],
    offset: usize,
}

fn locate<'a>(
    peak: &Peak,
    amplitudes: &'a SegmentedSequence<i32>,
    times: &'a SegmentedSequence<f64>,
) -> Result<PeakSegment<'a>> {
    let index = amplitudes
        .segment_of(peak.location)
        .ok_or_else(|| FullwaveError::InvalidParameter {
            param: "location".to_string(),
            value: peak.location.to_string(),
            expected: format!("an index below {}", amplitudes.len()),
        })?;
    let start = amplitudes.segment_start(index).unwrap_or_default();
    let samples = amplitudes.segment(index).unwrap_or_default();
    let segment_times = times
        .segment(index)
        .filter(|t| t.len() == samples.len())
        .ok_or_else(|| FullwaveError::InvalidParameter {
            param: "times".to_string(),
            value: format!("{} values in {} segments", times.len(), times.num_segments()),
            expected: "one time per buffered sample".to_string(),
        })?;

    Ok(PeakSegment {
        index,
        samples,
        times: segment_times,
        offset: peak.location - start,
    })
}

/// Full width at half maximum around `offset`, linearly interpolated
fn half_maximum_width(samples: &[i32], offset: usize) -> f64 {
    if samples[offset] <= 0 {
        return 0.0;
    }

    let value = |i: usize| f64::from(samples[i]);
    let half = value(offset) / 2.0;
    let crossing = |i: usize, j: usize| {
        let (vi, vj) = (value(i), value(j));
        if vi == vj {
            j as f64
        } else {
            i as f64 + (half - vi) / (vj - vi) * (j as f64 - i as f64)
        }
    };

    let mut left = offset;
    while left > 0 && value(left) > half {
        left -= 1;
    }
    let mut right = offset;
    while right + 1 < samples.len() && value(right) > half {
        right += 1;
    }

    let left_edge = if value(left) <= half {
        crossing(left, left + 1)
    } else {
        left as f64
    };
    let right_edge = if value(right) <= half {
        crossing(right - 1, right)
    } else {
        right as f64
    };

    (right_edge - left_edge).max(0.0)
}

// ============================================================================
// Raw refiner
// ============================================================================

/// Reports the raw sample, with sigma derived from the half-maximum width
#[derive(Debug, Clone, Copy, Default)]
pub struct RawRefiner;

impl PeakRefiner for RawRefiner {
    fn refine(
        &self,
        peak: &Peak,
        amplitudes: &SegmentedSequence<i32>,
        times: &SegmentedSequence<f64>,
    ) -> Result<RefinedPeak> {
        let seg = locate(peak, amplitudes, times)?;
        Ok(RefinedPeak {
            location: peak.location,
            segment: seg.index,
            time: seg.times[seg.offset],
            amplitude: f64::from(peak.amplitude),
            width: half_maximum_width(seg.samples, seg.offset) / FWHM_PER_SIGMA,
        })
    }

    fn name(&self) -> &'static str {
        "raw"
    }
}

// ============================================================================
// Gaussian fitter
// ============================================================================

/// Gaussian fit settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GaussianFitConfig {
    /// Samples on each side of the peak included in the fit
    pub half_window: usize,
    /// Iteration limit before giving up
    pub max_iterations: usize,
    /// Largest parameter step accepted as converged
    pub tolerance: f64,
}

impl Default for GaussianFitConfig {
    fn default() -> Self {
        Self {
            half_window: 6,
            max_iterations: 50,
            tolerance: 1e-6,
        }
    }
}

impl GaussianFitConfig {
    /// Validate settings
    pub fn validate(&self) -> Result<()> {
        if self.half_window == 0 {
            return Err(FullwaveError::InvalidParameter {
                param: "gaussian.half_window".to_string(),
                value: self.half_window.to_string(),
                expected: "at least 1 sample".to_string(),
            });
        }
        if self.max_iterations == 0 {
            return Err(FullwaveError::InvalidParameter {
                param: "gaussian.max_iterations".to_string(),
                value: self.max_iterations.to_string(),
                expected: "at least 1".to_string(),
            });
        }
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(FullwaveError::InvalidParameter {
                param: "gaussian.tolerance".to_string(),
                value: self.tolerance.to_string(),
                expected: "a positive finite number".to_string(),
            });
        }
        Ok(())
    }
}

/// Levenberg-Marquardt fit of `A * exp(-(x - mu)^2 / (2 sigma^2))`
///
/// The fit window is clipped to the peak's own segment. The raw refiner's
/// estimate seeds the fit.
#[derive(Debug, Clone, Default)]
pub struct GaussianFitter {
    config: GaussianFitConfig,
}

/// Gaussian parameters `[amplitude, centre, sigma]`
type Params = [f64; 3];

impl GaussianFitter {
    /// Create a fitter
    pub fn new(config: GaussianFitConfig) -> Self {
        Self { config }
    }

    /// Fit settings
    pub fn config(&self) -> &GaussianFitConfig {
        &self.config
    }

    fn fit(&self, xs: &[f64], ys: &[f64], initial: Params, location: usize) -> Result<Params> {
        let not_converged = |iterations| FullwaveError::FitDidNotConverge {
            location,
            iterations,
        };

        let mut params = initial;
        let mut cost = sum_of_squares(xs, ys, &params);
        let mut lambda = 1e-3;

        for iteration in 0..self.config.max_iterations {
            let (jtj, jtr) = normal_equations(xs, ys, &params);

            let mut damped = jtj;
            for (i, row) in damped.iter_mut().enumerate() {
                row[i] *= 1.0 + lambda;
            }
            let step = solve3(&damped, &jtr).ok_or_else(|| not_converged(iteration + 1))?;

            let candidate = [
                params[0] + step[0],
                params[1] + step[1],
                params[2] + step[2],
            ];
            if candidate[2] <= 0.0 || candidate.iter().any(|p| !p.is_finite()) {
                lambda *= 10.0;
                continue;
            }

            let candidate_cost = sum_of_squares(xs, ys, &candidate);
            if candidate_cost <= cost {
                params = candidate;
                cost = candidate_cost;
                lambda /= 10.0;
                if step.iter().all(|s| s.abs() < self.config.tolerance) {
                    return Ok(params);
                }
            } else {
                lambda *= 10.0;
            }
        }

        Err(not_converged(self.config.max_iterations))
    }
}

impl PeakRefiner for GaussianFitter {
    fn refine(
        &self,
        peak: &Peak,
        amplitudes: &SegmentedSequence<i32>,
        times: &SegmentedSequence<f64>,
    ) -> Result<RefinedPeak> {
        let PeakSegment {
            index,
            samples,
            times,
            offset,
        } = locate(peak, amplitudes, times)?;

        let lo = offset.saturating_sub(self.config.half_window);
        let hi = (offset + self.config.half_window + 1).min(samples.len());
        if hi - lo < 3 {
            return Err(FullwaveError::FitDidNotConverge {
                location: peak.location,
                iterations: 0,
            });
        }

        let xs = &times[lo..hi];
        let ys: Vec<f64> = samples[lo..hi].iter().map(|&y| f64::from(y)).collect();

        let sigma = (half_maximum_width(samples, offset) / FWHM_PER_SIGMA).max(MIN_INITIAL_SIGMA);
        let initial = [f64::from(peak.amplitude), times[offset], sigma];

        let [amplitude, centre, sigma] = self.fit(xs, &ys, initial, peak.location)?;
        Ok(RefinedPeak {
            location: peak.location,
            segment: index,
            time: centre,
            amplitude,
            width: sigma,
        })
    }

    fn name(&self) -> &'static str {
        "gaussian"
    }
}

fn gaussian(x: f64, params: &Params) -> f64 {
    let [a, mu, sigma] = *params;
    let d = x - mu;
    a * (-d * d / (2.0 * sigma * sigma)).exp()
}

fn sum_of_squares(xs: &[f64], ys: &[f64], params: &Params) -> f64 {
    xs.iter()
        .zip(ys)
        .map(|(&x, &y)| (y - gaussian(x, params)).powi(2))
        .sum()
}

/// `J^T J` and `J^T r` for the Gaussian model at `params`
fn normal_equations(xs: &[f64], ys: &[f64], params: &Params) -> ([[f64; 3]; 3], [f64; 3]) {
    let [a, mu, sigma] = *params;
    let mut jtj = [[0.0; 3]; 3];
    let mut jtr = [0.0; 3];

    for (&x, &y) in xs.iter().zip(ys) {
        let d = x - mu;
        let g = (-d * d / (2.0 * sigma * sigma)).exp();
        let residual = y - a * g;
        let jacobian = [
            g,
            a * g * d / (sigma * sigma),
            a * g * d * d / (sigma * sigma * sigma),
        ];
        for i in 0..3 {
            jtr[i] += jacobian[i] * residual;
            for j in 0..3 {
                jtj[i][j] += jacobian[i] * jacobian[j];
            }
        }
    }

    (jtj, jtr)
}

fn det3(m: &[[f64; 3]; 3]) -> f64 {
    m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
        - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
        + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
}

/// Solve a 3x3 system by Cramer's rule
fn solve3(m: &[[f64; 3]; 3], v: &[f64; 3]) -> Option<[f64; 3]> {
    let det = det3(m);
    if det.abs() < SINGULAR_EPSILON {
        return None;
    }

    let mut out = [0.0; 3];
    for (col, slot) in out.iter_mut().enumerate() {
        let mut replaced = *m;
        for row in 0..3 {
            replaced[row][col] = v[row];
        }
        *slot = det3(&replaced) / det;
    }
    Some(out)
}
