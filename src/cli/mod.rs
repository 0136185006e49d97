//! CLI Module
//!
//! Command-line interface for the full-waveform feature extractor.

pub mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::features::DetectionMethod;

/// Full-waveform LiDAR feature extraction
#[derive(Parser, Debug)]
#[command(name = "fullwave-cli")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable debug output
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only print warnings and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Log filter implied by the verbosity flags
    pub fn log_filter(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else if self.quiet {
            "warn"
        } else {
            "info"
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Extract peaks from a pulse file or a directory of pulse files
    #[command(name = "extract")]
    Extract {
        /// Pulse file, or directory scanned for pulse files
        input: PathBuf,

        /// Report file (single input) or report directory
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Override the noise level
        #[arg(long)]
        noise_level: Option<f64>,

        /// Override the segment length
        #[arg(long)]
        max_count: Option<usize>,

        /// Override the detection method
        #[arg(long, value_enum)]
        method: Option<MethodArg>,

        /// Refine peaks with a Gaussian fit
        ///
        /// Fitting is off unless this flag or the configuration file's
        /// `refinement` selects it; peaks are otherwise refined raw.
        #[arg(long)]
        gaussian: bool,

        /// Also write a CSV peak table next to each report
        #[arg(long)]
        csv: bool,
    },

    /// Write the default configuration to a file
    #[command(name = "config")]
    Config {
        /// Destination path
        path: PathBuf,
    },
}

/// Detection method as spelled on the command line
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodArg {
    /// Smoothed curvature regions
    Curvature,
    /// First-difference turning points
    FirstDifference,
}

impl From<MethodArg> for DetectionMethod {
    fn from(arg: MethodArg) -> Self {
        match arg {
            MethodArg::Curvature => DetectionMethod::CurvatureRegion,
            MethodArg::FirstDifference => DetectionMethod::FirstDifference,
        }
    }
}
