//! Error handling for Fullwave
//!
//! Geometry and tagging errors surface immediately; degenerate but valid
//! input (empty buffers, silent traces) is never an error.

use thiserror::Error;

/// Result type alias for Fullwave operations
pub type Result<T> = std::result::Result<T, FullwaveError>;

/// Main error type for Fullwave operations
#[derive(Error, Debug)]
pub enum FullwaveError {
    // File Errors
    #[error("File not found: {path}")]
    FileNotFound {
        path: String,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error("Invalid pulse file {path}: {reason}")]
    InvalidPulseFile { path: String, reason: String },

    // Geometry Errors
    #[error("Segment length mismatch: expected {expected} samples, got {actual}")]
    SegmentLengthMismatch { expected: usize, actual: usize },

    #[error("Sequence of {len} values cannot be split into segments of {segment_len}")]
    RaggedSequence { len: usize, segment_len: usize },

    #[error("Negative sample {value} in pulse {pulse} (amplitudes are non-negative)")]
    NegativeSample { pulse: u64, value: i32 },

    // Wave Class Errors
    #[error("Unexpected wave class {found} at sampling {position} of pulse {pulse}")]
    UnexpectedWaveClass {
        pulse: u64,
        position: usize,
        found: String,
    },

    #[error("Pulse {pulse} has no outgoing sampling")]
    MissingOutgoing { pulse: u64 },

    // Configuration Errors
    #[error("Invalid parameter: {param} = {value} ({expected})")]
    InvalidParameter {
        param: String,
        value: String,
        expected: String,
    },

    // Refinement Errors
    #[error("Gaussian fit at location {location} did not converge after {iterations} iterations")]
    FitDidNotConverge { location: usize, iterations: usize },

    // I/O Errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization Errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl FullwaveError {
    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            FullwaveError::FileNotFound { .. } => "FILE_NOT_FOUND",
            FullwaveError::InvalidPulseFile { .. } => "INVALID_PULSE_FILE",
            FullwaveError::SegmentLengthMismatch { .. } => "SEGMENT_LENGTH_MISMATCH",
            FullwaveError::RaggedSequence { .. } => "RAGGED_SEQUENCE",
            FullwaveError::NegativeSample { .. } => "NEGATIVE_SAMPLE",
            FullwaveError::UnexpectedWaveClass { .. } => "UNEXPECTED_WAVE_CLASS",
            FullwaveError::MissingOutgoing { .. } => "MISSING_OUTGOING",
            FullwaveError::InvalidParameter { .. } => "INVALID_PARAMETER",
            FullwaveError::FitDidNotConverge { .. } => "FIT_DID_NOT_CONVERGE",
            FullwaveError::Io(_) => "IO_ERROR",
            FullwaveError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Check if this error is recoverable
    ///
    /// A non-converging fit only loses the refinement of one peak; the
    /// detected peak itself is still valid.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            FullwaveError::FitDidNotConverge { .. }
                | FullwaveError::FileNotFound { .. }
                | FullwaveError::InvalidParameter { .. }
        )
    }

    /// Get recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            FullwaveError::FileNotFound { .. } => vec![
                "Check the file path is correct",
                "Pass a directory to process every pulse file inside it",
            ],
            FullwaveError::InvalidPulseFile { .. } => vec![
                "Check the file is a JSON pulse export",
                "Each pulse needs a list of samplings with segments",
            ],
            FullwaveError::SegmentLengthMismatch { .. } => vec![
                "Use the same --max-count for every stage of a run",
                "Re-populate the buffer instead of mixing segment lengths",
            ],
            FullwaveError::UnexpectedWaveClass { .. } | FullwaveError::MissingOutgoing { .. } => {
                vec![
                    "The first sampling of a pulse must be outgoing",
                    "Only one returning sampling may follow it",
                ]
            }
            FullwaveError::InvalidParameter { .. } => vec![
                "Adjust the parameter to be within valid range",
                "Run 'fullwave-cli config <path>' to write a default config",
            ],
            FullwaveError::FitDidNotConverge { .. } => vec![
                "Widen the fitting window or raise max_iterations",
                "Fall back to raw peak refinement",
            ],
            _ => vec![],
        }
    }
}
