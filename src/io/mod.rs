//! File input and output
//!
//! JSON pulse files in, JSON reports and CSV peak tables out.

mod pulse_file;
mod report;

pub use pulse_file::{discover_pulse_files, PulseFile, PulseFileSource, PULSE_FILE_EXTENSION};
pub use report::{file_checksum, ClassReport, FeatureReport, PeakRecord, CSV_HEADER};
