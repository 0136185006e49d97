//! JSON pulse files
//!
//! A pulse file holds the samplings of one flight line:
//!
//! ```json
//! {
//!   "pulses": [
//!     { "index": 0, "samplings": [
//!       { "class": "outgoing",  "segments": [{ "samples": [0, 3, 12] }] },
//!       { "class": "returning", "segments": [{ "duration_from_anchor": 40.0, "samples": [1, 9] }] }
//!     ] }
//!   ]
//! }
//! ```

use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

use crate::error::{FullwaveError, Result};
use crate::waveform::{Pulse, WaveformSource};

/// Extension of pulse files picked up by directory scans
pub const PULSE_FILE_EXTENSION: &str = "json";

/// On-disk layout of a pulse file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PulseFile {
    /// Pulses in arrival order
    pub pulses: Vec<Pulse>,
}

impl PulseFile {
    /// Write as pretty-printed JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}

/// [`WaveformSource`] reading a JSON pulse file
#[derive(Debug)]
pub struct PulseFileSource {
    path: PathBuf,
    pulses: VecDeque<Pulse>,
}

impl PulseFileSource {
    /// Open and parse a pulse file
    ///
    /// # Errors
    /// `FileNotFound` if the file is missing, `InvalidPulseFile` if it
    /// does not parse.
    pub fn open(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| FullwaveError::FileNotFound {
            path: path.display().to_string(),
            source: Some(e),
        })?;

        let file: PulseFile =
            serde_json::from_str(&content).map_err(|e| FullwaveError::InvalidPulseFile {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;

        debug!(
            "[IO] Opened {} with {} pulses",
            path.display(),
            file.pulses.len()
        );

        Ok(Self {
            path: path.to_path_buf(),
            pulses: file.pulses.into(),
        })
    }

    /// Path the pulses were read from
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Pulses not yet handed out
    pub fn remaining(&self) -> usize {
        self.pulses.len()
    }
}

impl WaveformSource for PulseFileSource {
    fn next_pulse(&mut self) -> Result<Option<Pulse>> {
        Ok(self.pulses.pop_front())
    }
}

/// Every pulse file below `dir`, sorted by path
///
/// A missing directory yields an empty list.
pub fn discover_pulse_files(dir: &Path) -> Vec<PathBuf> {
    if !dir.exists() {
        return Vec::new();
    }

    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            entry
                .path()
                .extension()
                .is_some_and(|ext| ext == PULSE_FILE_EXTENSION)
        })
        .map(|entry| entry.path().to_path_buf())
        .collect();

    files.sort();
    files
}
