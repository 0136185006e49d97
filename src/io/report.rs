//! Feature reports
//!
//! A JSON report with provenance (input checksum, generation time, config)
//! and an optional flat CSV table of peaks.

use std::fs::{self, File};
use std::io::{BufWriter, Read, Write};
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::config::PipelineConfig;
use crate::error::Result;
use crate::pipeline::{ClassFeatures, FlightLineFeatures};
use crate::waveform::WaveClass;

/// CSV column names
pub const CSV_HEADER: &str = "class,pulse,location,amplitude,segment,time,width";

/// One detected peak with its refinement, if any
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeakRecord {
    /// Owning pulse
    pub pulse: u64,
    /// Global location in the class's amplitude sequence
    pub location: usize,
    /// Raw amplitude
    pub amplitude: i32,
    /// Segment holding the peak
    pub segment: Option<usize>,
    /// Refined centre time, measured from the first segment of the sampling
    pub time: Option<f64>,
    /// Refined width (sigma)
    pub width: Option<f64>,
}

/// Peaks of one wave class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassReport {
    /// Wave class
    pub class: WaveClass,
    /// Buffered segments (one per contributing pulse)
    pub segments: usize,
    /// Detected peaks in location order
    pub peaks: Vec<PeakRecord>,
    /// Locations whose refinement did not converge
    pub failed_refinements: Vec<usize>,
}

impl ClassReport {
    /// Summarize one class's features
    pub fn from_features(features: &ClassFeatures) -> Self {
        let analysis = &features.analysis;
        let refined = &features.refinement.peaks;

        let peaks = analysis
            .peaks()
            .iter()
            .map(|peak| {
                let fit = refined.iter().find(|r| r.location == peak.location);
                PeakRecord {
                    pulse: analysis.buffer().pulse_at(peak.location).unwrap_or_default(),
                    location: peak.location,
                    amplitude: peak.amplitude,
                    segment: fit.map(|r| r.segment),
                    time: fit.map(|r| r.time),
                    width: fit.map(|r| r.width),
                }
            })
            .collect();

        Self {
            class: analysis.class(),
            segments: analysis.wave().num_segments(),
            peaks,
            failed_refinements: features.refinement.failed.clone(),
        }
    }
}

/// Full extraction report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureReport {
    /// Input file the pulses came from
    pub input: String,
    /// SHA-256 of the input file, hex encoded
    pub input_checksum: String,
    /// When the report was generated
    pub generated_at: DateTime<Utc>,
    /// Crate version that produced the report
    pub version: String,
    /// Settings used
    pub config: PipelineConfig,
    /// Pulses read
    pub pulses: usize,
    /// Outgoing wave peaks
    pub outgoing: ClassReport,
    /// Returning wave peaks
    pub returning: ClassReport,
}

impl FeatureReport {
    /// Build a report for features extracted from `input`
    ///
    /// # Errors
    /// Fails if `input` cannot be read for checksumming.
    pub fn new(input: &Path, config: &PipelineConfig, features: &FlightLineFeatures) -> Result<Self> {
        Ok(Self {
            input: input.display().to_string(),
            input_checksum: file_checksum(input)?,
            generated_at: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            config: config.clone(),
            pulses: features.num_pulses,
            outgoing: ClassReport::from_features(&features.outgoing),
            returning: ClassReport::from_features(&features.returning),
        })
    }

    /// Total detected peaks across both classes
    pub fn total_peaks(&self) -> usize {
        self.outgoing.peaks.len() + self.returning.peaks.len()
    }

    /// Write the report as pretty-printed JSON
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Read a report back from JSON
    pub fn read_json(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Write every peak as one CSV row, outgoing first
    ///
    /// Refinement columns are empty for peaks that were not refined.
    pub fn write_peaks_csv(&self, path: &Path) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        writeln!(writer, "{}", CSV_HEADER)?;

        for class in [&self.outgoing, &self.returning] {
            for peak in &class.peaks {
                writeln!(
                    writer,
                    "{},{},{},{},{},{},{}",
                    class.class,
                    peak.pulse,
                    peak.location,
                    peak.amplitude,
                    optional(peak.segment),
                    optional(peak.time),
                    optional(peak.width)
                )?;
            }
        }

        writer.flush()?;
        Ok(())
    }
}

fn optional<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Calculate the SHA-256 checksum of a file
pub fn file_checksum(path: &Path) -> Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 8192];

    loop {
        let bytes_read = file.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::PulseFile;
    use crate::pipeline::FeatureExtractor;
    use crate::waveform::{MemorySource, Pulse, Sampling};
    use tempfile::TempDir;

    fn bell(len: usize, centre: usize) -> Vec<i32> {
        let mut wave = vec![0; len];
        for (i, v) in [2, 10, 40, 80, 40, 10, 2].iter().enumerate() {
            wave[centre - 3 + i] = *v;
        }
        wave
    }

    fn pulses() -> Vec<Pulse> {
        vec![
            Pulse::new(
                10,
                vec![
                    Sampling::new(WaveClass::Outgoing, bell(30, 8)),
                    Sampling::new(WaveClass::Returning, bell(30, 20)),
                ],
            ),
            Pulse::new(11, vec![Sampling::new(WaveClass::Outgoing, bell(30, 12))]),
        ]
    }

    fn report(dir: &TempDir) -> FeatureReport {
        let input = dir.path().join("line.json");
        PulseFile { pulses: pulses() }.save(&input).unwrap();

        let config = PipelineConfig {
            max_count: 30,
            ..PipelineConfig::default()
        };
        let features = FeatureExtractor::new(config.clone())
            .extract(&mut MemorySource::new(pulses()))
            .unwrap();
        FeatureReport::new(&input, &config, &features).unwrap()
    }

    #[test]
    fn test_checksum_of_known_content() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("abc.txt");
        fs::write(&path, "abc").unwrap();
        assert_eq!(
            file_checksum(&path).unwrap(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_report_contents() {
        let dir = TempDir::new().unwrap();
        let report = report(&dir);

        assert_eq!(report.pulses, 2);
        assert_eq!(report.input_checksum.len(), 64);
        assert_eq!(report.outgoing.segments, 2);
        assert_eq!(report.returning.segments, 1);
        assert_eq!(report.total_peaks(), 3);

        let outgoing: Vec<(u64, usize)> = report
            .outgoing
            .peaks
            .iter()
            .map(|p| (p.pulse, p.location))
            .collect();
        assert_eq!(outgoing, vec![(10, 8), (11, 42)]);
        assert_eq!(report.returning.peaks[0].segment, Some(0));
    }

    #[test]
    fn test_json_report_reads_back() {
        let dir = TempDir::new().unwrap();
        let report = report(&dir);
        let path = dir.path().join("report.json");

        report.write_json(&path).unwrap();
        let read = FeatureReport::read_json(&path).unwrap();
        assert_eq!(read.input_checksum, report.input_checksum);
        assert_eq!(read.generated_at, report.generated_at);
        assert_eq!(read.config.max_count, 30);
        assert_eq!(read.outgoing.peaks.len(), report.outgoing.peaks.len());
        assert_eq!(read.returning.peaks[0].location, 20);
    }

    #[test]
    fn test_peaks_csv() {
        let dir = TempDir::new().unwrap();
        let report = report(&dir);
        let path = dir.path().join("peaks.csv");

        report.write_peaks_csv(&path).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], CSV_HEADER);
        assert!(lines[1].starts_with("outgoing,10,8,80,0,"));
        assert!(lines[3].starts_with("returning,10,20,80,0,"));
    }

    #[test]
    fn test_csv_leaves_unrefined_columns_empty() {
        let dir = TempDir::new().unwrap();
        let mut report = report(&dir);
        report.returning.peaks[0].segment = None;
        report.returning.peaks[0].time = None;
        report.returning.peaks[0].width = None;

        let path = dir.path().join("peaks.csv");
        report.write_peaks_csv(&path).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.lines().any(|l| l == "returning,10,20,80,,,"));
    }
}
