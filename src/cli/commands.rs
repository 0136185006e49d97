//! CLI Command Implementations
//!
//! Implements the actual logic for each CLI command.

use std::fs;
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::config::PipelineConfig;
use crate::error::Result;
use crate::features::{DetectionMethod, RefinementMethod};
use crate::io::{discover_pulse_files, FeatureReport, PulseFileSource};
use crate::pipeline::FeatureExtractor;

/// Suffix of report files written next to their input
pub const REPORT_SUFFIX: &str = ".features.json";

/// Suffix of CSV peak tables
pub const CSV_SUFFIX: &str = ".peaks.csv";

/// Command-line overrides applied on top of a configuration file
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub noise_level: Option<f64>,
    pub max_count: Option<usize>,
    pub method: Option<DetectionMethod>,
    pub gaussian: bool,
}

/// Load the configuration (or defaults) and apply overrides.
pub fn resolve_config(path: Option<&Path>, overrides: &Overrides) -> Result<PipelineConfig> {
    let mut config = match path {
        Some(path) => {
            info!("Loading configuration: {}", path.display());
            PipelineConfig::from_file(path)?
        }
        None => PipelineConfig::default(),
    };

    if let Some(noise_level) = overrides.noise_level {
        config.noise_level = noise_level;
    }
    if let Some(max_count) = overrides.max_count {
        config.max_count = max_count;
    }
    if let Some(method) = overrides.method {
        config.detection = method;
    }
    if overrides.gaussian {
        config.refinement = RefinementMethod::Gaussian;
    }

    config.validate()?;
    Ok(config)
}

/// Extract features from a pulse file or every pulse file in a directory.
///
/// Returns the report paths written.
pub fn extract(
    input: &Path,
    output: Option<&Path>,
    config: &PipelineConfig,
    csv: bool,
) -> Result<Vec<PathBuf>> {
    let extractor = FeatureExtractor::new(config.clone());

    if !input.is_dir() {
        let report_path = match output {
            Some(path) => path.to_path_buf(),
            None => sibling_path(input, input.parent(), REPORT_SUFFIX),
        };
        extract_file(&extractor, input, &report_path, csv)?;
        return Ok(vec![report_path]);
    }

    let files: Vec<PathBuf> = discover_pulse_files(input)
        .into_iter()
        .filter(|path| !is_output_file(path))
        .collect();
    if files.is_empty() {
        warn!("No pulse files found under {}", input.display());
    }

    let out_dir = output.unwrap_or(input);
    fs::create_dir_all(out_dir)?;

    let mut written = Vec::with_capacity(files.len());
    for file in &files {
        let report_path = sibling_path(file, Some(out_dir), REPORT_SUFFIX);
        extract_file(&extractor, file, &report_path, csv)?;
        written.push(report_path);
    }

    println!("Processed {} pulse files", written.len());
    Ok(written)
}

fn extract_file(
    extractor: &FeatureExtractor,
    input: &Path,
    report_path: &Path,
    csv: bool,
) -> Result<()> {
    info!("Extracting features: {}", input.display());

    let mut source = PulseFileSource::open(input)?;
    let features = extractor.extract(&mut source)?;
    let report = FeatureReport::new(input, extractor.config(), &features)?;

    report.write_json(report_path)?;
    println!(
        "{}: {} pulses, {} peaks -> {}",
        input.display(),
        report.pulses,
        report.total_peaks(),
        report_path.display()
    );

    if csv {
        let csv_path = report_path.with_file_name(format!(
            "{}{}",
            file_stem(report_path).trim_end_matches(".features"),
            CSV_SUFFIX
        ));
        report.write_peaks_csv(&csv_path)?;
        info!("Peak table written: {}", csv_path.display());
    }

    Ok(())
}

/// Write the default configuration.
pub fn write_default_config(path: &Path) -> Result<()> {
    info!("Writing default configuration: {}", path.display());

    PipelineConfig::default().save(path)?;
    println!("Configuration written: {}", path.display());

    Ok(())
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn sibling_path(input: &Path, dir: Option<&Path>, suffix: &str) -> PathBuf {
    let name = format!("{}{}", file_stem(input), suffix);
    match dir {
        Some(dir) => dir.join(name),
        None => PathBuf::from(name),
    }
}

fn is_output_file(path: &Path) -> bool {
    path.file_name()
        .map(|name| name.to_string_lossy().ends_with(REPORT_SUFFIX))
        .unwrap_or(false)
}
