//! Pulse profile rescaling and EPN profile conversion.
//!
//! EPN ascii profiles (`.acn`) hold one phase bin per line with the
//! intensity in the fourth whitespace separated column. Conversion reads
//! the intensities, rescales them into [0, 255] and writes them as a single
//! comma separated line to `<output>/<stem>.asc`.

use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::constants::{
    EPN_INTENSITY_COLUMN, EPN_PROFILE_EXTENSION, RESCALE_MAX, RESCALE_MIN,
    RESCALED_PROFILE_EXTENSION,
};
use crate::error::{CatalogError, Result};

/// Linearly map `values` onto [0, 255] using their own minimum and maximum
///
/// A constant sequence (maximum equal to minimum) maps to all zeros, as
/// does any sequence holding a non-finite value. Length and order are
/// preserved. Offsets are taken on halved values so that finite inputs
/// spanning more than `f64::MAX` still rescale without overflow.
pub fn rescale_amplitudes(values: &[f64]) -> Vec<f64> {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let half_span = max / 2.0 - min / 2.0;

    if !half_span.is_finite() || half_span <= 0.0 {
        return vec![RESCALE_MIN; values.len()];
    }

    values
        .iter()
        .map(|v| RESCALE_MIN + (v / 2.0 - min / 2.0) / half_span * (RESCALE_MAX - RESCALE_MIN))
        .collect()
}

/// Read the intensity column of an EPN ascii profile
pub fn read_epn_profile(path: &Path) -> Result<Vec<f64>> {
    let file = File::open(path).map_err(|e| CatalogError::source_unavailable(path, e))?;
    let reader = BufReader::new(file);
    let mut samples = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let Some(token) = intensity_token(&line, index + 1, path)? else {
            continue;
        };

        let value = token
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| CatalogError::ProfileFormat {
                path: path.to_path_buf(),
                line: index + 1,
                reason: format!("intensity '{}' is not a number", token),
            })?;
        samples.push(value);
    }

    if samples.is_empty() {
        return Err(CatalogError::EmptyProfile {
            path: path.to_path_buf(),
        });
    }

    debug!("Read {} samples from {}", samples.len(), path.display());
    Ok(samples)
}

/// Intensity token of a data line, `None` for blank lines
fn intensity_token<'a>(line: &'a str, line_number: usize, path: &Path) -> Result<Option<&'a str>> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.is_empty() {
        return Ok(None);
    }

    tokens
        .get(EPN_INTENSITY_COLUMN)
        .copied()
        .map(Some)
        .ok_or_else(|| CatalogError::ProfileFormat {
            path: path.to_path_buf(),
            line: line_number,
            reason: format!(
                "expected at least {} columns, found {}",
                EPN_INTENSITY_COLUMN + 1,
                tokens.len()
            ),
        })
}

/// Write amplitudes as one comma separated line, replacing any existing file
pub fn write_ascii_profile(path: &Path, amplitudes: &[f64]) -> Result<()> {
    let line = amplitudes
        .iter()
        .map(|v| format!("{:?}", v))
        .collect::<Vec<_>>()
        .join(",");

    let mut file = File::create(path)?;
    file.write_all(line.as_bytes())?;
    Ok(())
}

/// Output path of the rescaled profile for `input`
pub fn ascii_profile_path(input: &Path, output_dir: &Path) -> PathBuf {
    let mut name = input.file_stem().unwrap_or_default().to_os_string();
    name.push(".");
    name.push(RESCALED_PROFILE_EXTENSION);
    output_dir.join(name)
}

/// Convert one EPN profile, returning the number of samples written
pub fn convert_epn_profile(input: &Path, output_dir: &Path) -> Result<usize> {
    let samples = read_epn_profile(input)?;
    let rescaled = rescale_amplitudes(&samples);
    let output = ascii_profile_path(input, output_dir);

    write_ascii_profile(&output, &rescaled)?;
    debug!("Wrote {}", output.display());
    Ok(rescaled.len())
}

/// Outcome of a directory conversion
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ConversionStats {
    pub files_found: usize,
    pub files_converted: usize,
    pub files_failed: usize,
    pub samples_written: usize,

    /// One message per failed file
    pub errors: Vec<String>,
}

impl ConversionStats {
    pub fn success_rate(&self) -> f64 {
        if self.files_found == 0 {
            0.0
        } else {
            (self.files_converted as f64 / self.files_found as f64) * 100.0
        }
    }
}

/// `.acn` files below `input_dir`, sorted by path
pub fn find_epn_profiles(input_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut profiles = Vec::new();

    for entry in WalkDir::new(input_dir) {
        let entry = entry.map_err(|e| {
            let path = e
                .path()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| input_dir.to_path_buf());
            let source = e
                .into_io_error()
                .unwrap_or_else(|| std::io::Error::other("directory loop detected"));
            CatalogError::source_unavailable(path, source)
        })?;

        if entry.file_type().is_file()
            && entry
                .path()
                .extension()
                .is_some_and(|ext| ext == EPN_PROFILE_EXTENSION)
        {
            profiles.push(entry.into_path());
        }
    }

    profiles.sort();
    Ok(profiles)
}

/// Convert every EPN profile below `input_dir` into `output_dir`
///
/// The output directory is created when missing. A profile that cannot
/// be read or written is counted and reported without stopping the pass.
pub fn convert_epn_directory(
    input_dir: &Path,
    output_dir: &Path,
    show_progress: bool,
) -> Result<ConversionStats> {
    if !input_dir.is_dir() {
        return Err(CatalogError::source_unavailable(
            input_dir,
            std::io::Error::new(std::io::ErrorKind::NotFound, "not a directory"),
        ));
    }
    fs::create_dir_all(output_dir)?;

    let profiles = find_epn_profiles(input_dir)?;
    info!(
        "Converting {} EPN profiles from {} to {}",
        profiles.len(),
        input_dir.display(),
        output_dir.display()
    );

    let pb = if show_progress {
        let pb = ProgressBar::new(profiles.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        pb
    } else {
        ProgressBar::hidden()
    };

    let mut stats = ConversionStats {
        files_found: profiles.len(),
        ..Default::default()
    };

    for path in &profiles {
        if let Some(name) = path.file_name() {
            pb.set_message(name.to_string_lossy().into_owned());
        }

        match convert_epn_profile(path, output_dir) {
            Ok(samples) => {
                stats.files_converted += 1;
                stats.samples_written += samples;
            }
            Err(e) => {
                warn!("Failed to convert {}: {}", path.display(), e);
                stats.files_failed += 1;
                stats.errors.push(e.to_string());
            }
        }
        pb.inc(1);
    }

    pb.finish_with_message(format!("Converted {} profiles", stats.files_converted));
    info!(
        "Profile conversion finished: {} converted, {} failed",
        stats.files_converted, stats.files_failed
    );

    Ok(stats)
}
