//! Model-spectrum files: two-column plain text (wavelength, depth or flux).

use std::path::Path;

use serde::{Deserialize, Serialize};

/// A tabulated model spectrum. Wavelengths are in microns and strictly
/// increasing; the second column is a transit/eclipse depth or a flux,
/// depending on what the file models.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSpectrum {
    pub label: String,
    pub wavelength: Vec<f64>,
    pub depth: Vec<f64>,
}

#[derive(Debug, thiserror::Error)]
pub enum SpectrumError {
    #[error("spectrum has no data rows")]
    Empty,
    #[error("malformed spectrum row at line {line}: {content:?}")]
    Malformed { line: usize, content: String },
    #[error("wavelengths must be positive and strictly increasing (line {line})")]
    Unsorted { line: usize },
}

impl ModelSpectrum {
    /// Linear interpolation at `wl`, clamped to the tabulated range.
    pub fn sample(&self, wl: f64) -> f64 {
        let n = self.wavelength.len();
        if wl <= self.wavelength[0] {
            return self.depth[0];
        }
        if wl >= self.wavelength[n - 1] {
            return self.depth[n - 1];
        }
        let i = self.wavelength.partition_point(|&w| w < wl);
        let (w0, w1) = (self.wavelength[i - 1], self.wavelength[i]);
        let (d0, d1) = (self.depth[i - 1], self.depth[i]);
        d0 + (d1 - d0) * (wl - w0) / (w1 - w0)
    }
}

/// Parse a two-column whitespace-separated spectrum. Lines starting with
/// '#' and blank lines are ignored.
pub fn parse_spectrum(label: &str, text: &str) -> Result<ModelSpectrum, SpectrumError> {
    let mut wavelength = Vec::new();
    let mut depth = Vec::new();

    for (idx, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let mut cols = line.split_whitespace();
        let parsed = match (cols.next(), cols.next()) {
            (Some(a), Some(b)) => a.parse::<f64>().ok().zip(b.parse::<f64>().ok()),
            _ => None,
        };
        let (wl, value) = parsed.ok_or_else(|| SpectrumError::Malformed {
            line: idx + 1,
            content: raw.to_string(),
        })?;
        if wl <= 0.0 || wavelength.last().is_some_and(|&prev| wl <= prev) {
            return Err(SpectrumError::Unsorted { line: idx + 1 });
        }
        wavelength.push(wl);
        depth.push(value);
    }

    if wavelength.is_empty() {
        return Err(SpectrumError::Empty);
    }
    Ok(ModelSpectrum {
        label: label.to_string(),
        wavelength,
        depth,
    })
}

/// Read a spectrum file; the label is the file stem (without .dat/.txt).
pub fn read_spectrum_file(path: &Path) -> anyhow::Result<ModelSpectrum> {
    use anyhow::Context;

    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read spectrum file {}", path.display()))?;
    let label = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("spectrum");
    parse_spectrum(label, &text)
        .with_context(|| format!("Failed to parse spectrum file {}", path.display()))
}

/// Bundled model spectra grouped by their role in the scene.
#[derive(Debug, Clone, Default)]
pub struct SpectrumLibrary {
    pub transit: Vec<ModelSpectrum>,
    pub eclipse: Vec<ModelSpectrum>,
    pub sed: Vec<ModelSpectrum>,
}

/// Collect spectra from a folder, classifying by filename: transit or
/// transmission, eclipse or emission, sed or star. Unreadable files are
/// skipped with a warning.
pub fn collect_spectra(folder: &Path) -> anyhow::Result<SpectrumLibrary> {
    use anyhow::Context;

    let mut library = SpectrumLibrary::default();
    let entries = std::fs::read_dir(folder)
        .with_context(|| format!("Failed to list spectrum folder {}", folder.display()))?;

    let mut paths: Vec<_> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file())
        .collect();
    paths.sort();

    for path in paths {
        let file_name = match path.file_name().and_then(|s| s.to_str()) {
            Some(name) => name.to_lowercase(),
            None => continue,
        };
        let bucket = if file_name.contains("transit") || file_name.contains("transmission") {
            &mut library.transit
        } else if file_name.contains("eclipse") || file_name.contains("emission") {
            &mut library.eclipse
        } else if file_name.contains("sed") || file_name.contains("star") {
            &mut library.sed
        } else {
            continue;
        };
        match read_spectrum_file(&path) {
            Ok(spectrum) => bucket.push(spectrum),
            Err(e) => log::warn!("skipping spectrum {}: {}", path.display(), e),
        }
    }
    Ok(library)
}
