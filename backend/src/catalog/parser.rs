//! Parser for the bundled plain-text target catalog.
//!
//! The format packs one host star per `>` row followed by its planets:
//!
//! ```text
//! >WASP-39: 217.3266 -3.4445 10.202 0.918 0.913 5400.0 4.503 -0.12
//!  WASP-39 b: 2.8032 14.34 89.0 0.04828 4.0552941 1116.0
//! ```
//!
//! Star columns: ra dec ks_mag rstar mstar teff logg metallicity.
//! Planet columns: transit_dur rplanet mplanet sma period eq_temp.
//! `None` marks a missing value.

use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::catalog::aliases::is_candidate;
use crate::models::Target;

struct StarRow {
    host: String,
    ra: f64,
    dec: f64,
    ks_mag: Option<f64>,
    rstar: Option<f64>,
    mstar: Option<f64>,
    teff: Option<f64>,
    logg: Option<f64>,
    metal: Option<f64>,
}

/// Cast a catalog token to an optional float (`None` is a literal).
fn to_float(token: &str) -> Result<Option<f64>> {
    if token == "None" {
        return Ok(None);
    }
    token
        .parse::<f64>()
        .map(Some)
        .with_context(|| format!("invalid number {:?}", token))
}

fn split_name_row(line: &str) -> Result<(&str, Vec<&str>)> {
    let (name, tail) = line
        .split_once(':')
        .context("row has no ':' separator")?;
    Ok((name.trim(), tail.split_whitespace().collect()))
}

/// Parse the catalog text into targets. Alias and provenance fields are
/// filled in later by [`crate::catalog::Catalog::load`].
pub fn parse_targets(text: &str) -> Result<Vec<Target>> {
    let mut targets = Vec::new();
    let mut star: Option<StarRow> = None;

    for (idx, raw) in text.lines().enumerate() {
        let line_no = idx + 1;
        if raw.trim().is_empty() || raw.trim_start().starts_with('#') {
            continue;
        }

        if let Some(row) = raw.strip_prefix('>') {
            let (host, values) = split_name_row(row)
                .with_context(|| format!("bad star row at line {}", line_no))?;
            if values.len() != 8 {
                bail!("star row at line {} has {} columns, expected 8", line_no, values.len());
            }
            let ra = to_float(values[0])
                .with_context(|| format!("line {}", line_no))?
                .with_context(|| format!("star row at line {} is missing ra", line_no))?;
            let dec = to_float(values[1])
                .with_context(|| format!("line {}", line_no))?
                .with_context(|| format!("star row at line {} is missing dec", line_no))?;
            star = Some(StarRow {
                host: host.to_string(),
                ra,
                dec,
                ks_mag: to_float(values[2]).with_context(|| format!("line {}", line_no))?,
                rstar: to_float(values[3]).with_context(|| format!("line {}", line_no))?,
                mstar: to_float(values[4]).with_context(|| format!("line {}", line_no))?,
                teff: to_float(values[5]).with_context(|| format!("line {}", line_no))?,
                logg: to_float(values[6]).with_context(|| format!("line {}", line_no))?,
                metal: to_float(values[7]).with_context(|| format!("line {}", line_no))?,
            });
        } else if raw.starts_with(' ') {
            let host = star
                .as_ref()
                .with_context(|| format!("planet row at line {} precedes any star row", line_no))?;
            let (planet, values) = split_name_row(raw)
                .with_context(|| format!("bad planet row at line {}", line_no))?;
            if values.len() != 6 {
                bail!(
                    "planet row at line {} has {} columns, expected 6",
                    line_no,
                    values.len()
                );
            }
            targets.push(Target {
                name: planet.to_string(),
                host: host.host.clone(),
                aliases: Vec::new(),
                ra: qtty::Degrees::new(host.ra),
                dec: qtty::Degrees::new(host.dec),
                ks_mag: host.ks_mag,
                teff: host.teff,
                logg_star: host.logg,
                metal_star: host.metal,
                rstar: host.rstar,
                mstar: host.mstar,
                transit_dur: to_float(values[0])
                    .with_context(|| format!("line {}", line_no))?
                    .map(qtty::Hours::new),
                rplanet: to_float(values[1]).with_context(|| format!("line {}", line_no))?,
                mplanet: to_float(values[2]).with_context(|| format!("line {}", line_no))?,
                sma: to_float(values[3]).with_context(|| format!("line {}", line_no))?,
                period: to_float(values[4])
                    .with_context(|| format!("line {}", line_no))?
                    .map(qtty::Days::new),
                eq_temp: to_float(values[5]).with_context(|| format!("line {}", line_no))?,
                is_confirmed: !is_candidate(planet),
                has_jwst_observations: false,
            });
        } else {
            bail!("unrecognized catalog row at line {}: {:?}", line_no, raw);
        }
    }

    Ok(targets)
}

/// Load and parse a catalog file.
pub fn load_targets(path: &Path) -> Result<Vec<Target>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read catalog file {}", path.display()))?;
    parse_targets(&text).with_context(|| format!("Failed to parse catalog {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
# ra dec ks_mag rstar mstar teff logg metal
>WASP-39: 217.3266 -3.4445 10.202 0.918 0.913 5400.0 4.503 -0.12
 WASP-39 b: 2.8032 14.34 89.0 0.04828 4.0552941 1116.0
>TOI-270: 68.4162 -51.9573 8.251 0.378 0.386 3506.0 4.872 -0.20
 TOI-270 c: 1.6 2.355 6.15 0.04526 5.6605731 488.0
 TOI-270 d: 2.03 2.133 4.78 0.0733 11.379573 387.0
";

    #[test]
    fn test_parse_multi_planet_host() {
        let targets = parse_targets(SAMPLE).unwrap();
        assert_eq!(targets.len(), 3);
        assert_eq!(targets[0].name, "WASP-39 b");
        assert_eq!(targets[1].host, "TOI-270");
        assert_eq!(targets[2].host, "TOI-270");
        assert_eq!(targets[1].teff, Some(3506.0));
        assert_eq!(targets[2].teff, Some(3506.0));
    }

    #[test]
    fn test_parse_star_values_propagate_to_planets() {
        let targets = parse_targets(SAMPLE).unwrap();
        let wasp39b = &targets[0];
        assert_eq!(wasp39b.ks_mag, Some(10.202));
        assert!((wasp39b.ra.value() - 217.3266).abs() < 1e-9);
        assert_eq!(wasp39b.transit_dur.map(|d| d.value()), Some(2.8032));
        assert_eq!(wasp39b.period.map(|p| p.value()), Some(4.0552941));
    }

    #[test]
    fn test_parse_none_values() {
        let text = ">TOI-5205: 69.1 18.9 11.2 0.392 0.392 3430.0 None None\n TOI-5205.01: 1.62 11.6 None 0.0198 1.6308 737.0\n";
        let targets = parse_targets(text).unwrap();
        assert_eq!(targets[0].logg_star, None);
        assert_eq!(targets[0].mplanet, None);
        assert!(!targets[0].is_confirmed, "candidates are not confirmed");
    }

    #[test]
    fn test_parse_rejects_orphan_planet_row() {
        assert!(parse_targets(" WASP-39 b: 2.8 14.3 89.0 0.048 4.05 1116.0\n").is_err());
    }

    #[test]
    fn test_parse_rejects_short_star_row() {
        assert!(parse_targets(">WASP-39: 217.3 -3.4 10.2\n").is_err());
    }

    #[test]
    fn test_parse_rejects_unrecognized_row() {
        assert!(parse_targets("WASP-39 b, 2.8\n").is_err());
    }

    #[test]
    fn test_parse_rejects_bad_number() {
        let text = ">WASP-39: 217.3 -3.4 10.2 0.9 0.9 xyz 4.5 0.0\n";
        assert!(parse_targets(text).is_err());
    }
}
