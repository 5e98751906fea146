//! Instrument configuration and detector timing.
//!
//! The mode tables cover the four JWST time-series spectroscopy modes the
//! planner supports. Integration timing follows the MULTIACCUM accounting:
//! a readout pattern averages `nframe` frames per group and skips `nskip`
//! frames between groups, and every integration pays one reset frame.

use serde::{Deserialize, Serialize};

/// JWST instruments with a supported TSO spectroscopy mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Instrument {
    Miri,
    Nircam,
    Nirspec,
    Niriss,
}

impl Instrument {
    pub fn label(&self) -> &'static str {
        match self {
            Instrument::Miri => "MIRI",
            Instrument::Nircam => "NIRCam",
            Instrument::Nirspec => "NIRSpec",
            Instrument::Niriss => "NIRISS",
        }
    }

    /// Observing-mode name as used by the calculator service.
    pub fn mode_name(&self) -> &'static str {
        match self {
            Instrument::Miri => "lrsslitless",
            Instrument::Nircam => "lw_tsgrism",
            Instrument::Nirspec => "bots",
            Instrument::Niriss => "soss",
        }
    }
}

impl std::fmt::Display for Instrument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Allowed element combinations for one instrument mode. An empty filter
/// list means the mode takes no filter (the filter field must stay unset).
#[derive(Debug, Clone, Copy)]
pub struct InstrumentMode {
    pub instrument: Instrument,
    pub dispersers: &'static [&'static str],
    pub filters: &'static [&'static str],
    pub subarrays: &'static [&'static str],
    pub readout_patterns: &'static [&'static str],
}

const MODES: &[InstrumentMode] = &[
    InstrumentMode {
        instrument: Instrument::Miri,
        dispersers: &["P750L"],
        filters: &[],
        subarrays: &["SLITLESSPRISM"],
        readout_patterns: &["FASTR1"],
    },
    InstrumentMode {
        instrument: Instrument::Nircam,
        dispersers: &["GRISMR"],
        filters: &["F277W", "F322W2", "F356W", "F444W"],
        subarrays: &["SUBGRISM64", "SUBGRISM128", "SUBGRISM256"],
        readout_patterns: &[
            "RAPID", "BRIGHT1", "BRIGHT2", "SHALLOW2", "SHALLOW4", "MEDIUM2", "MEDIUM8", "DEEP2",
            "DEEP8",
        ],
    },
    InstrumentMode {
        instrument: Instrument::Nirspec,
        dispersers: &["G140M", "G140H", "G235M", "G235H", "G395M", "G395H", "PRISM"],
        filters: &["F070LP", "F100LP", "F170LP", "F290LP", "CLEAR"],
        subarrays: &["SUB512", "SUB1024A", "SUB1024B", "SUB2048"],
        readout_patterns: &["NRSRAPID", "NRS"],
    },
    InstrumentMode {
        instrument: Instrument::Niriss,
        dispersers: &["GR700XD"],
        filters: &["CLEAR"],
        subarrays: &["SUBSTRIP96", "SUBSTRIP256"],
        readout_patterns: &["NISRAPID", "NIS"],
    },
];

/// The supported instrument modes.
pub fn instrument_modes() -> &'static [InstrumentMode] {
    MODES
}

/// Mode definition for one instrument.
pub fn mode_for(instrument: Instrument) -> &'static InstrumentMode {
    MODES
        .iter()
        .find(|mode| mode.instrument == instrument)
        .expect("every instrument has a mode entry")
}

/// Detector frame time for a subarray.
pub fn frame_time(subarray: &str) -> Option<qtty::Seconds> {
    let seconds = match subarray {
        "SLITLESSPRISM" => 0.159,
        "SUBGRISM64" => 0.34061,
        "SUBGRISM128" => 0.67597,
        "SUBGRISM256" => 1.34669,
        "SUB512" => 0.22616,
        "SUB1024A" | "SUB1024B" => 0.45144,
        "SUB2048" => 0.90200,
        "SUBSTRIP96" => 2.21350,
        "SUBSTRIP256" => 5.49135,
        _ => return None,
    };
    Some(qtty::Seconds::new(seconds))
}

/// Frames averaged per group and frames skipped between groups.
pub fn readout_timing(pattern: &str) -> Option<(u32, u32)> {
    let timing = match pattern {
        "RAPID" | "NRSRAPID" | "NISRAPID" | "FASTR1" => (1, 0),
        "BRIGHT1" => (1, 1),
        "BRIGHT2" => (2, 0),
        "SHALLOW2" => (2, 3),
        "SHALLOW4" => (4, 1),
        "MEDIUM2" => (2, 8),
        "MEDIUM8" => (8, 2),
        "DEEP2" => (2, 18),
        "DEEP8" => (8, 12),
        "NRS" => (4, 1),
        "NIS" => (1, 0),
        _ => return None,
    };
    Some(timing)
}

/// Time spent on one integration: `(g*nf + (g-1)*ns + 1) * t_frame`, the
/// +1 being the detector reset.
pub fn integration_time(subarray: &str, pattern: &str, groups: u32) -> Option<qtty::Seconds> {
    if groups == 0 {
        return None;
    }
    let tframe = frame_time(subarray)?.value();
    let (nframe, nskip) = readout_timing(pattern)?;
    let frames = groups * nframe + (groups - 1) * nskip + 1;
    Some(qtty::Seconds::new(frames as f64 * tframe))
}

/// Wavelength coverage for an instrument/disperser/filter combination, in
/// microns.
pub fn wavelength_range(
    instrument: Instrument,
    disperser: &str,
    filter: Option<&str>,
) -> (f64, f64) {
    match instrument {
        Instrument::Miri => (5.0, 12.0),
        Instrument::Nircam => match filter {
            Some("F277W") => (2.4, 3.1),
            Some("F322W2") => (2.4, 4.0),
            Some("F356W") => (3.1, 4.0),
            Some("F444W") => (3.8, 5.0),
            _ => (2.4, 5.0),
        },
        Instrument::Nirspec => match disperser {
            "G140M" | "G140H" => (0.97, 1.84),
            "G235M" | "G235H" => (1.66, 3.07),
            "G395M" | "G395H" => (2.87, 5.18),
            _ => (0.6, 5.3),
        },
        Instrument::Niriss => (0.6, 2.8),
    }
}

/// Saturation advisory from the calculator: fraction of the detector full
/// well reached at the end of an integration ramp.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SaturationLevel {
    pub fraction: f64,
}

impl SaturationLevel {
    /// Above 80% of the full well the ramp is at risk.
    pub fn is_warning(&self) -> bool {
        self.fraction >= 0.8
    }

    pub fn is_saturated(&self) -> bool {
        self.fraction >= 1.0
    }
}

/// Instrument configuration under construction. Mutable, owned by the
/// session; unset fields mean the user has not chosen yet.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InstrumentConfig {
    pub instrument: Option<Instrument>,
    pub disperser: Option<String>,
    pub filter: Option<String>,
    pub subarray: Option<String>,
    pub readout: Option<String>,
    pub groups: Option<u32>,
    pub integrations: Option<u32>,
    /// Last saturation advisory accepted by the caller. Never updated
    /// implicitly; cleared whenever the configuration changes.
    pub saturation: Option<SaturationLevel>,
}

impl InstrumentConfig {
    /// Check the chosen elements against the mode table.
    pub fn validate(&self) -> Result<(), String> {
        let instrument = match self.instrument {
            Some(instrument) => instrument,
            None => return Ok(()),
        };
        let mode = mode_for(instrument);

        if let Some(disperser) = &self.disperser {
            if !mode.dispersers.contains(&disperser.as_str()) {
                return Err(format!(
                    "disperser '{}' is not available for {}",
                    disperser,
                    instrument.label()
                ));
            }
        }
        match &self.filter {
            Some(filter) if mode.filters.is_empty() => {
                return Err(format!(
                    "{} takes no filter, got '{}'",
                    instrument.label(),
                    filter
                ));
            }
            Some(filter) if !mode.filters.contains(&filter.as_str()) => {
                return Err(format!(
                    "filter '{}' is not available for {}",
                    filter,
                    instrument.label()
                ));
            }
            _ => {}
        }
        if let Some(subarray) = &self.subarray {
            if !mode.subarrays.contains(&subarray.as_str()) {
                return Err(format!(
                    "subarray '{}' is not available for {}",
                    subarray,
                    instrument.label()
                ));
            }
        }
        if let Some(readout) = &self.readout {
            if !mode.readout_patterns.contains(&readout.as_str()) {
                return Err(format!(
                    "readout pattern '{}' is not available for {}",
                    readout,
                    instrument.label()
                ));
            }
        }
        if self.groups == Some(0) {
            return Err("groups must be at least 1".to_string());
        }
        if self.integrations == Some(0) {
            return Err("integrations must be at least 1".to_string());
        }
        Ok(())
    }

    /// Fields that must be set before a simulation can run.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        let filter_required = match self.instrument {
            None => {
                missing.push("instrument");
                false
            }
            Some(instrument) => !mode_for(instrument).filters.is_empty(),
        };
        if self.disperser.is_none() {
            missing.push("disperser");
        }
        if filter_required && self.filter.is_none() {
            missing.push("filter");
        }
        if self.subarray.is_none() {
            missing.push("subarray");
        }
        if self.readout.is_none() {
            missing.push("readout");
        }
        if self.groups.is_none() {
            missing.push("groups");
        }
        if self.integrations.is_none() {
            missing.push("integrations");
        }
        missing
    }

    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }

    /// Per-integration time for the current subarray/readout/groups, when
    /// all three are chosen.
    pub fn integration_time(&self) -> Option<qtty::Seconds> {
        integration_time(
            self.subarray.as_deref()?,
            self.readout.as_deref()?,
            self.groups?,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nirspec_config() -> InstrumentConfig {
        InstrumentConfig {
            instrument: Some(Instrument::Nirspec),
            disperser: Some("G395H".to_string()),
            filter: Some("F290LP".to_string()),
            subarray: Some("SUB2048".to_string()),
            readout: Some("NRSRAPID".to_string()),
            groups: Some(4),
            integrations: Some(100),
            saturation: None,
        }
    }

    #[test]
    fn test_integration_time_nrsrapid() {
        // (4*1 + 3*0 + 1) frames of 0.902 s
        let t = integration_time("SUB2048", "NRSRAPID", 4).unwrap();
        assert!((t.value() - 5.0 * 0.902).abs() < 1e-9);
    }

    #[test]
    fn test_integration_time_with_skipped_frames() {
        // SHALLOW4: nframe=4, nskip=1 -> 2*4 + 1*1 + 1 = 10 frames
        let t = integration_time("SUBGRISM64", "SHALLOW4", 2).unwrap();
        assert!((t.value() - 10.0 * 0.34061).abs() < 1e-9);
    }

    #[test]
    fn test_integration_time_rejects_zero_groups() {
        assert!(integration_time("SUB2048", "NRSRAPID", 0).is_none());
    }

    #[test]
    fn test_unknown_subarray_has_no_frame_time() {
        assert!(frame_time("FULL").is_none());
        assert!(integration_time("FULL", "NRSRAPID", 2).is_none());
    }

    #[test]
    fn test_validate_accepts_known_combination() {
        assert!(nirspec_config().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_foreign_disperser() {
        let mut config = nirspec_config();
        config.disperser = Some("GR700XD".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_filter_on_miri() {
        let config = InstrumentConfig {
            instrument: Some(Instrument::Miri),
            disperser: Some("P750L".to_string()),
            filter: Some("F444W".to_string()),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_groups() {
        let mut config = nirspec_config();
        config.groups = Some(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_miri_does_not_require_filter() {
        let config = InstrumentConfig {
            instrument: Some(Instrument::Miri),
            disperser: Some("P750L".to_string()),
            subarray: Some("SLITLESSPRISM".to_string()),
            readout: Some("FASTR1".to_string()),
            groups: Some(30),
            integrations: Some(1000),
            ..Default::default()
        };
        assert!(config.is_complete(), "missing: {:?}", config.missing_fields());
    }

    #[test]
    fn test_missing_fields_for_empty_config() {
        let config = InstrumentConfig::default();
        let missing = config.missing_fields();
        assert!(missing.contains(&"instrument"));
        assert!(missing.contains(&"groups"));
        assert!(missing.contains(&"integrations"));
    }

    #[test]
    fn test_wavelength_range_follows_filter() {
        let (lo, hi) = wavelength_range(Instrument::Nircam, "GRISMR", Some("F444W"));
        assert_eq!((lo, hi), (3.8, 5.0));
        let (lo, hi) = wavelength_range(Instrument::Nirspec, "G140H", Some("F100LP"));
        assert_eq!((lo, hi), (0.97, 1.84));
    }

    #[test]
    fn test_saturation_thresholds() {
        assert!(!SaturationLevel { fraction: 0.5 }.is_warning());
        assert!(SaturationLevel { fraction: 0.85 }.is_warning());
        assert!(!SaturationLevel { fraction: 0.85 }.is_saturated());
        assert!(SaturationLevel { fraction: 1.2 }.is_saturated());
    }
}
