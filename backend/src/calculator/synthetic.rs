//! Deterministic synthetic calculator.
//!
//! A stand-in for the Pandeia service during development and testing. The
//! numbers are shaped like real products (depth spectra, photon-limited
//! S/N, ramp saturation) but carry no radiometric authority.

use async_trait::async_trait;

use super::{CalculationOutcome, CalculationRequest, CalculatorError, RadiometricCalculator};
use crate::models::{wavelength_range, ObservationType};

/// Points in the synthetic wavelength grid.
const GRID_POINTS: usize = 128;
/// Reference electron rate for a Ks = 10 source, electrons per second.
const REFERENCE_RATE: f64 = 1.0e4;
/// Detector full well, electrons.
const FULL_WELL: f64 = 6.0e4;

pub struct SyntheticCalculator;

impl SyntheticCalculator {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SyntheticCalculator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RadiometricCalculator for SyntheticCalculator {
    fn backend_name(&self) -> &'static str {
        "synthetic"
    }

    async fn calculate(
        &self,
        request: &CalculationRequest,
    ) -> Result<CalculationOutcome, CalculatorError> {
        let instrument = &request.instrument;
        let (wl_min, wl_max) = wavelength_range(
            instrument.instrument,
            &instrument.disperser,
            instrument.filter.as_deref(),
        );

        // Baseline depth: uploaded spectrum wins, then the target's depth
        let flat_depth = match request.observation {
            ObservationType::Transit => request.transit_depth,
            ObservationType::Eclipse => request.eclipse_depth,
        };
        if request.depth_spectrum.is_none() && flat_depth.is_none() {
            return Err(CalculatorError::InvalidRequest(format!(
                "no {} depth available for this target and no model spectrum given",
                request.observation
            )));
        }

        if request.st_teff <= 0.0 {
            return Err(CalculatorError::InvalidRequest(
                "stellar effective temperature must be positive".to_string(),
            ));
        }

        // Source brightness relative to a Ks = 10 star
        let flux_scale = 10f64.powf(-0.4 * (request.ks_mag - 10.0));
        let rate = REFERENCE_RATE * flux_scale;
        let t_int = instrument.integration_seconds;
        let n_int = instrument.integrations as f64;

        let mid = 0.5 * (wl_min + wl_max);
        let half = 0.5 * (wl_max - wl_min);
        let step = (wl_max - wl_min) / (GRID_POINTS - 1) as f64;

        let mut wavelength = Vec::with_capacity(GRID_POINTS);
        let mut snr = Vec::with_capacity(GRID_POINTS);
        let mut depth = Vec::with_capacity(GRID_POINTS);
        for i in 0..GRID_POINTS {
            let wl = wl_min + i as f64 * step;
            // Smooth throughput bump peaking mid-band
            let x = (wl - mid) / half;
            let throughput = 0.8 - 0.3 * x * x;
            let signal = rate * t_int * n_int * throughput;
            wavelength.push(wl);
            snr.push(signal.max(0.0).sqrt());
            depth.push(match &request.depth_spectrum {
                Some(spectrum) => spectrum.sample(wl),
                None => flat_depth.unwrap_or_default(),
            });
        }

        let saturation_fraction = rate * t_int / FULL_WELL;

        Ok(CalculationOutcome {
            wavelength,
            snr,
            depth,
            saturation_fraction,
        })
    }
}
