//! Radiometric calculator backends.
//!
//! The calculator is the external service that turns a configured scene and
//! instrument into a simulated spectrum and S/N estimate. The production
//! backend is a Pandeia-equivalent HTTP service (`pandeia-service` feature);
//! the synthetic backend is a deterministic stand-in for development and
//! tests.

#[cfg(feature = "pandeia-service")]
pub mod pandeia;
pub mod synthetic;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;
use crate::models::{InstrumentSnapshot, ModelSpectrum, ObservationType, SceneSnapshot, SedModel};

/// Error type for calculator calls.
#[derive(Debug, thiserror::Error)]
pub enum CalculatorError {
    /// The calculator rejected the request as unsimulatable.
    #[error("calculator rejected the request: {0}")]
    InvalidRequest(String),

    /// The service answered with an error status.
    #[error("calculator service error (status {status}): {message}")]
    Service { status: u16, message: String },

    /// The service could not be reached.
    #[error("calculator unreachable: {0}")]
    Transport(String),
}

#[cfg(feature = "pandeia-service")]
impl From<reqwest::Error> for CalculatorError {
    fn from(err: reqwest::Error) -> Self {
        CalculatorError::Transport(err.to_string())
    }
}

/// Everything the calculator needs for one simulation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculationRequest {
    pub sed: SedModel,
    pub observation: ObservationType,
    pub duration_hours: f64,
    pub st_teff: f64,
    pub st_logg: f64,
    pub st_metallicity: Option<f64>,
    pub ks_mag: f64,
    pub transit_depth: Option<f64>,
    pub eclipse_depth: Option<f64>,
    pub depth_spectrum: Option<ModelSpectrum>,
    pub instrument: InstrumentSnapshot,
}

impl CalculationRequest {
    /// Build a request from validated session snapshots.
    ///
    /// Snapshots are only produced for complete scenes, so the stellar
    /// parameters are present by construction.
    pub fn from_snapshots(scene: &SceneSnapshot, instrument: &InstrumentSnapshot) -> Self {
        let target = &scene.target;
        Self {
            sed: scene.sed,
            observation: scene.observation,
            duration_hours: scene.duration.value(),
            st_teff: target.teff.unwrap_or_default(),
            st_logg: target.logg_star.unwrap_or_default(),
            st_metallicity: target.metal_star,
            ks_mag: target.ks_mag.unwrap_or_default(),
            transit_depth: target.transit_depth(),
            eclipse_depth: target.eclipse_depth(),
            depth_spectrum: scene.depth_spectrum.clone(),
            instrument: instrument.clone(),
        }
    }

    /// Variant used for saturation checks: a single integration is enough
    /// to read the ramp.
    pub fn saturation_probe(&self) -> Self {
        let mut probe = self.clone();
        probe.instrument.integrations = 1;
        probe
    }
}

/// Calculator products for one simulation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculationOutcome {
    /// Wavelength grid [um]
    pub wavelength: Vec<f64>,
    /// Signal-to-noise per wavelength
    pub snr: Vec<f64>,
    /// Simulated transit/eclipse depth per wavelength
    pub depth: Vec<f64>,
    /// Fraction of the detector full well reached per integration
    pub saturation_fraction: f64,
}

/// Radiometric calculator interface.
#[async_trait]
pub trait RadiometricCalculator: Send + Sync {
    /// Short backend name for logs and the health endpoint.
    fn backend_name(&self) -> &'static str;

    /// Run one radiometric calculation. Long-running; callers decide about
    /// cancellation and retries.
    async fn calculate(
        &self,
        request: &CalculationRequest,
    ) -> Result<CalculationOutcome, CalculatorError>;
}

/// Create the calculator backend selected by the configuration: the Pandeia
/// service when an endpoint is configured, the synthetic backend otherwise.
pub fn create_calculator(config: &AppConfig) -> anyhow::Result<Arc<dyn RadiometricCalculator>> {
    match &config.services.pandeia_endpoint {
        #[cfg(feature = "pandeia-service")]
        Some(endpoint) => {
            let client = pandeia::PandeiaServiceClient::new(endpoint, &config.services)?;
            Ok(Arc::new(client))
        }
        #[cfg(not(feature = "pandeia-service"))]
        Some(_) => anyhow::bail!("pandeia-service feature not enabled"),
        None => Ok(Arc::new(synthetic::SyntheticCalculator::new())),
    }
}
