//! Data Transfer Objects for the HTTP API.
//!
//! Request and response bodies for the REST endpoints. Model types that
//! already derive Serialize/Deserialize are re-exported from the api
//! module.

use serde::{Deserialize, Serialize};

pub use crate::api::{
    InstrumentConfig, ModelSpectrum, ObservationType, ObservingScene, ProvenanceNotice,
    ResolvedTarget, RunId, SedModel, SimulationRun, Target,
};
use crate::models::Instrument;

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status of the service
    pub status: String,
    /// Version of the API
    pub version: String,
    /// Archive backend name and reachability
    pub archive: String,
    /// Calculator backend name
    pub calculator: String,
}

/// Current session state: scene, instrument, and history size.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionView {
    pub scene: ObservingScene,
    pub instrument: InstrumentConfig,
    pub match_duration: bool,
    pub run_count: usize,
}

/// Request body to load a target into the scene.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetTargetRequest {
    pub name: String,
}

/// Request body to choose the SED model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetSedRequest {
    pub sed: SedModel,
}

/// Request body to choose the observation type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetObservationRequest {
    pub observation: ObservationType,
}

/// Request body to set the requested duration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetDurationRequest {
    pub hours: f64,
}

/// Request body to upload a model spectrum as two-column text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadSpectrumRequest {
    pub label: String,
    pub content: String,
}

/// Request body to replace the instrument configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstrumentRequest {
    pub instrument: Instrument,
    pub disperser: String,
    #[serde(default)]
    pub filter: Option<String>,
    pub subarray: String,
    pub readout: String,
    pub groups: u32,
    #[serde(default)]
    pub integrations: Option<u32>,
}

impl From<InstrumentRequest> for InstrumentConfig {
    fn from(request: InstrumentRequest) -> Self {
        InstrumentConfig {
            instrument: Some(request.instrument),
            disperser: Some(request.disperser),
            filter: request.filter,
            subarray: Some(request.subarray),
            readout: Some(request.readout),
            groups: Some(request.groups),
            integrations: request.integrations,
            saturation: None,
        }
    }
}

/// Request body for the integration-matching toggle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchIntegrationsRequest {
    pub enabled: bool,
}

/// Response for the integration-matching toggle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchIntegrationsResponse {
    pub enabled: bool,
    pub integrations: Option<u32>,
}

/// Saturation advisory response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaturationResponse {
    /// Fraction of the detector full well per integration
    pub fraction: f64,
    pub warning: bool,
    pub saturated: bool,
}

/// Response for starting a simulation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartRunResponse {
    /// Job ID for tracking the async simulation
    pub job_id: String,
    /// Message about the operation
    pub message: String,
}

/// Compact run record for listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub id: RunId,
    pub key: String,
    pub target: String,
    pub instrument: String,
    pub observation: ObservationType,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<&SimulationRun> for RunSummary {
    fn from(run: &SimulationRun) -> Self {
        Self {
            id: run.id,
            key: run.key.clone(),
            target: run.scene.target.name.clone(),
            instrument: run.instrument.instrument.label().to_string(),
            observation: run.scene.observation,
            created_at: run.created_at,
        }
    }
}

/// Run history listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunListResponse {
    pub runs: Vec<RunSummary>,
    pub total: usize,
}

/// Job status response for async processing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobStatusResponse {
    /// Job ID
    pub job_id: String,
    /// Job status
    pub status: String,
    /// Log entries
    pub logs: Vec<crate::services::job_tracker::LogEntry>,
    /// Result if completed
    pub result: Option<serde_json::Value>,
}

/// Response for cancelling a job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelJobResponse {
    pub job_id: String,
    pub cancelled: bool,
}

/// Sky-view link for the current target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkyViewResponse {
    pub target: String,
    pub url: String,
}

/// Labels of the bundled model spectra, grouped by role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpectraResponse {
    pub transit: Vec<String>,
    pub eclipse: Vec<String>,
    pub sed: Vec<String>,
}
