//! Simulation-run records and their content keys.

use serde::{Deserialize, Serialize};

use super::instrument::Instrument;
use super::scene::{ObservationType, SedModel};
use super::spectrum::ModelSpectrum;
use super::target::Target;

/// Run identifier, assigned sequentially as runs are appended to the
/// session history.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct RunId(pub u64);

impl RunId {
    pub fn new(value: u64) -> Self {
        RunId(value)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Fully resolved observing scene, frozen at simulation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneSnapshot {
    pub target: Target,
    pub sed: SedModel,
    pub observation: ObservationType,
    pub depth_spectrum: Option<ModelSpectrum>,
    pub duration: qtty::Hours,
}

/// Fully resolved instrument configuration, frozen at simulation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstrumentSnapshot {
    pub instrument: Instrument,
    pub disperser: String,
    pub filter: Option<String>,
    pub subarray: String,
    pub readout: String,
    pub groups: u32,
    pub integrations: u32,
    /// Per-integration time implied by subarray/readout/groups
    pub integration_seconds: f64,
}

/// Signal-to-noise per wavelength.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnCurve {
    pub wavelength: Vec<f64>,
    pub snr: Vec<f64>,
}

/// Simulated transit/eclipse depth spectrum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulatedSpectrum {
    pub wavelength: Vec<f64>,
    pub depth: Vec<f64>,
}

/// One completed simulation. Immutable once created; the session history
/// accumulates these in completion order and never reorders them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationRun {
    pub id: RunId,
    /// Content key over the scene and instrument snapshots. Identical
    /// configurations produce identical keys, which is how prior runs are
    /// found for comparison.
    pub key: String,
    pub scene: SceneSnapshot,
    pub instrument: InstrumentSnapshot,
    pub sn_curve: SnCurve,
    pub spectrum: SimulatedSpectrum,
    pub saturation_fraction: f64,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Content key for a scene+instrument configuration (sha256 over the
/// canonical JSON serialization).
pub fn run_key(scene: &SceneSnapshot, instrument: &InstrumentSnapshot) -> String {
    use sha2::{Digest, Sha256};

    let payload = serde_json::to_string(&(scene, instrument))
        .unwrap_or_else(|_| format!("{:?}{:?}", scene, instrument));
    let mut hasher = Sha256::new();
    hasher.update(payload.as_bytes());
    hex::encode(hasher.finalize())
}
