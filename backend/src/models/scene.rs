use serde::{Deserialize, Serialize};

use super::spectrum::ModelSpectrum;
use super::target::Target;

/// Stellar spectral-energy-distribution model family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SedModel {
    Phoenix,
    Kurucz,
    Blackbody,
}

impl std::fmt::Display for SedModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            SedModel::Phoenix => "PHOENIX",
            SedModel::Kurucz => "Kurucz",
            SedModel::Blackbody => "blackbody",
        };
        write!(f, "{}", label)
    }
}

/// Time-series observation geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObservationType {
    Transit,
    Eclipse,
}

impl std::fmt::Display for ObservationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ObservationType::Transit => "transit",
            ObservationType::Eclipse => "eclipse",
        };
        write!(f, "{}", label)
    }
}

/// The observing scene under configuration. Mutable, owned by the session;
/// every field except the target may be unset while the user is still
/// choosing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObservingScene {
    pub target: Option<Target>,
    pub sed: Option<SedModel>,
    pub observation: Option<ObservationType>,
    /// Uploaded transit/eclipse depth spectrum, if any
    pub depth_spectrum: Option<ModelSpectrum>,
    /// Requested observation duration
    pub duration: Option<qtty::Hours>,
}

impl ObservingScene {
    /// Fields that must be set before a simulation can run.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        match &self.target {
            None => missing.push("target"),
            Some(target) => {
                if !target.has_stellar_parameters() {
                    missing.push("target stellar parameters");
                }
            }
        }
        if self.sed.is_none() {
            missing.push("sed");
        }
        if self.observation.is_none() {
            missing.push("observation");
        }
        if self.duration.is_none() {
            missing.push("duration");
        }
        missing
    }

    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }
}
