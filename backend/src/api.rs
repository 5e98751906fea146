//! Public API surface for the backend.
//!
//! Consolidates the data types exchanged with the frontend. All types
//! derive Serialize/Deserialize for JSON serialization.

pub use crate::models::instrument::{
    frame_time, instrument_modes, integration_time, readout_timing, wavelength_range, Instrument,
    InstrumentConfig, InstrumentMode, SaturationLevel,
};
pub use crate::models::scene::{ObservationType, ObservingScene, SedModel};
pub use crate::models::simulation::{
    run_key, InstrumentSnapshot, RunId, SceneSnapshot, SimulatedSpectrum, SimulationRun, SnCurve,
};
pub use crate::models::spectrum::{
    collect_spectra, parse_spectrum, read_spectrum_file, ModelSpectrum, SpectrumError,
    SpectrumLibrary,
};
pub use crate::models::target::Target;

pub use crate::services::resolver::{ProvenanceNotice, ResolvedTarget};
