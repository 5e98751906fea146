//! Interactive planning session: the mutable scene and instrument state,
//! plus the append-only run history.
//!
//! One session exists per server process; handlers share it through an
//! `Arc` clone. All validation rules live here so the HTTP layer stays a
//! thin mapping.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::calculator::CalculationOutcome;
use crate::models::{
    run_key, InstrumentConfig, InstrumentSnapshot, ModelSpectrum, ObservationType, ObservingScene,
    RunId, SaturationLevel, SceneSnapshot, SedModel, SimulatedSpectrum, SimulationRun, SnCurve,
    Target,
};

/// Error type for session operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// An action was attempted before the state it depends on exists.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// Simulation requested while required fields are still unset.
    #[error("incomplete configuration: missing {}", missing.join(", "))]
    IncompleteConfig { missing: Vec<String> },
}

struct SessionState {
    scene: ObservingScene,
    instrument: InstrumentConfig,
    match_duration: bool,
    history: Vec<SimulationRun>,
    next_run_id: u64,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            scene: ObservingScene::default(),
            instrument: InstrumentConfig::default(),
            match_duration: false,
            history: Vec::new(),
            next_run_id: 1,
        }
    }
}

/// Shared planning session.
#[derive(Clone)]
pub struct Session {
    state: Arc<RwLock<SessionState>>,
    running: Arc<AtomicBool>,
}

/// Guard holding the one-run-at-a-time gate; dropping it releases the gate.
pub struct RunGuard {
    flag: Arc<AtomicBool>,
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(SessionState::default())),
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn scene(&self) -> ObservingScene {
        self.state.read().scene.clone()
    }

    pub fn instrument(&self) -> InstrumentConfig {
        self.state.read().instrument.clone()
    }

    pub fn match_duration(&self) -> bool {
        self.state.read().match_duration
    }

    /// Replace the scene target wholesale with a freshly resolved one.
    pub fn load_target(&self, target: Target) {
        let mut state = self.state.write();
        state.scene.target = Some(target);
    }

    /// Choose the SED model. Requires a resolved target: the SED is picked
    /// for a concrete star.
    pub fn set_sed(&self, sed: SedModel) -> Result<(), SessionError> {
        let mut state = self.state.write();
        if state.scene.target.is_none() {
            return Err(SessionError::InvalidState(
                "cannot choose an SED model before a target is resolved".to_string(),
            ));
        }
        state.scene.sed = Some(sed);
        Ok(())
    }

    pub fn set_observation(&self, observation: ObservationType) {
        let mut state = self.state.write();
        state.scene.observation = Some(observation);
    }

    /// Set the requested observation duration in hours.
    pub fn set_duration(&self, hours: f64) -> Result<Option<u32>, SessionError> {
        if !hours.is_finite() || hours <= 0.0 {
            return Err(SessionError::InvalidState(format!(
                "duration must be a positive number of hours, got {}",
                hours
            )));
        }
        let mut state = self.state.write();
        state.scene.duration = Some(qtty::Hours::new(hours));
        Ok(Self::apply_match(&mut state))
    }

    pub fn set_spectrum(&self, spectrum: ModelSpectrum) {
        let mut state = self.state.write();
        state.scene.depth_spectrum = Some(spectrum);
    }

    pub fn clear_spectrum(&self) {
        let mut state = self.state.write();
        state.scene.depth_spectrum = None;
    }

    /// Replace the instrument configuration. The cached saturation advisory
    /// is dropped: it was derived from the old settings.
    pub fn configure_instrument(&self, mut config: InstrumentConfig) -> Result<Option<u32>, SessionError> {
        config.validate().map_err(SessionError::InvalidState)?;
        config.saturation = None;
        let mut state = self.state.write();
        state.instrument = config;
        Ok(Self::apply_match(&mut state))
    }

    /// Toggle integration matching. While on, the integration count is a
    /// pure function of duration and readout settings; it is recomputed
    /// here and on every later duration/instrument change.
    pub fn set_match_duration(&self, enabled: bool) -> Result<Option<u32>, SessionError> {
        let mut state = self.state.write();
        state.match_duration = enabled;
        if !enabled {
            return Ok(state.instrument.integrations);
        }
        if state.scene.duration.is_none() {
            return Err(SessionError::InvalidState(
                "cannot match integrations to duration: duration not set".to_string(),
            ));
        }
        if state.instrument.integration_time().is_none() {
            return Err(SessionError::InvalidState(
                "cannot match integrations to duration: subarray, readout, and groups must be set"
                    .to_string(),
            ));
        }
        Ok(Self::apply_match(&mut state))
    }

    /// Recompute integrations when matching is on. With matching on but the
    /// inputs incomplete the count is cleared rather than left stale.
    fn apply_match(state: &mut SessionState) -> Option<u32> {
        if !state.match_duration {
            return state.instrument.integrations;
        }
        let matched = Self::matched_integrations(state);
        state.instrument.integrations = matched;
        matched
    }

    fn matched_integrations(state: &SessionState) -> Option<u32> {
        let duration = state.scene.duration?;
        let t_int = state.instrument.integration_time()?;
        let count = (duration.value() * 3600.0 / t_int.value()).round();
        Some(count.max(1.0) as u32)
    }

    /// Store a saturation advisory the caller accepted.
    pub fn record_saturation(&self, level: SaturationLevel) {
        let mut state = self.state.write();
        state.instrument.saturation = Some(level);
    }

    /// Freeze the current scene and instrument for simulation.
    ///
    /// Fails with [`SessionError::IncompleteConfig`] listing every unset
    /// required field; a simulation never starts from a partial scene.
    pub fn snapshot(&self) -> Result<(SceneSnapshot, InstrumentSnapshot), SessionError> {
        let state = self.state.read();
        Self::snapshot_inner(&state, false)
    }

    /// Like [`Session::snapshot`] but a missing integration count defaults
    /// to one, which is all a saturation probe needs.
    pub fn saturation_snapshot(&self) -> Result<(SceneSnapshot, InstrumentSnapshot), SessionError> {
        let state = self.state.read();
        Self::snapshot_inner(&state, true)
    }

    fn snapshot_inner(
        state: &SessionState,
        default_integrations: bool,
    ) -> Result<(SceneSnapshot, InstrumentSnapshot), SessionError> {
        let mut missing: Vec<String> = state
            .scene
            .missing_fields()
            .into_iter()
            .map(str::to_string)
            .collect();
        let mut instrument_missing = state.instrument.missing_fields();
        if default_integrations {
            instrument_missing.retain(|&field| field != "integrations");
        }
        missing.extend(instrument_missing.into_iter().map(str::to_string));
        if !missing.is_empty() {
            return Err(SessionError::IncompleteConfig { missing });
        }

        state
            .instrument
            .validate()
            .map_err(SessionError::InvalidState)?;

        let scene = &state.scene;
        let instrument = &state.instrument;
        let integrations = match instrument.integrations {
            Some(n) => n,
            None => 1,
        };
        let integration_seconds = instrument
            .integration_time()
            .ok_or_else(|| {
                SessionError::InvalidState(
                    "no detector timing for the chosen subarray/readout".to_string(),
                )
            })?
            .value();

        let scene_snapshot = SceneSnapshot {
            target: scene.target.clone().ok_or_else(|| {
                SessionError::IncompleteConfig {
                    missing: vec!["target".to_string()],
                }
            })?,
            sed: scene.sed.ok_or_else(|| SessionError::IncompleteConfig {
                missing: vec!["sed".to_string()],
            })?,
            observation: scene
                .observation
                .ok_or_else(|| SessionError::IncompleteConfig {
                    missing: vec!["observation".to_string()],
                })?,
            depth_spectrum: scene.depth_spectrum.clone(),
            duration: scene.duration.ok_or_else(|| SessionError::IncompleteConfig {
                missing: vec!["duration".to_string()],
            })?,
        };
        let instrument_snapshot = InstrumentSnapshot {
            instrument: instrument.instrument.ok_or_else(|| {
                SessionError::IncompleteConfig {
                    missing: vec!["instrument".to_string()],
                }
            })?,
            disperser: instrument.disperser.clone().unwrap_or_default(),
            filter: instrument.filter.clone(),
            subarray: instrument.subarray.clone().unwrap_or_default(),
            readout: instrument.readout.clone().unwrap_or_default(),
            groups: instrument.groups.unwrap_or(1),
            integrations,
            integration_seconds,
        };
        Ok((scene_snapshot, instrument_snapshot))
    }

    /// Acquire the one-run-at-a-time gate.
    pub fn begin_run(&self) -> Result<RunGuard, SessionError> {
        if self
            .running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(SessionError::InvalidState(
                "a simulation is already in progress".to_string(),
            ));
        }
        Ok(RunGuard {
            flag: Arc::clone(&self.running),
        })
    }

    pub fn simulation_in_flight(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Append a completed simulation to the history and return the stored
    /// record. History is append-only: runs keep their insertion order and
    /// are never mutated.
    pub fn append_run(
        &self,
        scene: SceneSnapshot,
        instrument: InstrumentSnapshot,
        outcome: CalculationOutcome,
    ) -> SimulationRun {
        let mut state = self.state.write();
        let id = RunId::new(state.next_run_id);
        state.next_run_id += 1;
        let run = SimulationRun {
            id,
            key: run_key(&scene, &instrument),
            scene,
            instrument,
            sn_curve: SnCurve {
                wavelength: outcome.wavelength.clone(),
                snr: outcome.snr,
            },
            spectrum: SimulatedSpectrum {
                wavelength: outcome.wavelength,
                depth: outcome.depth,
            },
            saturation_fraction: outcome.saturation_fraction,
            created_at: chrono::Utc::now(),
        };
        state.history.push(run.clone());
        run
    }

    pub fn history(&self) -> Vec<SimulationRun> {
        self.state.read().history.clone()
    }

    pub fn run(&self, id: RunId) -> Option<SimulationRun> {
        self.state.read().history.iter().find(|r| r.id == id).cloned()
    }

    /// Latest prior run with the same configuration key, for comparison.
    pub fn find_by_key(&self, key: &str) -> Option<SimulationRun> {
        self.state
            .read()
            .history
            .iter()
            .rev()
            .find(|r| r.key == key)
            .cloned()
    }

    pub fn run_count(&self) -> usize {
        self.state.read().history.len()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
