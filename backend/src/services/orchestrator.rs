//! Simulation orchestration.
//!
//! Validates the session, delegates to the external calculator, and appends
//! the completed run to the history. A failed calculation records nothing.

use crate::calculator::{CalculationRequest, CalculatorError, RadiometricCalculator};
use crate::models::SimulationRun;
use crate::session::{Session, SessionError};

/// Error type for simulation runs.
#[derive(Debug, thiserror::Error)]
pub enum SimulationError {
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Calculator(#[from] CalculatorError),
}

/// Run one simulation against the calculator and append the result to the
/// session history.
///
/// Only one run may be in flight at a time; the gate is held for the whole
/// calculator call and released on completion, failure, or cancellation.
pub async fn run(
    session: &Session,
    calculator: &dyn RadiometricCalculator,
) -> Result<SimulationRun, SimulationError> {
    let (scene, instrument) = session.snapshot()?;
    let _guard = session.begin_run()?;

    let request = CalculationRequest::from_snapshots(&scene, &instrument);
    log::info!(
        "running {} simulation for '{}' on {} ({} groups x {} integrations) via {}",
        scene.observation,
        scene.target.name,
        instrument.instrument.label(),
        instrument.groups,
        instrument.integrations,
        calculator.backend_name(),
    );
    let outcome = calculator.calculate(&request).await?;

    Ok(session.append_run(scene, instrument, outcome))
}
