//! Saturation advisory.
//!
//! Probes the calculator with the current scene and instrument and reports
//! the expected full-well fraction. The advisory never changes the session
//! on its own; the caller decides whether to adjust groups.

use crate::calculator::{CalculationRequest, RadiometricCalculator};
use crate::models::SaturationLevel;
use crate::services::orchestrator::SimulationError;
use crate::session::Session;

/// Run a single-integration saturation probe for the current configuration.
pub async fn check_saturation(
    session: &Session,
    calculator: &dyn RadiometricCalculator,
) -> Result<SaturationLevel, SimulationError> {
    let (scene, instrument) = session.saturation_snapshot()?;
    let request = CalculationRequest::from_snapshots(&scene, &instrument).saturation_probe();
    let outcome = calculator.calculate(&request).await?;

    let level = SaturationLevel {
        fraction: outcome.saturation_fraction,
    };
    if level.is_saturated() {
        log::warn!(
            "'{}' saturates {} at {} groups ({:.0}% of full well)",
            scene.target.name,
            instrument.instrument.label(),
            instrument.groups,
            level.fraction * 100.0,
        );
    }
    Ok(level)
}
