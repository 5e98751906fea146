//! Async simulation processing.
//!
//! Drives a simulation in the background, emitting progress logs so users
//! can follow along via SSE. Designed to be spawned as a task whose abort
//! handle is registered with the job tracker for cancellation.

use std::sync::Arc;

use crate::calculator::RadiometricCalculator;
use crate::models::RunId;
use crate::services::job_tracker::{JobTracker, LogLevel};
use crate::services::orchestrator;
use crate::session::Session;

/// Run a simulation asynchronously: validate, calculate, and append the
/// run, logging each step.
///
/// # Arguments
/// * `job_id` - The job ID for tracking progress
/// * `tracker` - Job tracker for logging
/// * `session` - The planning session owning scene, instrument, and history
/// * `calculator` - Radiometric calculator backend
///
/// # Returns
/// * Run ID on success, or error message on failure
pub async fn process_simulation_async(
    job_id: String,
    tracker: JobTracker,
    session: Session,
    calculator: Arc<dyn RadiometricCalculator>,
) -> Result<RunId, String> {
    tracker.log(&job_id, LogLevel::Info, "Validating scene and instrument...");

    let target_name = session
        .scene()
        .target
        .map(|t| t.name)
        .unwrap_or_else(|| "unresolved target".to_string());
    tracker.log(
        &job_id,
        LogLevel::Info,
        format!(
            "Submitting '{}' to the {} calculator...",
            target_name,
            calculator.backend_name()
        ),
    );

    match orchestrator::run(&session, calculator.as_ref()).await {
        Ok(run) => {
            tracker.log(
                &job_id,
                LogLevel::Success,
                format!(
                    "✓ Simulation complete: run {} ({} wavelength bins)",
                    run.id,
                    run.spectrum.wavelength.len()
                ),
            );
            let result = serde_json::json!({
                "run_id": run.id.value(),
                "key": run.key,
            });
            tracker.complete_job(&job_id, Some(result));
            Ok(run.id)
        }
        Err(e) => {
            let msg = format!("Simulation failed: {}", e);
            tracker.fail_job(&job_id, &msg);
            Err(msg)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::synthetic::SyntheticCalculator;
    use crate::models::{Instrument, InstrumentConfig, ObservationType, SedModel, Target};
    use crate::services::job_tracker::JobStatus;

    fn configured_session() -> Session {
        let session = Session::new();
        session.load_target(Target {
            name: "WASP-69 b".to_string(),
            host: "WASP-69".to_string(),
            aliases: vec![],
            ra: qtty::Degrees::new(315.0260),
            dec: qtty::Degrees::new(-5.0946),
            ks_mag: Some(7.459),
            teff: Some(4715.0),
            logg_star: Some(4.539),
            metal_star: Some(0.15),
            rstar: Some(0.813),
            mstar: Some(0.826),
            rplanet: Some(11.8),
            mplanet: Some(82.6),
            transit_dur: Some(qtty::Hours::new(2.23)),
            period: Some(qtty::Days::new(3.8681382)),
            sma: Some(0.04525),
            eq_temp: Some(963.0),
            is_confirmed: true,
            has_jwst_observations: true,
        });
        session.set_sed(SedModel::Phoenix).unwrap();
        session.set_observation(ObservationType::Transit);
        session.set_duration(6.0).unwrap();
        session
            .configure_instrument(InstrumentConfig {
                instrument: Some(Instrument::Niriss),
                disperser: Some("GR700XD".to_string()),
                filter: Some("CLEAR".to_string()),
                subarray: Some("SUBSTRIP256".to_string()),
                readout: Some("NISRAPID".to_string()),
                groups: Some(3),
                integrations: Some(900),
                saturation: None,
            })
            .unwrap();
        session
    }

    #[tokio::test]
    async fn test_processor_completes_job_and_appends_run() {
        let tracker = JobTracker::new();
        let job_id = tracker.create_job();
        let session = configured_session();

        let run_id = process_simulation_async(
            job_id.clone(),
            tracker.clone(),
            session.clone(),
            Arc::new(SyntheticCalculator::new()),
        )
        .await
        .unwrap();

        let job = tracker.get_job(&job_id).unwrap();
        assert_eq!(job.status, JobStatus::Completed);
        assert_eq!(job.result.unwrap()["run_id"], run_id.value());
        assert_eq!(session.run_count(), 1);
    }

    #[tokio::test]
    async fn test_processor_fails_job_on_incomplete_config() {
        let tracker = JobTracker::new();
        let job_id = tracker.create_job();
        let session = Session::new();

        let result = process_simulation_async(
            job_id.clone(),
            tracker.clone(),
            session.clone(),
            Arc::new(SyntheticCalculator::new()),
        )
        .await;

        assert!(result.is_err());
        let job = tracker.get_job(&job_id).unwrap();
        assert_eq!(job.status, JobStatus::Failed);
        assert_eq!(session.run_count(), 0);
    }
}
