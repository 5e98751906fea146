//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the
//! session and service layer for business logic.

use axum::{
    extract::{Path, State},
    response::sse::{Event, Sse},
    Json,
};
use futures::stream::Stream;
use std::convert::Infallible;
use std::time::Duration;

use super::dto::{
    CancelJobResponse, HealthResponse, InstrumentRequest, JobStatusResponse,
    MatchIntegrationsRequest, MatchIntegrationsResponse, RunListResponse, RunSummary,
    SaturationResponse, SessionView, SetDurationRequest, SetObservationRequest, SetSedRequest,
    SetTargetRequest, SkyViewResponse, SpectraResponse, StartRunResponse, UploadSpectrumRequest,
};
use super::error::AppError;
use super::state::AppState;
use crate::api::{ModelSpectrum, ResolvedTarget, RunId, SimulationRun};
use crate::models::parse_spectrum;
use crate::services;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Health check endpoint to verify the service and its backends.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let archive = if state.archive.health().await {
        state.archive.source_name().to_string()
    } else {
        format!("{} (unreachable)", state.archive.source_name())
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        archive,
        calculator: state.calculator.backend_name().to_string(),
    }))
}

// =============================================================================
// Target Resolution
// =============================================================================

/// GET /v1/targets/{name}
///
/// Resolve a target name or alias without touching the session.
pub async fn resolve_target(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> HandlerResult<ResolvedTarget> {
    let resolved = services::resolve_target(state.archive.as_ref(), &name).await?;
    Ok(Json(resolved))
}

/// GET /v1/targets/{name}/sky-view
///
/// Build the external sky-viewer URL for a target's field of view.
pub async fn sky_view(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> HandlerResult<SkyViewResponse> {
    let resolved = services::resolve_target(state.archive.as_ref(), &name).await?;
    let target = resolved.target;
    Ok(Json(SkyViewResponse {
        url: services::sky_view_url(target.ra, target.dec, state.config.services.esasky_fov_deg),
        target: target.name,
    }))
}

// =============================================================================
// Scene Configuration
// =============================================================================

/// GET /v1/session
///
/// Current scene, instrument, and run-history size.
pub async fn get_session(State(state): State<AppState>) -> HandlerResult<SessionView> {
    Ok(Json(SessionView {
        scene: state.session.scene(),
        instrument: state.session.instrument(),
        match_duration: state.session.match_duration(),
        run_count: state.session.run_count(),
    }))
}

/// PUT /v1/scene/target
///
/// Resolve a target and load it into the scene.
pub async fn set_target(
    State(state): State<AppState>,
    Json(request): Json<SetTargetRequest>,
) -> HandlerResult<ResolvedTarget> {
    let resolved = services::resolve_target(state.archive.as_ref(), &request.name).await?;
    state.session.load_target(resolved.target.clone());
    Ok(Json(resolved))
}

/// PUT /v1/scene/sed
pub async fn set_sed(
    State(state): State<AppState>,
    Json(request): Json<SetSedRequest>,
) -> HandlerResult<SessionView> {
    state.session.set_sed(request.sed)?;
    get_session(State(state)).await
}

/// PUT /v1/scene/observation
pub async fn set_observation(
    State(state): State<AppState>,
    Json(request): Json<SetObservationRequest>,
) -> HandlerResult<SessionView> {
    state.session.set_observation(request.observation);
    get_session(State(state)).await
}

/// PUT /v1/scene/duration
pub async fn set_duration(
    State(state): State<AppState>,
    Json(request): Json<SetDurationRequest>,
) -> HandlerResult<SessionView> {
    state.session.set_duration(request.hours)?;
    get_session(State(state)).await
}

/// POST /v1/scene/spectrum
///
/// Upload a two-column model spectrum for the scene.
pub async fn upload_spectrum(
    State(state): State<AppState>,
    Json(request): Json<UploadSpectrumRequest>,
) -> HandlerResult<ModelSpectrum> {
    let spectrum = parse_spectrum(&request.label, &request.content)
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    state.session.set_spectrum(spectrum.clone());
    Ok(Json(spectrum))
}

/// GET /v1/spectra
///
/// Labels of the model spectra bundled under the data directory.
pub async fn list_spectra(State(state): State<AppState>) -> HandlerResult<SpectraResponse> {
    let folder = state.config.archive.data_dir.join("models");
    let library = crate::models::collect_spectra(&folder)
        .map_err(|e| AppError::Internal(e.to_string()))?;
    Ok(Json(SpectraResponse {
        transit: library.transit.into_iter().map(|s| s.label).collect(),
        eclipse: library.eclipse.into_iter().map(|s| s.label).collect(),
        sed: library.sed.into_iter().map(|s| s.label).collect(),
    }))
}

// =============================================================================
// Instrument Configuration
// =============================================================================

/// PUT /v1/instrument
///
/// Replace the instrument configuration after mode validation.
pub async fn set_instrument(
    State(state): State<AppState>,
    Json(request): Json<InstrumentRequest>,
) -> HandlerResult<SessionView> {
    state.session.configure_instrument(request.into())?;
    get_session(State(state)).await
}

/// POST /v1/instrument/match-integrations
///
/// Toggle matching the integration count to the requested duration.
pub async fn match_integrations(
    State(state): State<AppState>,
    Json(request): Json<MatchIntegrationsRequest>,
) -> HandlerResult<MatchIntegrationsResponse> {
    let integrations = state.session.set_match_duration(request.enabled)?;
    Ok(Json(MatchIntegrationsResponse {
        enabled: request.enabled,
        integrations,
    }))
}

/// GET /v1/instrument/saturation
///
/// Saturation advisory for the current scene and instrument. Advisory
/// only: the caller decides whether to adjust groups.
pub async fn get_saturation(State(state): State<AppState>) -> HandlerResult<SaturationResponse> {
    let level =
        services::check_saturation(&state.session, state.calculator.as_ref()).await?;
    Ok(Json(SaturationResponse {
        fraction: level.fraction,
        warning: level.is_warning(),
        saturated: level.is_saturated(),
    }))
}

// =============================================================================
// Simulation Runs
// =============================================================================

/// POST /v1/runs
///
/// Start a simulation asynchronously. Returns a job ID for tracking
/// progress; only one simulation may be in flight at a time.
pub async fn start_run(
    State(state): State<AppState>,
) -> Result<(axum::http::StatusCode, Json<StartRunResponse>), AppError> {
    if state.session.simulation_in_flight() {
        return Err(AppError::InvalidState(
            "a simulation is already in progress".to_string(),
        ));
    }
    // Surface incomplete configuration immediately instead of in the job log
    state.session.snapshot()?;

    let job_id = state.job_tracker.create_job();
    let response_job_id = job_id.clone();

    let tracker = state.job_tracker.clone();
    let session = state.session.clone();
    let calculator = state.calculator.clone();
    let handle = tokio::spawn(async move {
        let _ = services::simulation_processor::process_simulation_async(
            job_id, tracker, session, calculator,
        )
        .await;
    });
    state
        .job_tracker
        .register_handle(&response_job_id, handle.abort_handle());

    Ok((
        axum::http::StatusCode::ACCEPTED,
        Json(StartRunResponse {
            job_id: response_job_id.clone(),
            message: format!(
                "Simulation started. Track progress at /v1/jobs/{}/logs",
                response_job_id
            ),
        }),
    ))
}

/// GET /v1/runs
///
/// The append-only run history, in completion order.
pub async fn list_runs(State(state): State<AppState>) -> HandlerResult<RunListResponse> {
    let history = state.session.history();
    let runs: Vec<RunSummary> = history.iter().map(RunSummary::from).collect();
    let total = runs.len();
    Ok(Json(RunListResponse { runs, total }))
}

/// GET /v1/runs/{run_id}
pub async fn get_run(
    State(state): State<AppState>,
    Path(run_id): Path<u64>,
) -> HandlerResult<SimulationRun> {
    let run = state
        .session
        .run(RunId::new(run_id))
        .ok_or_else(|| AppError::NotFound(format!("run {} not found", run_id)))?;
    Ok(Json(run))
}

// =============================================================================
// Async Job Management
// =============================================================================

/// GET /v1/jobs/{job_id}
///
/// Get the current status and logs of a background job.
pub async fn get_job_status(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> HandlerResult<JobStatusResponse> {
    let job = state
        .job_tracker
        .get_job(&job_id)
        .ok_or_else(|| AppError::NotFound(format!("Job {} not found", job_id)))?;

    Ok(Json(JobStatusResponse {
        job_id: job.job_id,
        status: format!("{:?}", job.status).to_lowercase(),
        logs: job.logs,
        result: job.result,
    }))
}

/// POST /v1/jobs/{job_id}/cancel
///
/// Cancel an in-flight simulation job. A cancelled job records no run.
pub async fn cancel_job(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> HandlerResult<CancelJobResponse> {
    if state.job_tracker.get_job(&job_id).is_none() {
        return Err(AppError::NotFound(format!("Job {} not found", job_id)));
    }
    let cancelled = state.job_tracker.cancel_job(&job_id);
    Ok(Json(CancelJobResponse { job_id, cancelled }))
}

/// GET /v1/jobs/{job_id}/logs
///
/// Stream job logs via Server-Sent Events (SSE).
pub async fn stream_job_logs(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, AppError> {
    // Verify job exists
    if state.job_tracker.get_job(&job_id).is_none() {
        return Err(AppError::NotFound(format!("Job {} not found", job_id)));
    }

    let tracker = state.job_tracker.clone();
    let stream = async_stream::stream! {
        let mut last_log_count = 0;
        loop {
            // Send new logs since last check
            let logs = tracker.get_logs(&job_id);
            for log in logs.iter().skip(last_log_count) {
                let event_data = serde_json::to_string(log).unwrap_or_default();
                yield Ok(Event::default().data(event_data));
            }
            last_log_count = logs.len();

            match tracker.get_job(&job_id) {
                Some(job) if job.status.is_terminal() => {
                    let status = format!("{:?}", job.status).to_lowercase();
                    yield Ok(Event::default().event("status").data(status));
                    break;
                }
                None => break,
                _ => {}
            }
            tokio::time::sleep(Duration::from_millis(200)).await;
        }
    };

    Ok(Sse::new(stream))
}
