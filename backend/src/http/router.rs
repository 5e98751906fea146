//! Router configuration for the HTTP API.
//!
//! This module sets up all routes, middleware (CORS, compression, tracing),
//! and creates the axum router ready for serving.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration - permissive for development, should be restricted in production
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build the API router with versioned endpoints
    let api_v1 = Router::new()
        // Target resolution
        .route("/targets/{name}", get(handlers::resolve_target))
        .route("/targets/{name}/sky-view", get(handlers::sky_view))
        // Session and scene configuration
        .route("/session", get(handlers::get_session))
        .route("/scene/target", put(handlers::set_target))
        .route("/scene/sed", put(handlers::set_sed))
        .route("/scene/observation", put(handlers::set_observation))
        .route("/scene/duration", put(handlers::set_duration))
        .route("/scene/spectrum", post(handlers::upload_spectrum))
        .route("/spectra", get(handlers::list_spectra))
        // Instrument configuration
        .route("/instrument", put(handlers::set_instrument))
        .route("/instrument/match-integrations", post(handlers::match_integrations))
        .route("/instrument/saturation", get(handlers::get_saturation))
        // Simulation runs
        .route("/runs", post(handlers::start_run))
        .route("/runs", get(handlers::list_runs))
        .route("/runs/{run_id}", get(handlers::get_run))
        // Job management
        .route("/jobs/{job_id}", get(handlers::get_job_status))
        .route("/jobs/{job_id}/logs", get(handlers::stream_job_logs))
        .route("/jobs/{job_id}/cancel", post(handlers::cancel_job));

    // Combine all routes
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/v1", api_v1)
        // Allow sizable model-spectrum uploads.
        .layer(DefaultBodyLimit::max(8 * 1024 * 1024))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
