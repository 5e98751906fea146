//! Application state for the HTTP server.

use std::sync::Arc;

use crate::archive::ExoplanetArchive;
use crate::calculator::RadiometricCalculator;
use crate::config::AppConfig;
use crate::services::job_tracker::JobTracker;
use crate::session::Session;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// The single interactive planning session
    pub session: Session,
    /// Exoplanet archive backend
    pub archive: Arc<dyn ExoplanetArchive>,
    /// Radiometric calculator backend
    pub calculator: Arc<dyn RadiometricCalculator>,
    /// Background job tracker for simulations
    pub job_tracker: JobTracker,
    /// Application configuration
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Create a new application state with the given backends.
    pub fn new(
        archive: Arc<dyn ExoplanetArchive>,
        calculator: Arc<dyn RadiometricCalculator>,
        config: AppConfig,
    ) -> Self {
        Self {
            session: Session::new(),
            archive,
            calculator,
            job_tracker: JobTracker::new(),
            config: Arc::new(config),
        }
    }
}
