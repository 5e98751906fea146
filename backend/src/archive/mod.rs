//! Exoplanet archive backends.
//!
//! The archive is the read-only service that turns a target name into a
//! [`Target`] record. Two backends exist: the bundled catalog files
//! (default) and the live NASA Exoplanet Archive behind the `nea-archive`
//! feature.

#[cfg(feature = "bundled-catalog")]
pub mod bundled;
#[cfg(feature = "nea-archive")]
pub mod nea;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::AppConfig;
use crate::models::Target;

/// Error type for target resolution.
#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    /// No catalog entry matches the requested name.
    #[error("target '{0}' not found in the archive")]
    NotFound(String),

    /// The name matches several distinct planets; the caller must pick one.
    #[error("target name '{name}' is ambiguous: {}", candidates.join(", "))]
    Ambiguous {
        name: String,
        candidates: Vec<String>,
    },

    /// The archive service failed or was unreachable.
    #[error("archive service failure: {0}")]
    Service(String),
}

/// Read-only exoplanet archive interface.
#[async_trait]
pub trait ExoplanetArchive: Send + Sync {
    /// Short backend name for logs and the health endpoint.
    fn source_name(&self) -> &'static str;

    /// Resolve a target name or alias into a full target record.
    async fn resolve(&self, name: &str) -> Result<Target, ArchiveError>;

    /// Whether the backend is currently usable.
    async fn health(&self) -> bool {
        true
    }
}

/// Create the archive backend selected by the configuration.
pub fn create_archive(config: &AppConfig) -> anyhow::Result<Arc<dyn ExoplanetArchive>> {
    match config.archive.backend.as_str() {
        #[cfg(feature = "bundled-catalog")]
        "bundled" => {
            let archive = bundled::BundledArchive::from_dir(&config.archive.data_dir)?;
            Ok(Arc::new(archive))
        }
        #[cfg(not(feature = "bundled-catalog"))]
        "bundled" => anyhow::bail!("bundled-catalog feature not enabled"),
        #[cfg(feature = "nea-archive")]
        "nea" => {
            use crate::catalog::programs;

            let mut archive = nea::NeaArchiveClient::new(&config.services)?;
            let programs_path = config.archive.data_dir.join("jwst_programs.csv");
            if programs_path.exists() {
                match programs::load_programs(&programs_path) {
                    Ok(table) => {
                        archive = archive.with_jwst_hosts(programs::jwst_hosts(&table));
                    }
                    Err(e) => log::warn!("could not load JWST program table: {}", e),
                }
            }
            Ok(Arc::new(archive))
        }
        #[cfg(not(feature = "nea-archive"))]
        "nea" => anyhow::bail!("nea-archive feature not enabled"),
        other => anyhow::bail!("unknown archive backend '{}'", other),
    }
}
