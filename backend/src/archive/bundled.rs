//! Archive backend over the bundled catalog files.

use std::path::Path;

use async_trait::async_trait;

use super::{ArchiveError, ExoplanetArchive};
use crate::catalog::Catalog;
use crate::models::Target;

/// Offline archive backed by the catalog shipped under `data/`.
pub struct BundledArchive {
    catalog: Catalog,
}

impl BundledArchive {
    /// Load the catalog files from a data directory.
    pub fn from_dir(data_dir: &Path) -> anyhow::Result<Self> {
        let catalog = Catalog::load(data_dir)?;
        Ok(Self { catalog })
    }

    /// Wrap an already-built catalog (used by tests).
    pub fn from_catalog(catalog: Catalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }
}

#[async_trait]
impl ExoplanetArchive for BundledArchive {
    fn source_name(&self) -> &'static str {
        "bundled"
    }

    async fn resolve(&self, name: &str) -> Result<Target, ArchiveError> {
        self.catalog.lookup(name).map(Target::clone)
    }

    async fn health(&self) -> bool {
        !self.catalog.is_empty()
    }
}
