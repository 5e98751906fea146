//! Target resolution with provenance notification.

use serde::{Deserialize, Serialize};

use crate::archive::{ArchiveError, ExoplanetArchive};
use crate::models::Target;

/// Display notice about a resolved target's JWST history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvenanceNotice {
    pub has_jwst_observations: bool,
    pub message: String,
}

/// A resolved target together with its provenance notice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedTarget {
    pub target: Target,
    pub provenance: ProvenanceNotice,
}

/// Resolve a target name through the archive and attach the
/// prior-observation notice shown to the user.
pub async fn resolve_target(
    archive: &dyn ExoplanetArchive,
    name: &str,
) -> Result<ResolvedTarget, ArchiveError> {
    let target = archive.resolve(name).await?;

    let message = if target.has_jwst_observations {
        format!("{} has prior JWST observations", target.host)
    } else {
        format!("{} has no JWST observations on record", target.host)
    };
    log::info!(
        "resolved '{}' as '{}' via {} archive ({})",
        name,
        target.name,
        archive.source_name(),
        message,
    );

    Ok(ResolvedTarget {
        provenance: ProvenanceNotice {
            has_jwst_observations: target.has_jwst_observations,
            message,
        },
        target,
    })
}
