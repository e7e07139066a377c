use dve_core::analysis::{impact_level_from_metadata, quality_score_from_metadata};
use dve_core::analytics::{compute_analytics, HistoryEntry, VersionAnalytics};
use dve_core::types::DbId;

use super::DesignVersionEngine;
use crate::error::EngineResult;

impl DesignVersionEngine {
    /// Analytics over the full history of an asset, or `None` if it has no
    /// versions.
    pub async fn get_version_analytics(
        &self,
        asset_id: DbId,
    ) -> EngineResult<Option<VersionAnalytics>> {
        let history = self.store.list_history(asset_id).await?;
        if history.is_empty() {
            return Ok(None);
        }

        let entries: Vec<HistoryEntry> = history
            .iter()
            .map(|v| HistoryEntry {
                version: v.version,
                created_at: v.created_at,
                quality_score: quality_score_from_metadata(&v.metadata),
                impact_level: impact_level_from_metadata(&v.metadata),
            })
            .collect();

        let collaborators = self.collaborators.list_collaborators(asset_id).await?;
        let analytics = compute_analytics(&entries, &collaborators);

        if let Some(a) = &analytics {
            tracing::debug!(
                asset_id,
                total_versions = a.total_versions,
                quality_trend = ?a.quality_trend,
                "Version analytics computed"
            );
        }
        Ok(analytics)
    }
}
