use dve_core::analysis::ChangeAnalysisContext;
use dve_core::diff::{compute_differences, ComparisonType, VersionComparison};
use dve_core::types::{DbId, VersionNumber};
use dve_events::{event_types, DesignEvent};
use serde_json::json;

use super::DesignVersionEngine;
use crate::error::EngineResult;

impl DesignVersionEngine {
    /// Compare two versions of one asset.
    ///
    /// The structural differences are deterministic. Visual similarity and
    /// impact analysis come from the gateway and degrade to 0.5 and `None`.
    pub async fn compare_versions(
        &self,
        asset_id: DbId,
        from_version: VersionNumber,
        to_version: VersionNumber,
        comparison_type: ComparisonType,
    ) -> EngineResult<VersionComparison> {
        let from = self.require_version(asset_id, from_version).await?;
        let to = self.require_version(asset_id, to_version).await?;

        let differences = compute_differences(from.snapshot(), to.snapshot(), comparison_type);

        let visual_similarity = if comparison_type.includes_visual() {
            Some(
                self.gateway
                    .estimate_similarity(&from.files.prod_url, &to.files.prod_url)
                    .await,
            )
        } else {
            None
        };

        let impact_analysis = self
            .gateway
            .analyze_changes(&ChangeAnalysisContext {
                asset_id,
                from_version,
                to_version,
                differences: differences.clone(),
                visual_similarity,
            })
            .await;

        tracing::debug!(
            asset_id,
            from_version,
            to_version,
            comparison_type = comparison_type.as_str(),
            differences = differences.len(),
            ?visual_similarity,
            "Versions compared"
        );

        self.emit(
            DesignEvent::new(event_types::VERSIONS_COMPARED, asset_id).with_payload(json!({
                "fromVersion": from_version,
                "toVersion": to_version,
                "comparisonType": comparison_type,
                "differenceCount": differences.len(),
                "visualSimilarity": visual_similarity,
                "recommendedAction": impact_analysis.as_ref().map(|a| a.recommended_action),
            })),
        );

        Ok(VersionComparison {
            from_version,
            to_version,
            comparison_type,
            differences,
            visual_similarity,
            impact_analysis,
        })
    }
}
