//! Branch and revert. Both replay an existing version's content. A revert
//! goes through [`DesignVersionEngine::create_version`]; a branch writes a
//! new asset together with its version 1.

use dve_core::branching::{
    branch_asset_name, branch_metadata, revert_metadata, validate_branch_name,
};
use dve_core::design::{validate_asset_name, PrintMethod};
use dve_core::types::{DbId, VersionNumber};
use dve_db::models::design_asset::CreateDesignAsset;
use dve_db::models::design_version::{CreateDesignVersion, DesignVersion, VersionWithAsset};
use dve_events::{event_types, DesignEvent};
use serde_json::{json, Value};

use super::versions::attach_analysis;
use super::{BranchOutcome, DesignVersionEngine};
use crate::error::EngineResult;

impl DesignVersionEngine {
    /// Start a new, independently numbered asset from one version of
    /// `asset_id`.
    ///
    /// The new asset and its version 1 are written in one store call, so a
    /// failed branch leaves nothing behind. The seeded version is analyzed
    /// like any other, but the new asset's active version stays 1.
    pub async fn create_branch(
        &self,
        asset_id: DbId,
        from_version: VersionNumber,
        branch_name: &str,
        created_by: DbId,
    ) -> EngineResult<BranchOutcome> {
        validate_branch_name(branch_name)?;
        let source_asset = self.get_asset(asset_id).await?;
        let source = self.require_version(asset_id, from_version).await?;
        let print_method: PrintMethod = source_asset.print_method.parse()?;

        let asset_input = CreateDesignAsset {
            workspace_id: source_asset.workspace_id,
            brand_id: source_asset.brand_id,
            order_id: source_asset.order_id,
            name: branch_asset_name(&source_asset.name, branch_name),
            print_method,
            tags: source_asset.tags.clone(),
            created_by,
        };
        validate_asset_name(&asset_input.name)?;

        let metadata = branch_metadata(&source.metadata, asset_id, from_version, branch_name);
        // The asset id is assigned by the store.
        let mut seed = replay(&source, DbId::default(), metadata, created_by);
        let analysis = self.analyze_content(asset_id, &seed, None).await;
        seed.metadata = attach_analysis(seed.metadata, analysis.as_ref());

        let (branched_asset, branch_version) = self
            .store
            .create_asset_with_version(&asset_input, &seed)
            .await?;

        tracing::info!(
            source_asset_id = asset_id,
            from_version,
            branched_asset_id = branched_asset.id,
            branch_name,
            "Design branch created"
        );

        self.version_created(&branched_asset, &branch_version, analysis.as_ref());
        self.emit(
            DesignEvent::new(event_types::BRANCH_CREATED, asset_id)
                .with_actor(created_by)
                .with_payload(json!({
                    "fromVersion": from_version,
                    "branchName": branch_name,
                    "branchedAssetId": branched_asset.id,
                    "branchVersionId": branch_version.id,
                })),
        );

        Ok(BranchOutcome {
            branched_asset,
            branch_version,
        })
    }

    /// Append a new version replaying `target_version`'s content. History is
    /// never rewritten.
    pub async fn revert_to_version(
        &self,
        asset_id: DbId,
        target_version: VersionNumber,
        reverted_by: DbId,
    ) -> EngineResult<VersionWithAsset> {
        let target = self.require_version(asset_id, target_version).await?;
        let metadata = revert_metadata(&target.metadata, target_version);
        let created = self
            .create_version(replay(&target, asset_id, metadata, reverted_by))
            .await?;

        tracing::info!(
            asset_id,
            target_version,
            new_version = created.version.version,
            "Design version reverted"
        );

        self.emit(
            DesignEvent::new(event_types::VERSION_REVERTED, asset_id)
                .with_actor(reverted_by)
                .with_payload(json!({
                    "targetVersion": target_version,
                    "newVersion": created.version.version,
                    "versionId": created.version.id,
                })),
        );

        Ok(created)
    }
}

/// Creation input carrying `source`'s files, placements, and palette.
fn replay(
    source: &DesignVersion,
    asset_id: DbId,
    metadata: Value,
    created_by: DbId,
) -> CreateDesignVersion {
    CreateDesignVersion {
        asset_id,
        files: source.files.0.clone(),
        placements: source.placements.0.clone(),
        palette: source.palette.clone(),
        metadata,
        created_by,
    }
}
