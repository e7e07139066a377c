//! The design version engine: orchestration over the store, the quality
//! gateway, and the event publisher.
//!
//! Operations are split by concern:
//!
//! - [`versions`]: create, get, and list versions
//! - [`comparison`]: compare two versions
//! - [`branching`]: branch and revert
//! - [`analytics`]: history analytics

use std::sync::Arc;

use dve_core::design::validate_asset_name;
use dve_core::error::CoreError;
use dve_core::types::{DbId, VersionNumber};
use dve_core::versioning::validate_version_number;
use dve_db::models::design_asset::{CreateDesignAsset, DesignAsset};
use dve_db::models::design_version::DesignVersion;
use dve_events::{DesignEvent, EventPublisher};
use serde::Serialize;

use crate::config::EngineConfig;
use crate::error::EngineResult;
use crate::gateway::QualityGateway;
use crate::store::{CollaborationDirectory, DesignStore};

mod analytics;
mod branching;
mod comparison;
mod versions;

/// Result of [`DesignVersionEngine::create_branch`].
#[derive(Debug, Clone, Serialize)]
pub struct BranchOutcome {
    /// The newly created asset, with `current_version = 1`.
    pub branched_asset: DesignAsset,
    /// Version 1 of the new asset.
    pub branch_version: DesignVersion,
}

/// Entry point for every version-control operation.
///
/// Cheap to share behind an `Arc`; all collaborators are trait objects so
/// tests can substitute in-memory and stub implementations.
pub struct DesignVersionEngine {
    store: Arc<dyn DesignStore>,
    collaborators: Arc<dyn CollaborationDirectory>,
    gateway: QualityGateway,
    events: Arc<dyn EventPublisher>,
    config: EngineConfig,
}

impl DesignVersionEngine {
    pub fn new(
        store: Arc<dyn DesignStore>,
        collaborators: Arc<dyn CollaborationDirectory>,
        gateway: QualityGateway,
        events: Arc<dyn EventPublisher>,
        config: EngineConfig,
    ) -> Self {
        Self {
            store,
            collaborators,
            gateway,
            events,
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Create a design asset in `DRAFT` with active version 1.
    pub async fn create_asset(&self, input: CreateDesignAsset) -> EngineResult<DesignAsset> {
        validate_asset_name(&input.name)?;
        let asset = self.store.create_asset(&input).await?;
        tracing::info!(
            asset_id = asset.id,
            workspace_id = asset.workspace_id,
            name = %asset.name,
            "Design asset created"
        );
        Ok(asset)
    }

    pub async fn get_asset(&self, asset_id: DbId) -> EngineResult<DesignAsset> {
        self.store.find_asset(asset_id).await?.ok_or_else(|| {
            CoreError::NotFound {
                entity: "DesignAsset",
                id: asset_id,
            }
            .into()
        })
    }

    /// Load a version or fail with `VersionNotFound`.
    async fn require_version(
        &self,
        asset_id: DbId,
        version: VersionNumber,
    ) -> EngineResult<DesignVersion> {
        validate_version_number(version)?;
        self.store
            .find_version(asset_id, version)
            .await?
            .ok_or_else(|| CoreError::VersionNotFound { asset_id, version }.into())
    }

    fn emit(&self, event: DesignEvent) {
        tracing::debug!(event_type = %event.event_type, asset_id = event.asset_id, "Publishing event");
        self.events.publish(event);
    }
}
