//! Storage seams for the engine.
//!
//! [`DesignStore`] is the durable store of assets and their append-only
//! version log; [`CollaborationDirectory`] is the read-only source of
//! collaborator records. [`PgDesignStore`] backs both with PostgreSQL and
//! [`InMemoryDesignStore`] with process memory.

use async_trait::async_trait;
use dve_core::analytics::CollaboratorRecord;
use dve_core::types::{DbId, VersionNumber};
use dve_db::models::design_asset::{CreateDesignAsset, DesignAsset};
use dve_db::models::design_version::{CreateDesignVersion, DesignVersion};

pub mod memory;
pub mod postgres;

pub use memory::InMemoryDesignStore;
pub use postgres::PgDesignStore;

/// Errors from a [`DesignStore`] or [`CollaborationDirectory`].
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// `(asset_id, version)` is already taken.
    #[error("Version {version} already exists for design asset {asset_id}")]
    Duplicate {
        asset_id: DbId,
        version: VersionNumber,
    },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Durable store of design assets and their version logs.
///
/// Versions are append-only: there is no update or delete. The only
/// mutable asset field reachable through this trait is `current_version`,
/// and it only ever moves forward.
#[async_trait]
pub trait DesignStore: Send + Sync {
    async fn create_asset(&self, input: &CreateDesignAsset) -> Result<DesignAsset, StoreError>;

    async fn find_asset(&self, id: DbId) -> Result<Option<DesignAsset>, StoreError>;

    /// Create an asset and its version 1 atomically. `first_version.asset_id`
    /// is replaced by the new asset's id. On error nothing is persisted.
    async fn create_asset_with_version(
        &self,
        input: &CreateDesignAsset,
        first_version: &CreateDesignVersion,
    ) -> Result<(DesignAsset, DesignVersion), StoreError>;

    /// Move `current_version` to `version` if that is newer. Returns `true`
    /// if the pointer moved.
    async fn advance_current_version(
        &self,
        asset_id: DbId,
        version: VersionNumber,
    ) -> Result<bool, StoreError>;

    async fn max_version(&self, asset_id: DbId) -> Result<Option<VersionNumber>, StoreError>;

    /// Append a version with an explicit number. Fails with
    /// [`StoreError::Duplicate`] if the number is taken.
    async fn insert_version(
        &self,
        version: VersionNumber,
        input: &CreateDesignVersion,
    ) -> Result<DesignVersion, StoreError>;

    async fn find_version(
        &self,
        asset_id: DbId,
        version: VersionNumber,
    ) -> Result<Option<DesignVersion>, StoreError>;

    /// Newest first, at most `limit` rows.
    async fn list_recent_versions(
        &self,
        asset_id: DbId,
        limit: i64,
    ) -> Result<Vec<DesignVersion>, StoreError>;

    /// Full history, oldest first.
    async fn list_history(&self, asset_id: DbId) -> Result<Vec<DesignVersion>, StoreError>;
}

/// Read-only directory of who collaborates on an asset.
#[async_trait]
pub trait CollaborationDirectory: Send + Sync {
    async fn list_collaborators(
        &self,
        asset_id: DbId,
    ) -> Result<Vec<CollaboratorRecord>, StoreError>;
}
