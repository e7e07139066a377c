//! PostgreSQL-backed store built on the `dve_db` repositories.

use async_trait::async_trait;
use dve_core::analytics::CollaboratorRecord;
use dve_core::types::{DbId, VersionNumber};
use dve_db::models::design_asset::{CreateDesignAsset, DesignAsset};
use dve_db::models::design_version::{CreateDesignVersion, DesignVersion};
use dve_db::repositories::{
    DesignAssetRepo, DesignCollaboratorRepo, DesignVersionRepo, UQ_ASSET_VERSION,
};
use dve_db::{is_unique_violation, DbPool};

use super::{CollaborationDirectory, DesignStore, StoreError};

/// Store over a shared connection pool. Cheap to clone.
#[derive(Clone)]
pub struct PgDesignStore {
    pool: DbPool,
}

impl PgDesignStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

#[async_trait]
impl DesignStore for PgDesignStore {
    async fn create_asset(&self, input: &CreateDesignAsset) -> Result<DesignAsset, StoreError> {
        Ok(DesignAssetRepo::create(&self.pool, input).await?)
    }

    async fn find_asset(&self, id: DbId) -> Result<Option<DesignAsset>, StoreError> {
        Ok(DesignAssetRepo::find_by_id(&self.pool, id).await?)
    }

    async fn create_asset_with_version(
        &self,
        input: &CreateDesignAsset,
        first_version: &CreateDesignVersion,
    ) -> Result<(DesignAsset, DesignVersion), StoreError> {
        Ok(DesignAssetRepo::create_with_first_version(&self.pool, input, first_version).await?)
    }

    async fn advance_current_version(
        &self,
        asset_id: DbId,
        version: VersionNumber,
    ) -> Result<bool, StoreError> {
        Ok(DesignAssetRepo::advance_current_version(&self.pool, asset_id, version).await?)
    }

    async fn max_version(&self, asset_id: DbId) -> Result<Option<VersionNumber>, StoreError> {
        Ok(DesignVersionRepo::max_version(&self.pool, asset_id).await?)
    }

    async fn insert_version(
        &self,
        version: VersionNumber,
        input: &CreateDesignVersion,
    ) -> Result<DesignVersion, StoreError> {
        DesignVersionRepo::insert(&self.pool, version, input)
            .await
            .map_err(|e| {
                if is_unique_violation(&e, UQ_ASSET_VERSION) {
                    StoreError::Duplicate {
                        asset_id: input.asset_id,
                        version,
                    }
                } else {
                    StoreError::Database(e)
                }
            })
    }

    async fn find_version(
        &self,
        asset_id: DbId,
        version: VersionNumber,
    ) -> Result<Option<DesignVersion>, StoreError> {
        Ok(DesignVersionRepo::find(&self.pool, asset_id, version).await?)
    }

    async fn list_recent_versions(
        &self,
        asset_id: DbId,
        limit: i64,
    ) -> Result<Vec<DesignVersion>, StoreError> {
        Ok(DesignVersionRepo::list_recent(&self.pool, asset_id, limit).await?)
    }

    async fn list_history(&self, asset_id: DbId) -> Result<Vec<DesignVersion>, StoreError> {
        Ok(DesignVersionRepo::list_history(&self.pool, asset_id).await?)
    }
}

#[async_trait]
impl CollaborationDirectory for PgDesignStore {
    async fn list_collaborators(
        &self,
        asset_id: DbId,
    ) -> Result<Vec<CollaboratorRecord>, StoreError> {
        let rows = DesignCollaboratorRepo::list_by_asset(&self.pool, asset_id).await?;
        Ok(rows.into_iter().map(CollaboratorRecord::from).collect())
    }
}
