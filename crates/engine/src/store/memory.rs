//! In-process store for tests and database-less tooling.
//!
//! Enforces the same `(asset_id, version)` uniqueness as the
//! `uq_design_versions_asset_version` constraint, so retry behaviour can be
//! exercised without PostgreSQL.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::Utc;
use dve_core::analytics::CollaboratorRecord;
use dve_core::design::AssetStatus;
use dve_core::types::{DbId, VersionNumber};
use dve_db::models::design_asset::{CreateDesignAsset, DesignAsset};
use dve_db::models::design_version::{CreateDesignVersion, DesignVersion};
use sqlx::types::Json;

use super::{CollaborationDirectory, DesignStore, StoreError};

#[derive(Default)]
struct State {
    next_asset_id: DbId,
    next_version_id: DbId,
    assets: BTreeMap<DbId, DesignAsset>,
    versions: BTreeMap<(DbId, VersionNumber), DesignVersion>,
    collaborators: BTreeMap<DbId, Vec<CollaboratorRecord>>,
}

impl State {
    fn insert_asset(&mut self, input: &CreateDesignAsset) -> DesignAsset {
        self.next_asset_id += 1;
        let now = Utc::now();
        let asset = DesignAsset {
            id: self.next_asset_id,
            workspace_id: input.workspace_id,
            brand_id: input.brand_id,
            order_id: input.order_id,
            name: input.name.clone(),
            print_method: input.print_method.as_str().to_string(),
            status: AssetStatus::Draft.as_str().to_string(),
            current_version: 1,
            tags: input.tags.clone(),
            created_by: input.created_by,
            created_at: now,
            updated_at: now,
        };
        self.assets.insert(asset.id, asset.clone());
        asset
    }

    fn insert_version(
        &mut self,
        version: VersionNumber,
        input: &CreateDesignVersion,
    ) -> Result<DesignVersion, StoreError> {
        let key = (input.asset_id, version);
        if self.versions.contains_key(&key) {
            return Err(StoreError::Duplicate {
                asset_id: input.asset_id,
                version,
            });
        }
        self.next_version_id += 1;
        let row = DesignVersion {
            id: self.next_version_id,
            asset_id: input.asset_id,
            version,
            files: Json(input.files.clone()),
            placements: Json(input.placements.clone()),
            palette: input.palette.clone(),
            metadata: input.metadata.clone(),
            created_by: input.created_by,
            created_at: Utc::now(),
        };
        self.versions.insert(key, row.clone());
        Ok(row)
    }
}

/// Store holding everything behind a single mutex.
#[derive(Default)]
pub struct InMemoryDesignStore {
    state: Mutex<State>,
}

impl InMemoryDesignStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a collaborator on an asset.
    pub fn add_collaborator(&self, asset_id: DbId, record: CollaboratorRecord) {
        self.lock()
            .collaborators
            .entry(asset_id)
            .or_default()
            .push(record);
    }

    /// Number of assets stored.
    pub fn asset_count(&self) -> usize {
        self.lock().assets.len()
    }

    /// Number of versions stored across all assets.
    pub fn version_count(&self) -> usize {
        self.lock().versions.len()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl DesignStore for InMemoryDesignStore {
    async fn create_asset(&self, input: &CreateDesignAsset) -> Result<DesignAsset, StoreError> {
        Ok(self.lock().insert_asset(input))
    }

    async fn find_asset(&self, id: DbId) -> Result<Option<DesignAsset>, StoreError> {
        Ok(self.lock().assets.get(&id).cloned())
    }

    async fn create_asset_with_version(
        &self,
        input: &CreateDesignAsset,
        first_version: &CreateDesignVersion,
    ) -> Result<(DesignAsset, DesignVersion), StoreError> {
        let mut state = self.lock();
        let asset = state.insert_asset(input);
        let mut seeded = first_version.clone();
        seeded.asset_id = asset.id;
        match state.insert_version(1, &seeded) {
            Ok(version) => Ok((asset, version)),
            Err(e) => {
                state.assets.remove(&asset.id);
                Err(e)
            }
        }
    }

    async fn advance_current_version(
        &self,
        asset_id: DbId,
        version: VersionNumber,
    ) -> Result<bool, StoreError> {
        let mut state = self.lock();
        match state.assets.get_mut(&asset_id) {
            Some(asset) if asset.current_version < version => {
                asset.current_version = version;
                asset.updated_at = Utc::now();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn max_version(&self, asset_id: DbId) -> Result<Option<VersionNumber>, StoreError> {
        let state = self.lock();
        Ok(state
            .versions
            .range((asset_id, VersionNumber::MIN)..=(asset_id, VersionNumber::MAX))
            .next_back()
            .map(|((_, v), _)| *v))
    }

    async fn insert_version(
        &self,
        version: VersionNumber,
        input: &CreateDesignVersion,
    ) -> Result<DesignVersion, StoreError> {
        self.lock().insert_version(version, input)
    }

    async fn find_version(
        &self,
        asset_id: DbId,
        version: VersionNumber,
    ) -> Result<Option<DesignVersion>, StoreError> {
        Ok(self.lock().versions.get(&(asset_id, version)).cloned())
    }

    async fn list_recent_versions(
        &self,
        asset_id: DbId,
        limit: i64,
    ) -> Result<Vec<DesignVersion>, StoreError> {
        let take = usize::try_from(limit.max(0)).unwrap_or(usize::MAX);
        let state = self.lock();
        Ok(state
            .versions
            .range((asset_id, VersionNumber::MIN)..=(asset_id, VersionNumber::MAX))
            .rev()
            .take(take)
            .map(|(_, v)| v.clone())
            .collect())
    }

    async fn list_history(&self, asset_id: DbId) -> Result<Vec<DesignVersion>, StoreError> {
        let state = self.lock();
        Ok(state
            .versions
            .range((asset_id, VersionNumber::MIN)..=(asset_id, VersionNumber::MAX))
            .map(|(_, v)| v.clone())
            .collect())
    }
}

#[async_trait]
impl CollaborationDirectory for InMemoryDesignStore {
    async fn list_collaborators(
        &self,
        asset_id: DbId,
    ) -> Result<Vec<CollaboratorRecord>, StoreError> {
        Ok(self
            .lock()
            .collaborators
            .get(&asset_id)
            .cloned()
            .unwrap_or_default())
    }
}
