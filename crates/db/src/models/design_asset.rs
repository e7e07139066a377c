//! Design asset model and create DTO.

use dve_core::design::PrintMethod;
use dve_core::types::{DbId, Timestamp, VersionNumber};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// A row from the `design_assets` table.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct DesignAsset {
    pub id: DbId,
    pub workspace_id: DbId,
    pub brand_id: Option<DbId>,
    pub order_id: Option<DbId>,
    pub name: String,
    pub print_method: String,
    pub status: String,
    /// Version considered active. Only advanced by version creation.
    pub current_version: VersionNumber,
    pub tags: Vec<String>,
    pub created_by: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

// ---------------------------------------------------------------------------
// Create DTO
// ---------------------------------------------------------------------------

/// Input for creating a design asset. Status starts as `DRAFT` and the
/// active version as 1.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateDesignAsset {
    pub workspace_id: DbId,
    pub brand_id: Option<DbId>,
    pub order_id: Option<DbId>,
    pub name: String,
    pub print_method: PrintMethod,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_by: DbId,
}
