//! Design version model and create DTO.
//!
//! Versions are immutable once inserted; there is deliberately no update
//! DTO.

use dve_core::design::{DesignFiles, Placement};
use dve_core::diff::SnapshotView;
use dve_core::types::{DbId, Timestamp, VersionNumber};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

use super::design_asset::DesignAsset;

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// A row from the `design_versions` table.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct DesignVersion {
    pub id: DbId,
    pub asset_id: DbId,
    pub version: VersionNumber,
    pub files: Json<DesignFiles>,
    pub placements: Json<Vec<Placement>>,
    pub palette: Vec<String>,
    pub metadata: serde_json::Value,
    pub created_by: DbId,
    pub created_at: Timestamp,
}

impl DesignVersion {
    /// Borrowed view of the comparable content.
    pub fn snapshot(&self) -> SnapshotView<'_> {
        SnapshotView {
            files: &self.files.0,
            placements: &self.placements.0,
            palette: &self.palette,
            metadata: &self.metadata,
        }
    }
}

// ---------------------------------------------------------------------------
// Create DTO
// ---------------------------------------------------------------------------

/// Input for appending a version. The version number is assigned by the
/// caller from the current maximum.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateDesignVersion {
    pub asset_id: DbId,
    pub files: DesignFiles,
    pub placements: Vec<Placement>,
    #[serde(default)]
    pub palette: Vec<String>,
    #[serde(default = "empty_object")]
    pub metadata: serde_json::Value,
    pub created_by: DbId,
}

fn empty_object() -> serde_json::Value {
    serde_json::Value::Object(Default::default())
}

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// A version together with its owning asset as it stands after the write.
#[derive(Debug, Clone, Serialize)]
pub struct VersionWithAsset {
    #[serde(flatten)]
    pub version: DesignVersion,
    pub asset: DesignAsset,
}
