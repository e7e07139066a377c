//! Collaboration directory model.

use dve_core::analytics::CollaboratorRecord;
use dve_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `design_collaborators` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DesignCollaborator {
    pub id: DbId,
    pub asset_id: DbId,
    pub collaborator_id: DbId,
    pub collaborator_name: String,
    pub permission_level: String,
    pub invited_at: Timestamp,
    pub last_active_at: Option<Timestamp>,
}

impl From<DesignCollaborator> for CollaboratorRecord {
    fn from(row: DesignCollaborator) -> Self {
        Self {
            collaborator_id: row.collaborator_id,
            collaborator_name: row.collaborator_name,
            permission_level: row.permission_level,
            invited_at: row.invited_at,
            last_active_at: row.last_active_at,
        }
    }
}

/// DTO for inviting a collaborator to an asset.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateDesignCollaborator {
    pub asset_id: DbId,
    pub collaborator_id: DbId,
    pub collaborator_name: String,
    pub permission_level: String,
}
