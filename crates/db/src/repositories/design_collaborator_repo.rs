//! Repository for the `design_collaborators` table.

use dve_core::types::DbId;
use sqlx::PgPool;

use crate::models::collaborator::{CreateDesignCollaborator, DesignCollaborator};

const COLUMNS: &str = "id, asset_id, collaborator_id, collaborator_name, \
    permission_level, invited_at, last_active_at";

/// Read access to the collaboration directory, plus invites for seeding.
pub struct DesignCollaboratorRepo;

impl DesignCollaboratorRepo {
    /// Invite a collaborator to an asset.
    pub async fn create(
        pool: &PgPool,
        input: &CreateDesignCollaborator,
    ) -> Result<DesignCollaborator, sqlx::Error> {
        let query = format!(
            "INSERT INTO design_collaborators
                (asset_id, collaborator_id, collaborator_name, permission_level)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, DesignCollaborator>(&query)
            .bind(input.asset_id)
            .bind(input.collaborator_id)
            .bind(&input.collaborator_name)
            .bind(&input.permission_level)
            .fetch_one(pool)
            .await
    }

    /// List collaborators on an asset, most recently invited first.
    pub async fn list_by_asset(
        pool: &PgPool,
        asset_id: DbId,
    ) -> Result<Vec<DesignCollaborator>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM design_collaborators
             WHERE asset_id = $1
             ORDER BY invited_at DESC, id DESC"
        );
        sqlx::query_as::<_, DesignCollaborator>(&query)
            .bind(asset_id)
            .fetch_all(pool)
            .await
    }
}
