//! Repository for the `design_events` table.

use dve_core::types::DbId;
use sqlx::PgPool;

use crate::models::event::DesignEventRow;

pub struct DesignEventRepo;

impl DesignEventRepo {
    /// Insert an event, returning its id.
    pub async fn insert(
        pool: &PgPool,
        event_type: &str,
        asset_id: Option<DbId>,
        actor_id: Option<DbId>,
        payload: &serde_json::Value,
    ) -> Result<DbId, sqlx::Error> {
        let row: (DbId,) = sqlx::query_as(
            "INSERT INTO design_events (event_type, asset_id, actor_id, payload) \
             VALUES ($1, $2, $3, $4) RETURNING id",
        )
        .bind(event_type)
        .bind(asset_id)
        .bind(actor_id)
        .bind(payload)
        .fetch_one(pool)
        .await?;
        Ok(row.0)
    }

    /// List events recorded for an asset, newest first.
    pub async fn list_by_asset(
        pool: &PgPool,
        asset_id: DbId,
        limit: i64,
    ) -> Result<Vec<DesignEventRow>, sqlx::Error> {
        sqlx::query_as::<_, DesignEventRow>(
            "SELECT id, event_type, asset_id, actor_id, payload, created_at \
             FROM design_events WHERE asset_id = $1 \
             ORDER BY created_at DESC, id DESC LIMIT $2",
        )
        .bind(asset_id)
        .bind(limit)
        .fetch_all(pool)
        .await
    }
}
