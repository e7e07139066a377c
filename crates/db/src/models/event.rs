//! Persisted design event model.

use dve_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `design_events` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DesignEventRow {
    pub id: DbId,
    pub event_type: String,
    pub asset_id: Option<DbId>,
    pub actor_id: Option<DbId>,
    pub payload: serde_json::Value,
    pub created_at: Timestamp,
}
