//! Repository for the append-only `design_versions` table.
//!
//! There are no update or delete methods: a persisted version never
//! changes.

use dve_core::types::{DbId, VersionNumber};
use sqlx::types::Json;
use sqlx::{PgExecutor, PgPool};

use crate::models::design_version::{CreateDesignVersion, DesignVersion};

/// Unique constraint arbitrating concurrent creators of the same number.
pub const UQ_ASSET_VERSION: &str = "uq_design_versions_asset_version";

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, asset_id, version, files, placements, palette, \
    metadata, created_by, created_at";

/// Provides append and read operations for design versions.
pub struct DesignVersionRepo;

impl DesignVersionRepo {
    /// Insert a version with an explicit number.
    ///
    /// A concurrent insert of the same `(asset_id, version)` fails with a
    /// unique violation on [`UQ_ASSET_VERSION`]; callers re-read the maximum
    /// and retry.
    pub async fn insert<'e, E>(
        executor: E,
        version: VersionNumber,
        input: &CreateDesignVersion,
    ) -> Result<DesignVersion, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO design_versions
                (asset_id, version, files, placements, palette, metadata, created_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, DesignVersion>(&query)
            .bind(input.asset_id)
            .bind(version)
            .bind(Json(&input.files))
            .bind(Json(&input.placements))
            .bind(&input.palette)
            .bind(&input.metadata)
            .bind(input.created_by)
            .fetch_one(executor)
            .await
    }

    /// Highest version number for an asset, or `None` if it has none.
    pub async fn max_version(
        pool: &PgPool,
        asset_id: DbId,
    ) -> Result<Option<VersionNumber>, sqlx::Error> {
        let row: (Option<VersionNumber>,) =
            sqlx::query_as("SELECT MAX(version) FROM design_versions WHERE asset_id = $1")
                .bind(asset_id)
                .fetch_one(pool)
                .await?;
        Ok(row.0)
    }

    /// Find one version of an asset by number.
    pub async fn find(
        pool: &PgPool,
        asset_id: DbId,
        version: VersionNumber,
    ) -> Result<Option<DesignVersion>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM design_versions WHERE asset_id = $1 AND version = $2"
        );
        sqlx::query_as::<_, DesignVersion>(&query)
            .bind(asset_id)
            .bind(version)
            .fetch_optional(pool)
            .await
    }

    /// List the most recent versions of an asset, newest first.
    pub async fn list_recent(
        pool: &PgPool,
        asset_id: DbId,
        limit: i64,
    ) -> Result<Vec<DesignVersion>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM design_versions
             WHERE asset_id = $1
             ORDER BY version DESC
             LIMIT $2"
        );
        sqlx::query_as::<_, DesignVersion>(&query)
            .bind(asset_id)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// List the full history of an asset, oldest first.
    pub async fn list_history(
        pool: &PgPool,
        asset_id: DbId,
    ) -> Result<Vec<DesignVersion>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM design_versions
             WHERE asset_id = $1
             ORDER BY version ASC"
        );
        sqlx::query_as::<_, DesignVersion>(&query)
            .bind(asset_id)
            .fetch_all(pool)
            .await
    }
}
