//! Repository for the `design_assets` table.

use dve_core::types::{DbId, VersionNumber};
use sqlx::{PgExecutor, PgPool};

use crate::models::design_asset::{CreateDesignAsset, DesignAsset};
use crate::models::design_version::{CreateDesignVersion, DesignVersion};
use crate::repositories::DesignVersionRepo;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, workspace_id, brand_id, order_id, name, print_method, \
    status, current_version, tags, created_by, created_at, updated_at";

/// Provides create/read operations for design assets and the single
/// mutable field, `current_version`.
pub struct DesignAssetRepo;

impl DesignAssetRepo {
    /// Insert a new design asset with status `DRAFT` and active version 1.
    pub async fn create<'e, E>(
        executor: E,
        input: &CreateDesignAsset,
    ) -> Result<DesignAsset, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO design_assets
                (workspace_id, brand_id, order_id, name, print_method, tags, created_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, DesignAsset>(&query)
            .bind(input.workspace_id)
            .bind(input.brand_id)
            .bind(input.order_id)
            .bind(&input.name)
            .bind(input.print_method.as_str())
            .bind(&input.tags)
            .bind(input.created_by)
            .fetch_one(executor)
            .await
    }

    /// Insert a new asset together with its version 1 in one transaction.
    ///
    /// `first_version.asset_id` is ignored; the version is attached to the
    /// asset created here. Either both rows are committed or neither is.
    pub async fn create_with_first_version(
        pool: &PgPool,
        input: &CreateDesignAsset,
        first_version: &CreateDesignVersion,
    ) -> Result<(DesignAsset, DesignVersion), sqlx::Error> {
        let mut tx = pool.begin().await?;

        let asset = Self::create(&mut *tx, input).await?;

        let mut seeded = first_version.clone();
        seeded.asset_id = asset.id;
        let version = DesignVersionRepo::insert(&mut *tx, 1, &seeded).await?;

        tx.commit().await?;
        Ok((asset, version))
    }

    /// Find a design asset by its primary key.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<DesignAsset>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM design_assets WHERE id = $1");
        sqlx::query_as::<_, DesignAsset>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Advance `current_version` to `version` if it is newer than the value
    /// already stored.
    ///
    /// Returns `true` if the pointer moved.
    pub async fn advance_current_version(
        pool: &PgPool,
        id: DbId,
        version: VersionNumber,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE design_assets SET current_version = $2, updated_at = NOW() \
             WHERE id = $1 AND current_version < $2",
        )
        .bind(id)
        .bind(version)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
