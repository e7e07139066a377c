//! Integration tests for the design asset/version repositories.
//!
//! Exercises the repositories against a real PostgreSQL database:
//! - Sequential inserts produce versions 1, 2, 3
//! - An asset and its version 1 can be created in one transaction
//! - A duplicate `(asset_id, version)` is reported as a unique violation
//! - `list_recent` orders newest first and honours the limit
//! - `advance_current_version` only moves the pointer forward
//! - Collaborators list most recently invited first
//!
//! Requires `DATABASE_URL`; run with `cargo test -p dve-db -- --ignored`.

use dve_core::design::{DesignFiles, Placement, PrintArea, PrintMethod};
use dve_core::versioning::next_version_number;
use dve_db::is_unique_violation;
use dve_db::models::collaborator::CreateDesignCollaborator;
use dve_db::models::design_asset::CreateDesignAsset;
use dve_db::models::design_version::CreateDesignVersion;
use dve_db::repositories::{
    DesignAssetRepo, DesignCollaboratorRepo, DesignEventRepo, DesignVersionRepo, UQ_ASSET_VERSION,
};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_asset(name: &str) -> CreateDesignAsset {
    CreateDesignAsset {
        workspace_id: 1,
        brand_id: Some(7),
        order_id: Some(42),
        name: name.to_string(),
        print_method: PrintMethod::ScreenPrint,
        tags: vec!["summer".to_string()],
        created_by: 100,
    }
}

fn new_version(asset_id: i64, prod_url: &str) -> CreateDesignVersion {
    CreateDesignVersion {
        asset_id,
        files: DesignFiles::production(prod_url),
        placements: vec![Placement::new(PrintArea::Front, 30.0, 40.0)],
        palette: vec!["PMS 186 C".to_string(), "Black".to_string()],
        metadata: serde_json::json!({"notes": "initial"}),
        created_by: 100,
    }
}

async fn append(pool: &PgPool, asset_id: i64, prod_url: &str) -> i32 {
    let max = DesignVersionRepo::max_version(pool, asset_id).await.unwrap();
    let version = DesignVersionRepo::insert(pool, next_version_number(max), &new_version(asset_id, prod_url))
        .await
        .unwrap();
    version.version
}

// ---------------------------------------------------------------------------
// Test: sequential inserts are numbered without gaps
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn test_sequential_version_numbers(pool: PgPool) {
    let asset = DesignAssetRepo::create(&pool, &new_asset("Tee")).await.unwrap();
    assert_eq!(asset.status, "DRAFT");
    assert_eq!(asset.current_version, 1);
    assert_eq!(asset.print_method, "SCREEN_PRINT");

    assert_eq!(DesignVersionRepo::max_version(&pool, asset.id).await.unwrap(), None);
    for expected in 1..=3 {
        assert_eq!(append(&pool, asset.id, &format!("prod-{expected}.png")).await, expected);
    }

    let v2 = DesignVersionRepo::find(&pool, asset.id, 2).await.unwrap().unwrap();
    assert_eq!(v2.files.prod_url, "prod-2.png");
    assert_eq!(v2.placements.len(), 1);
    assert_eq!(v2.palette, vec!["PMS 186 C", "Black"]);
    assert_eq!(v2.metadata["notes"], "initial");
}

// ---------------------------------------------------------------------------
// Test: duplicate numbers are rejected by the unique constraint
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn test_duplicate_version_is_unique_violation(pool: PgPool) {
    let asset = DesignAssetRepo::create(&pool, &new_asset("Hoodie")).await.unwrap();
    DesignVersionRepo::insert(&pool, 1, &new_version(asset.id, "a.png"))
        .await
        .unwrap();

    let err = DesignVersionRepo::insert(&pool, 1, &new_version(asset.id, "b.png"))
        .await
        .unwrap_err();
    assert!(is_unique_violation(&err, UQ_ASSET_VERSION));

    let kept = DesignVersionRepo::find(&pool, asset.id, 1).await.unwrap().unwrap();
    assert_eq!(kept.files.prod_url, "a.png", "the first write must win");
}

// ---------------------------------------------------------------------------
// Test: asset and first version are written together
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn test_create_with_first_version(pool: PgPool) {
    let (asset, version) = DesignAssetRepo::create_with_first_version(
        &pool,
        &new_asset("Tee - Navy"),
        &new_version(0, "navy.png"),
    )
    .await
    .unwrap();

    assert_eq!(asset.current_version, 1);
    assert_eq!(version.asset_id, asset.id);
    assert_eq!(version.version, 1);

    let stored = DesignVersionRepo::find(&pool, asset.id, 1).await.unwrap().unwrap();
    assert_eq!(stored.files.prod_url, "navy.png");
    assert_eq!(DesignVersionRepo::max_version(&pool, asset.id).await.unwrap(), Some(1));
}

// ---------------------------------------------------------------------------
// Test: listing order and limit
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn test_list_recent_and_history(pool: PgPool) {
    let asset = DesignAssetRepo::create(&pool, &new_asset("Cap")).await.unwrap();
    for i in 0..4 {
        append(&pool, asset.id, &format!("cap-{i}.png")).await;
    }

    let recent = DesignVersionRepo::list_recent(&pool, asset.id, 2).await.unwrap();
    let numbers: Vec<i32> = recent.iter().map(|v| v.version).collect();
    assert_eq!(numbers, vec![4, 3]);

    let history = DesignVersionRepo::list_history(&pool, asset.id).await.unwrap();
    let numbers: Vec<i32> = history.iter().map(|v| v.version).collect();
    assert_eq!(numbers, vec![1, 2, 3, 4]);
}

// ---------------------------------------------------------------------------
// Test: the active-version pointer only moves forward
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn test_advance_current_version(pool: PgPool) {
    let asset = DesignAssetRepo::create(&pool, &new_asset("Tote")).await.unwrap();

    assert!(DesignAssetRepo::advance_current_version(&pool, asset.id, 3).await.unwrap());
    assert!(!DesignAssetRepo::advance_current_version(&pool, asset.id, 2).await.unwrap());

    let reloaded = DesignAssetRepo::find_by_id(&pool, asset.id).await.unwrap().unwrap();
    assert_eq!(reloaded.current_version, 3);
}

// ---------------------------------------------------------------------------
// Test: collaborators and events
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn test_collaborators_and_events(pool: PgPool) {
    let asset = DesignAssetRepo::create(&pool, &new_asset("Jersey")).await.unwrap();

    for (id, name) in [(1, "Ana"), (2, "Bo")] {
        DesignCollaboratorRepo::create(
            &pool,
            &CreateDesignCollaborator {
                asset_id: asset.id,
                collaborator_id: id,
                collaborator_name: name.to_string(),
                permission_level: "EDIT".to_string(),
            },
        )
        .await
        .unwrap();
    }
    let collaborators = DesignCollaboratorRepo::list_by_asset(&pool, asset.id).await.unwrap();
    assert_eq!(collaborators.len(), 2);
    assert_eq!(collaborators[0].collaborator_name, "Bo");

    let payload = serde_json::json!({"version": 1});
    let id = DesignEventRepo::insert(&pool, "design_version.created", Some(asset.id), Some(100), &payload)
        .await
        .unwrap();
    assert!(id > 0);
    let events = DesignEventRepo::list_by_asset(&pool, asset.id, 10).await.unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event_type, "design_version.created");
}
