//! History analytics through the engine.

mod common;

use std::sync::Arc;

use chrono::{Duration, Utc};
use common::*;
use dve_core::analysis::ImpactLevel;
use dve_core::analytics::{CollaboratorRecord, QualityTrend};
use dve_engine::EngineConfig;

#[tokio::test]
async fn asset_without_versions_has_no_analytics() {
    let h = harness();
    let asset = seed_asset(&h.engine, "Crest").await;
    assert!(h.engine.get_version_analytics(asset.id).await.unwrap().is_none());
}

#[tokio::test]
async fn improving_scores_and_major_changes() {
    let h = harness_with(
        ScriptedAnalyzer::new([
            (0.5, Some(ImpactLevel::Major)),
            (0.6, Some(ImpactLevel::Minor)),
            (0.7, Some(ImpactLevel::Major)),
            (0.9, None),
        ]),
        Arc::new(FixedSimilarity::new(0.7)),
        EngineConfig::default(),
    );
    let asset = seed_asset(&h.engine, "Crest").await;
    for i in 0..4 {
        h.engine
            .create_version(version_input(asset.id, &format!("s3://art/{i}.png"), &[]))
            .await
            .unwrap();
    }

    let analytics = h.engine.get_version_analytics(asset.id).await.unwrap().unwrap();
    assert_eq!(analytics.total_versions, 4);
    assert_eq!(analytics.latest_version, 4);
    assert_eq!(analytics.quality_trend, QualityTrend::Improving);
    // All created within the same day.
    assert_eq!(analytics.creation_frequency, 4.0);

    let majors: Vec<_> = analytics.major_changes.iter().map(|m| m.version).collect();
    assert_eq!(majors, vec![3]);
}

#[tokio::test]
async fn declining_scores() {
    let h = harness_with(
        ScriptedAnalyzer::scores(&[0.9, 0.7, 0.6, 0.5]),
        Arc::new(FixedSimilarity::new(0.7)),
        EngineConfig::default(),
    );
    let asset = seed_asset(&h.engine, "Crest").await;
    for i in 0..4 {
        h.engine
            .create_version(version_input(asset.id, &format!("s3://art/{i}.png"), &[]))
            .await
            .unwrap();
    }

    let analytics = h.engine.get_version_analytics(asset.id).await.unwrap().unwrap();
    assert_eq!(analytics.quality_trend, QualityTrend::Declining);
}

#[tokio::test]
async fn missing_analyses_default_to_stable() {
    let h = harness();
    let asset = seed_asset(&h.engine, "Crest").await;
    for i in 0..3 {
        h.engine
            .create_version(version_input(asset.id, &format!("s3://art/{i}.png"), &[]))
            .await
            .unwrap();
    }

    let analytics = h.engine.get_version_analytics(asset.id).await.unwrap().unwrap();
    assert_eq!(analytics.quality_trend, QualityTrend::Stable);
    assert!(analytics.major_changes.is_empty());
}

#[tokio::test]
async fn single_version_has_zero_frequency() {
    let h = harness();
    let asset = seed_asset(&h.engine, "Crest").await;
    h.engine
        .create_version(version_input(asset.id, "s3://art/a.png", &[]))
        .await
        .unwrap();

    let analytics = h.engine.get_version_analytics(asset.id).await.unwrap().unwrap();
    assert_eq!(analytics.total_versions, 1);
    assert_eq!(analytics.creation_frequency, 0.0);
    assert_eq!(analytics.quality_trend, QualityTrend::Stable);
}

#[tokio::test]
async fn collaborators_most_recently_invited_first() {
    let h = harness();
    let asset = seed_asset(&h.engine, "Crest").await;
    h.engine
        .create_version(version_input(asset.id, "s3://art/a.png", &[]))
        .await
        .unwrap();

    let now = Utc::now();
    h.store.add_collaborator(
        asset.id,
        CollaboratorRecord {
            collaborator_id: 31,
            collaborator_name: "Ana".to_string(),
            permission_level: "EDIT".to_string(),
            invited_at: now - Duration::days(10),
            last_active_at: Some(now - Duration::days(1)),
        },
    );
    h.store.add_collaborator(
        asset.id,
        CollaboratorRecord {
            collaborator_id: 32,
            collaborator_name: "Bo".to_string(),
            permission_level: "VIEW".to_string(),
            invited_at: now - Duration::days(2),
            last_active_at: None,
        },
    );

    let analytics = h.engine.get_version_analytics(asset.id).await.unwrap().unwrap();
    let activity = &analytics.collaborator_activity;
    assert_eq!(activity.len(), 2);
    assert_eq!(activity[0].collaborator_id, 32);
    assert_eq!(activity[0].last_activity, now - Duration::days(2));
    assert_eq!(activity[1].collaborator_id, 31);
    assert_eq!(activity[1].last_activity, now - Duration::days(1));
}
