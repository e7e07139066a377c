//! Version creation with optimistic-concurrency numbering, and reads.

use dve_core::analysis::{meta_keys, QualityAnalysis, VersionAnalysisContext};
use dve_core::design::validate_version_content;
use dve_core::error::CoreError;
use dve_core::types::{DbId, VersionNumber};
use dve_core::versioning::{next_version_number, resolve_list_limit};
use dve_db::models::design_asset::DesignAsset;
use dve_db::models::design_version::{CreateDesignVersion, DesignVersion, VersionWithAsset};
use dve_events::{event_types, DesignEvent};
use serde_json::{json, Map, Value};

use super::DesignVersionEngine;
use crate::error::{EngineError, EngineResult};
use crate::store::StoreError;

impl DesignVersionEngine {
    /// Append a new version to an asset.
    ///
    /// The number is `max + 1`. A lost race on `(asset_id, version)` is
    /// retried with a freshly read maximum up to `max_create_attempts`
    /// times. The analyzer is consulted once, before the first attempt; if
    /// its score exceeds the improvement threshold the asset's
    /// `current_version` is advanced to the new number.
    pub async fn create_version(
        &self,
        input: CreateDesignVersion,
    ) -> EngineResult<VersionWithAsset> {
        validate_version_content(&input.files, &input.placements)?;
        if !(input.metadata.is_object() || input.metadata.is_null()) {
            return Err(CoreError::Validation("metadata must be a JSON object".to_string()).into());
        }
        let mut asset = self.get_asset(input.asset_id).await?;

        let current_max = self.store.max_version(asset.id).await?;
        let analysis = self.analyze_content(asset.id, &input, current_max).await;

        let mut record = input;
        record.metadata = attach_analysis(record.metadata, analysis.as_ref());

        let version = self.insert_next(&record, current_max).await?;

        let advanced = match &analysis {
            Some(a) if a.is_improvement(self.config.improvement_threshold) => {
                self.store
                    .advance_current_version(asset.id, version.version)
                    .await?
            }
            _ => false,
        };
        if advanced {
            asset.current_version = version.version;
        }

        self.version_created(&asset, &version, analysis.as_ref());
        Ok(VersionWithAsset { version, asset })
    }

    /// Read one version.
    pub async fn get_version(
        &self,
        asset_id: DbId,
        version: VersionNumber,
    ) -> EngineResult<DesignVersion> {
        self.require_version(asset_id, version).await
    }

    /// Most recent versions of an asset, newest first. An asset without
    /// versions (or an unknown asset) yields an empty list.
    pub async fn list_versions(
        &self,
        asset_id: DbId,
        limit: Option<i64>,
    ) -> EngineResult<Vec<DesignVersion>> {
        let limit = resolve_list_limit(limit, self.config.default_list_limit)?;
        Ok(self.store.list_recent_versions(asset_id, limit).await?)
    }

    /// Score the content of a version about to be written. `None` when the
    /// analyzer is disabled, failed, or timed out.
    pub(super) async fn analyze_content(
        &self,
        asset_id: DbId,
        input: &CreateDesignVersion,
        previous_version: Option<VersionNumber>,
    ) -> Option<QualityAnalysis> {
        self.gateway
            .analyze_version(&VersionAnalysisContext {
                asset_id,
                files: input.files.clone(),
                placements: input.placements.clone(),
                palette: input.palette.clone(),
                previous_version,
            })
            .await
    }

    /// Log and publish a newly written version.
    pub(super) fn version_created(
        &self,
        asset: &DesignAsset,
        version: &DesignVersion,
        analysis: Option<&QualityAnalysis>,
    ) {
        tracing::info!(
            asset_id = asset.id,
            version = version.version,
            quality_score = ?analysis.map(|a| a.quality_score),
            current_version = asset.current_version,
            "Design version created"
        );

        self.emit(
            DesignEvent::new(event_types::VERSION_CREATED, asset.id)
                .with_actor(version.created_by)
                .with_payload(json!({
                    "versionId": version.id,
                    "version": version.version,
                    "qualityScore": analysis.map(|a| a.quality_score),
                    "currentVersion": asset.current_version,
                })),
        );
    }

    /// Insert `input` under the next free number.
    ///
    /// The first attempt uses `current_max` as already read by the caller;
    /// later attempts re-read it.
    async fn insert_next(
        &self,
        input: &CreateDesignVersion,
        mut current_max: Option<VersionNumber>,
    ) -> EngineResult<DesignVersion> {
        let attempts = self.config.max_create_attempts;
        for attempt in 1..=attempts {
            if attempt > 1 {
                current_max = self.store.max_version(input.asset_id).await?;
            }
            let number = next_version_number(current_max);
            match self.store.insert_version(number, input).await {
                Ok(version) => return Ok(version),
                Err(StoreError::Duplicate { .. }) => {
                    tracing::warn!(
                        asset_id = input.asset_id,
                        version = number,
                        attempt,
                        "Version number already taken, retrying"
                    );
                }
                Err(e) => return Err(e.into()),
            }
        }
        Err(EngineError::ConcurrencyConflict {
            asset_id: input.asset_id,
            attempts,
        })
    }
}

/// Store the analysis (or `null`) under its metadata key.
pub(super) fn attach_analysis(metadata: Value, analysis: Option<&QualityAnalysis>) -> Value {
    let mut map = match metadata {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    let stored = analysis
        .and_then(|a| serde_json::to_value(a).ok())
        .unwrap_or(Value::Null);
    map.insert(meta_keys::ANALYSIS.to_string(), stored);
    Value::Object(map)
}
