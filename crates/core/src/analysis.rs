//! Quality/impact analysis results and the version metadata keys that
//! carry them.
//!
//! The external analyzer's payload is stored verbatim (camelCase) under
//! [`meta_keys::ANALYSIS`] in each version's metadata, so the analytics
//! aggregator can read it back without a separate table.

use serde::{Deserialize, Serialize};

use crate::types::VersionNumber;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Quality score above which a newly created version becomes the asset's
/// active version.
pub const DEFAULT_IMPROVEMENT_THRESHOLD: f64 = 0.8;

/// Quality score assumed for versions created without an analysis.
pub const DEFAULT_QUALITY_SCORE: f64 = 0.5;

/// Well-known keys inside a version's metadata object.
pub mod meta_keys {
    pub const ANALYSIS: &str = "ashleyAnalysis";
    pub const NOTES: &str = "notes";
    pub const TAGS: &str = "tags";
    pub const REVERTED_FROM: &str = "revertedFrom";
    pub const BRANCHED_FROM: &str = "branchedFrom";
    pub const BRANCHED_FROM_VERSION: &str = "branchedFromVersion";
    pub const BRANCH_NAME: &str = "branchName";
}

/// Keys written by the engine itself rather than by users. Excluded from
/// metadata comparison.
pub const ENGINE_MANAGED_KEYS: &[&str] = &[
    meta_keys::ANALYSIS,
    meta_keys::REVERTED_FROM,
    meta_keys::BRANCHED_FROM,
    meta_keys::BRANCHED_FROM_VERSION,
    meta_keys::BRANCH_NAME,
];

/// Returns `true` if `key` is written by the engine.
pub fn is_engine_managed_key(key: &str) -> bool {
    ENGINE_MANAGED_KEYS.contains(&key)
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// How far-reaching a change is, as judged by the analyzer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ImpactLevel {
    Minor,
    Moderate,
    Major,
}

/// Action the analyzer recommends for a version or a set of changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecommendedAction {
    Approve,
    Review,
    Reject,
}

// ---------------------------------------------------------------------------
// Analysis payload
// ---------------------------------------------------------------------------

/// Result returned by the Quality/Impact Analyzer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityAnalysis {
    /// Normalised quality score in `[0, 1]`.
    pub quality_score: f64,
    #[serde(default)]
    pub impact_assessment: String,
    pub recommended_action: RecommendedAction,
    #[serde(default)]
    pub risk_factors: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impact_level: Option<ImpactLevel>,
}

impl QualityAnalysis {
    /// Clamp the score into `[0, 1]`. Analyzer output is not trusted to be
    /// normalised.
    pub fn normalized(mut self) -> Self {
        self.quality_score = if self.quality_score.is_finite() {
            self.quality_score.clamp(0.0, 1.0)
        } else {
            0.0
        };
        self
    }

    /// Whether this analysis should advance the asset's active version.
    pub fn is_improvement(&self, threshold: f64) -> bool {
        self.quality_score > threshold
    }
}

/// Extract the stored analysis from a version's metadata, if present and
/// well-formed.
pub fn analysis_from_metadata(metadata: &serde_json::Value) -> Option<QualityAnalysis> {
    let raw = metadata.get(meta_keys::ANALYSIS)?;
    if raw.is_null() {
        return None;
    }
    serde_json::from_value(raw.clone()).ok()
}

/// Quality score recorded in the metadata, defaulting to
/// [`DEFAULT_QUALITY_SCORE`] when no analysis was attached.
pub fn quality_score_from_metadata(metadata: &serde_json::Value) -> f64 {
    metadata
        .get(meta_keys::ANALYSIS)
        .and_then(|a| a.get("qualityScore"))
        .and_then(serde_json::Value::as_f64)
        .unwrap_or(DEFAULT_QUALITY_SCORE)
}

/// Impact level recorded in the metadata, if any.
pub fn impact_level_from_metadata(metadata: &serde_json::Value) -> Option<ImpactLevel> {
    let raw = metadata.get(meta_keys::ANALYSIS)?.get("impactLevel")?;
    serde_json::from_value(raw.clone()).ok()
}

/// Context sent to the analyzer when a version is created.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionAnalysisContext {
    pub asset_id: crate::types::DbId,
    pub files: crate::design::DesignFiles,
    pub placements: Vec<crate::design::Placement>,
    pub palette: Vec<String>,
    pub previous_version: Option<VersionNumber>,
}

/// Context sent to the analyzer when two versions are compared.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeAnalysisContext {
    pub asset_id: crate::types::DbId,
    pub from_version: VersionNumber,
    pub to_version: VersionNumber,
    pub differences: Vec<crate::diff::VersionDifference>,
    pub visual_similarity: Option<f64>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
