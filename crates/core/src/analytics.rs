//! Version history analytics: creation frequency, quality trend, major
//! changes, and collaborator activity.
//!
//! All functions are pure over an ascending-by-version history so they can
//! be tested without a store.

use serde::{Deserialize, Serialize};

use crate::analysis::ImpactLevel;
use crate::types::{DbId, Timestamp, VersionNumber};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Minimum difference between half-means to count as a trend.
pub const TREND_DELTA: f64 = 0.1;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Direction of attached quality scores across a version history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QualityTrend {
    Improving,
    Declining,
    Stable,
}

/// The subset of a version the aggregator needs.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub version: VersionNumber,
    pub created_at: Timestamp,
    /// Score from the attached analysis, or the default when none was attached.
    pub quality_score: f64,
    pub impact_level: Option<ImpactLevel>,
}

/// A version whose analysis reported a major impact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MajorChange {
    pub version: VersionNumber,
    pub created_at: Timestamp,
}

/// A collaboration record tied to an asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollaboratorRecord {
    pub collaborator_id: DbId,
    pub collaborator_name: String,
    pub permission_level: String,
    pub invited_at: Timestamp,
    pub last_active_at: Option<Timestamp>,
}

/// Activity summary for one collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollaboratorActivity {
    pub collaborator_id: DbId,
    pub collaborator_name: String,
    pub permission_level: String,
    pub last_activity: Timestamp,
}

/// Aggregate analytics over an asset's version history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionAnalytics {
    pub total_versions: usize,
    pub latest_version: VersionNumber,
    /// Versions per day between the first and last version.
    pub creation_frequency: f64,
    pub quality_trend: QualityTrend,
    pub major_changes: Vec<MajorChange>,
    pub collaborator_activity: Vec<CollaboratorActivity>,
}

// ---------------------------------------------------------------------------
// Computation
// ---------------------------------------------------------------------------

/// Summarise an ascending-by-version history. Returns `None` for an empty
/// history.
pub fn compute_analytics(
    history: &[HistoryEntry],
    collaborators: &[CollaboratorRecord],
) -> Option<VersionAnalytics> {
    let first = history.first()?;
    let last = history.last()?;

    let scores: Vec<f64> = history.iter().map(|e| e.quality_score).collect();

    Some(VersionAnalytics {
        total_versions: history.len(),
        latest_version: last.version,
        creation_frequency: creation_frequency(history.len(), first.created_at, last.created_at),
        quality_trend: classify_quality_trend(&scores),
        major_changes: major_changes(history),
        collaborator_activity: collaborator_activity(collaborators),
    })
}

/// `count / max(days(first, last), 1)`, or 0 with fewer than two versions.
///
/// Days are whole days; a history spanning less than a day counts as one.
pub fn creation_frequency(count: usize, first: Timestamp, last: Timestamp) -> f64 {
    if count < 2 {
        return 0.0;
    }
    let days = (last - first).num_days().abs().max(1);
    count as f64 / days as f64
}

/// Split-half classification of quality scores in version order.
///
/// Non-positive scores are dropped. With fewer than two remaining scores the
/// trend is [`QualityTrend::Stable`].
pub fn classify_quality_trend(scores: &[f64]) -> QualityTrend {
    let valid: Vec<f64> = scores.iter().copied().filter(|s| *s > 0.0).collect();
    if valid.len() < 2 {
        return QualityTrend::Stable;
    }

    let (first_half, second_half) = valid.split_at(valid.len() / 2);
    let delta = mean(second_half) - mean(first_half);

    if delta > TREND_DELTA {
        QualityTrend::Improving
    } else if delta < -TREND_DELTA {
        QualityTrend::Declining
    } else {
        QualityTrend::Stable
    }
}

/// Every version after the first whose analysis reported a major impact.
pub fn major_changes(history: &[HistoryEntry]) -> Vec<MajorChange> {
    history
        .iter()
        .skip(1)
        .filter(|e| e.impact_level == Some(ImpactLevel::Major))
        .map(|e| MajorChange {
            version: e.version,
            created_at: e.created_at,
        })
        .collect()
}

/// Collaborators ordered by most recently invited first. Last activity falls
/// back to the invitation time.
pub fn collaborator_activity(records: &[CollaboratorRecord]) -> Vec<CollaboratorActivity> {
    let mut sorted: Vec<&CollaboratorRecord> = records.iter().collect();
    sorted.sort_by(|a, b| b.invited_at.cmp(&a.invited_at));
    sorted
        .into_iter()
        .map(|r| CollaboratorActivity {
            collaborator_id: r.collaborator_id,
            collaborator_name: r.collaborator_name.clone(),
            permission_level: r.permission_level.clone(),
            last_activity: r.last_active_at.unwrap_or(r.invited_at),
        })
        .collect()
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
