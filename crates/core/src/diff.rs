//! Structural comparison of two design version snapshots.
//!
//! [`compute_differences`] is a pure function over two immutable snapshots:
//! file references, placement lists, palettes, and user metadata. Visual
//! similarity and impact analysis come from external collaborators and are
//! attached by the orchestration layer.

use std::collections::HashSet;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::analysis::is_engine_managed_key;
use crate::design::{DesignFiles, Placement};
use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// The status of a key in a key-by-key comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiffStatus {
    Added,
    Removed,
    Changed,
    Unchanged,
}

impl DiffStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Added => "added",
            Self::Removed => "removed",
            Self::Changed => "changed",
            Self::Unchanged => "unchanged",
        }
    }
}

impl std::fmt::Display for DiffStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Category of a detected change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DifferenceType {
    FileChanged,
    PlacementModified,
    PaletteUpdated,
    MetadataChanged,
}

/// Coarse severity of a detected change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Significance {
    Minor,
    Moderate,
    Major,
}

/// Which categories a comparison evaluates.
///
/// | Type        | files + visual | placements | palette | metadata |
/// |-------------|----------------|------------|---------|----------|
/// | `Visual`    | yes            |            |         |          |
/// | `Placement` |                | yes        |         |          |
/// | `Metadata`  |                |            |         | yes      |
/// | `Full`      | yes            | yes        | yes     | yes      |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComparisonType {
    #[default]
    Visual,
    Metadata,
    Placement,
    Full,
}

impl ComparisonType {
    pub fn includes_files(self) -> bool {
        matches!(self, Self::Visual | Self::Full)
    }

    pub fn includes_placements(self) -> bool {
        matches!(self, Self::Placement | Self::Full)
    }

    pub fn includes_palette(self) -> bool {
        matches!(self, Self::Full)
    }

    pub fn includes_metadata(self) -> bool {
        matches!(self, Self::Metadata | Self::Full)
    }

    /// Visual similarity is only estimated for these types.
    pub fn includes_visual(self) -> bool {
        self.includes_files()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Visual => "VISUAL",
            Self::Metadata => "METADATA",
            Self::Placement => "PLACEMENT",
            Self::Full => "FULL",
        }
    }
}

impl FromStr for ComparisonType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "VISUAL" => Ok(Self::Visual),
            "METADATA" => Ok(Self::Metadata),
            "PLACEMENT" => Ok(Self::Placement),
            "FULL" => Ok(Self::Full),
            other => Err(CoreError::Validation(format!(
                "Unknown comparison type '{other}'"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Difference
// ---------------------------------------------------------------------------

/// A single detected change between two versions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionDifference {
    #[serde(rename = "type")]
    pub kind: DifferenceType,
    pub field: String,
    pub old_value: Value,
    pub new_value: Value,
    pub significance: Significance,
    pub description: String,
}

/// Borrowed view over the comparable content of one version.
#[derive(Debug, Clone, Copy)]
pub struct SnapshotView<'a> {
    pub files: &'a DesignFiles,
    pub placements: &'a [Placement],
    pub palette: &'a [String],
    pub metadata: &'a Value,
}

/// Result of comparing two versions of one asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionComparison {
    pub from_version: crate::types::VersionNumber,
    pub to_version: crate::types::VersionNumber,
    pub comparison_type: ComparisonType,
    pub differences: Vec<VersionDifference>,
    /// Only estimated for comparison types that include files.
    pub visual_similarity: Option<f64>,
    pub impact_analysis: Option<crate::analysis::QualityAnalysis>,
}

// ---------------------------------------------------------------------------
// Comparison logic
// ---------------------------------------------------------------------------

/// Compute the structural differences between `from` and `to`.
///
/// Categories are evaluated in a fixed order (files, placements, palette,
/// metadata) and only when `comparison_type` includes them.
pub fn compute_differences(
    from: SnapshotView<'_>,
    to: SnapshotView<'_>,
    comparison_type: ComparisonType,
) -> Vec<VersionDifference> {
    let mut differences = Vec::new();

    if comparison_type.includes_files() {
        differences.extend(compare_files(from.files, to.files));
    }
    if comparison_type.includes_placements() {
        differences.extend(compare_placements(from.placements, to.placements));
    }
    if comparison_type.includes_palette() {
        differences.extend(compare_palettes(from.palette, to.palette));
    }
    if comparison_type.includes_metadata() {
        differences.extend(compare_metadata(from.metadata, to.metadata));
    }

    differences
}

/// Any production-file swap is a major change. References are compared
/// literally.
pub fn compare_files(from: &DesignFiles, to: &DesignFiles) -> Option<VersionDifference> {
    if from.prod_url == to.prod_url {
        return None;
    }
    Some(VersionDifference {
        kind: DifferenceType::FileChanged,
        field: "files.prodUrl".to_string(),
        old_value: Value::String(from.prod_url.clone()),
        new_value: Value::String(to.prod_url.clone()),
        significance: Significance::Major,
        description: "Production file changed".to_string(),
    })
}

/// Only the number of placements is compared; per-placement geometry is not
/// diffed.
pub fn compare_placements(from: &[Placement], to: &[Placement]) -> Option<VersionDifference> {
    if from.len() == to.len() {
        return None;
    }
    Some(VersionDifference {
        kind: DifferenceType::PlacementModified,
        field: "placements".to_string(),
        old_value: serde_json::to_value(from).unwrap_or(Value::Null),
        new_value: serde_json::to_value(to).unwrap_or(Value::Null),
        significance: Significance::Moderate,
        description: format!(
            "Placement count changed from {} to {}",
            from.len(),
            to.len()
        ),
    })
}

/// Palettes are compared as sets. Old/new values carry the full palettes.
pub fn compare_palettes(from: &[String], to: &[String]) -> Option<VersionDifference> {
    let (added, removed) = palette_delta(from, to);
    if added.is_empty() && removed.is_empty() {
        return None;
    }
    Some(VersionDifference {
        kind: DifferenceType::PaletteUpdated,
        field: "palette".to_string(),
        old_value: Value::from(from.to_vec()),
        new_value: Value::from(to.to_vec()),
        significance: Significance::Moderate,
        description: format!(
            "Color palette updated: {} added, {} removed",
            added.len(),
            removed.len()
        ),
    })
}

/// `(to - from, from - to)`, each in order of first appearance and without
/// duplicates.
pub fn palette_delta<'a>(from: &'a [String], to: &'a [String]) -> (Vec<&'a str>, Vec<&'a str>) {
    let from_set: HashSet<&str> = from.iter().map(String::as_str).collect();
    let to_set: HashSet<&str> = to.iter().map(String::as_str).collect();

    let mut seen = HashSet::new();
    let added = to
        .iter()
        .map(String::as_str)
        .filter(|c| !from_set.contains(c) && seen.insert(*c))
        .collect();

    let mut seen = HashSet::new();
    let removed = from
        .iter()
        .map(String::as_str)
        .filter(|c| !to_set.contains(c) && seen.insert(*c))
        .collect();

    (added, removed)
}

/// Compare user metadata key-by-key, sorted by key. Engine-managed keys
/// (analysis, lineage) are skipped.
pub fn compare_metadata(from: &Value, to: &Value) -> Vec<VersionDifference> {
    let empty = serde_json::Map::new();
    let from_obj = from.as_object().unwrap_or(&empty);
    let to_obj = to.as_object().unwrap_or(&empty);

    let mut keys: Vec<&String> = from_obj
        .keys()
        .chain(to_obj.keys())
        .filter(|k| !is_engine_managed_key(k))
        .collect();
    keys.sort();
    keys.dedup();

    keys.into_iter()
        .filter_map(|key| {
            let old = from_obj.get(key);
            let new = to_obj.get(key);
            let status = match (old, new) {
                (Some(a), Some(b)) if a == b => DiffStatus::Unchanged,
                (Some(_), Some(_)) => DiffStatus::Changed,
                (Some(_), None) => DiffStatus::Removed,
                (None, Some(_)) => DiffStatus::Added,
                (None, None) => return None,
            };
            if status == DiffStatus::Unchanged {
                return None;
            }
            Some(VersionDifference {
                kind: DifferenceType::MetadataChanged,
                field: format!("metadata.{key}"),
                old_value: old.cloned().unwrap_or(Value::Null),
                new_value: new.cloned().unwrap_or(Value::Null),
                significance: Significance::Minor,
                description: format!("Metadata '{key}' {status}"),
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
