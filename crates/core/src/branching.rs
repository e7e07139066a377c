//! Branch and revert helpers: name validation, derived asset names, and the
//! lineage metadata written onto seeded versions.
//!
//! A branch is a brand-new asset whose version 1 replays one version of the
//! source asset. The back-reference lives only in that version's metadata
//! and is never used for cascading behaviour.

use serde_json::{Map, Value};

use crate::analysis::{is_engine_managed_key, meta_keys};
use crate::error::CoreError;
use crate::types::{DbId, VersionNumber};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Maximum allowed length for a branch name.
pub const MAX_BRANCH_NAME_LENGTH: usize = 100;

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a branch name: must be non-empty, trimmed, and within
/// [`MAX_BRANCH_NAME_LENGTH`].
pub fn validate_branch_name(name: &str) -> Result<(), CoreError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(
            "Branch name must not be empty".to_string(),
        ));
    }
    if trimmed.len() != name.len() {
        return Err(CoreError::Validation(
            "Branch name must not have leading or trailing whitespace".to_string(),
        ));
    }
    if name.len() > MAX_BRANCH_NAME_LENGTH {
        return Err(CoreError::Validation(format!(
            "Branch name must not exceed {MAX_BRANCH_NAME_LENGTH} characters, got {}",
            name.len()
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Derived values
// ---------------------------------------------------------------------------

/// Name of the asset created by a branch: `"<original> - <branch>"`.
pub fn branch_asset_name(original_name: &str, branch_name: &str) -> String {
    format!("{original_name} - {branch_name}")
}

/// Copy `source` metadata without any engine-managed key. The analysis is
/// replaced when the new version is created, and lineage keys describe only
/// the version that carries them.
fn carried_metadata(source: &Value) -> Map<String, Value> {
    let mut map = source.as_object().cloned().unwrap_or_default();
    map.retain(|key, _| !is_engine_managed_key(key));
    map
}

/// Metadata for version 1 of a branched asset.
pub fn branch_metadata(
    source: &Value,
    source_asset_id: DbId,
    source_version: VersionNumber,
    branch_name: &str,
) -> Value {
    let mut map = carried_metadata(source);
    map.insert(meta_keys::BRANCHED_FROM.into(), Value::from(source_asset_id));
    map.insert(
        meta_keys::BRANCHED_FROM_VERSION.into(),
        Value::from(source_version),
    );
    map.insert(meta_keys::BRANCH_NAME.into(), Value::from(branch_name));
    Value::Object(map)
}

/// Metadata for a version that replays `target_version`.
pub fn revert_metadata(source: &Value, target_version: VersionNumber) -> Value {
    let mut map = carried_metadata(source);
    map.insert(
        meta_keys::NOTES.into(),
        Value::from(format!("Reverted to version {target_version}")),
    );
    map.insert(meta_keys::REVERTED_FROM.into(), Value::from(target_version));
    Value::Object(map)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
