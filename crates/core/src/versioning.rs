//! Version numbering constants and the optimistic-concurrency retry budget.

use crate::error::CoreError;
use crate::types::VersionNumber;

/// Default page size for version listings.
pub const DEFAULT_LIST_LIMIT: i64 = 20;

/// Largest page size a caller may request.
pub const MAX_LIST_LIMIT: i64 = 500;

/// Default number of insert attempts before a version-number race is
/// reported as a conflict.
pub const DEFAULT_MAX_CREATE_ATTEMPTS: u32 = 3;

/// Number assigned to the next version given the current maximum.
pub fn next_version_number(current_max: Option<VersionNumber>) -> VersionNumber {
    current_max.unwrap_or(0) + 1
}

/// Resolve an optional caller-supplied limit against the defaults.
pub fn resolve_list_limit(limit: Option<i64>, default: i64) -> Result<i64, CoreError> {
    match limit {
        None => Ok(default),
        Some(l) if l < 1 => Err(CoreError::Validation(format!(
            "limit must be at least 1, got {l}"
        ))),
        Some(l) => Ok(l.min(MAX_LIST_LIMIT)),
    }
}

/// Validate a requested version number.
pub fn validate_version_number(version: VersionNumber) -> Result<(), CoreError> {
    if version < 1 {
        return Err(CoreError::Validation(format!(
            "version numbers start at 1, got {version}"
        )));
    }
    Ok(())
}
