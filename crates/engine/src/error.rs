use dve_core::error::CoreError;
use dve_core::types::DbId;

use crate::store::StoreError;

/// Error type for engine operations.
///
/// Degraded external collaborators are not represented here: they are
/// absorbed by the gateway and replaced with documented defaults.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Not-found and validation errors from `dve_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Version-number race still lost after the retry budget.
    #[error("Could not allocate a version number for design asset {asset_id} after {attempts} attempts")]
    ConcurrencyConflict { asset_id: DbId, attempts: u32 },

    /// The durable store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Convenience alias for engine return values.
pub type EngineResult<T> = Result<T, EngineError>;
