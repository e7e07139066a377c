use crate::types::{DbId, VersionNumber};

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Version {version} not found for design asset {asset_id}")]
    VersionNotFound {
        asset_id: DbId,
        version: VersionNumber,
    },

    #[error("Validation failed: {0}")]
    Validation(String),
}
