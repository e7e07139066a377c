//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods
//! that accept `&PgPool` as the first argument. Inserts that take part in a
//! transaction accept any `PgExecutor` instead.

pub mod design_asset_repo;
pub mod design_collaborator_repo;
pub mod design_event_repo;
pub mod design_version_repo;

pub use design_asset_repo::DesignAssetRepo;
pub use design_collaborator_repo::DesignCollaboratorRepo;
pub use design_event_repo::DesignEventRepo;
pub use design_version_repo::{DesignVersionRepo, UQ_ASSET_VERSION};
