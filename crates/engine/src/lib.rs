//! Design version control engine.
//!
//! Exposes the orchestration layer ([`DesignVersionEngine`]), the storage
//! and collaborator seams it depends on, configuration, and tracing setup,
//! so both the CLI and integration tests can assemble an engine.

pub mod config;
pub mod engine;
pub mod error;
pub mod gateway;
pub mod store;
pub mod telemetry;

pub use config::EngineConfig;
pub use engine::{BranchOutcome, DesignVersionEngine};
pub use error::{EngineError, EngineResult};
