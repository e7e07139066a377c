//! Domain types and pure logic for the design version control engine.
//!
//! This crate has no internal dependencies and performs no I/O. Persistence
//! lives in `dve-db`, orchestration and external collaborators in
//! `dve-engine`.

pub mod analysis;
pub mod analytics;
pub mod branching;
pub mod design;
pub mod diff;
pub mod error;
pub mod similarity;
pub mod types;
pub mod versioning;
