//! Outbound notifications for the design version engine.
//!
//! - [`DesignEvent`]: the event envelope emitted on create, compare,
//!   revert, and branch.
//! - [`EventPublisher`]: the fire-and-forget outbound interface the engine
//!   depends on.
//! - [`EventBus`]: in-process fan-out backed by `tokio::sync::broadcast`.
//! - [`NoopPublisher`]: discards everything; useful in tests and tools.
//! - [`EventLogger`] and [`EventPersistence`]: background subscribers that
//!   write events to the log and to the `design_events` table.

pub mod bus;
pub mod logger;
pub mod persistence;

pub use bus::{event_types, DesignEvent, EventBus, EventPublisher, NoopPublisher};
pub use logger::EventLogger;
pub use persistence::EventPersistence;
