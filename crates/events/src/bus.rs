//! Event envelope, publisher interface, and the in-process broadcast bus.
//!
//! [`EventBus`] is designed to be shared via `Arc<EventBus>` and handed to
//! the engine as an `Arc<dyn EventPublisher>`.

use chrono::{DateTime, Utc};
use dve_core::types::DbId;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

// ---------------------------------------------------------------------------
// Event types
// ---------------------------------------------------------------------------

/// Dot-separated names of the events the engine emits.
pub mod event_types {
    pub const VERSION_CREATED: &str = "design_version.created";
    pub const VERSIONS_COMPARED: &str = "design_version.compared";
    pub const VERSION_REVERTED: &str = "design_version.reverted";
    pub const BRANCH_CREATED: &str = "design_asset.branched";
}

// ---------------------------------------------------------------------------
// DesignEvent
// ---------------------------------------------------------------------------

/// Something that happened to a design asset.
///
/// Constructed via [`DesignEvent::new`] and enriched with
/// [`with_actor`](DesignEvent::with_actor) and
/// [`with_payload`](DesignEvent::with_payload).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DesignEvent {
    /// One of [`event_types`].
    pub event_type: String,

    /// Asset the event concerns.
    pub asset_id: DbId,

    /// User that triggered the event, when known.
    pub actor_id: Option<DbId>,

    /// Identifiers and computed results specific to the event type.
    pub payload: serde_json::Value,

    pub timestamp: DateTime<Utc>,
}

impl DesignEvent {
    pub fn new(event_type: impl Into<String>, asset_id: DbId) -> Self {
        Self {
            event_type: event_type.into(),
            asset_id,
            actor_id: None,
            payload: serde_json::Value::Object(Default::default()),
            timestamp: Utc::now(),
        }
    }

    pub fn with_actor(mut self, actor_id: DbId) -> Self {
        self.actor_id = Some(actor_id);
        self
    }

    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }
}

// ---------------------------------------------------------------------------
// Publisher interface
// ---------------------------------------------------------------------------

/// Fire-and-forget outbound notification channel.
///
/// Publishing never fails from the caller's point of view and is never
/// retried. Delivery is not required for correctness.
pub trait EventPublisher: Send + Sync {
    fn publish(&self, event: DesignEvent);
}

/// Publisher that drops every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopPublisher;

impl EventPublisher for NoopPublisher {
    fn publish(&self, _event: DesignEvent) {}
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out event bus.
///
/// Wraps a [`broadcast::Sender`] so that any number of subscribers can
/// independently receive every published [`DesignEvent`].
///
/// # Usage
///
/// ```rust
/// use dve_events::bus::{DesignEvent, EventBus, EventPublisher};
///
/// let bus = EventBus::default();
/// let mut rx = bus.subscribe();
///
/// bus.publish(DesignEvent::new("design_version.created", 1));
/// ```
pub struct EventBus {
    sender: broadcast::Sender<DesignEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full, the oldest un-consumed messages are dropped
    /// and slow receivers will observe a `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribe to all events published on this bus.
    pub fn subscribe(&self) -> broadcast::Receiver<DesignEvent> {
        self.sender.subscribe()
    }
}

impl EventPublisher for EventBus {
    fn publish(&self, event: DesignEvent) {
        // SendError only means there are zero receivers.
        let _ = self.sender.send(event);
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
