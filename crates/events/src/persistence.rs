//! Durable event persistence service.
//!
//! [`EventPersistence`] subscribes to the [`EventBus`](crate::bus::EventBus)
//! broadcast channel and writes every received [`DesignEvent`] to the
//! `design_events` table. It runs as a long-lived background task and shuts
//! down gracefully when the bus sender is dropped.

use dve_core::types::DbId;
use dve_db::repositories::DesignEventRepo;
use dve_db::DbPool;
use tokio::sync::broadcast;

use crate::bus::DesignEvent;

/// Background service that persists design events to the database.
pub struct EventPersistence;

impl EventPersistence {
    /// Run the persistence loop.
    ///
    /// Failed writes are logged and skipped; events are never retried.
    pub async fn run(pool: DbPool, mut receiver: broadcast::Receiver<DesignEvent>) {
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    if let Err(e) = Self::persist(&pool, &event).await {
                        tracing::error!(
                            error = %e,
                            event_type = %event.event_type,
                            asset_id = event.asset_id,
                            "Failed to persist design event"
                        );
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(
                        skipped = n,
                        "Event persistence lagged, some events were not persisted"
                    );
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, persistence shutting down");
                    break;
                }
            }
        }
    }

    async fn persist(pool: &DbPool, event: &DesignEvent) -> Result<DbId, sqlx::Error> {
        DesignEventRepo::insert(
            pool,
            &event.event_type,
            Some(event.asset_id),
            event.actor_id,
            &event.payload,
        )
        .await
    }
}
