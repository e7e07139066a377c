//! Log-stream subscriber.
//!
//! [`EventLogger`] drains a bus receiver and writes each event through
//! `tracing`, so deployments without a notification backend still get an
//! audit trail in their logs.

use tokio::sync::broadcast;

use crate::bus::DesignEvent;

pub struct EventLogger;

impl EventLogger {
    /// Run until the bus is dropped. Returns the number of events logged.
    pub async fn run(mut receiver: broadcast::Receiver<DesignEvent>) -> u64 {
        let mut logged = 0;
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    tracing::info!(
                        event_type = %event.event_type,
                        asset_id = event.asset_id,
                        actor_id = ?event.actor_id,
                        payload = %event.payload,
                        "Design event"
                    );
                    logged += 1;
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Event logger lagged, some events were not logged");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::debug!("Event bus closed, logger shutting down");
                    break;
                }
            }
        }
        logged
    }
}
