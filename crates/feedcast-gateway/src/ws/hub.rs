use std::sync::Arc;

use feedcast_protocol::ServerEvent;
use tokio::sync::mpsc::error::TrySendError;
use tracing::debug;

use crate::ws::registry::{ClientRegistry, ConnectionId};

/// Relays events to every live connection except the one that caused them.
///
/// Delivery is best-effort at-most-once: each recipient gets one non-blocking
/// enqueue attempt, and a full or closed queue loses the frame for that
/// recipient only. There is no ack, no retry, and no replay for connections
/// that join later.
#[derive(Clone)]
pub struct BroadcastHub {
    registry: Arc<ClientRegistry>,
}

impl BroadcastHub {
    pub fn new(registry: Arc<ClientRegistry>) -> Self {
        Self { registry }
    }

    /// Enqueue `event` to every connection except `origin`. The frame is
    /// serialized once and shared. Returns how many recipients accepted it.
    pub fn broadcast_except(&self, origin: &ConnectionId, event: &ServerEvent) -> usize {
        let frame = event.to_frame();
        let mut delivered = 0;

        for (id, tx) in self.registry.snapshot_except(origin) {
            match tx.try_send(frame.clone()) {
                Ok(()) => delivered += 1,
                Err(TrySendError::Full(_)) => {
                    debug!(conn = %id, event = event.name(), "recipient queue full, frame dropped");
                }
                Err(TrySendError::Closed(_)) => {
                    debug!(conn = %id, event = event.name(), "recipient gone mid-broadcast");
                }
            }
        }
        delivered
    }

    /// Unicast to a single connection (the hello reply path).
    pub fn send_to(&self, id: &ConnectionId, event: &ServerEvent) -> bool {
        match self.registry.sender(id) {
            Some(tx) => tx.try_send(event.to_frame()).is_ok(),
            None => false,
        }
    }
}
