use std::fmt;

use dashmap::DashMap;
use tokio::sync::mpsc;
use uuid::Uuid;

/// Opaque identifier for one live websocket connection. Never leaves the
/// process and never appears in a wire frame.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConnectionId(String);

impl ConnectionId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Live connections: conn id -> outbound frame queue.
///
/// Registration makes a connection broadcast-eligible; removal is synchronous
/// on disconnect. State is process-local and starts empty on boot —
/// reconnecting clients refetch the feed instead of replaying missed events.
pub struct ClientRegistry {
    connections: DashMap<ConnectionId, mpsc::Sender<String>>,
}

impl ClientRegistry {
    pub fn new() -> Self {
        Self {
            connections: DashMap::new(),
        }
    }

    /// Add a connection. Re-registering the same id replaces the old queue.
    pub fn register(&self, id: ConnectionId, tx: mpsc::Sender<String>) {
        self.connections.insert(id, tx);
    }

    /// Drop a connection. Safe to call for an id that is already gone.
    pub fn unregister(&self, id: &ConnectionId) {
        self.connections.remove(id);
    }

    /// Clone out the queue for one connection (unicast replies).
    pub fn sender(&self, id: &ConnectionId) -> Option<mpsc::Sender<String>> {
        self.connections.get(id).map(|entry| entry.value().clone())
    }

    /// Snapshot every connection except `origin`. Senders are cloned out so
    /// no shard guard is held while frames are enqueued.
    pub fn snapshot_except(
        &self,
        origin: &ConnectionId,
    ) -> Vec<(ConnectionId, mpsc::Sender<String>)> {
        self.connections
            .iter()
            .filter(|entry| entry.key() != origin)
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }
}

impl Default for ClientRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn queue() -> (mpsc::Sender<String>, mpsc::Receiver<String>) {
        mpsc::channel(8)
    }

    #[test]
    fn register_and_unregister() {
        let registry = ClientRegistry::new();
        let id = ConnectionId::generate();
        let (tx, _rx) = queue();

        registry.register(id.clone(), tx);
        assert_eq!(registry.len(), 1);
        assert!(registry.sender(&id).is_some());

        registry.unregister(&id);
        assert!(registry.is_empty());
        assert!(registry.sender(&id).is_none());
    }

    #[test]
    fn reregistering_replaces_the_queue() {
        let registry = ClientRegistry::new();
        let id = ConnectionId::generate();
        let (tx1, mut rx1) = queue();
        let (tx2, mut rx2) = queue();

        registry.register(id.clone(), tx1);
        registry.register(id.clone(), tx2);
        assert_eq!(registry.len(), 1);

        registry
            .sender(&id)
            .unwrap()
            .try_send("frame".into())
            .unwrap();
        assert!(rx1.try_recv().is_err());
        assert_eq!(rx2.try_recv().unwrap(), "frame");
    }

    #[test]
    fn snapshot_excludes_origin() {
        let registry = ClientRegistry::new();
        let origin = ConnectionId::generate();
        let other = ConnectionId::generate();
        let (tx1, _rx1) = queue();
        let (tx2, _rx2) = queue();
        registry.register(origin.clone(), tx1);
        registry.register(other.clone(), tx2);

        let snapshot = registry.snapshot_except(&origin);
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].0, other);
    }

    #[test]
    fn unregistering_unknown_id_is_a_noop() {
        let registry = ClientRegistry::new();
        registry.unregister(&ConnectionId::generate());
        assert!(registry.is_empty());
    }
}
