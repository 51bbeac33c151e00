use std::sync::Arc;

use axum::{routing::get, Router};
use feedcast_core::config::FeedcastConfig;
use tracing::warn;

use crate::ws::{hub::BroadcastHub, registry::ClientRegistry};

/// Central shared state — passed as Arc<AppState> to all Axum handlers.
///
/// Built once at startup. The registry and hub are plain fields rather than
/// globals, so tests can stand up as many isolated instances as they need.
pub struct AppState {
    pub config: FeedcastConfig,
    pub registry: Arc<ClientRegistry>,
    pub hub: BroadcastHub,
}

impl AppState {
    pub fn new(mut config: FeedcastConfig) -> Self {
        // tokio's mpsc::channel panics on a zero buffer, and every
        // connection task builds its queue from this value
        if config.realtime.send_queue_capacity == 0 {
            warn!("send_queue_capacity 0 is not usable, clamping to 1");
            config.realtime.send_queue_capacity = 1;
        }
        let registry = Arc::new(ClientRegistry::new());
        let hub = BroadcastHub::new(Arc::clone(&registry));
        Self {
            config,
            registry,
            hub,
        }
    }
}

/// Assemble the full Axum router.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(crate::http::health::health_handler))
        .route("/ws", get(crate::ws::connection::ws_handler))
        .with_state(state)
        .layer(tower_http::trace::TraceLayer::new_for_http())
}
