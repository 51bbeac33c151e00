use axum::{
    extract::{ws::Message, ws::WebSocket, State, WebSocketUpgrade},
    response::IntoResponse,
};
use feedcast_core::config::HEARTBEAT_INTERVAL_SECS;
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::info;

use crate::app::AppState;
use crate::ws::{
    registry::ConnectionId,
    router::{self, FrameVerdict},
};

/// Axum handler — upgrades HTTP to WebSocket at GET /ws.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| run_connection(socket, state))
}

/// Per-connection event loop — lives for the entire WS session.
///
/// The connection is registered before the first frame is read, so it is
/// broadcast-eligible for exactly as long as this task runs. Every exit path
/// funnels past the unregister at the bottom, whether the client closed, the
/// transport failed, or the server gave up on the peer.
async fn run_connection(socket: WebSocket, state: Arc<AppState>) {
    let conn_id = ConnectionId::generate();
    info!(conn = %conn_id, "new WS connection");

    let (mut sink, mut stream) = socket.split();

    let (tx, mut out_rx) = mpsc::channel::<String>(state.config.realtime.send_queue_capacity);
    state.registry.register(conn_id.clone(), tx);

    let mut heartbeat =
        tokio::time::interval(std::time::Duration::from_secs(HEARTBEAT_INTERVAL_SECS));
    heartbeat.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            frame = out_rx.recv() => {
                match frame {
                    Some(frame) => {
                        if sink.send(Message::Text(frame.into())).await.is_err() {
                            break;
                        }
                    }
                    // queue replaced by a re-registration; this task is stale
                    None => break,
                }
            }

            msg = stream.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        if router::handle(&conn_id, &text, &state) == FrameVerdict::Close {
                            break;
                        }
                    }
                    Some(Ok(Message::Ping(data))) => {
                        let _ = sink.send(Message::Pong(data)).await;
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    _ => {}
                }
            }

            _ = heartbeat.tick() => {
                if sink.send(Message::Ping(Default::default())).await.is_err() {
                    break;
                }
            }
        }
    }

    state.registry.unregister(&conn_id);
    info!(conn = %conn_id, "WS connection closed");
}
