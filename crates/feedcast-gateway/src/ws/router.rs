use feedcast_protocol::{ClientEvent, HelloReply, ServerEvent};
use tracing::{debug, warn};

use crate::app::AppState;
use crate::ws::registry::ConnectionId;

/// What the connection loop should do with the session after a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameVerdict {
    Continue,
    Close,
}

/// Process one inbound text frame from `origin`. Returns the verdict the
/// connection loop obeys.
///
/// Frames over the configured size cap close the connection. Frames that
/// fail validation are dropped here with a warn log; the origin gets no
/// error reply, the other connections see nothing, and the session stays
/// open. Valid mutation events are relayed to everyone else under the
/// broadcast name.
pub fn handle(origin: &ConnectionId, text: &str, state: &AppState) -> FrameVerdict {
    if text.len() > state.config.realtime.max_payload_bytes {
        warn!(conn = %origin, size = text.len(), "payload too large");
        return FrameVerdict::Close;
    }

    let event = match ClientEvent::parse(text) {
        Ok(event) => event,
        Err(e) => {
            warn!(conn = %origin, error = %e, "dropping invalid realtime event");
            return FrameVerdict::Continue;
        }
    };

    match event {
        ClientEvent::Hello(_) => {
            let reply = ServerEvent::HelloFromServer(HelloReply::new());
            if !state.hub.send_to(origin, &reply) {
                debug!(conn = %origin, "hello reply not deliverable");
            }
        }
        other => {
            if let Some(broadcast) = other.into_broadcast() {
                let delivered = state.hub.broadcast_except(origin, &broadcast);
                debug!(conn = %origin, event = broadcast.name(), delivered, "event relayed");
            }
        }
    }

    FrameVerdict::Continue
}

#[cfg(test)]
mod tests {
    use super::*;
    use feedcast_core::config::FeedcastConfig;
    use tokio::sync::mpsc;

    fn test_state() -> AppState {
        AppState::new(FeedcastConfig::default())
    }

    fn connect(state: &AppState) -> (ConnectionId, mpsc::Receiver<String>) {
        let id = ConnectionId::generate();
        let (tx, rx) = mpsc::channel(8);
        state.registry.register(id.clone(), tx);
        (id, rx)
    }

    #[test]
    fn relays_valid_like_event_to_others() {
        let state = test_state();
        let (a, mut rx_a) = connect(&state);
        let (_b, mut rx_b) = connect(&state);

        handle(
            &a,
            r#"{"event":"like_updated_from_client","payload":{"postId":"p1","likes":["u1"]}}"#,
            &state,
        );

        assert!(rx_a.try_recv().is_err());
        let frame = rx_b.try_recv().unwrap();
        assert!(frame.contains(r#""event":"like_updated""#));
        assert!(frame.contains(r#""likes":["u1"]"#));
    }

    #[test]
    fn invalid_frames_reach_nobody_and_leave_the_session_open() {
        let state = test_state();
        let (a, mut rx_a) = connect(&state);
        let (_b, mut rx_b) = connect(&state);

        for bad in [
            // missing likes array
            r#"{"event":"like_updated_from_client","payload":{"postId":"p1"}}"#,
            // post without _id
            r#"{"event":"new_post_from_client","payload":{"author":{"username":"ada"}}}"#,
            // event name outside the contract
            r#"{"event":"profile_updated","payload":{}}"#,
            // not JSON at all
            "garbage",
        ] {
            assert_eq!(handle(&a, bad, &state), FrameVerdict::Continue);
        }

        assert!(rx_a.try_recv().is_err());
        assert!(rx_b.try_recv().is_err());
    }

    #[test]
    fn oversized_frame_closes_the_connection() {
        let mut config = FeedcastConfig::default();
        config.realtime.max_payload_bytes = 64;
        let state = AppState::new(config);
        let (a, mut rx_a) = connect(&state);
        let (_b, mut rx_b) = connect(&state);

        let padding = "x".repeat(256);
        let frame = format!(
            r#"{{"event":"new_post_from_client","payload":{{"_id":"p1","author":"{padding}"}}}}"#
        );

        assert_eq!(handle(&a, &frame, &state), FrameVerdict::Close);
        assert!(rx_a.try_recv().is_err());
        assert!(
            rx_b.try_recv().is_err(),
            "oversized frames are never relayed"
        );
    }

    #[test]
    fn frame_at_the_size_cap_still_relays() {
        let frame = r#"{"event":"delete_post_from_client","payload":{"postId":"p1"}}"#;
        let mut config = FeedcastConfig::default();
        config.realtime.max_payload_bytes = frame.len();
        let state = AppState::new(config);
        let (a, _rx_a) = connect(&state);
        let (_b, mut rx_b) = connect(&state);

        assert_eq!(handle(&a, frame, &state), FrameVerdict::Continue);
        let relayed = rx_b.try_recv().unwrap();
        assert!(relayed.contains(r#""event":"post_deleted""#));
    }

    #[test]
    fn hello_gets_unicast_reply_only() {
        let state = test_state();
        let (a, mut rx_a) = connect(&state);
        let (_b, mut rx_b) = connect(&state);

        handle(&a, r#"{"event":"hello","payload":"hi server"}"#, &state);

        let reply = rx_a.try_recv().unwrap();
        assert!(reply.contains(r#""event":"helloFromServer""#));
        assert!(rx_b.try_recv().is_err(), "hello must not be broadcast");
    }

    #[test]
    fn comment_event_keeps_unmodeled_fields() {
        let state = test_state();
        let (a, _rx_a) = connect(&state);
        let (_b, mut rx_b) = connect(&state);

        handle(
            &a,
            r#"{"event":"new_comment_from_client","payload":{"postId":"p1","comment":{"id":"c1","text":"nice","postedBy":"u9"}}}"#,
            &state,
        );

        let frame = rx_b.try_recv().unwrap();
        assert!(frame.contains(r#""event":"comment_added""#));
        assert!(frame.contains(r#""postedBy":"u9""#));
    }
}
