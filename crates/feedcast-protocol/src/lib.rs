//! Wire contract for the feedcast realtime channel.
//!
//! Both directions exchange one JSON text frame per event:
//! `{ "event": "<name>", "payload": <value> }`. Inbound names carry a
//! `_from_client` suffix; the relay rebroadcasts the validated payload to
//! every other connection under the bare name. Frames never identify their
//! sender — receivers reconcile by entity id, not by origin.

pub mod envelope;
pub mod error;
pub mod events;
pub mod names;

pub use envelope::Envelope;
pub use error::ProtocolError;
pub use events::{
    ClientEvent, Comment, HelloReply, LikeUpdate, Post, PostComment, PostRef, ServerEvent,
};
