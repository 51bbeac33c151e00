use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::envelope::Envelope;
use crate::error::{ProtocolError, Result};
use crate::names;

/// A feed post as the mutation API returned it to the acting client.
///
/// Only `_id` and `author` are required; `likes` and `comments` are typed so
/// receivers can merge them; any other fields (caption, image URL, ...) pass
/// through the relay untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    #[serde(rename = "_id")]
    pub id: String,
    pub author: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub likes: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<Vec<Comment>>,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

/// One comment on a post. `id` is the receiver's dedupe key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

/// The full canonical list of user ids that like one post. Receivers replace
/// their copy wholesale and recompute their own like state by membership.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LikeUpdate {
    #[serde(rename = "postId")]
    pub post_id: String,
    pub likes: Vec<String>,
}

/// A new comment attached to an existing post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostComment {
    #[serde(rename = "postId")]
    pub post_id: String,
    pub comment: Comment,
}

/// Identifies a post by id alone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostRef {
    #[serde(rename = "postId")]
    pub post_id: String,
}

/// Payload of the `helloFromServer` handshake reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HelloReply {
    pub server: String,
    pub version: String,
}

impl HelloReply {
    pub fn new() -> Self {
        Self {
            server: "feedcast".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl Default for HelloReply {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Closed event sets
// ---------------------------------------------------------------------------

/// Client → server events, one variant per supported inbound name.
///
/// Parsing is the validation boundary: a frame that does not match one of
/// these shapes never reaches the fan-out path.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientEvent {
    /// Liveness handshake; the payload is accepted as-is and ignored.
    Hello(Value),
    LikeUpdated(LikeUpdate),
    NewPost(Post),
    NewComment(PostComment),
    DeletePost(PostRef),
}

impl ClientEvent {
    /// Parse and validate one inbound text frame.
    pub fn parse(text: &str) -> Result<Self> {
        Self::from_envelope(Envelope::parse(text)?)
    }

    pub fn from_envelope(envelope: Envelope) -> Result<Self> {
        let Envelope { event, payload } = envelope;
        match event.as_str() {
            names::HELLO => Ok(ClientEvent::Hello(payload)),
            names::LIKE_UPDATED_FROM_CLIENT => {
                typed(names::LIKE_UPDATED_FROM_CLIENT, payload).map(ClientEvent::LikeUpdated)
            }
            names::NEW_POST_FROM_CLIENT => {
                typed(names::NEW_POST_FROM_CLIENT, payload).map(ClientEvent::NewPost)
            }
            names::NEW_COMMENT_FROM_CLIENT => {
                typed(names::NEW_COMMENT_FROM_CLIENT, payload).map(ClientEvent::NewComment)
            }
            names::DELETE_POST_FROM_CLIENT => {
                typed(names::DELETE_POST_FROM_CLIENT, payload).map(ClientEvent::DeletePost)
            }
            _ => Err(ProtocolError::UnknownEvent { name: event }),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ClientEvent::Hello(_) => names::HELLO,
            ClientEvent::LikeUpdated(_) => names::LIKE_UPDATED_FROM_CLIENT,
            ClientEvent::NewPost(_) => names::NEW_POST_FROM_CLIENT,
            ClientEvent::NewComment(_) => names::NEW_COMMENT_FROM_CLIENT,
            ClientEvent::DeletePost(_) => names::DELETE_POST_FROM_CLIENT,
        }
    }

    /// The broadcast event this inbound event is relayed as. The payload is
    /// carried over unchanged; only the name differs. `hello` is answered
    /// directly and never broadcast, so it maps to nothing here.
    pub fn into_broadcast(self) -> Option<ServerEvent> {
        match self {
            ClientEvent::Hello(_) => None,
            ClientEvent::LikeUpdated(p) => Some(ServerEvent::LikeUpdated(p)),
            ClientEvent::NewPost(p) => Some(ServerEvent::PostCreated(p)),
            ClientEvent::NewComment(p) => Some(ServerEvent::CommentAdded(p)),
            ClientEvent::DeletePost(p) => Some(ServerEvent::PostDeleted(p)),
        }
    }

    /// Serialize for emission (the fire-and-forget half of a client mutation).
    pub fn to_frame(&self) -> String {
        match self {
            ClientEvent::Hello(v) => Envelope::new(names::HELLO, v),
            ClientEvent::LikeUpdated(p) => Envelope::new(names::LIKE_UPDATED_FROM_CLIENT, p),
            ClientEvent::NewPost(p) => Envelope::new(names::NEW_POST_FROM_CLIENT, p),
            ClientEvent::NewComment(p) => Envelope::new(names::NEW_COMMENT_FROM_CLIENT, p),
            ClientEvent::DeletePost(p) => Envelope::new(names::DELETE_POST_FROM_CLIENT, p),
        }
        .to_frame()
    }
}

/// Server → client events: what connected feed views actually receive.
#[derive(Debug, Clone, PartialEq)]
pub enum ServerEvent {
    /// Unicast reply to `hello`; never broadcast.
    HelloFromServer(HelloReply),
    LikeUpdated(LikeUpdate),
    PostCreated(Post),
    CommentAdded(PostComment),
    PostDeleted(PostRef),
}

impl ServerEvent {
    /// Parse one received frame (the reconciling client's boundary).
    pub fn parse(text: &str) -> Result<Self> {
        Self::from_envelope(Envelope::parse(text)?)
    }

    pub fn from_envelope(envelope: Envelope) -> Result<Self> {
        let Envelope { event, payload } = envelope;
        match event.as_str() {
            names::HELLO_FROM_SERVER => {
                typed(names::HELLO_FROM_SERVER, payload).map(ServerEvent::HelloFromServer)
            }
            names::LIKE_UPDATED => {
                typed(names::LIKE_UPDATED, payload).map(ServerEvent::LikeUpdated)
            }
            names::POST_CREATED => {
                typed(names::POST_CREATED, payload).map(ServerEvent::PostCreated)
            }
            names::COMMENT_ADDED => {
                typed(names::COMMENT_ADDED, payload).map(ServerEvent::CommentAdded)
            }
            names::POST_DELETED => {
                typed(names::POST_DELETED, payload).map(ServerEvent::PostDeleted)
            }
            _ => Err(ProtocolError::UnknownEvent { name: event }),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ServerEvent::HelloFromServer(_) => names::HELLO_FROM_SERVER,
            ServerEvent::LikeUpdated(_) => names::LIKE_UPDATED,
            ServerEvent::PostCreated(_) => names::POST_CREATED,
            ServerEvent::CommentAdded(_) => names::COMMENT_ADDED,
            ServerEvent::PostDeleted(_) => names::POST_DELETED,
        }
    }

    pub fn to_frame(&self) -> String {
        match self {
            ServerEvent::HelloFromServer(p) => Envelope::new(names::HELLO_FROM_SERVER, p),
            ServerEvent::LikeUpdated(p) => Envelope::new(names::LIKE_UPDATED, p),
            ServerEvent::PostCreated(p) => Envelope::new(names::POST_CREATED, p),
            ServerEvent::CommentAdded(p) => Envelope::new(names::COMMENT_ADDED, p),
            ServerEvent::PostDeleted(p) => Envelope::new(names::POST_DELETED, p),
        }
        .to_frame()
    }
}

/// Deserialize a payload into its typed shape, tagging errors with the event
/// name for the drop log.
fn typed<T: serde::de::DeserializeOwned>(event: &'static str, payload: Value) -> Result<T> {
    serde_json::from_value(payload).map_err(|source| ProtocolError::InvalidPayload { event, source })
}
