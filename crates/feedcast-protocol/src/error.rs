use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("Malformed frame: {0}")]
    MalformedFrame(#[from] serde_json::Error),

    #[error("Unknown event: {name}")]
    UnknownEvent { name: String },

    #[error("Invalid payload for {event}: {source}")]
    InvalidPayload {
        event: &'static str,
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, ProtocolError>;
