use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

// Fan-out layer constants
pub const DEFAULT_PORT: u16 = 4650;
pub const DEFAULT_BIND: &str = "127.0.0.1";
pub const MAX_PAYLOAD_BYTES: usize = 64 * 1024; // 64 KB hard cap per inbound frame
pub const SEND_QUEUE_CAPACITY: usize = 256; // buffered outbound frames per connection
pub const HEARTBEAT_INTERVAL_SECS: u64 = 30; // transport ping cadence

/// Top-level config (feedcast.toml + FEEDCAST_* env overrides).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FeedcastConfig {
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub realtime: RealtimeConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            bind: DEFAULT_BIND.to_string(),
        }
    }
}

/// Tunables for the websocket fan-out path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealtimeConfig {
    /// Outbound frames buffered per connection; a full queue drops the frame
    /// for that recipient only.
    #[serde(default = "default_send_queue_capacity")]
    pub send_queue_capacity: usize,
    /// Inbound text frames larger than this close the connection.
    #[serde(default = "default_max_payload_bytes")]
    pub max_payload_bytes: usize,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            send_queue_capacity: SEND_QUEUE_CAPACITY,
            max_payload_bytes: MAX_PAYLOAD_BYTES,
        }
    }
}

fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}
fn default_send_queue_capacity() -> usize {
    SEND_QUEUE_CAPACITY
}
fn default_max_payload_bytes() -> usize {
    MAX_PAYLOAD_BYTES
}

impl FeedcastConfig {
    /// Load config from a TOML file with FEEDCAST_* env var overrides.
    ///
    /// Checks in order:
    ///   1. Explicit path argument
    ///   2. ./feedcast.toml
    ///
    /// A missing file is not an error; every field has a default.
    ///
    /// Env overrides nest on a double underscore, so field names keep their
    /// own underscores: `FEEDCAST_GATEWAY__PORT=9999`,
    /// `FEEDCAST_REALTIME__SEND_QUEUE_CAPACITY=64`.
    pub fn load(config_path: Option<&str>) -> crate::error::Result<Self> {
        let path = config_path.unwrap_or("feedcast.toml");

        let config: FeedcastConfig = Figment::new()
            .merge(Toml::file(path))
            .merge(Env::prefixed("FEEDCAST_").split("__"))
            .extract()
            .map_err(|e| crate::error::CoreError::Config(e.to_string()))?;

        Ok(config)
    }
}
