//! Realtime fan-out gateway: accepts websocket connections from feed clients
//! and relays each client's mutation events to every other live connection.

pub mod app;
pub mod http;
pub mod ws;
