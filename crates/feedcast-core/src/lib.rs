//! Shared configuration and error types for the feedcast workspace.

pub mod config;
pub mod error;

pub use config::FeedcastConfig;
pub use error::{CoreError, Result};
