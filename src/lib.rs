//! Saezuri: a paced social timeline harvester
//!
//! This crate collects short-form posts from a seed set of accounts and,
//! optionally, one hop of their followers, then ranks and filters the posts
//! by an engagement score or keyword match. Every remote call is paced by an
//! adaptive delay controller so the request cadence stays close to a human
//! browsing rhythm.

pub mod adapter;
pub mod collector;
pub mod config;
pub mod ident;
pub mod model;
pub mod output;
pub mod pacing;
pub mod scoring;

use thiserror::Error;

/// Main error type for saezuri operations
#[derive(Debug, Error)]
pub enum SaezuriError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid collection parameters: {0}")]
    InvalidParameters(String),

    #[error("Source adapter error: {0}")]
    Adapter(#[from] adapter::AdapterError),

    #[error("Output error: {0}")]
    Sink(#[from] output::SinkError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for saezuri operations
pub type Result<T> = std::result::Result<T, SaezuriError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use adapter::{AdapterError, Capabilities, SourceAdapter};
pub use collector::{CollectParams, Collector};
pub use config::Config;
pub use ident::{classify, normalize, AccountRef};
pub use model::{Post, UserProfile};
pub use pacing::Pacer;
pub use scoring::{buzz_score, is_trending};
