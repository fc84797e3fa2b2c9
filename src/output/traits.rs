//! Result sink trait and error types
//!
//! The pipeline produces an ordered sequence of ranked records; sinks only
//! externalize that sequence. Order is the ranking and must survive
//! serialization.

use crate::model::Post;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while persisting results
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Failed to serialize results: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for sink operations
pub type SinkResult<T> = std::result::Result<T, SinkError>;

/// Destination for the final ranked record set
pub trait ResultSink {
    /// Persists `records` to `destination`, preserving order
    fn persist(&self, records: &[Post], destination: &Path) -> SinkResult<()>;
}
