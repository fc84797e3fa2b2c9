//! Source service adapter
//!
//! The collection pipeline only talks to the remote service through the
//! [`SourceAdapter`] trait: profile resolution, timeline listing, and
//! follower listing, plus a one-time activation call. The guest-mode HTTP
//! implementation lives in [`http`].

mod http;

pub use http::{build_http_client, GuestApiAdapter};

use crate::ident::AccountRef;
use crate::model::{Post, UserProfile};
use async_trait::async_trait;
use thiserror::Error;

/// Errors raised by a source adapter
#[derive(Debug, Error)]
pub enum AdapterError {
    /// The account does not exist or is not accessible
    #[error("account lookup failed: {0}")]
    Lookup(String),

    /// Network or service failure
    #[error("transport failure: {0}")]
    Transport(String),

    /// Session or credential failure
    #[error("authentication failure: {0}")]
    Auth(String),
}

/// Result type alias for adapter operations
pub type AdapterResult<T> = std::result::Result<T, AdapterError>;

/// What a concrete adapter can do at runtime
///
/// Guest and authenticated sessions expose the same interface and differ
/// only in these flags; callers branch on capabilities instead of on the
/// adapter's concrete type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub fetch_by_handle: bool,
    pub fetch_by_id: bool,
    pub fetch_followers: bool,

    /// Service-side keyword search requires a logged-in session; the
    /// collector's own keyword filter works without it
    pub authenticated_search: bool,
}

/// Interface the collection pipeline requires from the source service
#[async_trait]
pub trait SourceAdapter: Send + Sync {
    /// One-time session setup; must complete before any fetch
    async fn activate(&mut self) -> AdapterResult<()>;

    /// Runtime capability flags for this session
    fn capabilities(&self) -> Capabilities;

    /// Resolves a profile snapshot for a handle or numeric id
    async fn resolve_profile(&self, target: &AccountRef) -> AdapterResult<UserProfile>;

    /// Lists up to `limit` recent posts for an account id (base fields only)
    async fn list_posts(&self, account_id: &str, limit: usize) -> AdapterResult<Vec<Post>>;

    /// Lists up to `limit` followers of an account id
    async fn list_followers(&self, account_id: &str, limit: usize)
        -> AdapterResult<Vec<UserProfile>>;
}
