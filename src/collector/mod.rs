//! Collection pipeline: traversal, filtering, ranking
//!
//! This module contains the core collection logic, including:
//! - The single-account fetch primitive and sequential multi-account fetch
//! - The seed-and-follower walk with deduplication and pruning
//! - The ranking and keyword-search entry points layered on the same
//!   primitives
//!
//! All traversal is strictly sequential; the pacing delays between fetches
//! are the primary defense against remote rate limiting, so there is no
//! parallel fan-out.

mod aggregate;
mod engine;

pub use engine::{CollectParams, Collector};

/// Followers with fewer followers than this are pruned from any follower walk
pub(crate) const POPULARITY_FLOOR: u64 = 1000;

/// Hard cap on posts fetched per follower, regardless of the per-account limit
pub(crate) const FOLLOWER_POST_CAP: usize = 20;
