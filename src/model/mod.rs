//! Record types flowing through the collection pipeline
//!
//! The source adapter produces these as immutable base records; the
//! scoring/filter stage enriches posts in place by filling the optional
//! derived fields. Enrichment is additive and never rewrites base fields.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Snapshot of an account profile as returned by the source service
///
/// Owned by whoever requested it and never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Numeric account id, kept as a string (the service uses 64-bit ids)
    pub id: String,

    /// Screen name without the leading sigil
    pub handle: String,

    /// Human-readable display name
    pub display_name: String,

    #[serde(default)]
    pub description: String,

    pub followers_count: u64,
    pub following_count: u64,
    pub post_count: u64,

    #[serde(default)]
    pub verified: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// A single collected post
///
/// Base fields come from the source adapter. `buzz_score` and
/// `search_keyword` are absent until the ranking or search stage computes
/// them, and are only serialized once present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub text: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    /// Screen name of the posting account, stamped with the resolved handle
    /// by the traversal engine
    pub author_handle: String,

    /// Numeric id of the posting account; only stamped when the account was
    /// fetched by id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_id: Option<String>,

    pub retweet_count: u64,
    pub favorite_count: u64,
    pub reply_count: u64,

    /// Not every endpoint reports quotes; absent means zero
    #[serde(default)]
    pub quote_count: u64,

    /// Canonical web location, derived from the author handle and post id
    #[serde(default)]
    pub url: String,

    /// Weighted engagement score, attached by the ranking stage
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buzz_score: Option<u64>,

    /// Keyword this post matched, attached by the search variant only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_keyword: Option<String>,
}

impl Post {
    /// Builds the canonical web URL for a post
    pub fn permalink(handle: &str, post_id: &str) -> String {
        format!("https://twitter.com/{}/status/{}", handle, post_id)
    }

    /// Re-stamps authorship after the owning account has been resolved
    ///
    /// Sets the resolved handle, the account id when one is supplied, and
    /// refreshes the derived permalink. Engagement counters and text are
    /// left untouched.
    pub fn stamp_author(&mut self, handle: &str, account_id: Option<&str>) {
        self.author_handle = handle.to_string();
        if let Some(id) = account_id {
            self.author_id = Some(id.to_string());
        }
        self.url = Self::permalink(handle, &self.id);
    }
}
