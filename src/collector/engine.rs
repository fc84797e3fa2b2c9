//! Traversal engine - walks seed accounts and their followers
//!
//! The engine owns the source adapter and the pacing session. Its fetch
//! primitives absorb per-account failures: a remote error is logged,
//! triggers the failure cooldown, and yields an empty result for that
//! account, so one dead account never aborts a traversal.

use crate::adapter::{AdapterResult, SourceAdapter};
use crate::collector::{aggregate, FOLLOWER_POST_CAP, POPULARITY_FLOOR};
use crate::ident::{classify, normalize, AccountRef};
use crate::model::{Post, UserProfile};
use crate::pacing::Pacer;
use crate::scoring::{buzz_score, is_trending};
use crate::{Result, SaezuriError};
use std::collections::HashSet;

/// Caller-supplied knobs for the seed-and-follower walk
#[derive(Debug, Clone)]
pub struct CollectParams {
    /// Followers to list per seed account
    pub follower_count_per_seed: usize,

    /// Posts to fetch per account (followers are additionally capped)
    pub post_limit_per_account: usize,

    /// Unweighted engagement sum a post must reach to be kept
    pub min_engagement: u64,

    /// Size of the final ranked result
    pub top_n: usize,

    /// Expand the walk one hop into each seed's followers
    pub include_followers: bool,
}

impl CollectParams {
    /// Rejects parameter combinations that can only be programming errors
    pub fn validate(&self) -> Result<()> {
        validate_counts(self.post_limit_per_account, self.top_n)
    }
}

/// Shared guard for the pipeline entry points
pub(crate) fn validate_counts(limit_per_account: usize, top_n: usize) -> Result<()> {
    if limit_per_account == 0 {
        return Err(SaezuriError::InvalidParameters(
            "post limit per account must be at least 1".to_string(),
        ));
    }
    if top_n == 0 {
        return Err(SaezuriError::InvalidParameters(
            "top-n must be at least 1".to_string(),
        ));
    }
    Ok(())
}

/// Collection pipeline over a source adapter and a pacing session
pub struct Collector<A> {
    pub(super) adapter: A,
    pub(super) pacer: Pacer,
}

impl<A: SourceAdapter> Collector<A> {
    /// Creates a collector from an activated adapter and a pacing session
    pub fn new(adapter: A, pacer: Pacer) -> Self {
        Self { adapter, pacer }
    }

    /// The adapter this collector fetches through
    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    /// Fetches up to `limit` posts for one account, absorbing failures
    ///
    /// The identifier is normalized and classified; handles and numeric ids
    /// take the appropriate adapter path. Returned posts carry the resolved
    /// handle (and the account id when fetched by id) and the derived
    /// permalink. On any adapter failure the failure cooldown runs and an
    /// empty list is returned.
    pub async fn fetch_posts(&mut self, identifier: &str, limit: usize) -> Vec<Post> {
        let target = classify(identifier);
        self.pacer.before_request().await;

        match self.fetch_posts_inner(&target, limit).await {
            Ok(posts) => posts,
            Err(e) => {
                tracing::warn!("post fetch failed for {}: {}", target, e);
                self.pacer.after_failure().await;
                Vec::new()
            }
        }
    }

    async fn fetch_posts_inner(&self, target: &AccountRef, limit: usize) -> AdapterResult<Vec<Post>> {
        let profile = self.adapter.resolve_profile(target).await?;
        let mut posts = self.adapter.list_posts(&profile.id, limit).await?;

        let fetched_by_id = matches!(target, AccountRef::Id(_));
        for post in &mut posts {
            post.stamp_author(
                &profile.handle,
                fetched_by_id.then_some(profile.id.as_str()),
            );
        }
        Ok(posts)
    }

    /// Sequentially fetches several accounts, concatenating results in
    /// input order
    pub async fn fetch_many(&mut self, identifiers: &[String], limit_per_account: usize) -> Vec<Post> {
        let mut all = Vec::new();
        for identifier in identifiers {
            tracing::info!("fetching posts for {}", identifier);
            let posts = self.fetch_posts(identifier, limit_per_account).await;
            all.extend(posts);
        }
        all
    }

    /// Fetches up to `limit` followers of an account, absorbing failures
    pub(super) async fn fetch_followers(&mut self, identifier: &str, limit: usize) -> Vec<UserProfile> {
        let target = classify(identifier);
        self.pacer.before_request().await;

        match self.fetch_followers_inner(&target, limit).await {
            Ok(followers) => followers,
            Err(e) => {
                tracing::warn!("follower fetch failed for {}: {}", target, e);
                self.pacer.after_failure().await;
                Vec::new()
            }
        }
    }

    async fn fetch_followers_inner(
        &self,
        target: &AccountRef,
        limit: usize,
    ) -> AdapterResult<Vec<UserProfile>> {
        let profile = self.adapter.resolve_profile(target).await?;
        self.adapter.list_followers(&profile.id, limit).await
    }

    /// Trending posts for a single account: fetch, gate, score
    async fn trending_from_account(
        &mut self,
        identifier: &str,
        limit: usize,
        min_engagement: u64,
    ) -> Vec<Post> {
        let posts = self.fetch_posts(identifier, limit).await;
        let mut trending: Vec<Post> = posts
            .into_iter()
            .filter(|post| is_trending(post, min_engagement))
            .collect();
        for post in &mut trending {
            post.buzz_score = Some(buzz_score(post));
        }
        trending
    }

    /// Walks the seed accounts and one hop of their followers, keeping
    /// posts that clear the trending gate, and returns the top `top_n` by
    /// buzz score
    ///
    /// Each account is fetched at most once per walk: duplicate seeds are
    /// skipped, as is a follower that already appeared as a seed or under an
    /// earlier seed. Followers below the popularity floor are pruned without
    /// being marked visited. Between seeds the pacer takes its batch rest.
    pub async fn collect_trending(
        &mut self,
        seeds: &[String],
        params: &CollectParams,
    ) -> Result<Vec<Post>> {
        params.validate()?;

        let mut visited: HashSet<String> = HashSet::new();
        let mut collected: Vec<Post> = Vec::new();

        for (index, seed) in seeds.iter().enumerate() {
            let seed_key = normalize(seed);
            if visited.contains(&seed_key) {
                tracing::debug!("seed {} already visited, skipping", seed_key);
                continue;
            }

            tracing::info!("collecting trending posts from {}", seed_key);
            let seed_posts = self
                .trending_from_account(seed, params.post_limit_per_account, params.min_engagement)
                .await;
            collected.extend(seed_posts);
            visited.insert(seed_key.clone());

            if params.include_followers {
                tracing::info!("expanding into followers of {}", seed_key);
                let followers = self
                    .fetch_followers(seed, params.follower_count_per_seed)
                    .await;
                let follower_limit = params.post_limit_per_account.min(FOLLOWER_POST_CAP);

                for (position, follower) in followers.iter().enumerate() {
                    if visited.contains(&follower.handle) {
                        continue;
                    }

                    if follower.followers_count < POPULARITY_FLOOR {
                        tracing::debug!(
                            "pruning {} ({} followers)",
                            follower.handle,
                            follower.followers_count
                        );
                        continue;
                    }

                    tracing::info!(
                        "({}/{}) checking follower {}",
                        position + 1,
                        followers.len(),
                        follower.handle
                    );
                    let follower_posts = self
                        .trending_from_account(
                            &follower.handle,
                            follower_limit,
                            params.min_engagement,
                        )
                        .await;
                    collected.extend(follower_posts);
                    visited.insert(follower.handle.clone());
                }
            }

            if index + 1 < seeds.len() {
                self.pacer.after_batch().await;
            }
        }

        if collected.is_empty() {
            tracing::info!("no posts cleared the trending gate");
            return Ok(Vec::new());
        }

        tracing::info!("{} trending posts collected", collected.len());
        Ok(aggregate::rank_by_buzz(collected, params.top_n))
    }
}
