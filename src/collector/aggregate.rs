//! Ranking and keyword-search entry points
//!
//! These share the traversal engine's fetch primitives but apply different
//! filter and ranking policies: pure ranking scores everything, keyword
//! search keeps case-insensitive substring matches, and the
//! follower-inclusive search applies the same popularity prune as the
//! trending walk.

use crate::adapter::SourceAdapter;
use crate::collector::engine::{validate_counts, Collector};
use crate::collector::{FOLLOWER_POST_CAP, POPULARITY_FLOOR};
use crate::ident::normalize;
use crate::model::Post;
use crate::scoring::buzz_score;
use crate::{Result, SaezuriError};
use std::collections::HashSet;

impl<A: SourceAdapter> Collector<A> {
    /// Pure ranking: every post from every account, scored and sorted
    ///
    /// No trending gate, no follower expansion. Failed accounts contribute
    /// nothing and the run continues.
    pub async fn top_buzz_from_accounts(
        &mut self,
        accounts: &[String],
        limit_per_account: usize,
        top_n: usize,
    ) -> Result<Vec<Post>> {
        validate_counts(limit_per_account, top_n)?;

        tracing::info!("ranking posts from {} accounts", accounts.len());
        let mut posts = self.fetch_many(accounts, limit_per_account).await;
        if posts.is_empty() {
            return Ok(Vec::new());
        }

        for post in &mut posts {
            post.buzz_score = Some(buzz_score(post));
        }
        Ok(rank_by_buzz(posts, top_n))
    }

    /// Case-insensitive keyword search over one account's recent posts
    async fn search_account(&mut self, identifier: &str, keyword: &str, limit: usize) -> Vec<Post> {
        let posts = self.fetch_posts(identifier, limit).await;
        filter_by_keyword(posts, keyword)
    }

    /// Keyword search across several accounts, ranked by buzz score
    ///
    /// Survivors are tagged with the matched keyword and scored; the walk
    /// shares the failure policy of every other entry point.
    pub async fn search_accounts_for_keyword(
        &mut self,
        accounts: &[String],
        keyword: &str,
        limit_per_account: usize,
        top_n: usize,
    ) -> Result<Vec<Post>> {
        validate_counts(limit_per_account, top_n)?;
        validate_keyword(keyword)?;

        let mut matches = Vec::new();
        for account in accounts {
            tracing::info!("searching {} for '{}'", account, keyword);
            let found = self.search_account(account, keyword, limit_per_account).await;
            matches.extend(found);
        }

        if matches.is_empty() {
            tracing::info!("no posts matched '{}'", keyword);
            return Ok(Vec::new());
        }

        tracing::info!("{} posts matched '{}'", matches.len(), keyword);
        Ok(rank_by_buzz(matches, top_n))
    }

    /// Keyword search over a seed account and one hop of its followers
    ///
    /// Followers below the popularity floor are pruned before their posts
    /// are searched, mirroring the trending walk.
    pub async fn search_with_followers(
        &mut self,
        seed: &str,
        keyword: &str,
        follower_count: usize,
        limit_per_account: usize,
        top_n: usize,
    ) -> Result<Vec<Post>> {
        validate_counts(limit_per_account, top_n)?;
        validate_keyword(keyword)?;

        let mut visited: HashSet<String> = HashSet::new();
        let mut matches = Vec::new();

        let seed_key = normalize(seed);
        tracing::info!("searching {} and followers for '{}'", seed_key, keyword);
        matches.extend(self.search_account(seed, keyword, limit_per_account).await);
        visited.insert(seed_key);

        let followers = self.fetch_followers(seed, follower_count).await;
        let follower_limit = limit_per_account.min(FOLLOWER_POST_CAP);

        for (position, follower) in followers.iter().enumerate() {
            if visited.contains(&follower.handle) {
                continue;
            }

            if follower.followers_count < POPULARITY_FLOOR {
                continue;
            }

            tracing::info!(
                "({}/{}) searching follower {}",
                position + 1,
                followers.len(),
                follower.handle
            );
            matches.extend(
                self.search_account(&follower.handle, keyword, follower_limit)
                    .await,
            );
            visited.insert(follower.handle.clone());
        }

        if matches.is_empty() {
            tracing::info!("no posts matched '{}'", keyword);
            return Ok(Vec::new());
        }

        Ok(rank_by_buzz(matches, top_n))
    }
}

fn validate_keyword(keyword: &str) -> Result<()> {
    if keyword.trim().is_empty() {
        return Err(SaezuriError::InvalidParameters(
            "search keyword must not be empty".to_string(),
        ));
    }
    Ok(())
}

/// Stable descending sort by buzz score, truncated to `top_n`
///
/// The sort is stable, so posts with equal scores keep their discovery
/// order. Unscored posts rank as zero.
pub(crate) fn rank_by_buzz(mut posts: Vec<Post>, top_n: usize) -> Vec<Post> {
    posts.sort_by(|a, b| b.buzz_score.unwrap_or(0).cmp(&a.buzz_score.unwrap_or(0)));
    posts.truncate(top_n);
    posts
}

/// Retains posts containing `keyword` case-insensitively, scoring and
/// tagging each survivor
fn filter_by_keyword(posts: Vec<Post>, keyword: &str) -> Vec<Post> {
    let needle = keyword.to_lowercase();
    posts
        .into_iter()
        .filter(|post| post.text.to_lowercase().contains(&needle))
        .map(|mut post| {
            post.buzz_score = Some(buzz_score(&post));
            post.search_keyword = Some(keyword.to_string());
            post
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::testutil::{post, profile, ScriptedAdapter};
    use crate::pacing::Pacer;

    fn collector(adapter: ScriptedAdapter) -> Collector<ScriptedAdapter> {
        Collector::new(adapter, Pacer::new(false))
    }

    fn scored(id: &str, score: u64) -> Post {
        let mut p = post(id, "x", 0, score, 0);
        p.buzz_score = Some(score);
        p
    }

    #[test]
    fn test_rank_by_buzz_sorts_descending() {
        let ranked = rank_by_buzz(vec![scored("a", 10), scored("b", 40), scored("c", 25)], 10);
        let ids: Vec<&str> = ranked.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c", "a"]);
    }

    #[test]
    fn test_rank_by_buzz_stable_on_ties() {
        let ranked = rank_by_buzz(
            vec![scored("first", 25), scored("second", 25), scored("third", 25)],
            10,
        );
        let ids: Vec<&str> = ranked.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_rank_by_buzz_truncates() {
        let ranked = rank_by_buzz(vec![scored("a", 1), scored("b", 2), scored("c", 3)], 2);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].id, "c");
    }

    #[test]
    fn test_rank_by_buzz_top_n_beyond_size() {
        let ranked = rank_by_buzz(vec![scored("a", 1)], 50);
        assert_eq!(ranked.len(), 1);
    }

    #[test]
    fn test_filter_by_keyword_case_insensitive() {
        let posts = vec![
            post("1", "I love AI", 0, 0, 0),
            post("2", "no match", 0, 0, 0),
            post("3", "ai is great", 0, 0, 0),
        ];
        let matches = filter_by_keyword(posts, "AI");

        assert_eq!(matches.len(), 2);
        for found in &matches {
            assert_eq!(found.search_keyword.as_deref(), Some("AI"));
            assert!(found.buzz_score.is_some());
        }
    }

    #[tokio::test]
    async fn test_top_buzz_scores_everything() {
        let adapter = ScriptedAdapter::new()
            .with_account(
                profile("alice", "101", 5000),
                vec![post("a1", "x", 0, 10, 0), post("a2", "y", 0, 40, 0)],
            )
            .with_account(profile("bob", "102", 5000), vec![post("b1", "z", 0, 25, 0)]);
        let mut collector = collector(adapter);

        let accounts = vec!["alice".to_string(), "bob".to_string()];
        let result = collector.top_buzz_from_accounts(&accounts, 50, 2).await.unwrap();

        let ids: Vec<&str> = result.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["a2", "b1"]);
        assert_eq!(result[0].buzz_score, Some(40));
    }

    #[tokio::test]
    async fn test_top_buzz_has_no_trending_gate() {
        let adapter = ScriptedAdapter::new()
            .with_account(profile("alice", "101", 5000), vec![post("a1", "x", 0, 0, 0)]);
        let mut collector = collector(adapter);

        let result = collector
            .top_buzz_from_accounts(&["alice".to_string()], 50, 10)
            .await
            .unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].buzz_score, Some(0));
    }

    #[tokio::test]
    async fn test_search_tags_and_ranks_matches() {
        let adapter = ScriptedAdapter::new().with_account(
            profile("alice", "101", 5000),
            vec![
                post("1", "I love AI", 0, 5, 0),
                post("2", "no match", 0, 100, 0),
                post("3", "ai is great", 0, 50, 0),
            ],
        );
        let mut collector = collector(adapter);

        let result = collector
            .search_accounts_for_keyword(&["alice".to_string()], "AI", 50, 10)
            .await
            .unwrap();

        let ids: Vec<&str> = result.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["3", "1"]);
        assert_eq!(result[0].search_keyword.as_deref(), Some("AI"));
    }

    #[tokio::test]
    async fn test_search_failed_account_skipped() {
        let adapter = ScriptedAdapter::new()
            .with_account(profile("alice", "101", 5000), vec![post("1", "AI news", 0, 1, 0)])
            .with_failure("bob");
        let mut collector = collector(adapter);

        let accounts = vec!["alice".to_string(), "bob".to_string()];
        let result = collector
            .search_accounts_for_keyword(&accounts, "AI", 50, 10)
            .await
            .unwrap();

        assert_eq!(result.len(), 1);
    }

    #[tokio::test]
    async fn test_search_no_matches_is_empty_ok() {
        let adapter = ScriptedAdapter::new()
            .with_account(profile("alice", "101", 5000), vec![post("1", "hello", 0, 1, 0)]);
        let mut collector = collector(adapter);

        let result = collector
            .search_accounts_for_keyword(&["alice".to_string()], "rust", 50, 10)
            .await
            .unwrap();

        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn test_search_rejects_empty_keyword() {
        let adapter = ScriptedAdapter::new();
        let mut collector = collector(adapter);

        let result = collector
            .search_accounts_for_keyword(&["alice".to_string()], "  ", 50, 10)
            .await;

        assert!(matches!(result, Err(SaezuriError::InvalidParameters(_))));
    }

    #[tokio::test]
    async fn test_search_with_followers_prunes_small_accounts() {
        let adapter = ScriptedAdapter::new()
            .with_account(profile("seed", "100", 5000), vec![post("s1", "AI here", 0, 1, 0)])
            .with_account(profile("small", "201", 999), vec![post("x1", "AI there", 0, 9, 0)])
            .with_account(profile("big", "202", 1500), vec![post("b1", "more AI", 0, 5, 0)])
            .with_followers("seed", &["small", "big"]);
        let mut collector = collector(adapter);

        let result = collector
            .search_with_followers("seed", "AI", 10, 50, 10)
            .await
            .unwrap();

        let ids: Vec<&str> = result.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["b1", "s1"]);
        assert_eq!(collector.adapter().call_count("posts:201"), 0);
    }

    #[tokio::test]
    async fn test_search_with_followers_skips_seed_in_follower_list() {
        let adapter = ScriptedAdapter::new()
            .with_account(profile("seed", "100", 5000), vec![post("s1", "AI", 0, 1, 0)])
            .with_followers("seed", &["seed"]);
        let mut collector = collector(adapter);

        let result = collector
            .search_with_followers("@seed", "AI", 10, 50, 10)
            .await
            .unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(collector.adapter().call_count("posts:100"), 1);
    }
}
