//! Engagement scoring
//!
//! Two deliberately different formulas live here. The buzz score weights
//! engagement kinds for ranking; the trending gate compares the plain
//! unweighted sum against a caller threshold. Neither applies time decay, so
//! older posts are not penalized for age.

use crate::model::Post;

/// Weight applied to retweets in the buzz score
pub const RETWEET_WEIGHT: u64 = 3;

/// Weight applied to favorites in the buzz score
pub const FAVORITE_WEIGHT: u64 = 1;

/// Weight applied to replies in the buzz score
pub const REPLY_WEIGHT: u64 = 2;

/// Weighted engagement score used for ranking
pub fn buzz_score(post: &Post) -> u64 {
    RETWEET_WEIGHT * post.retweet_count
        + FAVORITE_WEIGHT * post.favorite_count
        + REPLY_WEIGHT * post.reply_count
}

/// Trending gate: the unweighted engagement sum against a minimum
///
/// Intentionally distinct from [`buzz_score`]; a post can clear the gate on
/// raw volume while still ranking low, and vice versa.
pub fn is_trending(post: &Post, min_engagement: u64) -> bool {
    post.retweet_count + post.favorite_count + post.reply_count >= min_engagement
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post_with_counts(retweets: u64, favorites: u64, replies: u64) -> Post {
        Post {
            id: "1".to_string(),
            text: String::new(),
            created_at: None,
            author_handle: "a".to_string(),
            author_id: None,
            retweet_count: retweets,
            favorite_count: favorites,
            reply_count: replies,
            quote_count: 0,
            url: String::new(),
            buzz_score: None,
            search_keyword: None,
        }
    }

    #[test]
    fn test_buzz_score_weights() {
        let post = post_with_counts(2, 5, 3);
        // 3*2 + 1*5 + 2*3
        assert_eq!(buzz_score(&post), 17);
    }

    #[test]
    fn test_buzz_score_zero_engagement() {
        let post = post_with_counts(0, 0, 0);
        assert_eq!(buzz_score(&post), 0);
    }

    #[test]
    fn test_is_trending_uses_unweighted_sum() {
        // Weighted score is 30, unweighted sum only 10
        let post = post_with_counts(10, 0, 0);
        assert_eq!(buzz_score(&post), 30);
        assert!(is_trending(&post, 10));
        assert!(!is_trending(&post, 11));
    }

    #[test]
    fn test_is_trending_boundary() {
        let post = post_with_counts(3, 4, 3);
        assert!(is_trending(&post, 10));
        assert!(!is_trending(&post, 11));
    }

    #[test]
    fn test_is_trending_zero_minimum() {
        let post = post_with_counts(0, 0, 0);
        assert!(is_trending(&post, 0));
    }
}
