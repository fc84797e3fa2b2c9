//! Output module for persisting and presenting ranked results

mod json;
mod traits;

pub use json::JsonSink;
pub use traits::{ResultSink, SinkError, SinkResult};

use crate::model::Post;
use std::fmt::Write;

/// Renders a ranked result set as a plain-text summary for the terminal
pub fn render_ranked(posts: &[Post]) -> String {
    let mut out = String::new();

    for (rank, post) in posts.iter().enumerate() {
        let score = post.buzz_score.unwrap_or(0);
        let excerpt: String = post.text.chars().take(120).collect();

        let _ = writeln!(out, "{}. @{} (score {})", rank + 1, post.author_handle, score);
        let _ = writeln!(out, "   {}", excerpt);
        let _ = writeln!(
            out,
            "   fav {} | rt {} | replies {}",
            post.favorite_count, post.retweet_count, post.reply_count
        );
        if let Some(keyword) = &post.search_keyword {
            let _ = writeln!(out, "   matched: {}", keyword);
        }
        let _ = writeln!(out, "   {}", post.url);
    }

    out
}
