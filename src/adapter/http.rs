//! Guest-mode HTTP adapter
//!
//! Talks to the source service's JSON API without a logged-in account:
//! - a one-time activation call obtains a guest token
//! - profile, timeline, and follower endpoints are plain GETs with the
//!   bearer and guest token attached as headers
//!
//! Responses are deserialized into private wire structs and converted to the
//! public record types; the rest of the crate never sees the wire shapes.
//! The base URL is configurable so tests can point the adapter at a mock
//! server.

use crate::adapter::{AdapterError, AdapterResult, Capabilities, SourceAdapter};
use crate::config::SourceConfig;
use crate::ident::AccountRef;
use crate::model::{Post, UserProfile};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use url::Url;

const ACTIVATE_PATH: &str = "1.1/guest/activate.json";
const USER_SHOW_PATH: &str = "1.1/users/show.json";
const USER_TIMELINE_PATH: &str = "1.1/statuses/user_timeline.json";
const FOLLOWERS_PATH: &str = "1.1/followers/list.json";

/// Timestamp format used by the service, e.g. `Wed Oct 10 20:19:24 +0000 2018`
const SERVICE_TIME_FORMAT: &str = "%a %b %d %H:%M:%S %z %Y";

/// Builds an HTTP client with the configured user agent and sane timeouts
pub fn build_http_client(user_agent: &str) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Source adapter backed by the service's guest JSON API
pub struct GuestApiAdapter {
    client: Client,
    base_url: Url,
    bearer_token: Option<String>,
    guest_token: Option<String>,
}

impl GuestApiAdapter {
    /// Creates an inactive adapter from the source configuration
    ///
    /// [`SourceAdapter::activate`] must run before any fetch.
    pub fn new(source: &SourceConfig) -> AdapterResult<Self> {
        let base_url = Url::parse(&source.base_url)
            .map_err(|e| AdapterError::Transport(format!("invalid base url: {}", e)))?;
        let client = build_http_client(&source.user_agent)
            .map_err(|e| AdapterError::Transport(format!("failed to build client: {}", e)))?;

        Ok(Self {
            client,
            base_url,
            bearer_token: source.bearer_token.clone(),
            guest_token: None,
        })
    }

    fn endpoint(&self, path: &str) -> AdapterResult<Url> {
        self.base_url
            .join(path)
            .map_err(|e| AdapterError::Transport(format!("invalid endpoint {}: {}", path, e)))
    }

    fn decorate(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let mut request = request;
        if let Some(bearer) = &self.bearer_token {
            request = request.bearer_auth(bearer);
        }
        if let Some(token) = &self.guest_token {
            request = request.header("x-guest-token", token);
        }
        request
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> AdapterResult<T> {
        let response = self
            .decorate(self.client.get(url.clone()))
            .send()
            .await
            .map_err(classify_transport)?;

        let status = response.status();
        if status.is_success() {
            response
                .json::<T>()
                .await
                .map_err(|e| AdapterError::Transport(format!("malformed response: {}", e)))
        } else {
            Err(error_for_status(status, url.path()))
        }
    }
}

#[async_trait]
impl SourceAdapter for GuestApiAdapter {
    async fn activate(&mut self) -> AdapterResult<()> {
        let url = self.endpoint(ACTIVATE_PATH)?;
        let response = self
            .decorate(self.client.post(url.clone()))
            .send()
            .await
            .map_err(classify_transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(error_for_status(status, url.path()));
        }

        let token: WireGuestToken = response
            .json()
            .await
            .map_err(|e| AdapterError::Transport(format!("malformed response: {}", e)))?;
        self.guest_token = Some(token.guest_token);

        tracing::info!("guest session activated");
        Ok(())
    }

    fn capabilities(&self) -> Capabilities {
        // Service-side search needs a logged-in session, which a guest
        // adapter never holds.
        Capabilities {
            fetch_by_handle: true,
            fetch_by_id: true,
            fetch_followers: true,
            authenticated_search: false,
        }
    }

    async fn resolve_profile(&self, target: &AccountRef) -> AdapterResult<UserProfile> {
        let mut url = self.endpoint(USER_SHOW_PATH)?;
        match target {
            AccountRef::Handle(handle) => {
                url.query_pairs_mut().append_pair("screen_name", handle);
            }
            AccountRef::Id(id) => {
                url.query_pairs_mut().append_pair("user_id", id);
            }
        }

        let user: WireUser = self.get_json(url).await?;
        Ok(user.into())
    }

    async fn list_posts(&self, account_id: &str, limit: usize) -> AdapterResult<Vec<Post>> {
        let mut url = self.endpoint(USER_TIMELINE_PATH)?;
        url.query_pairs_mut()
            .append_pair("user_id", account_id)
            .append_pair("count", &limit.to_string());

        let tweets: Vec<WireTweet> = self.get_json(url).await?;
        Ok(tweets.into_iter().map(Post::from).collect())
    }

    async fn list_followers(
        &self,
        account_id: &str,
        limit: usize,
    ) -> AdapterResult<Vec<UserProfile>> {
        let mut url = self.endpoint(FOLLOWERS_PATH)?;
        url.query_pairs_mut()
            .append_pair("user_id", account_id)
            .append_pair("count", &limit.to_string());

        let page: WireFollowerPage = self.get_json(url).await?;
        Ok(page.users.into_iter().map(UserProfile::from).collect())
    }
}

/// Maps request-level failures onto the adapter taxonomy
fn classify_transport(error: reqwest::Error) -> AdapterError {
    if error.is_timeout() {
        AdapterError::Transport("request timeout".to_string())
    } else if error.is_connect() {
        AdapterError::Transport("connection refused".to_string())
    } else {
        AdapterError::Transport(error.to_string())
    }
}

/// Maps HTTP status codes onto the adapter taxonomy
fn error_for_status(status: StatusCode, path: &str) -> AdapterError {
    match status {
        StatusCode::NOT_FOUND => {
            AdapterError::Lookup(format!("{} returned HTTP 404", path))
        }
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            AdapterError::Auth(format!("{} returned HTTP {}", path, status.as_u16()))
        }
        _ => AdapterError::Transport(format!("{} returned HTTP {}", path, status.as_u16())),
    }
}

fn parse_service_time(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_str(raw, SERVICE_TIME_FORMAT)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

#[derive(Debug, Deserialize)]
struct WireGuestToken {
    guest_token: String,
}

#[derive(Debug, Deserialize)]
struct WireUser {
    id_str: String,
    screen_name: String,
    name: String,
    #[serde(default)]
    description: String,
    followers_count: u64,
    #[serde(default)]
    friends_count: u64,
    #[serde(default)]
    statuses_count: u64,
    #[serde(default)]
    verified: bool,
    #[serde(default)]
    profile_image_url_https: Option<String>,
    #[serde(default)]
    created_at: Option<String>,
}

impl From<WireUser> for UserProfile {
    fn from(user: WireUser) -> Self {
        UserProfile {
            id: user.id_str,
            handle: user.screen_name,
            display_name: user.name,
            description: user.description,
            followers_count: user.followers_count,
            following_count: user.friends_count,
            post_count: user.statuses_count,
            verified: user.verified,
            avatar_url: user.profile_image_url_https,
            created_at: user.created_at.as_deref().and_then(parse_service_time),
        }
    }
}

#[derive(Debug, Deserialize)]
struct WireFollowerPage {
    #[serde(default)]
    users: Vec<WireUser>,
}

#[derive(Debug, Deserialize)]
struct WireTweet {
    id_str: String,
    #[serde(alias = "full_text")]
    text: String,
    #[serde(default)]
    created_at: Option<String>,
    #[serde(default)]
    retweet_count: u64,
    #[serde(default)]
    favorite_count: u64,
    #[serde(default)]
    reply_count: u64,
    #[serde(default)]
    quote_count: u64,
    #[serde(default)]
    user: Option<WireTweetAuthor>,
}

#[derive(Debug, Deserialize)]
struct WireTweetAuthor {
    screen_name: String,
}

impl From<WireTweet> for Post {
    fn from(tweet: WireTweet) -> Self {
        // The traversal engine re-stamps authorship with the resolved
        // profile; the embedded author is only a best-effort base value.
        let author_handle = tweet
            .user
            .map(|author| author.screen_name)
            .unwrap_or_default();
        let url = if author_handle.is_empty() {
            String::new()
        } else {
            Post::permalink(&author_handle, &tweet.id_str)
        };

        Post {
            id: tweet.id_str,
            text: tweet.text,
            created_at: tweet.created_at.as_deref().and_then(parse_service_time),
            author_handle,
            author_id: None,
            retweet_count: tweet.retweet_count,
            favorite_count: tweet.favorite_count,
            reply_count: tweet.reply_count,
            quote_count: tweet.quote_count,
            url,
            buzz_score: None,
            search_keyword: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    fn test_source_config() -> SourceConfig {
        SourceConfig {
            base_url: "https://api.example.com".to_string(),
            user_agent: "test-agent/1.0".to_string(),
            bearer_token: None,
        }
    }

    #[test]
    fn test_build_http_client() {
        assert!(build_http_client("test-agent/1.0").is_ok());
    }

    #[test]
    fn test_new_adapter_is_inactive() {
        let adapter = GuestApiAdapter::new(&test_source_config()).unwrap();
        assert!(adapter.guest_token.is_none());
    }

    #[test]
    fn test_new_adapter_rejects_bad_base_url() {
        let mut source = test_source_config();
        source.base_url = "not a url".to_string();
        assert!(GuestApiAdapter::new(&source).is_err());
    }

    #[test]
    fn test_guest_capabilities() {
        let adapter = GuestApiAdapter::new(&test_source_config()).unwrap();
        let caps = adapter.capabilities();

        assert!(caps.fetch_by_handle);
        assert!(caps.fetch_by_id);
        assert!(caps.fetch_followers);
        assert!(!caps.authenticated_search);
    }

    #[test]
    fn test_parse_service_time() {
        let parsed = parse_service_time("Wed Oct 10 20:19:24 +0000 2018").unwrap();
        assert_eq!(parsed.year(), 2018);
        assert_eq!(parsed.month(), 10);
        assert_eq!(parsed.day(), 10);
    }

    #[test]
    fn test_parse_service_time_rejects_garbage() {
        assert!(parse_service_time("yesterday").is_none());
    }

    #[test]
    fn test_wire_user_conversion() {
        let raw = r#"{
            "id_str": "44196397",
            "screen_name": "alice",
            "name": "Alice",
            "description": "hi",
            "followers_count": 5000,
            "friends_count": 10,
            "statuses_count": 200,
            "verified": true,
            "profile_image_url_https": "https://img.example.com/a.png",
            "created_at": "Wed Oct 10 20:19:24 +0000 2018"
        }"#;
        let user: WireUser = serde_json::from_str(raw).unwrap();
        let profile = UserProfile::from(user);

        assert_eq!(profile.id, "44196397");
        assert_eq!(profile.handle, "alice");
        assert_eq!(profile.followers_count, 5000);
        assert!(profile.verified);
        assert!(profile.created_at.is_some());
    }

    #[test]
    fn test_wire_tweet_conversion_without_author() {
        let raw = r#"{
            "id_str": "77",
            "text": "hello world",
            "retweet_count": 2,
            "favorite_count": 3,
            "reply_count": 1
        }"#;
        let tweet: WireTweet = serde_json::from_str(raw).unwrap();
        let post = Post::from(tweet);

        assert_eq!(post.id, "77");
        assert!(post.author_handle.is_empty());
        assert!(post.url.is_empty());
        assert_eq!(post.quote_count, 0);
        assert!(post.buzz_score.is_none());
    }

    #[test]
    fn test_wire_tweet_conversion_with_author() {
        let raw = r#"{
            "id_str": "77",
            "full_text": "hello world",
            "retweet_count": 0,
            "favorite_count": 0,
            "reply_count": 0,
            "user": {"screen_name": "alice"}
        }"#;
        let tweet: WireTweet = serde_json::from_str(raw).unwrap();
        let post = Post::from(tweet);

        assert_eq!(post.author_handle, "alice");
        assert_eq!(post.url, "https://twitter.com/alice/status/77");
    }

    #[test]
    fn test_error_for_status_taxonomy() {
        assert!(matches!(
            error_for_status(StatusCode::NOT_FOUND, "/p"),
            AdapterError::Lookup(_)
        ));
        assert!(matches!(
            error_for_status(StatusCode::UNAUTHORIZED, "/p"),
            AdapterError::Auth(_)
        ));
        assert!(matches!(
            error_for_status(StatusCode::FORBIDDEN, "/p"),
            AdapterError::Auth(_)
        ));
        assert!(matches!(
            error_for_status(StatusCode::INTERNAL_SERVER_ERROR, "/p"),
            AdapterError::Transport(_)
        ));
    }
}
