use serde::Deserialize;

/// Main configuration structure for saezuri
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub pacing: PacingConfig,
    pub collect: CollectConfig,
    pub source: SourceConfig,
    pub output: OutputConfig,
}

/// Request pacing configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PacingConfig {
    /// Whether adaptive delays are inserted around remote calls
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Collection behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CollectConfig {
    /// Seed account handles or numeric ids (leading @ allowed)
    pub seeds: Vec<String>,

    /// Followers to list per seed account
    #[serde(rename = "follower-count-per-seed")]
    pub follower_count_per_seed: usize,

    /// Posts to fetch per account
    #[serde(rename = "post-limit-per-account")]
    pub post_limit_per_account: usize,

    /// Unweighted engagement sum a post must reach for the trending walk
    #[serde(rename = "min-engagement")]
    pub min_engagement: u64,

    /// Size of the final ranked result
    #[serde(rename = "top-n")]
    pub top_n: usize,

    /// Expand the trending walk one hop into each seed's followers
    #[serde(rename = "include-followers", default = "default_true")]
    pub include_followers: bool,
}

/// Source service configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    /// Origin of the service API, e.g. "https://api.twitter.com"
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// User agent sent with every request
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    /// Application bearer token attached when present
    #[serde(rename = "bearer-token", default)]
    pub bearer_token: Option<String>,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path the ranked JSON result set is written to
    #[serde(rename = "results-path")]
    pub results_path: String,
}

fn default_true() -> bool {
    true
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) \
     Chrome/122.0.0.0 Safari/537.36"
        .to_string()
}
