use crate::config::types::{CollectConfig, Config, OutputConfig, SourceConfig};
use crate::ConfigError;
use crate::ident::normalize;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_collect_config(&config.collect)?;
    validate_source_config(&config.source)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates collection configuration
fn validate_collect_config(config: &CollectConfig) -> Result<(), ConfigError> {
    if config.seeds.is_empty() {
        return Err(ConfigError::Validation(
            "at least one seed account is required".to_string(),
        ));
    }

    for seed in &config.seeds {
        if normalize(seed).is_empty() {
            return Err(ConfigError::Validation(format!(
                "seed '{}' is empty after normalization",
                seed
            )));
        }
    }

    if config.post_limit_per_account < 1 || config.post_limit_per_account > 200 {
        return Err(ConfigError::Validation(format!(
            "post-limit-per-account must be between 1 and 200, got {}",
            config.post_limit_per_account
        )));
    }

    if config.follower_count_per_seed > 200 {
        return Err(ConfigError::Validation(format!(
            "follower-count-per-seed must be at most 200, got {}",
            config.follower_count_per_seed
        )));
    }

    if config.top_n < 1 {
        return Err(ConfigError::Validation(format!(
            "top-n must be >= 1, got {}",
            config.top_n
        )));
    }

    Ok(())
}

/// Validates source service configuration
fn validate_source_config(config: &SourceConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url must use HTTP or HTTPS, got '{}'",
            url.scheme()
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.results_path.is_empty() {
        return Err(ConfigError::Validation(
            "results-path cannot be empty".to_string(),
        ));
    }

    Ok(())
}
