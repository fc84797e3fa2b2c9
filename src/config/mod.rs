//! Configuration module for saezuri
//!
//! Handles loading, parsing, and validating TOML configuration files.

mod parser;
mod types;
mod validation;

pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use types::{CollectConfig, Config, OutputConfig, PacingConfig, SourceConfig};
pub use validation::validate;
