//! Configuration module for Forum-Sentry
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use forum_sentry::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("config.toml")).unwrap();
//! println!("Watching {} users", config.watch.len());
//! ```

mod parser;
mod types;
mod validation;

pub use types::{
    Config, EmptySectionPolicy, ForumConfig, ProfileConfig, UserAgentConfig, WatchEntry,
    DEFAULT_FETCH_TIMEOUT_SECS, DEFAULT_POLL_INTERVAL_SECS,
};

pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};

pub(crate) use validation::validate_user_id;
