//! Forum-Sentry: a watcher for forum profile activity
//!
//! This crate scrapes a forum's HTML pages into structured facts (profile
//! fields, post counts, post bodies) and polls a user's profile to raise an
//! event whenever their post count goes up.

pub mod config;
pub mod fetch;
pub mod forum;
pub mod query;
pub mod watch;

use thiserror::Error;

/// Main error type for Forum-Sentry operations
#[derive(Debug, Error)]
pub enum SentryError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed {stage}: {source}")]
    Fetch {
        stage: &'static str,
        #[source]
        source: fetch::FetchError,
    },

    #[error("Page at {url} is not a valid user profile: user name not found")]
    IdentityNotFound { url: String },

    #[error("Invalid profile URL '{url}': {source}")]
    InvalidProfileUrl {
        url: String,
        #[source]
        source: ::url::ParseError,
    },

    #[error(transparent)]
    Locate(#[from] forum::LocateError),

    #[error("Query error: {0}")]
    Query(#[from] query::QueryError),

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Forum-Sentry operations
pub type Result<T> = std::result::Result<T, SentryError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use forum::{FieldError, ForumClient, LatestPost, ProfileSnapshot, VisitorMessage};
pub use watch::{start_polling, ChangeDetector, PollHandle, PollState, TickOutcome};
