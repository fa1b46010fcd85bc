use serde::Deserialize;

/// Default seconds between two polls of a watched profile
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 10;

/// Default timeout for a single page fetch (seconds)
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;

/// Main configuration structure for Forum-Sentry
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub forum: ForumConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub profile: ProfileConfig,
    #[serde(default)]
    pub watch: Vec<WatchEntry>,
}

/// Remote forum configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ForumConfig {
    /// Base URL every forum page is resolved against (e.g. "http://forum.sa-mp.com/")
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Timeout for a single page fetch (seconds)
    #[serde(rename = "fetch-timeout-secs", default = "default_fetch_timeout")]
    pub fetch_timeout_secs: u64,
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

/// Profile extraction options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ProfileConfig {
    /// Whether to run the reputation lookup (two extra fetches per profile)
    #[serde(rename = "fetch-reputation", default = "default_true")]
    pub fetch_reputation: bool,

    /// How a visitor message section with no messages is reported
    #[serde(rename = "empty-visitor-section", default)]
    pub empty_visitor_section: EmptySectionPolicy,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            fetch_reputation: true,
            empty_visitor_section: EmptySectionPolicy::default(),
        }
    }
}

/// Treatment of a visitor message container that is present but holds no messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EmptySectionPolicy {
    /// An empty section is a valid, empty list
    #[default]
    Empty,
    /// An empty section is recorded as a field error
    Error,
}

/// A forum user whose post count is polled
#[derive(Debug, Clone, Deserialize)]
pub struct WatchEntry {
    /// Numeric forum user id
    #[serde(rename = "user-id")]
    pub user_id: String,

    /// Seconds between two polls
    #[serde(rename = "poll-interval-secs", default = "default_poll_interval")]
    pub poll_interval_secs: u64,
}

fn default_true() -> bool {
    true
}

fn default_fetch_timeout() -> u64 {
    DEFAULT_FETCH_TIMEOUT_SECS
}

fn default_poll_interval() -> u64 {
    DEFAULT_POLL_INTERVAL_SECS
}
