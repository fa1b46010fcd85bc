//! Forum client: page fetcher, compiled queries and the profile pipeline

use crate::config::{validate_user_id, Config, ProfileConfig};
use crate::fetch::{HttpFetcher, PageFetcher};
use crate::forum::fields::FieldError;
use crate::forum::locator::LocateError;
use crate::forum::profile::{PageFields, ProfileSnapshot};
use crate::forum::queries::ForumQueries;
use crate::query::parse_document;
use crate::{Result, SentryError};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Scrapes one forum
///
/// Cheap to clone: the fetcher and compiled queries are shared, so one client
/// can serve any number of pollers.
#[derive(Clone)]
pub struct ForumClient {
    fetcher: Arc<dyn PageFetcher>,
    queries: Arc<ForumQueries>,
    base_url: Url,
    options: ProfileConfig,
}

impl ForumClient {
    /// Creates a client over an arbitrary page fetcher
    ///
    /// Compiles every static query; a malformed one fails here.
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        base_url: &str,
        options: ProfileConfig,
    ) -> Result<Self> {
        let mut base_url = Url::parse(base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            fetcher,
            queries: Arc::new(ForumQueries::compile()?),
            base_url,
            options,
        })
    }

    /// Creates an HTTP-backed client from the configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        let fetcher = HttpFetcher::from_config(
            &config.user_agent,
            Duration::from_secs(config.forum.fetch_timeout_secs),
        )?;
        Self::new(Arc::new(fetcher), &config.forum.base_url, config.profile)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub(crate) fn fetcher(&self) -> &dyn PageFetcher {
        self.fetcher.as_ref()
    }

    pub(crate) fn queries(&self) -> &ForumQueries {
        &self.queries
    }

    /// Profile page of `user_id`
    pub fn profile_url(&self, user_id: &str) -> std::result::Result<Url, LocateError> {
        self.user_page("member.php?u=", user_id)
    }

    /// "Find all posts by user" search page of `user_id`
    pub fn search_url(&self, user_id: &str) -> std::result::Result<Url, LocateError> {
        self.user_page("search.php?do=finduser&u=", user_id)
    }

    fn user_page(&self, page: &str, user_id: &str) -> std::result::Result<Url, LocateError> {
        validate_user_id(user_id).map_err(|_| LocateError::InvalidUserId(user_id.to_string()))?;
        Ok(self.base_url.join(&format!("{}{}", page, user_id))?)
    }

    /// Fetches a profile page and extracts every field it can
    ///
    /// Fails only when the page cannot be fetched or carries no user name.
    /// Every other field failure lands in [`ProfileSnapshot::field_errors`].
    ///
    /// Cost varies between one and three fetches: with reputation lookup
    /// enabled, the user's post listing and latest post are fetched too.
    pub async fn fetch_user_profile(&self, url: &str) -> Result<ProfileSnapshot> {
        let profile_url = Url::parse(url).map_err(|source| SentryError::InvalidProfileUrl {
            url: url.to_string(),
            source,
        })?;

        let html = self
            .fetcher
            .fetch_page(&profile_url)
            .await
            .map_err(|source| SentryError::Fetch {
                stage: "fetching user profile page",
                source,
            })?;

        let page = {
            let document = parse_document(&html);
            PageFields::extract(
                &document,
                &self.queries.profile,
                self.options.empty_visitor_section,
            )
        }
        .ok_or_else(|| SentryError::IdentityNotFound {
            url: url.to_string(),
        })?;

        let reputation = if self.options.fetch_reputation {
            Some(
                self.reputation_for(&profile_url)
                    .await
                    .map_err(FieldError::Reputation),
            )
        } else {
            None
        };

        let snapshot = ProfileSnapshot::assemble(page, reputation);
        if snapshot.is_degraded() {
            tracing::debug!(
                "Profile of {} is missing {} field(s)",
                snapshot.user_name,
                snapshot.field_errors.len()
            );
        }
        Ok(snapshot)
    }

    async fn reputation_for(&self, profile_url: &Url) -> std::result::Result<i64, LocateError> {
        let user_id = profile_url
            .query_pairs()
            .find(|(key, _)| key == "u")
            .map(|(_, value)| value.into_owned())
            .ok_or_else(|| LocateError::MissingUserId(profile_url.to_string()))?;
        self.fetch_reputation(&user_id).await
    }
}

impl std::fmt::Debug for ForumClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ForumClient")
            .field("base_url", &self.base_url.as_str())
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
