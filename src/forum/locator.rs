//! Post locator: user id → post listing → post page → post
//!
//! Both lookups start from the forum's "find all posts by user" search page,
//! follow the first listed post to its thread page and read one piece of
//! that post: the poster's reputation, or the message body.

use crate::fetch::FetchError;
use crate::forum::client::ForumClient;
use crate::forum::fields::parse_count;
use crate::forum::queries::{ForumQueries, POST_FRAGMENT_PREFIX, REPUTATION_PREFIX};
use crate::query::{parse_document, QueryError};
use thiserror::Error;
use url::Url;

/// Failures of the post locator pipelines
#[derive(Debug, Error)]
pub enum LocateError {
    #[error("Failed {stage}: {source}")]
    Fetch {
        stage: &'static str,
        #[source]
        source: FetchError,
    },

    #[error("Invalid user id '{0}'")]
    InvalidUserId(String),

    #[error("Profile URL {0} carries no user id")]
    MissingUserId(String),

    #[error("User's post listing has no posts")]
    EmptyListing,

    #[error("Title of the first listed post not found")]
    MissingTitle,

    #[error("Malformed post reference '{0}'")]
    MalformedReference(String),

    #[error("Post {0} not found on its thread page")]
    MissingPost(String),

    #[error("Reputation not found in post {0}")]
    MissingReputation(String),

    #[error("Reputation value '{0}' is not a valid number")]
    BadReputation(String),

    #[error("Query error: {0}")]
    Query(#[from] QueryError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),
}

/// Link from a post listing to one post inside a thread page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostReference {
    /// Thread page, relative to the forum base or absolute
    pub url: String,
    /// Anchor of the post on that page
    pub fragment_id: String,
}

impl PostReference {
    /// Splits an href like "showthread.php?t=9#post123" at its fragment marker
    pub fn parse(href: &str) -> Result<Self, LocateError> {
        let malformed = || LocateError::MalformedReference(href.to_string());

        let (url, fragment) = href.trim().split_once('#').ok_or_else(malformed)?;
        if url.is_empty() || fragment.is_empty() {
            return Err(malformed());
        }
        // The fragment ends up inside a selector.
        if !fragment
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(malformed());
        }

        Ok(Self {
            url: url.to_string(),
            fragment_id: fragment.to_string(),
        })
    }

    /// Forum-wide post id: "123" for "#post123"
    pub fn post_id(&self) -> Option<&str> {
        self.fragment_id
            .strip_prefix(POST_FRAGMENT_PREFIX)
            .filter(|id| !id.is_empty())
    }
}

/// Title and body of a user's most recent post
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LatestPost {
    pub title: String,
    pub body: String,
}

impl ForumClient {
    /// Fetches the most recent post of `user_id`
    ///
    /// All-or-nothing: any missing piece fails the whole lookup. Costs two
    /// fetches.
    pub async fn fetch_latest_post(&self, user_id: &str) -> Result<LatestPost, LocateError> {
        let listing_url = self.search_url(user_id)?;
        let listing = self
            .fetch_stage(&listing_url, "fetching user's post listing")
            .await?;

        let (title, href) = {
            let document = parse_document(&listing);
            let root = document.root_element();
            let queries = &self.queries().listing;
            (queries.title.string_value(root), queries.href.string_value(root))
        };
        let title = title.ok_or(LocateError::MissingTitle)?;
        let href = href.ok_or(LocateError::EmptyListing)?;

        let reference = PostReference::parse(&href)?;
        let post_id = reference
            .post_id()
            .ok_or_else(|| LocateError::MalformedReference(href.clone()))?
            .to_string();
        tracing::debug!("Latest post of user {} is {} ({})", user_id, post_id, href);

        let post_url = self.resolve_reference(&reference)?;
        let page = self
            .fetch_stage(&post_url, "fetching user's latest post")
            .await?;

        let query = ForumQueries::post_message(&post_id)?;
        let document = parse_document(&page);
        let body = query
            .string_value(document.root_element())
            .ok_or(LocateError::MissingPost(post_id))?;

        Ok(LatestPost {
            title: title.trim().to_string(),
            body: body.trim().to_string(),
        })
    }

    /// Reads the reputation of `user_id` from the poster info of their latest post
    ///
    /// The profile page does not show reputation, so this costs two fetches.
    pub async fn fetch_reputation(&self, user_id: &str) -> Result<i64, LocateError> {
        let listing_url = self.search_url(user_id)?;
        let listing = self
            .fetch_stage(&listing_url, "fetching user's post listing")
            .await?;

        let href = {
            let document = parse_document(&listing);
            self.queries()
                .listing
                .first_post_href
                .string_value(document.root_element())
        }
        .ok_or(LocateError::EmptyListing)?;

        let reference = PostReference::parse(&href)?;
        let post_url = self.resolve_reference(&reference)?;
        let page = self
            .fetch_stage(&post_url, "fetching user's post in a topic")
            .await?;

        let query = ForumQueries::reputation_in_post(&reference.fragment_id)?;
        let document = parse_document(&page);
        let raw = query
            .string_value(document.root_element())
            .ok_or_else(|| LocateError::MissingReputation(reference.fragment_id.clone()))?;

        parse_count(&raw, REPUTATION_PREFIX)
            .ok_or_else(|| LocateError::BadReputation(raw.trim().to_string()))
    }

    /// Absolute thread URL of a post reference, without its fragment
    fn resolve_reference(&self, reference: &PostReference) -> Result<Url, LocateError> {
        let mut url = self.base_url().join(&reference.url)?;
        url.set_fragment(None);
        Ok(url)
    }

    async fn fetch_stage(&self, url: &Url, stage: &'static str) -> Result<String, LocateError> {
        self.fetcher()
            .fetch_page(url)
            .await
            .map_err(|source| LocateError::Fetch { stage, source })
    }
}
