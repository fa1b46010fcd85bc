//! Page fetching for forum scraping
//!
//! Everything above this module only sees [`PageFetcher`]: the HTTP
//! implementation lives in [`HttpFetcher`], tests plug in canned pages.

mod fetcher;

pub use fetcher::{build_http_client, HttpFetcher};

use async_trait::async_trait;
use thiserror::Error;
use url::Url;

/// Errors raised while fetching a page
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error for {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("HTTP status {status} for {url}")]
    Status { url: String, status: u16 },
}

/// Source of raw forum pages
///
/// Implementations return the HTML body of a page on success. Non-2xx
/// responses and transport failures are errors; callers wrap them with the
/// stage that failed and never retry within the same operation.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch_page(&self, url: &Url) -> Result<String, FetchError>;
}
