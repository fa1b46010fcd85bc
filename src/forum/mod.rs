//! Forum scraping: profile pages, post listings and posts
//!
//! # Components
//!
//! - `ForumClient`: entry point; owns the page fetcher and compiled queries
//! - `fields`: one extractor per profile field
//! - `profile`: assembles extracted fields into a `ProfileSnapshot`
//! - `locator`: follows a user's post listing to a post (latest post, reputation)
//! - `queries`: the forum's page layout as compiled queries

mod client;
mod fields;
mod locator;
mod profile;
mod queries;

pub use client::ForumClient;
pub use fields::{parse_count, Field, FieldError, VisitorMessage, MAX_VISITOR_MESSAGES};
pub use locator::{LatestPost, LocateError, PostReference};
pub use profile::ProfileSnapshot;
pub use queries::ForumQueries;
