//! Profile snapshots and their assembly from extracted fields

use crate::config::EmptySectionPolicy;
use crate::forum::fields::{
    extract_bio, extract_join_date, extract_total_posts, extract_user_name,
    extract_visitor_messages, FieldError, VisitorMessage,
};
use crate::forum::queries::ProfileQueries;
use chrono::{DateTime, Utc};
use scraper::Html;

/// Structured view of one user profile page
///
/// Only `user_name` is guaranteed. Every other field is best-effort: when it
/// could not be read it stays `None` (or empty) and the reason is recorded in
/// `field_errors`, in extraction order.
#[derive(Debug)]
pub struct ProfileSnapshot {
    pub user_name: String,
    pub join_date: Option<String>,
    pub total_posts: Option<u64>,
    pub reputation: Option<i64>,
    pub bio_text: Option<String>,
    pub visitor_messages: Vec<VisitorMessage>,
    pub field_errors: Vec<FieldError>,
    pub fetched_at: DateTime<Utc>,
}

impl ProfileSnapshot {
    /// True when every attempted field was read
    pub fn is_complete(&self) -> bool {
        self.field_errors.is_empty()
    }

    /// True when at least one field failed
    pub fn is_degraded(&self) -> bool {
        !self.is_complete()
    }

    pub(crate) fn assemble(page: PageFields, reputation: Option<Result<i64, FieldError>>) -> Self {
        let mut field_errors = Vec::new();

        let join_date = record(&mut field_errors, page.join_date);
        let total_posts = record(&mut field_errors, page.total_posts);
        let reputation = reputation.and_then(|r| record(&mut field_errors, r));
        let bio_text = record(&mut field_errors, page.bio);
        let visitor_messages =
            record(&mut field_errors, page.visitor_messages).unwrap_or_default();

        Self {
            user_name: page.user_name,
            join_date,
            total_posts,
            reputation,
            bio_text,
            visitor_messages,
            field_errors,
            fetched_at: Utc::now(),
        }
    }
}

fn record<T>(errors: &mut Vec<FieldError>, result: Result<T, FieldError>) -> Option<T> {
    result.map_err(|e| errors.push(e)).ok()
}

/// Fields read from the profile page itself, before any follow-up fetch
#[derive(Debug)]
pub(crate) struct PageFields {
    pub user_name: String,
    pub join_date: Result<String, FieldError>,
    pub total_posts: Result<u64, FieldError>,
    pub bio: Result<String, FieldError>,
    pub visitor_messages: Result<Vec<VisitorMessage>, FieldError>,
}

impl PageFields {
    /// Runs the page extractors; `None` when the user name is missing
    pub(crate) fn extract(
        document: &Html,
        queries: &ProfileQueries,
        empty_section: EmptySectionPolicy,
    ) -> Option<Self> {
        let root = document.root_element();
        let user_name = extract_user_name(root, &queries.user_name)?;

        Some(Self {
            user_name,
            join_date: extract_join_date(root, &queries.join_date),
            total_posts: extract_total_posts(root, &queries.total_posts),
            bio: extract_bio(root, &queries.bio),
            visitor_messages: extract_visitor_messages(root, &queries.visitor, empty_section),
        })
    }
}
