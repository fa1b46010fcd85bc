//! Per-field extractors for profile pages
//!
//! Each extractor reads one field from a parsed page. Only the user name is
//! mandatory; every other extractor reports failure as a [`FieldError`] which
//! the profile assembler collects instead of aborting.

use crate::config::EmptySectionPolicy;
use crate::forum::locator::LocateError;
use crate::forum::queries::{VisitorQueries, JOIN_DATE_PREFIX, TOTAL_POSTS_PREFIX};
use crate::query::Query;
use scraper::ElementRef;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Upper bound on visitor messages kept per profile (the page shows ten)
pub const MAX_VISITOR_MESSAGES: usize = 10;

/// A profile field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    UserName,
    JoinDate,
    TotalPosts,
    Reputation,
    Bio,
    VisitorMessages,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::UserName => "user name",
            Self::JoinDate => "join date",
            Self::TotalPosts => "total posts",
            Self::Reputation => "reputation",
            Self::Bio => "bio",
            Self::VisitorMessages => "visitor messages",
        };
        f.write_str(name)
    }
}

/// A non-fatal failure to extract one profile field
#[derive(Debug, Error)]
pub enum FieldError {
    #[error("{0} not found on profile page")]
    Missing(Field),

    #[error("{field} value '{raw}' is not a valid number")]
    NotANumber { field: Field, raw: String },

    #[error("visitor message section has no messages")]
    EmptyVisitorSection,

    #[error("reputation lookup failed: {0}")]
    Reputation(#[source] LocateError),
}

impl FieldError {
    /// The field this error belongs to
    pub fn field(&self) -> Field {
        match self {
            Self::Missing(field) | Self::NotANumber { field, .. } => *field,
            Self::EmptyVisitorSection => Field::VisitorMessages,
            Self::Reputation(_) => Field::Reputation,
        }
    }
}

/// A message left on a user's profile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisitorMessage {
    pub author: String,
    pub body: String,
}

/// Parses a counter such as "Total Posts: 12,345"
///
/// Surrounding whitespace and `prefix` are stripped and thousands separators
/// removed, so "12,345" and "12345" read the same.
pub fn parse_count<T: FromStr>(raw: &str, prefix: &str) -> Option<T> {
    let trimmed = raw.trim();
    let value = trimmed
        .strip_prefix(prefix.trim_end())
        .unwrap_or(trimmed)
        .trim();
    let digits: String = value.chars().filter(|c| *c != ',').collect();
    digits.parse().ok()
}

/// Reads the profile owner's name; `None` means the page is not a profile
pub fn extract_user_name(root: ElementRef<'_>, query: &Query) -> Option<String> {
    query
        .string_value(root)
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
}

pub fn extract_join_date(root: ElementRef<'_>, query: &Query) -> Result<String, FieldError> {
    let raw = query
        .string_value(root)
        .ok_or(FieldError::Missing(Field::JoinDate))?;
    let raw = raw.trim();
    Ok(raw.strip_prefix(JOIN_DATE_PREFIX).unwrap_or(raw).trim().to_string())
}

pub fn extract_total_posts(root: ElementRef<'_>, query: &Query) -> Result<u64, FieldError> {
    let raw = query
        .string_value(root)
        .ok_or(FieldError::Missing(Field::TotalPosts))?;
    parse_count(&raw, TOTAL_POSTS_PREFIX).ok_or_else(|| FieldError::NotANumber {
        field: Field::TotalPosts,
        raw: raw.trim().to_string(),
    })
}

/// Bio text is returned verbatim; it is free-form and often multi-line.
pub fn extract_bio(root: ElementRef<'_>, query: &Query) -> Result<String, FieldError> {
    query
        .string_value(root)
        .ok_or(FieldError::Missing(Field::Bio))
}

/// Collects visitor messages in page order
///
/// A block missing its author or its body is skipped without error. A page
/// with no message section at all is an error; a section without messages is
/// handled according to `empty_section`.
pub fn extract_visitor_messages(
    root: ElementRef<'_>,
    queries: &VisitorQueries,
    empty_section: EmptySectionPolicy,
) -> Result<Vec<VisitorMessage>, FieldError> {
    if !queries.section.exists(root) {
        return Err(FieldError::Missing(Field::VisitorMessages));
    }

    let mut blocks = queries.blocks.iterate(root).peekable();
    if blocks.peek().is_none() && empty_section == EmptySectionPolicy::Error {
        return Err(FieldError::EmptyVisitorSection);
    }

    let messages: Vec<VisitorMessage> = blocks
        .filter_map(|block| {
            let author = queries.author.string_value(block)?;
            let body = queries.body.string_value(block)?;
            Some(VisitorMessage {
                author: author.trim().to_string(),
                body: body.trim().to_string(),
            })
        })
        .take(MAX_VISITOR_MESSAGES)
        .collect();

    Ok(messages)
}
