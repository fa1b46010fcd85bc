//! Page layout of the forum, as compiled queries
//!
//! All static queries are compiled once when a [`ForumClient`](super::ForumClient)
//! is built, so a malformed selector fails at startup rather than mid-poll.
//! Queries that embed a value taken from a fetched page are built on demand.

use crate::query::{Query, QueryError};

/// Text before the join date in the profile statistics box
pub const JOIN_DATE_PREFIX: &str = "Join Date: ";

/// Text before the post count in the profile statistics box
pub const TOTAL_POSTS_PREFIX: &str = "Total Posts: ";

/// Text before the reputation value in a post's user info column
pub const REPUTATION_PREFIX: &str = "Reputation: ";

/// Fragment prefix of post anchors ("showthread.php?t=9#post123")
pub const POST_FRAGMENT_PREFIX: &str = "post";

/// Id prefix of the element holding a post's message body
pub const POST_MESSAGE_ID_PREFIX: &str = "post_message_";

/// Queries run against a user's profile page
#[derive(Debug, Clone)]
pub struct ProfileQueries {
    pub user_name: Query,
    pub join_date: Query,
    pub total_posts: Query,
    pub bio: Query,
    pub visitor: VisitorQueries,
}

/// Queries for the visitor message section of a profile page
#[derive(Debug, Clone)]
pub struct VisitorQueries {
    /// The section container itself
    pub section: Query,
    /// Each message block inside the container
    pub blocks: Query,
    /// Author link, relative to a block
    pub author: Query,
    /// Message text, relative to a block
    pub body: Query,
}

/// Queries run against the "find all posts by user" search listing
#[derive(Debug, Clone)]
pub struct ListingQueries {
    /// Href of the first post in the result table
    pub first_post_href: Query,
    /// Title of the first listed thread
    pub title: Query,
    /// Href of the first listed post
    pub href: Query,
}

/// Every static query the forum scraper needs
#[derive(Debug, Clone)]
pub struct ForumQueries {
    pub profile: ProfileQueries,
    pub listing: ListingQueries,
}

impl ForumQueries {
    /// Compiles the static queries
    pub fn compile() -> Result<Self, QueryError> {
        let profile = ProfileQueries {
            user_name: Query::text("#username_box > h1")?,
            join_date: Query::text("#collapseobj_stats > div > * > ul > *")?
                .containing(JOIN_DATE_PREFIX),
            total_posts: Query::text(
                "#collapseobj_stats > div > fieldset:nth-of-type(1) > ul > li:nth-of-type(1)",
            )?,
            bio: Query::text(
                "#collapseobj_aboutme > div > ul > li:nth-of-type(1) > dl > dd:nth-of-type(1)",
            )?,
            visitor: VisitorQueries {
                section: Query::text("#message_list")?,
                blocks: Query::text("#message_list > *")?,
                author: Query::text("div:nth-of-type(2) > div:nth-of-type(1) > div > a")?,
                body: Query::text("div:nth-of-type(2) > div:nth-of-type(2)")?,
            },
        };

        let listing = ListingQueries {
            first_post_href: Query::attr(
                r#"td[class="alt1"] > div[class="alt2"] > div > em > a"#,
                "href",
            )?,
            title: Query::text("em > a")?,
            href: Query::attr("em > a", "href")?,
        };

        Ok(Self { profile, listing })
    }

    /// Line carrying the poster's reputation inside the post table `fragment_id`
    ///
    /// `fragment_id` must already be validated as a plain identifier.
    pub fn reputation_in_post(fragment_id: &str) -> Result<Query, QueryError> {
        Ok(Query::text(&format!(
            r#"table[id="{}"] > tbody > tr[valign="top"] > td[class="alt2"] > * > *"#,
            fragment_id
        ))?
        .containing(REPUTATION_PREFIX))
    }

    /// Message body of post `post_id`
    pub fn post_message(post_id: &str) -> Result<Query, QueryError> {
        Query::text(&format!(
            r#"div[id="{}{}"]"#,
            POST_MESSAGE_ID_PREFIX, post_id
        ))
    }
}
