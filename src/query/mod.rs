//! Compiled tree queries over parsed HTML
//!
//! A [`Query`] pairs a CSS selector with what to read from the first match:
//! its text content or one of its attributes. An optional text filter keeps
//! only elements whose text contains a given needle, which covers the
//! `contains(., '...')` style lookups forum pages need.
//!
//! ```
//! use forum_sentry::query::{parse_document, Query};
//!
//! let doc = parse_document(r#"<ul><li>Posts: 3</li><li>Join Date: May 2010</li></ul>"#);
//! let join = Query::text("ul > li").unwrap().containing("Join Date: ");
//! assert_eq!(join.string_value(doc.root_element()).as_deref(), Some("Join Date: May 2010"));
//! ```

use scraper::{ElementRef, Html, Selector};
use thiserror::Error;

/// Errors raised when compiling a query
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("Invalid selector '{expression}': {message}")]
    InvalidSelector { expression: String, message: String },
}

/// What a query reads from a matched element
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// Concatenated text of the element and its descendants
    Text,
    /// Value of the named attribute
    Attr(String),
}

/// A compiled query
#[derive(Debug, Clone)]
pub struct Query {
    expression: String,
    selector: Selector,
    target: Target,
    containing: Option<String>,
}

impl Query {
    /// Compiles a query reading the text of the first match
    pub fn text(expression: &str) -> Result<Self, QueryError> {
        Self::compile(expression, Target::Text)
    }

    /// Compiles a query reading attribute `name` of the first match carrying it
    pub fn attr(expression: &str, name: &str) -> Result<Self, QueryError> {
        Self::compile(expression, Target::Attr(name.to_string()))
    }

    fn compile(expression: &str, target: Target) -> Result<Self, QueryError> {
        let selector = Selector::parse(expression).map_err(|e| QueryError::InvalidSelector {
            expression: expression.to_string(),
            message: format!("{:?}", e),
        })?;

        Ok(Self {
            expression: expression.to_string(),
            selector,
            target,
            containing: None,
        })
    }

    /// Restricts matches to elements whose text contains `needle`
    pub fn containing(mut self, needle: &str) -> Self {
        self.containing = Some(needle.to_string());
        self
    }

    /// The selector source this query was compiled from
    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// Reads the target value of the first matching element, if any
    pub fn string_value(&self, node: ElementRef<'_>) -> Option<String> {
        self.iterate(node).find_map(|element| match &self.target {
            Target::Text => Some(element_text(element)),
            Target::Attr(name) => element.value().attr(name).map(str::to_string),
        })
    }

    /// Returns true if at least one element matches
    pub fn exists(&self, node: ElementRef<'_>) -> bool {
        self.iterate(node).next().is_some()
    }

    /// Iterates over matching elements below `node`, in document order
    pub fn iterate<'a>(&'a self, node: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> + 'a {
        node.select(&self.selector).filter(move |element| match &self.containing {
            Some(needle) => element_text(*element).contains(needle.as_str()),
            None => true,
        })
    }
}

/// Parses a full HTML document
pub fn parse_document(html: &str) -> Html {
    Html::parse_document(html)
}

/// Text content of an element, descendants included
pub fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect()
}
