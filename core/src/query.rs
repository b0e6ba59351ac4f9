//! Search form input: validated title/author terms and result options.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Largest `maxResults` the API accepts.
pub const MAX_RESULTS_LIMIT: u32 = 40;

/// Result count used when the user has not configured one.
pub const DEFAULT_MAX_RESULTS: u32 = 10;

/// Letters and dots, with single space, apostrophe, or hyphen separators.
static AUTHOR_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[\p{L}.]+([ '-][\p{L}.]+)*$").expect("author pattern is a valid regex")
});

/// Result ordering accepted by the `orderBy` parameter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderBy {
    #[default]
    Relevance,
    Newest,
}

impl OrderBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderBy::Relevance => "relevance",
            OrderBy::Newest => "newest",
        }
    }
}

impl fmt::Display for OrderBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderBy {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "relevance" => Ok(OrderBy::Relevance),
            "newest" => Ok(OrderBy::Newest),
            other => Err(ApiError::InvalidQuery(format!(
                "unknown ordering {other:?}, expected \"relevance\" or \"newest\""
            ))),
        }
    }
}

/// Pagination and ordering appended to every search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    pub max_results: u32,
    pub order_by: OrderBy,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            max_results: DEFAULT_MAX_RESULTS,
            order_by: OrderBy::default(),
        }
    }
}

impl SearchOptions {
    pub fn validate(&self) -> Result<(), ApiError> {
        if (1..=MAX_RESULTS_LIMIT).contains(&self.max_results) {
            Ok(())
        } else {
            Err(ApiError::InvalidQuery(format!(
                "max results must be between 1 and {MAX_RESULTS_LIMIT}, got {}",
                self.max_results
            )))
        }
    }
}

/// A validated title (required) and author (optional) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    title: String,
    author: Option<String>,
}

impl SearchQuery {
    /// Trim and validate raw form input.
    ///
    /// An author that is empty after trimming is treated as absent.
    pub fn new(title: &str, author: Option<&str>) -> Result<Self, ApiError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(ApiError::InvalidQuery("a book title is required".to_string()));
        }

        let author = author.map(str::trim).filter(|a| !a.is_empty());
        if let Some(author) = author {
            if !AUTHOR_PATTERN.is_match(author) {
                return Err(ApiError::InvalidQuery(format!(
                    "author {author:?} may only contain letters, dots, spaces, apostrophes and hyphens"
                )));
            }
        }

        Ok(Self {
            title: title.to_string(),
            author: author.map(str::to_string),
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> Option<&str> {
        self.author.as_deref()
    }

    /// The `q` parameter value: `+intitle:{title}[+inauthor:{author}]`.
    pub fn to_query_param(&self) -> String {
        let mut q = format!("+intitle:{}", encode_term(&self.title));
        if let Some(author) = &self.author {
            q.push_str("+inauthor:");
            q.push_str(&encode_term(author));
        }
        q
    }
}

/// Spaces become `+`; anything else reserved is percent-encoded.
fn encode_term(term: &str) -> String {
    term.split_whitespace()
        .map(|word| urlencoding::encode(word).into_owned())
        .collect::<Vec<_>>()
        .join("+")
}
