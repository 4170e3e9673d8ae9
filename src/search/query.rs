//! Query sanitization and validation.

use std::fmt;
use thiserror::Error;

/// Longest sanitized query, in characters.
pub const MAX_QUERY_CHARS: usize = 100;

/// Shortest query that is worth searching for, in characters.
pub const MIN_QUERY_CHARS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("Search query cannot be empty")]
    EmptyQuery,

    #[error("Search query must be at least 2 characters long")]
    QueryTooShort,
}

/// A query that went through [`sanitize`] and passed [`validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizedQuery(String);

impl SanitizedQuery {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for SanitizedQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn is_allowed(c: char) -> bool {
    c.is_alphanumeric() || c.is_whitespace() || matches!(c, '_' | '-' | '&' | '\'')
}

/// Normalize raw user input: lowercase, strip anything but word characters,
/// whitespace, `-`, `&` and `'`, collapse whitespace and cap the length.
///
/// The output never has leading or trailing whitespace, so
/// `sanitize(&sanitize(s)) == sanitize(s)`.
pub fn sanitize(raw: &str) -> String {
    let kept: String = raw
        .trim()
        .to_lowercase()
        .chars()
        .filter(|c| is_allowed(*c))
        .collect();

    let collapsed = kept.split_whitespace().collect::<Vec<_>>().join(" ");
    let capped: String = collapsed.chars().take(MAX_QUERY_CHARS).collect();
    capped.trim_end().to_string()
}

pub fn validate(raw: &str) -> Result<SanitizedQuery, QueryError> {
    let sanitized = sanitize(raw);
    match sanitized.chars().count() {
        0 => Err(QueryError::EmptyQuery),
        n if n < MIN_QUERY_CHARS => Err(QueryError::QueryTooShort),
        _ => Ok(SanitizedQuery(sanitized)),
    }
}
