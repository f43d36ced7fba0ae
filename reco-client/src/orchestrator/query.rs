//! Search query validation.

use std::fmt;

use crate::error::RecoError;

/// Shortest accepted query, in characters, after trimming.
pub const MIN_QUERY_CHARS: usize = 2;

/// A trimmed query of at least [`MIN_QUERY_CHARS`] characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Query(String);

impl Query {
    /// Trim `raw` and check its length.
    ///
    /// # Errors
    ///
    /// Returns [`RecoError::Validation`] when the trimmed query is too short.
    pub fn parse(raw: &str) -> Result<Self, RecoError> {
        let trimmed = raw.trim();
        if trimmed.chars().count() < MIN_QUERY_CHARS {
            return Err(RecoError::Validation(format!(
                "query must be at least {MIN_QUERY_CHARS} characters"
            )));
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
