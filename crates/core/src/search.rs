//! Free-text search parameters.

use crate::error::{DomainError, DomainResult};

/// A parsed search query.
///
/// Matches case-insensitively as a substring against a kind's text fields,
/// and exactly against its display-ID field when the query is an integer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    needle: String,
    number: Option<i64>,
}

impl SearchQuery {
    pub fn parse(raw: Option<&str>) -> DomainResult<Self> {
        let needle = raw.map(str::trim).unwrap_or_default();
        if needle.is_empty() {
            return Err(DomainError::validation("Search query is required."));
        }
        Ok(Self {
            needle: needle.to_lowercase(),
            number: needle.parse::<i64>().ok(),
        })
    }

    /// Lowercased, trimmed query text.
    pub fn needle(&self) -> &str {
        &self.needle
    }

    pub fn number(&self) -> Option<i64> {
        self.number
    }

    /// Case-insensitive substring test against one text value.
    pub fn matches_text(&self, haystack: &str) -> bool {
        haystack.to_lowercase().contains(&self.needle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_query_is_rejected() {
        assert_eq!(
            SearchQuery::parse(Some("   ")),
            Err(DomainError::validation("Search query is required."))
        );
        assert!(SearchQuery::parse(None).is_err());
    }

    #[test]
    fn numeric_query_keeps_both_forms() {
        let q = SearchQuery::parse(Some(" 1001 ")).unwrap();
        assert_eq!(q.number(), Some(1001));
        assert_eq!(q.needle(), "1001");
    }

    #[test]
    fn text_match_ignores_case() {
        let q = SearchQuery::parse(Some("ACME")).unwrap();
        assert!(q.matches_text("Acme Trading"));
        assert!(!q.matches_text("Globex"));
        assert_eq!(q.number(), None);
    }
}
