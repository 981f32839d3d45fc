//! Error types for the template search engine.

use thiserror::Error;

/// Errors that can occur while parsing criteria or running a search.
///
/// Every error is fail-fast: a search either resolves exactly one catalog
/// item or returns one of these variants immediately. Nothing is retried.
#[derive(Debug, Error)]
pub enum SearchError {
    /// The filter configuration is not the expected single-element list of
    /// string-keyed objects.
    #[error("Invalid filter shape: {0}")]
    InvalidShape(String),

    /// No recognized filter directives were supplied.
    #[error("No filter criteria supplied")]
    EmptyCriteria,

    /// An unrecognized filter key was supplied.
    #[error("Unsupported filter key: {0}")]
    UnsupportedKey(String),

    /// A regex-bearing field failed to compile.
    #[error("Invalid regular expression '{pattern}': {source}")]
    InvalidRegex {
        /// The pattern that failed to compile.
        pattern: String,
        /// The underlying compilation error.
        #[source]
        source: regex::Error,
    },

    /// A date expression's operator or timestamp could not be parsed.
    #[error("Invalid date expression '{0}': expected '<operator> <timestamp>' with operator one of >, >=, ==, <, <=")]
    InvalidDateExpression(String),

    /// The external listing query failed.
    #[error("Template query failed: {0}")]
    Query(String),

    /// Filtering produced zero candidates.
    #[error("No template matched the filter criteria")]
    NoMatch,

    /// Filtering produced multiple candidates and `latest` was not requested.
    /// Carries every conflicting candidate name for diagnostics.
    #[error("Criteria matched {} templates: {}; refine the filter or set latest = true", .0.len(), .0.join(", "))]
    Ambiguous(Vec<String>),

    /// The final by-name catalog item lookup failed.
    #[error("Catalog item not found: {0}")]
    ItemNotFound(String),

    /// A serialization/deserialization error occurred.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SearchError {
    /// The conflicting candidate names carried by [`SearchError::Ambiguous`],
    /// if this is that variant.
    pub fn ambiguous_names(&self) -> Option<&[String]> {
        match self {
            Self::Ambiguous(names) => Some(names),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SearchError::UnsupportedKey("bogus_key".to_string());
        assert_eq!(format!("{}", err), "Unsupported filter key: bogus_key");

        let err = SearchError::InvalidShape("expected a list".to_string());
        assert_eq!(format!("{}", err), "Invalid filter shape: expected a list");

        let err = SearchError::ItemNotFound("photon-v4".to_string());
        assert_eq!(format!("{}", err), "Catalog item not found: photon-v4");
    }

    #[test]
    fn test_ambiguous_lists_every_candidate() {
        let err = SearchError::Ambiguous(vec!["tmpl-a".to_string(), "tmpl-a".to_string()]);
        let display = format!("{}", err);
        assert!(display.contains("2 templates"));
        assert!(display.contains("tmpl-a, tmpl-a"));
    }

    #[test]
    fn test_ambiguous_names_accessor() {
        let err = SearchError::Ambiguous(vec!["a".to_string(), "b".to_string()]);
        assert_eq!(
            err.ambiguous_names(),
            Some(&["a".to_string(), "b".to_string()][..])
        );

        assert!(SearchError::NoMatch.ambiguous_names().is_none());
    }

    #[test]
    fn test_invalid_regex_preserves_pattern() {
        let source = regex::Regex::new("((").unwrap_err();
        let err = SearchError::InvalidRegex {
            pattern: "((".to_string(),
            source,
        };
        assert!(format!("{}", err).contains("'(('"));
    }
}
