//! Condition primitives: per-record predicates compiled from filter criteria.
//!
//! A [`Condition`] is a closed sum type with one variant per criterion kind.
//! Conditions are stateless once built and live for a single search
//! invocation; they borrow nothing from the records they test.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;
use std::cmp::Ordering;

use crate::error::SearchError;
use crate::types::TemplateRecord;

/// A predicate over a [`TemplateRecord`].
#[derive(Debug, Clone)]
pub enum Condition {
    /// Creation-date comparison against an `<operator> <timestamp>` expression.
    Date(DateCondition),
    /// Regex match on the template name.
    NameRegex(NameRegexCondition),
    /// Regex match on one metadata field's value.
    MetadataRegex(MetadataRegexCondition),
}

impl Condition {
    /// Test the condition against a record.
    ///
    /// Only [`Condition::Date`] can fail (its expression is validated
    /// lazily, at first comparison); the regex variants are infallible.
    pub fn matches(&self, record: &TemplateRecord) -> Result<bool, SearchError> {
        match self {
            Self::Date(condition) => condition.matches(record),
            Self::NameRegex(condition) => Ok(condition.matches(record)),
            Self::MetadataRegex(condition) => Ok(condition.matches(record)),
        }
    }
}

/// Compares a record's creation date against a stored expression of the form
/// `<operator> <timestamp>`, operator one of `>`, `>=`, `==`, `<`, `<=`.
///
/// The comparison itself is lexicographic, which is sound because Cloud
/// Director reports zero-padded ISO-like timestamps; the expression's
/// timestamp is still parsed to reject garbage before comparing.
#[derive(Debug, Clone)]
pub struct DateCondition {
    expression: String,
}

impl DateCondition {
    /// Store a raw date expression. Validation happens at match time.
    pub fn new(expression: impl Into<String>) -> Self {
        Self {
            expression: expression.into(),
        }
    }

    /// The raw expression this condition was built from.
    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// Evaluate the expression against `record.creation_date`.
    pub fn matches(&self, record: &TemplateRecord) -> Result<bool, SearchError> {
        let (operator, timestamp) = self
            .expression
            .trim()
            .split_once(char::is_whitespace)
            .ok_or_else(|| SearchError::InvalidDateExpression(self.expression.clone()))?;
        let timestamp = timestamp.trim();

        if !is_parseable_timestamp(timestamp) {
            return Err(SearchError::InvalidDateExpression(self.expression.clone()));
        }

        let ordering = record.creation_date.as_str().cmp(timestamp);
        let satisfied = match operator {
            ">" => ordering == Ordering::Greater,
            ">=" => ordering != Ordering::Less,
            "==" => ordering == Ordering::Equal,
            "<" => ordering == Ordering::Less,
            "<=" => ordering != Ordering::Greater,
            _ => return Err(SearchError::InvalidDateExpression(self.expression.clone())),
        };
        Ok(satisfied)
    }
}

/// Accept the timestamp shapes Cloud Director and its users actually write:
/// a bare date, a date-time, or an RFC 3339 stamp with offset.
fn is_parseable_timestamp(timestamp: &str) -> bool {
    NaiveDate::parse_from_str(timestamp, "%Y-%m-%d").is_ok()
        || NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%d %H:%M:%S").is_ok()
        || NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%dT%H:%M:%S").is_ok()
        || DateTime::parse_from_rfc3339(timestamp).is_ok()
}

/// Matches the template name against a compiled regex. Never errors.
#[derive(Debug, Clone)]
pub struct NameRegexCondition {
    pattern: Regex,
}

impl NameRegexCondition {
    /// Wrap a compiled pattern.
    pub fn new(pattern: Regex) -> Self {
        Self { pattern }
    }

    /// Whether the pattern matches the record name.
    pub fn matches(&self, record: &TemplateRecord) -> bool {
        self.pattern.is_match(&record.name)
    }
}

/// Matches one metadata field's value against a compiled regex.
///
/// An absent metadata bag or an absent key is a non-match, not an error:
/// templates without the field simply fall out of the candidate set.
#[derive(Debug, Clone)]
pub struct MetadataRegexCondition {
    field: String,
    pattern: Regex,
}

impl MetadataRegexCondition {
    /// Build a condition over the metadata key `field`.
    pub fn new(field: impl Into<String>, pattern: Regex) -> Self {
        Self {
            field: field.into(),
            pattern,
        }
    }

    /// The metadata key this condition inspects.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Whether the field is present and its value matches the pattern.
    pub fn matches(&self, record: &TemplateRecord) -> bool {
        match record.metadata_value(&self.field) {
            Some(value) => self.pattern.is_match(value),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, date: &str) -> TemplateRecord {
        TemplateRecord::new(name, date)
    }

    #[test]
    fn test_date_operators() {
        let item = record("tmpl", "2021-01-01 00:00:00");

        let cases = [
            ("> 2020-06-01", true),
            ("> 2021-06-01", false),
            (">= 2021-01-01 00:00:00", true),
            ("== 2021-01-01 00:00:00", true),
            ("== 2020-01-01 00:00:00", false),
            ("< 2022-01-01", true),
            ("<= 2021-01-01 00:00:00", true),
            ("<= 2020-12-31", false),
        ];
        for (expression, expected) in cases {
            let condition = DateCondition::new(expression);
            assert_eq!(
                condition.matches(&item).unwrap(),
                expected,
                "expression {:?}",
                expression
            );
        }
    }

    #[test]
    fn test_date_malformed_operator() {
        let item = record("tmpl", "2021-01-01 00:00:00");
        let condition = DateCondition::new("** 2020-01-01");
        assert!(matches!(
            condition.matches(&item),
            Err(SearchError::InvalidDateExpression(expr)) if expr == "** 2020-01-01"
        ));
    }

    #[test]
    fn test_date_unparseable_timestamp() {
        let item = record("tmpl", "2021-01-01 00:00:00");
        let condition = DateCondition::new("> yesterday");
        assert!(matches!(
            condition.matches(&item),
            Err(SearchError::InvalidDateExpression(_))
        ));
    }

    #[test]
    fn test_date_missing_whitespace() {
        let item = record("tmpl", "2021-01-01 00:00:00");
        let condition = DateCondition::new(">2020-01-01");
        assert!(condition.matches(&item).is_err());
    }

    #[test]
    fn test_date_accepts_rfc3339_timestamp() {
        let item = record("tmpl", "2021-01-01 00:00:00");
        let condition = DateCondition::new("< 2022-01-01T00:00:00Z");
        assert!(condition.matches(&item).unwrap());
    }

    #[test]
    fn test_name_regex() {
        let condition = NameRegexCondition::new(Regex::new("^photon-").unwrap());
        assert!(condition.matches(&record("photon-v4", "2021-01-01 00:00:00")));
        assert!(!condition.matches(&record("ubuntu-20", "2021-01-01 00:00:00")));
    }

    #[test]
    fn test_metadata_regex_match() {
        let condition = MetadataRegexCondition::new("os", Regex::new("^photon$").unwrap());
        let item = record("tmpl", "2021-01-01 00:00:00").with_metadata("os", "photon");
        assert!(condition.matches(&item));

        let item = record("tmpl", "2021-01-01 00:00:00").with_metadata("os", "ubuntu");
        assert!(!condition.matches(&item));
    }

    #[test]
    fn test_metadata_absence_is_nonmatch_not_error() {
        let condition = Condition::MetadataRegex(MetadataRegexCondition::new(
            "os",
            Regex::new(".*").unwrap(),
        ));

        // No metadata bag at all.
        let bare = record("tmpl", "2021-01-01 00:00:00");
        assert!(!condition.matches(&bare).unwrap());

        // Bag present, key absent.
        let other = record("tmpl", "2021-01-01 00:00:00").with_metadata("env", "prod");
        assert!(!condition.matches(&other).unwrap());
    }

    #[test]
    fn test_condition_dispatch() {
        let item = record("photon-v4", "2021-01-01 00:00:00");

        let date = Condition::Date(DateCondition::new("> 2020-01-01"));
        assert!(date.matches(&item).unwrap());

        let name = Condition::NameRegex(NameRegexCondition::new(Regex::new("^photon").unwrap()));
        assert!(name.matches(&item).unwrap());
    }
}
