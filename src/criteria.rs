//! Filter criteria: the typed search directives and the untyped boundary.
//!
//! Data-source glue layers hand the engine a loosely-typed configuration
//! value (the decoded `filter { ... }` block: a single-element list holding
//! a string-keyed map). [`FilterCriteria::from_config`] validates that shape
//! exactly once at the boundary; everything past it works with typed data.
//! Strongly-typed callers can skip the untyped path entirely and use the
//! builder methods.
//!
//! # Example
//!
//! ```
//! use vcd_template_search::FilterCriteria;
//!
//! let criteria = FilterCriteria::new()
//!     .with_name_regex("^photon-")
//!     .with_date("> 2021-01-01")
//!     .with_latest();
//!
//! let compiled = criteria.compile().unwrap();
//! assert_eq!(compiled.conditions.len(), 2);
//! assert!(compiled.latest);
//! ```

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::condition::{Condition, DateCondition, MetadataRegexCondition, NameRegexCondition};
use crate::error::SearchError;
use crate::types::MetadataField;

/// One metadata directive: match the field `key` against the regex `value`.
///
/// `is_system` is scoped to this criterion alone; two criteria in the same
/// filter may target different metadata visibility domains.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataCriterion {
    /// The metadata key to match.
    pub key: String,
    /// The regex the field value must match.
    pub value: String,
    /// Whether the key lives in the system metadata domain.
    #[serde(default)]
    pub is_system: bool,
}

/// The set of filter directives for one search.
///
/// At least one directive (or `latest`) must be present; compiling an empty
/// criteria set fails with [`SearchError::EmptyCriteria`]. Empty strings
/// count as absent, mirroring how optional HCL attributes decode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    /// Regex the template name must match.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_regex: Option<String>,
    /// Creation-date expression, e.g. `"> 2021-01-01"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// When set, narrow multiple matches to the most recently created one
    /// instead of failing as ambiguous.
    #[serde(default)]
    pub latest: bool,
    /// Metadata directives, all of which must match.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub metadata: Vec<MetadataCriterion>,
}

/// The output of [`FilterCriteria::compile`]: per-item predicates plus the
/// post-filter selection flag and the metadata projection for the query.
#[derive(Debug, Clone)]
pub struct CompiledCriteria {
    /// Predicates to AND together over each candidate.
    pub conditions: Vec<Condition>,
    /// Whether to resolve multiple matches by newest creation date.
    pub latest: bool,
    /// Metadata fields the listing query must project, each with its own
    /// visibility domain.
    pub metadata_fields: Vec<MetadataField>,
}

impl FilterCriteria {
    /// Create an empty criteria set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the name regex directive.
    pub fn with_name_regex(mut self, pattern: impl Into<String>) -> Self {
        self.name_regex = Some(pattern.into());
        self
    }

    /// Set the creation-date directive.
    pub fn with_date(mut self, expression: impl Into<String>) -> Self {
        self.date = Some(expression.into());
        self
    }

    /// Request latest-date selection for multi-candidate results.
    pub fn with_latest(mut self) -> Self {
        self.latest = true;
        self
    }

    /// Add a tenant-domain metadata directive.
    pub fn with_metadata(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.with_metadata_criterion(key, value, false)
    }

    /// Add a metadata directive in an explicit visibility domain.
    pub fn with_metadata_criterion(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
        is_system: bool,
    ) -> Self {
        self.metadata.push(MetadataCriterion {
            key: key.into(),
            value: value.into(),
            is_system,
        });
        self
    }

    /// Parse the loosely-typed `filter` block shape: a single-element list
    /// whose element is a string-keyed object.
    ///
    /// Recognized keys are `name_regex`, `date`, `latest`, and `metadata`;
    /// anything else fails with [`SearchError::UnsupportedKey`] naming the
    /// offending key. An empty object fails with
    /// [`SearchError::EmptyCriteria`] before any query is issued.
    pub fn from_config(config: &Value) -> Result<Self, SearchError> {
        let list = config.as_array().ok_or_else(|| {
            SearchError::InvalidShape("filter must be a single-element list".to_string())
        })?;
        if list.len() != 1 {
            return Err(SearchError::InvalidShape(format!(
                "filter must contain exactly one block, got {}",
                list.len()
            )));
        }
        let block = list[0].as_object().ok_or_else(|| {
            SearchError::InvalidShape("filter block must be a string-keyed map".to_string())
        })?;
        if block.is_empty() {
            return Err(SearchError::EmptyCriteria);
        }

        let mut criteria = Self::default();
        for (key, raw) in block {
            match key.as_str() {
                "name_regex" => {
                    criteria.name_regex = Some(string_value(key, raw)?);
                }
                "date" => {
                    criteria.date = Some(string_value(key, raw)?);
                }
                "latest" => {
                    criteria.latest = raw.as_bool().ok_or_else(|| {
                        SearchError::InvalidShape("'latest' must be a boolean".to_string())
                    })?;
                }
                "metadata" => {
                    let entries = raw.as_array().ok_or_else(|| {
                        SearchError::InvalidShape("'metadata' must be a list".to_string())
                    })?;
                    for entry in entries {
                        criteria
                            .metadata
                            .push(serde_json::from_value(entry.clone())?);
                    }
                }
                other => return Err(SearchError::UnsupportedKey(other.to_string())),
            }
        }
        Ok(criteria)
    }

    /// Compile the directives into per-item conditions.
    ///
    /// Regexes compile here ([`SearchError::InvalidRegex`] on failure); the
    /// date expression stays raw and is validated lazily at comparison time.
    /// Each metadata criterion contributes both a condition and an entry in
    /// the query projection, keeping its own `is_system` flag.
    pub fn compile(&self) -> Result<CompiledCriteria, SearchError> {
        let mut conditions = Vec::new();
        let mut metadata_fields = Vec::new();

        if let Some(pattern) = self.name_regex.as_deref().filter(|p| !p.is_empty()) {
            let regex = compile_regex(pattern)?;
            conditions.push(Condition::NameRegex(NameRegexCondition::new(regex)));
        }

        if let Some(expression) = self.date.as_deref().filter(|d| !d.is_empty()) {
            conditions.push(Condition::Date(DateCondition::new(expression)));
        }

        for criterion in &self.metadata {
            let regex = compile_regex(&criterion.value)?;
            conditions.push(Condition::MetadataRegex(MetadataRegexCondition::new(
                criterion.key.clone(),
                regex,
            )));
            metadata_fields.push(MetadataField {
                name: criterion.key.clone(),
                is_system: criterion.is_system,
            });
        }

        // `latest` alone is a valid search: match everything, keep the newest.
        if conditions.is_empty() && !self.latest {
            return Err(SearchError::EmptyCriteria);
        }

        Ok(CompiledCriteria {
            conditions,
            latest: self.latest,
            metadata_fields,
        })
    }
}

fn string_value(key: &str, raw: &Value) -> Result<String, SearchError> {
    raw.as_str()
        .map(str::to_string)
        .ok_or_else(|| SearchError::InvalidShape(format!("'{}' must be a string", key)))
}

fn compile_regex(pattern: &str) -> Result<Regex, SearchError> {
    Regex::new(pattern).map_err(|source| SearchError::InvalidRegex {
        pattern: pattern.to_string(),
        source,
    })
}
