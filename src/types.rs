//! Core data types exchanged with the query layer.
//!
//! These are thin, immutable DTOs: the query layer owns the records, the
//! search engine only reads them. Nothing here is cached between searches.

use serde::{Deserialize, Serialize};

/// Whether the listing query runs against the tenant or the admin view.
///
/// Cloud Director exposes vApp templates through two query types depending
/// on the caller's privilege level; the scope selects which one is issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum QueryScope {
    /// Tenant-visible query (`vAppTemplate`).
    #[default]
    Tenant,
    /// System administrator query (`adminVAppTemplate`).
    Admin,
}

impl QueryScope {
    /// The Cloud Director query type name for this scope.
    pub fn query_type(&self) -> &'static str {
        match self {
            Self::Tenant => "vAppTemplate",
            Self::Admin => "adminVAppTemplate",
        }
    }
}

/// One key/value pair in a template's metadata bag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataEntry {
    /// The metadata key.
    pub key: String,
    /// The metadata value, as its string representation.
    pub value: String,
    /// Whether this entry lives in the system metadata domain
    /// (visible only to privileged accounts) rather than the tenant one.
    #[serde(default)]
    pub is_system: bool,
}

/// A metadata field the listing query must project into its results.
///
/// Each field carries its own visibility domain; two fields in the same
/// projection may mix system and tenant metadata freely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataField {
    /// The metadata key to fetch.
    pub name: String,
    /// Whether to look the key up as system metadata.
    #[serde(default)]
    pub is_system: bool,
}

/// A vApp template record returned by the listing query.
///
/// `creation_date` is a zero-padded ISO-like timestamp as Cloud Director
/// reports it (e.g. `2021-03-04 11:22:33`), so records order correctly
/// under plain lexicographic comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateRecord {
    /// The template name.
    pub name: String,
    /// The template creation timestamp.
    pub creation_date: String,
    /// Projected metadata entries, in query return order. Empty when the
    /// projection requested no fields or the template carries none.
    #[serde(default)]
    pub metadata: Vec<MetadataEntry>,
}

impl TemplateRecord {
    /// Create a record with no metadata.
    pub fn new(name: impl Into<String>, creation_date: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            creation_date: creation_date.into(),
            metadata: Vec::new(),
        }
    }

    /// Append a tenant-visible metadata entry.
    pub fn with_metadata(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.with_metadata_entry(key, value, false)
    }

    /// Append a metadata entry in an explicit visibility domain.
    pub fn with_metadata_entry(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
        is_system: bool,
    ) -> Self {
        self.metadata.push(MetadataEntry {
            key: key.into(),
            value: value.into(),
            is_system,
        });
        self
    }

    /// Look up a metadata value by key. Returns the first entry with that
    /// key, or `None` when the bag is empty or the key is absent.
    pub fn metadata_value(&self, key: &str) -> Option<&str> {
        self.metadata
            .iter()
            .find(|entry| entry.key == key)
            .map(|entry| entry.value.as_str())
    }
}

/// The resolved output of a successful search: a handle to the catalog item
/// that wraps the winning template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    /// The catalog item name (matches the template name).
    pub name: String,
    /// The catalog item identifier (URN).
    pub id: String,
    /// The catalog the item belongs to.
    pub catalog: String,
}

impl CatalogItem {
    /// Create a new catalog item handle.
    pub fn new(
        name: impl Into<String>,
        id: impl Into<String>,
        catalog: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            id: id.into(),
            catalog: catalog.into(),
        }
    }
}
