//! Testing utilities for template search integrations.
//!
//! This module provides an in-memory [`CatalogQuery`] so provider code
//! built on the search engine can be exercised without a Cloud Director
//! endpoint.
//!
//! # Example
//!
//! ```
//! use vcd_template_search::{
//!     search_templates, testing::StubCatalog, FilterCriteria, QueryScope, TemplateRecord,
//! };
//!
//! # tokio_test::block_on(async {
//! let catalog = StubCatalog::new("templates")
//!     .with_template(TemplateRecord::new("photon-v4", "2021-01-01 00:00:00"));
//!
//! let criteria = FilterCriteria::new().with_name_regex("^photon-");
//! let item = search_templates(&catalog, QueryScope::Tenant, "templates", &criteria)
//!     .await
//!     .unwrap();
//! assert_eq!(item.name, "photon-v4");
//! # });
//! ```

use std::collections::HashSet;
use std::sync::Mutex;

use crate::error::SearchError;
use crate::query::CatalogQuery;
use crate::types::{CatalogItem, MetadataField, QueryScope, TemplateRecord};

/// An in-memory catalog backing [`CatalogQuery`].
///
/// The stub returns its configured records for any listing call and records
/// the metadata projection it was asked for, so tests can assert what the
/// engine requested. Listing failures and missing catalog items can be
/// injected with the builder methods.
pub struct StubCatalog {
    name: String,
    templates: Vec<TemplateRecord>,
    listing_failure: Option<String>,
    missing_items: HashSet<String>,
    requested_fields: Mutex<Vec<MetadataField>>,
    requested_scope: Mutex<Option<QueryScope>>,
}

impl StubCatalog {
    /// Create an empty stub catalog with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            templates: Vec::new(),
            listing_failure: None,
            missing_items: HashSet::new(),
            requested_fields: Mutex::new(Vec::new()),
            requested_scope: Mutex::new(None),
        }
    }

    /// Add a template record to the catalog.
    pub fn with_template(mut self, record: TemplateRecord) -> Self {
        self.templates.push(record);
        self
    }

    /// Make every listing call fail with [`SearchError::Query`].
    pub fn with_failing_query(mut self, detail: impl Into<String>) -> Self {
        self.listing_failure = Some(detail.into());
        self
    }

    /// Make the by-name lookup fail for `name`, simulating a template whose
    /// catalog item has disappeared between listing and resolution.
    pub fn without_catalog_item(mut self, name: impl Into<String>) -> Self {
        self.missing_items.insert(name.into());
        self
    }

    /// The metadata projection from the last listing call, empty if no
    /// listing was ever issued.
    pub fn requested_fields(&self) -> Vec<MetadataField> {
        self.requested_fields
            .lock()
            .map(|fields| fields.clone())
            .unwrap_or_default()
    }

    /// The scope of the last listing call, `None` if no listing was issued.
    pub fn requested_scope(&self) -> Option<QueryScope> {
        self.requested_scope
            .lock()
            .map(|scope| *scope)
            .unwrap_or_default()
    }
}

#[async_trait::async_trait]
impl CatalogQuery for StubCatalog {
    async fn list_templates(
        &self,
        scope: QueryScope,
        catalog: &str,
        fields: &[MetadataField],
    ) -> Result<Vec<TemplateRecord>, SearchError> {
        // Record the request before any injected failure, so tests can
        // distinguish "listing failed" from "listing never issued".
        if let Ok(mut recorded) = self.requested_fields.lock() {
            *recorded = fields.to_vec();
        }
        if let Ok(mut recorded) = self.requested_scope.lock() {
            *recorded = Some(scope);
        }

        if let Some(detail) = &self.listing_failure {
            return Err(SearchError::Query(detail.clone()));
        }
        if catalog != self.name {
            return Err(SearchError::Query(format!("unknown catalog: {}", catalog)));
        }
        Ok(self.templates.clone())
    }

    async fn catalog_item_by_name(
        &self,
        catalog: &str,
        name: &str,
    ) -> Result<CatalogItem, SearchError> {
        if self.missing_items.contains(name) {
            return Err(SearchError::ItemNotFound(name.to_string()));
        }
        self.templates
            .iter()
            .find(|record| record.name == name)
            .map(|record| {
                CatalogItem::new(
                    record.name.clone(),
                    format!("urn:vcloud:catalogitem:{}", record.name),
                    catalog,
                )
            })
            .ok_or_else(|| SearchError::ItemNotFound(name.to_string()))
    }
}
