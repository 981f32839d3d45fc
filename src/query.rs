//! The collaborator seam to the external catalog/query layer.
//!
//! The engine never talks to Cloud Director directly; a provider supplies a
//! [`CatalogQuery`] implementation backed by its API client. One search
//! awaits `list_templates` exactly once and, on success, resolves the winner
//! through `catalog_item_by_name`. The engine adds no caching, retries, or
//! timeouts of its own; failures propagate immediately.

use crate::error::SearchError;
use crate::types::{CatalogItem, MetadataField, QueryScope, TemplateRecord};

/// Access to the catalog's template listing and item lookup.
#[async_trait::async_trait]
pub trait CatalogQuery: Send + Sync {
    /// List the vApp template records of `catalog`, projecting the given
    /// metadata fields into the results.
    ///
    /// `scope` selects the tenant or admin query variant (see
    /// [`QueryScope::query_type`]). Each projected field carries its own
    /// visibility domain.
    async fn list_templates(
        &self,
        scope: QueryScope,
        catalog: &str,
        fields: &[MetadataField],
    ) -> Result<Vec<TemplateRecord>, SearchError>;

    /// Resolve a catalog item by its name within `catalog`.
    ///
    /// Implementations should return [`SearchError::ItemNotFound`] when the
    /// name does not resolve.
    async fn catalog_item_by_name(
        &self,
        catalog: &str,
        name: &str,
    ) -> Result<CatalogItem, SearchError>;
}
