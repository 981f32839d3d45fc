//! Filtered vApp template search for VMware Cloud Director providers.
//!
//! Data sources that locate a catalog template by criteria rather than by
//! exact name share one engine: compile the user's filter block into
//! conditions, issue a single metadata-aware listing query, keep the
//! records satisfying every condition, optionally narrow to the newest,
//! and resolve the lone survivor to its catalog item.
//!
//! # Overview
//!
//! The crate provides:
//!
//! - **Criteria**: [`FilterCriteria`], built with typed builders or parsed
//!   once from the loosely-typed `filter { ... }` block shape
//! - **Conditions**: a closed sum type of per-record predicates (creation
//!   date, name regex, metadata regex)
//! - **CatalogQuery trait**: the async seam to the provider's Cloud
//!   Director client
//! - **Search pipeline**: [`search_templates`], one query then pure
//!   in-memory filtering, fail-fast on every error
//! - **Error types**: [`SearchError`], one variant per failure kind
//! - **Testing**: an in-memory [`testing::StubCatalog`]
//! - **Logging**: `tracing` subscriber helpers writing to stderr
//!
//! # Quick Start
//!
//! ```ignore
//! use vcd_template_search::{
//!     search_templates, CatalogQuery, FilterCriteria, QueryScope,
//! };
//!
//! let criteria = FilterCriteria::new()
//!     .with_name_regex("^photon-")
//!     .with_date("> 2021-01-01")
//!     .with_latest();
//!
//! // `client` is the provider's CatalogQuery implementation.
//! let item = search_templates(&client, QueryScope::Tenant, "templates", &criteria).await?;
//! println!("resolved {}", item.id);
//! ```
//!
//! # Filter semantics
//!
//! All directives AND together; there is no OR combinator. A search yields
//! exactly one catalog item or an error: zero survivors is
//! [`SearchError::NoMatch`], several survivors without `latest` is
//! [`SearchError::Ambiguous`] carrying every conflicting name. Nothing is
//! cached or retried; each invocation queries fresh and shares no state
//! with any other.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod condition;
pub mod criteria;
pub mod error;
pub mod logging;
pub mod query;
pub mod search;
pub mod testing;
pub mod types;

// Re-export main types at crate root
pub use condition::{Condition, DateCondition, MetadataRegexCondition, NameRegexCondition};
pub use criteria::{CompiledCriteria, FilterCriteria, MetadataCriterion};
pub use error::SearchError;
pub use logging::{init_logging, init_logging_with_default, try_init_logging};
pub use query::CatalogQuery;
pub use search::{
    filter_candidates, latest_candidate, search_templates, search_templates_config, EPOCH_FLOOR,
};
pub use types::{CatalogItem, MetadataEntry, MetadataField, QueryScope, TemplateRecord};

// Re-export async_trait for implementors of CatalogQuery
pub use async_trait::async_trait;

// Re-export commonly used external types
pub use serde_json;
pub use tracing;
