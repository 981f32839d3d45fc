//! The search pipeline: filter, narrow, disambiguate, resolve.
//!
//! One invocation is a straight line: compile the criteria, issue a single
//! listing query, AND every condition over every record, optionally keep
//! only the newest match, then map the lone survivor to its catalog item.
//! There is no shared state between invocations; concurrent searches from
//! separate calls are independent.

use tracing::{debug, info, instrument};

use crate::condition::Condition;
use crate::criteria::FilterCriteria;
use crate::error::SearchError;
use crate::query::CatalogQuery;
use crate::types::{CatalogItem, QueryScope, TemplateRecord};

/// Sentinel seeding the latest-date scan. Any real Cloud Director creation
/// date compares greater than or equal to this.
pub const EPOCH_FLOOR: &str = "1970-01-01 00:00:00";

/// Keep the records satisfying every condition (logical AND; there is no OR
/// combinator).
///
/// Evaluation is fail-fast: the first condition error aborts the whole
/// filter rather than skipping the record. An empty result is
/// [`SearchError::NoMatch`]. With zero conditions every record is kept,
/// which is how a `latest`-only search matches the full catalog.
pub fn filter_candidates<'a>(
    records: &'a [TemplateRecord],
    conditions: &[Condition],
) -> Result<Vec<&'a TemplateRecord>, SearchError> {
    let mut kept = Vec::new();
    for record in records {
        let mut satisfied = 0;
        for condition in conditions {
            if condition.matches(record)? {
                satisfied += 1;
            }
        }
        if satisfied == conditions.len() {
            kept.push(record);
        }
    }
    if kept.is_empty() {
        return Err(SearchError::NoMatch);
    }
    Ok(kept)
}

/// Pick the candidate with the lexicographically greatest creation date,
/// scanning from the [`EPOCH_FLOOR`] sentinel.
///
/// Ties resolve last-seen-wins: the comparison is `>=`, so of two records
/// with identical creation dates the one later in iteration order survives.
/// The query layer's return order is not guaranteed stable, so callers
/// should not rely on which of two identically-dated templates wins, only
/// that the selection is a deterministic function of the input order.
pub fn latest_candidate<'a>(candidates: &[&'a TemplateRecord]) -> Option<&'a TemplateRecord> {
    let mut newest = None;
    let mut best: &str = EPOCH_FLOOR;
    for record in candidates {
        if record.creation_date.as_str() >= best {
            best = record.creation_date.as_str();
            newest = Some(*record);
        }
    }
    newest
}

/// Run a full template search against `catalog` and resolve the winning
/// record to its catalog item.
///
/// The pipeline is: compile criteria, one listing query (failures wrapped
/// as [`SearchError::Query`]), AND-filter, latest-date narrowing when
/// requested, disambiguation, then the by-name catalog item lookup
/// ([`SearchError::ItemNotFound`] on failure). Multiple surviving
/// candidates without `latest` fail as [`SearchError::Ambiguous`] with
/// every conflicting name.
#[instrument(skip(query, criteria), fields(catalog = %catalog))]
pub async fn search_templates<Q: CatalogQuery + ?Sized>(
    query: &Q,
    scope: QueryScope,
    catalog: &str,
    criteria: &FilterCriteria,
) -> Result<CatalogItem, SearchError> {
    let compiled = criteria.compile()?;
    debug!(
        conditions = compiled.conditions.len(),
        latest = compiled.latest,
        "compiled filter criteria"
    );

    let records = query
        .list_templates(scope, catalog, &compiled.metadata_fields)
        .await
        .map_err(|err| match err {
            SearchError::Query(_) => err,
            other => SearchError::Query(other.to_string()),
        })?;
    debug!(records = records.len(), "listing query returned");

    let matches = filter_candidates(&records, &compiled.conditions)?;

    let winner = if compiled.latest {
        // filter_candidates guarantees at least one match, and every real
        // creation date clears the epoch floor.
        latest_candidate(&matches).ok_or(SearchError::NoMatch)?
    } else if matches.len() > 1 {
        let names = matches.iter().map(|record| record.name.clone()).collect();
        return Err(SearchError::Ambiguous(names));
    } else {
        matches[0]
    };
    info!(template = %winner.name, "search resolved a single template");

    match query.catalog_item_by_name(catalog, &winner.name).await {
        Ok(item) => Ok(item),
        Err(SearchError::ItemNotFound(detail)) => Err(SearchError::ItemNotFound(detail)),
        Err(other) => Err(SearchError::ItemNotFound(format!(
            "{}: {}",
            winner.name, other
        ))),
    }
}

/// [`search_templates`] for callers still holding the loosely-typed
/// `filter` block shape (see [`FilterCriteria::from_config`]).
pub async fn search_templates_config<Q: CatalogQuery + ?Sized>(
    query: &Q,
    scope: QueryScope,
    catalog: &str,
    config: &serde_json::Value,
) -> Result<CatalogItem, SearchError> {
    let criteria = FilterCriteria::from_config(config)?;
    search_templates(query, scope, catalog, &criteria).await
}
