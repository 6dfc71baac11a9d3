//! Canonical slug resolution for detail-page requests.
//!
//! ## Summary
//! For a request path `/<collection>/<segment>`:
//! 1. Parse: unmonitored or malformed paths pass through untouched.
//! 2. Classify the segment as a generated id or a slug.
//! 3. Look the record up by id, or by the normalized slug (canonical slug
//!    first, then legacy slugs). An id that misses is retried as a slug, since
//!    a record named after nothing gets its lowercased id as slug.
//! 4. Decide: pass through on a miss or a lookup failure, pass through with
//!    the record when the segment is already canonical, otherwise redirect to
//!    the canonical path.
//!
//! Resolution never fails; lookup errors are carried in
//! [`Resolution::PassthroughOnError`] for the caller to log.

use wayfarer_core::config::CollectionConfig;
use wayfarer_core::types::{DetailPath, detail_path};
use wayfarer_core::util::identifier::Identifier;
use wayfarer_core::util::slug::build_candidate;
use wayfarer_db::model::record::Record;

use crate::error::{ServiceError, ServiceResult};
use crate::lookup::RecordLookup;

/// Outcome of resolving one request path.
#[derive(Debug)]
pub enum Resolution {
    /// The path is not a monitored detail path.
    Passthrough,
    /// No record answers to the segment, or the record found has no
    /// canonical slug yet.
    PassthroughOnMiss(Option<Record>),
    /// The lookup failed; the request proceeds unredirected.
    PassthroughOnError(ServiceError),
    /// The segment is the record's canonical slug.
    CanonicalMatch(Record),
    /// The segment is an id, a legacy slug, or a non-normalized slug.
    Redirect { location: String, record: Record },
}

/// ## Summary
/// Looks up the record a path segment refers to.
///
/// Generated ids are looked up by id, then by slug when no record has that
/// id. Anything else is normalized first, so slightly malformed slugs
/// (`Masai-Mara`) still resolve; a segment that normalizes to nothing falls
/// back to the collection's default slug.
///
/// ## Errors
/// Returns the lookup backend's error unchanged.
async fn lookup_segment(
    lookup: &dyn RecordLookup,
    collection: &CollectionConfig,
    segment: &str,
) -> ServiceResult<Option<Record>> {
    if let Identifier::Id(id) = Identifier::classify(segment) {
        if let Some(record) = lookup.by_id(&collection.name, &id).await? {
            return Ok(Some(record));
        }
        tracing::debug!(segment, "No record with this id, trying it as a slug");
    }

    let slug = build_candidate(Some(segment), Some(segment), &collection.fallback_slug);
    lookup.by_slug(&collection.name, &slug).await
}

/// ## Summary
/// Resolves a request path against the monitored collections.
#[tracing::instrument(skip(lookup, collections))]
pub async fn resolve(
    lookup: &dyn RecordLookup,
    collections: &[CollectionConfig],
    path: &str,
) -> Resolution {
    let Some(detail) = DetailPath::parse(path, |name| collections.iter().any(|c| c.name == name))
    else {
        return Resolution::Passthrough;
    };
    let Some(collection) = collections.iter().find(|c| c.name == detail.collection) else {
        return Resolution::Passthrough;
    };

    match lookup_segment(lookup, collection, &detail.segment).await {
        Ok(Some(record)) => decide(detail.collection, &detail.segment, record),
        Ok(None) => {
            tracing::debug!(segment = %detail.segment, "No record for segment");
            Resolution::PassthroughOnMiss(None)
        }
        Err(e) => Resolution::PassthroughOnError(e),
    }
}

fn decide(collection: &str, segment: &str, record: Record) -> Resolution {
    match record.slug.as_deref() {
        None => {
            tracing::debug!(record_id = %record.id, "Record has no canonical slug");
            Resolution::PassthroughOnMiss(Some(record))
        }
        Some(_) if record.is_canonical(segment) => Resolution::CanonicalMatch(record),
        Some(slug) => {
            let location = detail_path(collection, slug);
            Resolution::Redirect { location, record }
        }
    }
}
