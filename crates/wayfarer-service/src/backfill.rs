//! One-shot assignment of canonical slugs to records that lack one.
//!
//! ## Summary
//! Walks the slugless records of a collection in creation order, derives a
//! candidate from each record's name (falling back to its id, then to the
//! collection's default slug), and makes the candidate unique by appending
//! `-1`, `-2`, … When the numeric suffixes run out a millisecond timestamp
//! suffix is used instead, bumped until it is free as well.
//!
//! Each listed record is read again right before its slug is chosen, so a
//! record slugged by someone else since the listing is left alone.
//!
//! The uniqueness check and the write are separate statements. Two
//! concurrent runs can race; the unique index on `(collection, slug)` turns
//! the loser's write into an error that aborts its run. Run one backfill at a
//! time.

use std::collections::HashSet;

use wayfarer_core::config::CollectionConfig;
use wayfarer_core::util::slug::{Slug, build_candidate};
use wayfarer_db::db::RecordStore;

use crate::error::{ServiceError, ServiceResult};

#[derive(Debug, Clone, Copy)]
pub struct BackfillOptions {
    /// Numeric suffixes tried before the timestamp fallback.
    pub max_suffix_attempts: u32,
    /// Compute assignments without writing them.
    pub dry_run: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub record_id: String,
    pub slug: String,
}

#[derive(Debug, Clone, Default)]
pub struct BackfillReport {
    pub collection: String,
    /// Slugless records found.
    pub scanned: usize,
    /// Listed records that had a slug, or were gone, once processed.
    pub skipped: usize,
    pub assignments: Vec<Assignment>,
    pub dry_run: bool,
}

impl BackfillReport {
    #[must_use]
    pub fn assigned(&self) -> usize {
        self.assignments.len()
    }
}

/// ## Summary
/// Backfills every collection in `collections`, or only `only` when given.
///
/// ## Errors
/// Returns `ServiceError::InvalidConfiguration` if `only` names an
/// unconfigured collection; otherwise the first store error aborts the run.
pub async fn run(
    store: &dyn RecordStore,
    collections: &[CollectionConfig],
    only: Option<&str>,
    options: BackfillOptions,
) -> ServiceResult<Vec<BackfillReport>> {
    let selected: Vec<&CollectionConfig> = match only {
        Some(name) => {
            let collection = collections.iter().find(|c| c.name == name).ok_or_else(|| {
                ServiceError::InvalidConfiguration(format!("unknown collection {name:?}"))
            })?;
            vec![collection]
        }
        None => collections.iter().collect(),
    };

    let mut reports = Vec::with_capacity(selected.len());
    for collection in selected {
        reports.push(backfill_collection(store, collection, options).await?);
    }
    Ok(reports)
}

/// ## Summary
/// Assigns unique canonical slugs to the slugless records of one collection.
///
/// ## Side Effects
/// Unless `options.dry_run` is set, each record is updated as soon as its
/// slug is chosen, so progress survives a later failure.
///
/// ## Errors
/// Returns `ServiceError::CoreError` if the collection's fallback slug is not
/// a valid slug, or the first store error encountered.
#[tracing::instrument(skip(store, collection), fields(collection = %collection.name))]
pub async fn backfill_collection(
    store: &dyn RecordStore,
    collection: &CollectionConfig,
    options: BackfillOptions,
) -> ServiceResult<BackfillReport> {
    let records = store.list_missing_slug(&collection.name).await?;
    tracing::info!(count = records.len(), "Found records without a slug");

    let mut report = BackfillReport {
        collection: collection.name.clone(),
        scanned: records.len(),
        skipped: 0,
        assignments: Vec::new(),
        dry_run: options.dry_run,
    };
    // Slugs chosen during this run; a dry run never writes them.
    let mut claimed = HashSet::new();

    for listed in records {
        let current = store.find_by_id(&collection.name, &listed.id).await?;
        let Some(record) = current.filter(|r| r.slug.is_none()) else {
            tracing::debug!(record_id = %listed.id, "Record slugged or removed since listing");
            report.skipped += 1;
            continue;
        };

        let candidate = Slug::try_from(build_candidate(
            record.name.as_deref(),
            Some(record.id.as_str()),
            &collection.fallback_slug,
        ))?;
        let slug = ensure_unique_slug(
            store,
            &collection.name,
            &candidate,
            &record.id,
            options.max_suffix_attempts,
            &claimed,
        )
        .await?;

        if options.dry_run {
            tracing::info!(record_id = %record.id, slug = %slug, "Would assign slug");
        } else {
            store
                .assign_slug(&record.id, slug.as_str(), &record.legacy_slugs)
                .await?;
            tracing::info!(record_id = %record.id, slug = %slug, "Assigned slug");
        }

        claimed.insert(slug.clone());
        report.assignments.push(Assignment {
            record_id: record.id,
            slug: slug.into_inner(),
        });
    }

    Ok(report)
}

/// ## Summary
/// Returns `candidate` or the first free `candidate-N` for `N` in
/// `1..=max_attempts`, else the first free `candidate-<millis>` counting up
/// from the current unix time in milliseconds.
///
/// A slug is free when no other record holds it as canonical or legacy slug
/// and it is not in `claimed`.
///
/// ## Errors
/// Returns the first store error encountered.
pub async fn ensure_unique_slug(
    store: &dyn RecordStore,
    collection: &str,
    candidate: &Slug,
    record_id: &str,
    max_attempts: u32,
    claimed: &HashSet<Slug>,
) -> ServiceResult<Slug> {
    if is_available(store, collection, candidate, record_id, claimed).await? {
        return Ok(candidate.clone());
    }

    for n in 1..=max_attempts {
        let attempt = candidate.with_suffix(n);
        if is_available(store, collection, &attempt, record_id, claimed).await? {
            return Ok(attempt);
        }
    }

    let mut millis = chrono::Utc::now().timestamp_millis();
    loop {
        let stamped = candidate.with_suffix(millis);
        if is_available(store, collection, &stamped, record_id, claimed).await? {
            tracing::warn!(
                candidate = %candidate,
                max_attempts,
                slug = %stamped,
                "Numeric suffixes exhausted, using timestamp suffix"
            );
            return Ok(stamped);
        }
        millis += 1;
    }
}

async fn is_available(
    store: &dyn RecordStore,
    collection: &str,
    slug: &Slug,
    record_id: &str,
    claimed: &HashSet<Slug>,
) -> ServiceResult<bool> {
    if claimed.contains(slug) {
        return Ok(false);
    }

    let canonical_holder = store.find_by_slug(collection, slug.as_str()).await?;
    if canonical_holder.is_some_and(|holder| holder.id != record_id) {
        return Ok(false);
    }

    // A legacy slug must keep resolving to the record that used to own it.
    let legacy_holder = store.find_by_legacy_slug(collection, slug.as_str()).await?;
    Ok(!legacy_holder.is_some_and(|holder| holder.id != record_id))
}
