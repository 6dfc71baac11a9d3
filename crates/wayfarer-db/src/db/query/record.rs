//! Query builders and statements for resource records.

use diesel::dsl::now;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::db::connection::DbConnection;
use crate::db::schema::resource_record;
use crate::model::record::{NewRecord, Record};

/// ## Summary
/// Returns a query selecting every record in a collection.
#[must_use]
pub fn in_collection(collection: &str) -> resource_record::BoxedQuery<'_, diesel::pg::Pg> {
    resource_record::table
        .filter(resource_record::collection.eq(collection))
        .into_boxed()
}

/// ## Summary
/// Returns a query to find a record by its generated id.
#[must_use]
pub fn by_id<'a>(
    collection: &'a str,
    id: &'a str,
) -> resource_record::BoxedQuery<'a, diesel::pg::Pg> {
    in_collection(collection).filter(resource_record::id.eq(id))
}

/// ## Summary
/// Returns a query to find the record whose canonical slug is `slug`.
#[must_use]
pub fn by_slug<'a>(
    collection: &'a str,
    slug: &'a str,
) -> resource_record::BoxedQuery<'a, diesel::pg::Pg> {
    in_collection(collection).filter(resource_record::slug.eq(slug))
}

/// ## Summary
/// Returns a query to find records listing `slug` among their legacy slugs.
#[must_use]
pub fn by_legacy_slug<'a>(
    collection: &'a str,
    slug: &'a str,
) -> resource_record::BoxedQuery<'a, diesel::pg::Pg> {
    in_collection(collection)
        .filter(resource_record::legacy_slugs.contains(vec![slug.to_string()]))
        .order(resource_record::updated_at.desc())
}

/// ## Summary
/// Returns a query for records without a canonical slug, oldest first.
#[must_use]
pub fn missing_slug(collection: &str) -> resource_record::BoxedQuery<'_, diesel::pg::Pg> {
    in_collection(collection)
        .filter(resource_record::slug.is_null())
        .order((resource_record::created_at.asc(), resource_record::id.asc()))
}

/// ## Summary
/// Loads a single record by id.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn find_by_id(
    conn: &mut DbConnection<'_>,
    collection: &str,
    id: &str,
) -> diesel::QueryResult<Option<Record>> {
    by_id(collection, id)
        .select(Record::as_select())
        .first(conn)
        .await
        .optional()
}

/// ## Summary
/// Loads the record holding `slug` as its canonical slug.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn find_by_slug(
    conn: &mut DbConnection<'_>,
    collection: &str,
    slug: &str,
) -> diesel::QueryResult<Option<Record>> {
    by_slug(collection, slug)
        .select(Record::as_select())
        .first(conn)
        .await
        .optional()
}

/// ## Summary
/// Loads the most recently updated record listing `slug` as a legacy slug.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn find_by_legacy_slug(
    conn: &mut DbConnection<'_>,
    collection: &str,
    slug: &str,
) -> diesel::QueryResult<Option<Record>> {
    by_legacy_slug(collection, slug)
        .select(Record::as_select())
        .first(conn)
        .await
        .optional()
}

/// ## Summary
/// Loads every record of a collection that has no canonical slug yet.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn list_missing_slug(
    conn: &mut DbConnection<'_>,
    collection: &str,
) -> diesel::QueryResult<Vec<Record>> {
    missing_slug(collection)
        .select(Record::as_select())
        .load(conn)
        .await
}

/// ## Summary
/// Sets the canonical slug and legacy slugs of a record.
///
/// ## Errors
/// Returns a database error if the update fails, including a unique
/// violation when another record took the slug concurrently.
pub async fn assign_slug(
    conn: &mut DbConnection<'_>,
    id: &str,
    slug: &str,
    legacy_slugs: &[String],
) -> diesel::QueryResult<Record> {
    diesel::update(resource_record::table.find(id))
        .set((
            resource_record::slug.eq(slug),
            resource_record::legacy_slugs.eq(legacy_slugs.to_vec()),
            resource_record::updated_at.eq(now),
        ))
        .returning(Record::as_returning())
        .get_result(conn)
        .await
}

/// ## Summary
/// Inserts a record.
///
/// ## Errors
/// Returns a database error if the insert fails.
pub async fn insert(
    conn: &mut DbConnection<'_>,
    record: &NewRecord<'_>,
) -> diesel::QueryResult<Record> {
    diesel::insert_into(resource_record::table)
        .values(record)
        .returning(Record::as_returning())
        .get_result(conn)
        .await
}
