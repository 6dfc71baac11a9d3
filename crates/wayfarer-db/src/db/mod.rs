use std::future::Future;
use std::pin::Pin;

use crate::error::DbResult;
use crate::model::record::Record;

pub mod connection;
pub mod query;
pub mod schema;

/// Boxed future returned by [`RecordStore`] methods.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = DbResult<T>> + Send + 'a>>;

/// Persistence operations the slug routing logic needs.
///
/// Implemented for the Postgres pool; tests supply in-memory stores.
pub trait RecordStore: Send + Sync {
    fn find_by_id<'a>(
        &'a self,
        collection: &'a str,
        id: &'a str,
    ) -> StoreFuture<'a, Option<Record>>;

    /// Record holding `slug` as its canonical slug.
    fn find_by_slug<'a>(
        &'a self,
        collection: &'a str,
        slug: &'a str,
    ) -> StoreFuture<'a, Option<Record>>;

    /// Record listing `slug` among its legacy slugs.
    fn find_by_legacy_slug<'a>(
        &'a self,
        collection: &'a str,
        slug: &'a str,
    ) -> StoreFuture<'a, Option<Record>>;

    /// Records without a canonical slug, oldest first.
    fn list_missing_slug<'a>(&'a self, collection: &'a str) -> StoreFuture<'a, Vec<Record>>;

    fn assign_slug<'a>(
        &'a self,
        id: &'a str,
        slug: &'a str,
        legacy_slugs: &'a [String],
    ) -> StoreFuture<'a, Record>;

    /// Inserts a record under a freshly generated id.
    fn insert<'a>(
        &'a self,
        collection: &'a str,
        name: Option<&'a str>,
        slug: Option<&'a str>,
    ) -> StoreFuture<'a, Record>;
}
