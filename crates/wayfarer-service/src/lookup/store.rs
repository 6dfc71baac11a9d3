use std::sync::Arc;

use wayfarer_db::db::RecordStore;

use super::{LookupFuture, RecordLookup};

/// Resolves records straight from a [`RecordStore`].
#[derive(Clone)]
pub struct StoreLookup {
    store: Arc<dyn RecordStore>,
}

impl StoreLookup {
    #[must_use]
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }
}

impl RecordLookup for StoreLookup {
    fn by_id<'a>(&'a self, collection: &'a str, id: &'a str) -> LookupFuture<'a> {
        Box::pin(async move { Ok(self.store.find_by_id(collection, id).await?) })
    }

    fn by_slug<'a>(&'a self, collection: &'a str, slug: &'a str) -> LookupFuture<'a> {
        Box::pin(async move {
            if let Some(record) = self.store.find_by_slug(collection, slug).await? {
                return Ok(Some(record));
            }

            let legacy = self.store.find_by_legacy_slug(collection, slug).await?;
            if let Some(ref record) = legacy {
                tracing::debug!(
                    collection,
                    slug,
                    record_id = %record.id,
                    "Resolved legacy slug"
                );
            }
            Ok(legacy)
        })
    }
}
