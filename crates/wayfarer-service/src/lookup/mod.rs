//! Record lookup backends used by the redirect middleware.
//!
//! ## Summary
//! [`RecordLookup`] answers the two questions slug routing asks: which
//! record has this id, and which record answers to this slug (canonical
//! first, then legacy). [`StoreLookup`] asks the database directly;
//! [`HttpLookup`] asks the lookup API of a Wayfarer instance.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use wayfarer_core::config::{LookupMode, Settings};
use wayfarer_db::db::RecordStore;
use wayfarer_db::model::record::Record;

use crate::error::{ServiceError, ServiceResult};

mod http;
mod store;

pub use http::HttpLookup;
pub use store::StoreLookup;

/// Boxed future returned by [`RecordLookup`] methods.
pub type LookupFuture<'a> = Pin<Box<dyn Future<Output = ServiceResult<Option<Record>>> + Send + 'a>>;

pub trait RecordLookup: Send + Sync {
    /// Record with the generated id `id`.
    fn by_id<'a>(&'a self, collection: &'a str, id: &'a str) -> LookupFuture<'a>;

    /// Record whose canonical slug is `slug`, else a record listing `slug`
    /// among its legacy slugs.
    fn by_slug<'a>(&'a self, collection: &'a str, slug: &'a str) -> LookupFuture<'a>;
}

/// ## Summary
/// Builds the lookup backend selected by `lookup.mode`.
///
/// ## Errors
/// Returns `ServiceError::InvalidConfiguration` if HTTP mode is selected
/// without a usable base URL, or store mode without a store.
pub fn lookup_from_settings(
    settings: &Settings,
    store: Option<Arc<dyn RecordStore>>,
) -> ServiceResult<Arc<dyn RecordLookup>> {
    match settings.lookup.mode {
        LookupMode::Store => {
            let store = store.ok_or_else(|| {
                ServiceError::InvalidConfiguration(
                    "lookup.mode = \"store\" requires a database".to_string(),
                )
            })?;
            Ok(Arc::new(StoreLookup::new(store)))
        }
        LookupMode::Http => {
            let origin = settings.lookup.base_url.as_deref().ok_or_else(|| {
                ServiceError::InvalidConfiguration(
                    "lookup.mode = \"http\" requires lookup.base_url".to_string(),
                )
            })?;
            tracing::info!(origin = %origin, "Using HTTP record lookup");
            Ok(Arc::new(HttpLookup::new(
                origin,
                Duration::from_millis(settings.lookup.timeout_ms),
            )?))
        }
    }
}
