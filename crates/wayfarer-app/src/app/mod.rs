pub mod api;
pub mod detail;

use std::sync::Arc;

use salvo::Router;
use wayfarer_core::config::Settings;
use wayfarer_service::lookup::RecordLookup;

use crate::config::ConfigHandler;
use crate::lookup_handler::LookupHandler;

/// ## Summary
/// Builds the full application router: depot hoops for configuration and
/// record lookup, the `/api` tree, and the detail-page route.
#[must_use]
pub fn router(settings: Settings, lookup: Arc<dyn RecordLookup>) -> Router {
    Router::new()
        .hoop(ConfigHandler::new(settings))
        .hoop(LookupHandler { lookup })
        .push(api::routes())
        .push(detail::routes())
}
