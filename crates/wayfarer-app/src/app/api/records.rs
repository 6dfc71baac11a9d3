//! Record lookup endpoints used by the slug redirect middleware in HTTP mode.
//!
//! - `GET /api/{collection}/{id}`
//! - `GET /api/{collection}/slug/{slug}` (canonical slug first, then legacy
//!   slugs; cacheable)

use std::sync::Arc;

use salvo::http::{HeaderValue, StatusCode, header};
use salvo::writing::Json;
use salvo::{Depot, Request, Response, Router, handler};
use tracing::{debug, error, warn};
use wayfarer_core::config::Settings;
use wayfarer_core::constants::SLUG_ROUTE_COMPONENT;
use wayfarer_db::model::record::Record;
use wayfarer_service::error::ServiceResult;
use wayfarer_service::lookup::RecordLookup;

use super::render_error;
use crate::config::get_config_from_depot;
use crate::lookup_handler::get_lookup_from_depot;

/// ## Summary
/// GET /api/{collection}/{id} - Fetch a record by its generated id
///
/// ## Errors
/// Returns HTTP 404 for unknown collections and missing records.
/// Returns HTTP 502 if the lookup backend fails.
#[handler]
async fn record_by_id(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let (Some(collection), Some(id)) = (
        req.param::<String>("collection"),
        req.param::<String>("id"),
    ) else {
        render_error(res, StatusCode::BAD_REQUEST, "Missing path parameters");
        return;
    };
    let Some((settings, lookup)) = request_context(depot, res) else {
        return;
    };
    if !settings.is_monitored(&collection) {
        render_error(res, StatusCode::NOT_FOUND, "Unknown collection");
        return;
    }

    debug!(collection = %collection, id = %id, "Looking up record by id");
    let result = lookup.by_id(&collection, &id).await;
    render_lookup(res, result, None);
}

/// ## Summary
/// GET /api/{collection}/slug/{slug} - Fetch a record by canonical or legacy slug
///
/// ## Side Effects
/// Successful responses carry a shared-cache `Cache-Control` header.
///
/// ## Errors
/// Returns HTTP 404 for unknown collections and missing records.
/// Returns HTTP 502 if the lookup backend fails.
#[handler]
async fn record_by_slug(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let (Some(collection), Some(slug)) = (
        req.param::<String>("collection"),
        req.param::<String>("slug"),
    ) else {
        render_error(res, StatusCode::BAD_REQUEST, "Missing path parameters");
        return;
    };
    let Some((settings, lookup)) = request_context(depot, res) else {
        return;
    };
    if !settings.is_monitored(&collection) {
        render_error(res, StatusCode::NOT_FOUND, "Unknown collection");
        return;
    }

    debug!(collection = %collection, slug = %slug, "Looking up record by slug");
    let result = lookup.by_slug(&collection, &slug).await;
    let cache_control = settings.lookup.cache_control();
    render_lookup(res, result, Some(&cache_control));
}

fn request_context(
    depot: &Depot,
    res: &mut Response,
) -> Option<(Arc<Settings>, Arc<dyn RecordLookup>)> {
    let context = get_config_from_depot(depot)
        .and_then(|settings| get_lookup_from_depot(depot).map(|lookup| (settings, lookup)));
    match context {
        Ok(context) => Some(context),
        Err(e) => {
            error!(error = %e, "Lookup endpoint misconfigured");
            render_error(res, StatusCode::INTERNAL_SERVER_ERROR, "Internal server error");
            None
        }
    }
}

fn render_lookup(
    res: &mut Response,
    result: ServiceResult<Option<Record>>,
    cache_control: Option<&str>,
) {
    match result {
        Ok(Some(record)) => {
            if let Some(value) = cache_control.and_then(|v| HeaderValue::from_str(v).ok()) {
                res.headers_mut().insert(header::CACHE_CONTROL, value);
            }
            res.render(Json(record));
        }
        Ok(None) => render_error(res, StatusCode::NOT_FOUND, "Record not found"),
        Err(e) => {
            warn!(error = %e, "Record lookup failed");
            render_error(res, StatusCode::BAD_GATEWAY, "Record lookup failed");
        }
    }
}

#[must_use]
pub fn routes() -> Router {
    Router::with_path("{collection}")
        .push(Router::with_path(format!("{SLUG_ROUTE_COMPONENT}/{{slug}}")).get(record_by_slug))
        .push(Router::with_path("{id}").get(record_by_id))
}
