//! Detail-page route `/{collection}/{segment}`.
//!
//! The page itself renders the record as JSON. Requests reach the handler
//! only after [`SlugRedirectMiddleware`] declined to redirect them, and the
//! handler renders from what the middleware left in the depot.

use salvo::http::header::{CACHE_CONTROL, HeaderValue};
use salvo::http::{Method, StatusCode};
use salvo::writing::Json;
use salvo::{Depot, Request, Response, Router, handler};
use serde::Serialize;
use wayfarer_db::model::record::Record;

use crate::app::api::render_error;
use crate::middleware::depot_keys;
use crate::middleware::slug_redirect::{SlugOutcome, SlugRedirectMiddleware};

/// Page served while the record behind it cannot be looked up.
#[derive(Debug, Serialize)]
struct UnresolvedPage {
    collection: String,
    segment: String,
}

/// ## Summary
/// GET /{collection}/{segment} - Render a record's detail page
///
/// A failed lookup still serves the page, unredirected and uncacheable.
///
/// ## Errors
/// Returns HTTP 404 for unmonitored collections and missing records.
/// Returns HTTP 405 for methods other than GET and HEAD.
#[handler]
async fn detail(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    if *req.method() != Method::GET && *req.method() != Method::HEAD {
        res.status_code(StatusCode::METHOD_NOT_ALLOWED);
        return;
    }

    if let Ok(record) = depot.get::<Record>(depot_keys::RESOLVED_RECORD) {
        res.render(Json(record.clone()));
        return;
    }

    match depot.get::<SlugOutcome>(depot_keys::SLUG_OUTCOME).copied() {
        Ok(SlugOutcome::LookupFailed) => {
            res.headers_mut()
                .insert(CACHE_CONTROL, HeaderValue::from_static("no-store"));
            res.render(Json(UnresolvedPage {
                collection: req.param::<String>("collection").unwrap_or_default(),
                segment: req.param::<String>("segment").unwrap_or_default(),
            }));
        }
        Ok(SlugOutcome::Miss) => render_error(res, StatusCode::NOT_FOUND, "Record not found"),
        Err(_) => render_error(res, StatusCode::NOT_FOUND, "Not found"),
    }
}

#[must_use]
pub fn routes() -> Router {
    Router::with_path("{collection}/{segment}")
        .hoop(SlugRedirectMiddleware)
        .goal(detail)
}
