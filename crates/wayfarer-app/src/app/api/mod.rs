mod app_specific;
mod records;

use salvo::http::StatusCode;
use salvo::writing::Json;
use salvo::{Response, Router};
use serde::Serialize;

// Re-export route constants from core
pub use wayfarer_core::constants::{API_ROUTE_COMPONENT, API_ROUTE_PREFIX};

/// ## Summary
/// Error response payload
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub(crate) fn render_error(res: &mut Response, status: StatusCode, error: impl Into<String>) {
    res.status_code(status);
    res.render(Json(ErrorResponse {
        error: error.into(),
    }));
}

/// ## Summary
/// Constructs the API router.
///
/// `app/...` routes are registered ahead of the per-collection lookups so a
/// collection can never shadow them.
#[must_use]
pub fn routes() -> Router {
    Router::with_path(API_ROUTE_COMPONENT)
        .push(app_specific::routes())
        .push(records::routes())
}
