//! Middleware redirecting detail-page requests to their canonical slug path.
//!
//! ## Summary
//! For a request to `/<collection>/<segment>` on a monitored collection:
//! - an id, legacy slug, or non-normalized slug answers `308 Permanent
//!   Redirect` with `Location: /<collection>/<canonical-slug>`, keeping the
//!   query string
//! - the canonical slug passes through with the record stored under
//!   `depot_keys::RESOLVED_RECORD`, as does a record not yet given a slug
//! - a miss or a failed lookup passes through with a [`SlugOutcome`] stored
//!   under `depot_keys::SLUG_OUTCOME`
//!
//! The middleware never fails a request. Lookup failures are logged and the
//! downstream handler renders from what was stored, without looking again.

use salvo::Depot;
use salvo::http::{HeaderValue, StatusCode, header};
use tracing::{debug, info, warn};
use wayfarer_service::resolve::{Resolution, resolve};

use crate::config::get_config_from_depot;
use crate::lookup_handler::get_lookup_from_depot;
use crate::middleware::depot_keys;

/// Why a monitored detail path resolved to no record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlugOutcome {
    Miss,
    LookupFailed,
}

pub struct SlugRedirectMiddleware;

#[salvo::async_trait]
impl salvo::Handler for SlugRedirectMiddleware {
    #[tracing::instrument(skip_all, fields(path = %req.uri().path()))]
    async fn handle(
        &self,
        req: &mut salvo::Request,
        depot: &mut Depot,
        res: &mut salvo::Response,
        ctrl: &mut salvo::FlowCtrl,
    ) {
        let settings = match get_config_from_depot(depot) {
            Ok(settings) => settings,
            Err(e) => {
                warn!(error = %e, "Configuration not available in slug redirect middleware");
                return;
            }
        };
        let lookup = match get_lookup_from_depot(depot) {
            Ok(lookup) => lookup,
            Err(e) => {
                warn!(error = %e, "Record lookup not available in slug redirect middleware");
                return;
            }
        };

        let path = req.uri().path().to_string();
        match resolve(lookup.as_ref(), &settings.collections, &path).await {
            Resolution::Passthrough => {}
            Resolution::PassthroughOnMiss(Some(record)) => {
                depot.insert(depot_keys::RESOLVED_RECORD, record);
            }
            Resolution::PassthroughOnMiss(None) => {
                depot.insert(depot_keys::SLUG_OUTCOME, SlugOutcome::Miss);
            }
            Resolution::PassthroughOnError(e) => {
                warn!(error = %e, "Slug lookup failed, serving request without redirect");
                depot.insert(depot_keys::SLUG_OUTCOME, SlugOutcome::LookupFailed);
            }
            Resolution::CanonicalMatch(record) => {
                debug!(record_id = %record.id, "Path already canonical");
                depot.insert(depot_keys::RESOLVED_RECORD, record);
            }
            Resolution::Redirect { location, record } => {
                let location = with_query(location, req.uri().query());
                let value = match HeaderValue::from_str(&location) {
                    Ok(value) => value,
                    Err(e) => {
                        warn!(error = %e, location = %location, "Unusable redirect location");
                        return;
                    }
                };

                info!(record_id = %record.id, location = %location, "Redirecting to canonical slug");
                res.status_code(StatusCode::PERMANENT_REDIRECT);
                res.headers_mut().insert(header::LOCATION, value);
                ctrl.skip_rest();
            }
        }
    }
}

fn with_query(location: String, query: Option<&str>) -> String {
    match query {
        Some(query) if !query.is_empty() => format!("{location}?{query}"),
        _ => location,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_query() {
        assert_eq!(
            with_query("/hotels/voi-lodge".to_string(), Some("ref=mail&x=1")),
            "/hotels/voi-lodge?ref=mail&x=1"
        );
        assert_eq!(
            with_query("/hotels/voi-lodge".to_string(), Some("")),
            "/hotels/voi-lodge"
        );
        assert_eq!(with_query("/hotels/voi-lodge".to_string(), None), "/hotels/voi-lodge");
    }
}
