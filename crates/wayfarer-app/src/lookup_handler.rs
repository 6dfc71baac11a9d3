use std::sync::Arc;

use salvo::async_trait;
use wayfarer_core::error::CoreError;
use wayfarer_service::lookup::RecordLookup;

use crate::error::AppResult;

pub struct LookupHandler {
    pub lookup: Arc<dyn RecordLookup>,
}

#[async_trait]
impl salvo::Handler for LookupHandler {
    #[tracing::instrument(skip(self, _req, depot, _res, _ctrl))]
    async fn handle(
        &self,
        _req: &mut salvo::Request,
        depot: &mut salvo::Depot,
        _res: &mut salvo::Response,
        _ctrl: &mut salvo::FlowCtrl,
    ) {
        depot.inject(Arc::clone(&self.lookup));
    }
}

/// ## Summary
/// Retrieves the record lookup backend from the depot.
///
/// ## Errors
/// Returns an error if no lookup backend was injected.
pub fn get_lookup_from_depot(depot: &salvo::Depot) -> AppResult<Arc<dyn RecordLookup>> {
    depot
        .obtain::<Arc<dyn RecordLookup>>()
        .cloned()
        .map_err(|_err| CoreError::InvariantViolation("Record lookup not found in depot").into())
}
