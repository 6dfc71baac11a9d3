use std::time::Duration;

use reqwest::{StatusCode, Url};
use wayfarer_core::constants::{API_ROUTE_COMPONENT, SLUG_ROUTE_COMPONENT};
use wayfarer_db::model::record::Record;

use super::{LookupFuture, RecordLookup};
use crate::error::{ServiceError, ServiceResult};

/// Resolves records through the lookup API:
/// `GET {origin}/api/<collection>/<id>` and
/// `GET {origin}/api/<collection>/slug/<slug>`.
///
/// Requests are bounded by the client timeout; a timeout surfaces as
/// `ServiceError::HttpError` like any other transport failure.
#[derive(Debug, Clone)]
pub struct HttpLookup {
    client: reqwest::Client,
    origin: Url,
}

impl HttpLookup {
    /// ## Summary
    /// Creates a lookup client for the API served at `origin`.
    ///
    /// ## Errors
    /// Returns `ServiceError::InvalidConfiguration` if `origin` is not an
    /// absolute URL, or `ServiceError::HttpError` if the client cannot be built.
    pub fn new(origin: &str, timeout: Duration) -> ServiceResult<Self> {
        let origin = Url::parse(origin).map_err(|e| {
            ServiceError::InvalidConfiguration(format!("invalid lookup origin {origin:?}: {e}"))
        })?;
        if origin.cannot_be_a_base() {
            return Err(ServiceError::InvalidConfiguration(format!(
                "lookup origin cannot be a base URL: {origin}"
            )));
        }

        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self { client, origin })
    }

    fn endpoint(&self, segments: &[&str]) -> ServiceResult<Url> {
        let mut url = self.origin.clone();
        {
            let mut path = url.path_segments_mut().map_err(|()| {
                ServiceError::InvalidConfiguration(format!(
                    "lookup origin cannot be a base URL: {}",
                    self.origin
                ))
            })?;
            path.pop_if_empty()
                .push(API_ROUTE_COMPONENT)
                .extend(segments);
        }
        Ok(url)
    }

    #[tracing::instrument(skip(self, url), fields(url = %url))]
    async fn fetch(&self, url: Url) -> ServiceResult<Option<Record>> {
        let response = self.client.get(url.clone()).send().await?;

        match response.status() {
            StatusCode::NOT_FOUND => {
                tracing::debug!("Lookup found no record");
                Ok(None)
            }
            status if status.is_success() => Ok(Some(response.json::<Record>().await?)),
            status => Err(ServiceError::LookupStatus {
                status: status.as_u16(),
                url: url.to_string(),
            }),
        }
    }
}

impl RecordLookup for HttpLookup {
    fn by_id<'a>(&'a self, collection: &'a str, id: &'a str) -> LookupFuture<'a> {
        Box::pin(async move {
            let url = self.endpoint(&[collection, id])?;
            self.fetch(url).await
        })
    }

    fn by_slug<'a>(&'a self, collection: &'a str, slug: &'a str) -> LookupFuture<'a> {
        Box::pin(async move {
            let url = self.endpoint(&[collection, SLUG_ROUTE_COMPONENT, slug])?;
            self.fetch(url).await
        })
    }
}
