#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Redirect middleware scenarios driven through the full router.

use std::sync::Arc;

use salvo::http::header::{CACHE_CONTROL, LOCATION};
use salvo::http::StatusCode;
use salvo::prelude::*;
use salvo::test::{ResponseExt, TestClient};
use wayfarer_app::config::ConfigHandler;
use wayfarer_app::lookup_handler::LookupHandler;
use wayfarer_app::middleware::slug_redirect::SlugRedirectMiddleware;
use wayfarer_service::backfill::{self, BackfillOptions};
use wayfarer_service::lookup::{RecordLookup, StoreLookup};
use wayfarer_test::{
    CountingLookup, FailingLookup, MemoryStore, RecordSeed, service_with_lookup,
    service_with_store, test_settings,
};

const MASAI_ID: &str = "AbCdEfGhIj1234567890";
const SLUGLESS_ID: &str = "KlMnOpQrSt0987654321";

fn seeded_store() -> Arc<MemoryStore> {
    Arc::new(MemoryStore::with_records(vec![
        RecordSeed::new("hotels", MASAI_ID)
            .name("Masai Mara Lodge")
            .slug("masai-mara-lodge")
            .legacy(&["mara-lodge", "old-masai"])
            .build(),
        RecordSeed::new("hotels", SLUGLESS_ID)
            .name("Amboseli Camp")
            .created(10)
            .build(),
    ]))
}

async fn get(service: &Service, path: &str) -> Response {
    TestClient::get(format!("http://127.0.0.1:8698{path}"))
        .send(service)
        .await
}

fn location(res: &Response) -> Option<&str> {
    res.headers().get(LOCATION).and_then(|v| v.to_str().ok())
}

#[handler]
async fn page() -> &'static str {
    "page"
}

/// Router with the middleware in front of a static page, so pass-through is
/// observable independently of the detail handler.
fn page_service(lookup: Arc<dyn RecordLookup>) -> Service {
    Service::new(
        Router::new()
            .hoop(ConfigHandler::new(test_settings().unwrap()))
            .hoop(LookupHandler { lookup })
            .push(
                Router::with_path("{collection}/{segment}")
                    .hoop(SlugRedirectMiddleware)
                    .goal(page),
            ),
    )
}

#[test_log::test(tokio::test)]
async fn id_request_redirects_to_canonical_slug() {
    let service = service_with_store(seeded_store()).unwrap();

    let res = get(&service, &format!("/hotels/{MASAI_ID}")).await;

    assert_eq!(res.status_code, Some(StatusCode::PERMANENT_REDIRECT));
    assert_eq!(location(&res), Some("/hotels/masai-mara-lodge"));
}

#[test_log::test(tokio::test)]
async fn canonical_slug_passes_through_to_detail() {
    let service = service_with_store(seeded_store()).unwrap();

    let mut res = get(&service, "/hotels/masai-mara-lodge").await;

    assert_eq!(res.status_code, Some(StatusCode::OK));
    assert!(location(&res).is_none());
    let body: serde_json::Value = res.take_json().await.unwrap();
    assert_eq!(body["id"], MASAI_ID);
    assert_eq!(body["slug"], "masai-mara-lodge");
}

#[test_log::test(tokio::test)]
async fn lookup_failure_passes_through() {
    let service = page_service(Arc::new(FailingLookup));

    let mut res = get(&service, &format!("/hotels/{MASAI_ID}")).await;

    assert_eq!(res.status_code, Some(StatusCode::OK));
    assert!(location(&res).is_none());
    assert_eq!(res.take_string().await.unwrap(), "page");
}

#[test_log::test(tokio::test)]
async fn store_failure_passes_through() {
    let store = seeded_store();
    store.fail_all();
    let service = page_service(Arc::new(StoreLookup::new(store)));

    let mut res = get(&service, "/hotels/mara-lodge").await;

    assert_eq!(res.status_code, Some(StatusCode::OK));
    assert_eq!(res.take_string().await.unwrap(), "page");
}

#[test_log::test(tokio::test)]
async fn lookup_failure_still_serves_detail_page() {
    let counting = Arc::new(CountingLookup::new(Arc::new(FailingLookup)));
    let service = service_with_lookup(counting.clone()).unwrap();

    let mut res = get(&service, "/hotels/masai-mara-lodge").await;

    assert_eq!(res.status_code, Some(StatusCode::OK));
    assert!(location(&res).is_none());
    assert_eq!(
        res.headers().get(CACHE_CONTROL).and_then(|v| v.to_str().ok()),
        Some("no-store")
    );
    let body: serde_json::Value = res.take_json().await.unwrap();
    assert_eq!(body["collection"], "hotels");
    assert_eq!(body["segment"], "masai-mara-lodge");
    assert_eq!(counting.calls(), 1);
}

#[test_log::test(tokio::test)]
async fn legacy_slug_redirects_to_canonical_slug() {
    let service = service_with_store(seeded_store()).unwrap();

    let res = get(&service, "/hotels/old-masai").await;

    assert_eq!(res.status_code, Some(StatusCode::PERMANENT_REDIRECT));
    assert_eq!(location(&res), Some("/hotels/masai-mara-lodge"));
}

#[test_log::test(tokio::test)]
async fn non_normalized_slug_redirects() {
    let service = service_with_store(seeded_store()).unwrap();

    for path in [
        "/hotels/Masai-Mara-Lodge",
        "/hotels/masai--mara--lodge-",
        "/hotels/Masai%20Mara%20Lodge",
        "/hotels/M%C3%A1sai%20M%C3%A1ra%20Lodge",
    ] {
        let res = get(&service, path).await;
        assert_eq!(
            res.status_code,
            Some(StatusCode::PERMANENT_REDIRECT),
            "path {path}"
        );
        assert_eq!(location(&res), Some("/hotels/masai-mara-lodge"), "path {path}");
    }
}

#[test_log::test(tokio::test)]
async fn redirect_preserves_query_string() {
    let service = service_with_store(seeded_store()).unwrap();

    let res = get(&service, &format!("/hotels/{MASAI_ID}?checkin=2025-07-01&guests=2")).await;

    assert_eq!(res.status_code, Some(StatusCode::PERMANENT_REDIRECT));
    assert_eq!(
        location(&res),
        Some("/hotels/masai-mara-lodge?checkin=2025-07-01&guests=2")
    );
}

#[test_log::test(tokio::test)]
async fn redirect_applies_to_any_method() {
    let service = service_with_store(seeded_store()).unwrap();

    let res = TestClient::post(format!("http://127.0.0.1:8698/hotels/{MASAI_ID}"))
        .send(&service)
        .await;

    assert_eq!(res.status_code, Some(StatusCode::PERMANENT_REDIRECT));
    assert_eq!(location(&res), Some("/hotels/masai-mara-lodge"));
}

#[test_log::test(tokio::test)]
async fn unknown_segment_passes_through_to_not_found() {
    let service = service_with_store(seeded_store()).unwrap();

    let res = get(&service, "/hotels/serengeti-tented-camp").await;

    assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));
    assert!(location(&res).is_none());
}

#[test_log::test(tokio::test)]
async fn unknown_segment_costs_one_lookup() {
    let counting = Arc::new(CountingLookup::new(Arc::new(StoreLookup::new(seeded_store()))));
    let service = service_with_lookup(counting.clone()).unwrap();

    let res = get(&service, "/hotels/serengeti-tented-camp").await;

    assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));
    assert_eq!(counting.calls(), 1);
}

#[test_log::test(tokio::test)]
async fn unknown_id_is_retried_as_slug_only() {
    let counting = Arc::new(CountingLookup::new(Arc::new(StoreLookup::new(seeded_store()))));
    let service = service_with_lookup(counting.clone()).unwrap();

    let res = get(&service, "/hotels/ZzZzZzZzZz0000000000").await;

    assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));
    assert!(location(&res).is_none());
    assert_eq!(counting.calls(), 2);
}

#[test_log::test(tokio::test)]
async fn slug_derived_from_id_serves_its_record() {
    let store = Arc::new(MemoryStore::with_records(vec![
        RecordSeed::new("hotels", MASAI_ID).build(),
    ]));
    let settings = test_settings().unwrap();
    backfill::run(
        store.as_ref(),
        &settings.collections,
        Some("hotels"),
        BackfillOptions {
            max_suffix_attempts: 50,
            dry_run: false,
        },
    )
    .await
    .unwrap();
    let service = service_with_store(store).unwrap();

    let res = get(&service, &format!("/hotels/{MASAI_ID}")).await;
    assert_eq!(res.status_code, Some(StatusCode::PERMANENT_REDIRECT));
    assert_eq!(location(&res), Some("/hotels/abcdefghij1234567890"));

    let mut res = get(&service, "/hotels/abcdefghij1234567890").await;
    assert_eq!(res.status_code, Some(StatusCode::OK));
    assert!(location(&res).is_none());
    let body: serde_json::Value = res.take_json().await.unwrap();
    assert_eq!(body["id"], MASAI_ID);
    assert_eq!(body["slug"], "abcdefghij1234567890");
}

#[test_log::test(tokio::test)]
async fn record_without_slug_is_not_redirected() {
    let service = service_with_store(seeded_store()).unwrap();

    let mut res = get(&service, &format!("/hotels/{SLUGLESS_ID}")).await;

    assert_eq!(res.status_code, Some(StatusCode::OK));
    assert!(location(&res).is_none());
    let body: serde_json::Value = res.take_json().await.unwrap();
    assert_eq!(body["id"], SLUGLESS_ID);
    assert!(body["slug"].is_null());
}

#[test_log::test(tokio::test)]
async fn unmonitored_collection_is_not_looked_up() {
    let counting = Arc::new(CountingLookup::new(Arc::new(StoreLookup::new(seeded_store()))));
    let service = service_with_lookup(counting.clone()).unwrap();

    let res = get(&service, &format!("/rooms/{MASAI_ID}")).await;

    assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));
    assert!(location(&res).is_none());
    assert_eq!(counting.calls(), 0);
}

#[test_log::test(tokio::test)]
async fn redirect_costs_one_lookup() {
    let counting = Arc::new(CountingLookup::new(Arc::new(StoreLookup::new(seeded_store()))));
    let service = page_service(counting.clone());

    let res = get(&service, &format!("/hotels/{MASAI_ID}")).await;
    assert_eq!(res.status_code, Some(StatusCode::PERMANENT_REDIRECT));
    assert_eq!(counting.calls(), 1);

    let res = get(&service, "/hotels/masai-mara-lodge").await;
    assert_eq!(res.status_code, Some(StatusCode::OK));
    assert_eq!(counting.calls(), 2);
}

#[test_log::test(tokio::test)]
async fn api_routes_are_not_intercepted() {
    let counting = Arc::new(CountingLookup::new(Arc::new(StoreLookup::new(seeded_store()))));
    let service = service_with_lookup(counting.clone()).unwrap();

    let mut res = get(&service, "/api/app/healthcheck").await;

    assert_eq!(res.status_code, Some(StatusCode::OK));
    assert_eq!(res.take_string().await.unwrap(), "OK");
    assert_eq!(counting.calls(), 0);
}
