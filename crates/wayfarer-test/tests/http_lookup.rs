#![allow(clippy::unwrap_used, clippy::expect_used)]
//! HTTP lookup client against a live lookup server.

use std::sync::Arc;
use std::time::{Duration, Instant};

use salvo::conn::TcpListener;
use salvo::http::StatusCode;
use salvo::http::header::LOCATION;
use salvo::prelude::*;
use salvo::test::TestClient;
use wayfarer_service::error::ServiceError;
use wayfarer_service::lookup::{HttpLookup, RecordLookup};
use wayfarer_test::{MemoryStore, RecordSeed, service_with_lookup, service_with_store};

const MASAI_ID: &str = "AbCdEfGhIj1234567890";

fn free_port() -> u16 {
    std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

async fn serve(service: Service) -> String {
    let port = free_port();
    let acceptor = TcpListener::new(format!("127.0.0.1:{port}")).bind().await;
    tokio::spawn(async move {
        Server::new(acceptor).serve(service).await;
    });
    format!("http://127.0.0.1:{port}")
}

/// Starts a store-backed lookup server and returns its origin.
async fn lookup_server() -> String {
    let store = Arc::new(MemoryStore::with_records(vec![
        RecordSeed::new("hotels", MASAI_ID)
            .name("Masai Mara Lodge")
            .slug("masai-mara-lodge")
            .legacy(&["mara-lodge"])
            .build(),
    ]));
    serve(service_with_store(store).unwrap()).await
}

#[handler]
async fn unavailable(res: &mut Response) {
    res.status_code(StatusCode::SERVICE_UNAVAILABLE);
}

#[test_log::test(tokio::test)]
async fn fetches_records_by_id_and_slug() {
    let origin = lookup_server().await;
    let lookup = HttpLookup::new(&origin, Duration::from_secs(5)).unwrap();

    let by_id = lookup.by_id("hotels", MASAI_ID).await.unwrap().unwrap();
    assert_eq!(by_id.slug.as_deref(), Some("masai-mara-lodge"));

    let by_slug = lookup.by_slug("hotels", "masai-mara-lodge").await.unwrap().unwrap();
    assert_eq!(by_slug.id, MASAI_ID);

    let by_legacy = lookup.by_slug("hotels", "mara-lodge").await.unwrap().unwrap();
    assert_eq!(by_legacy.id, MASAI_ID);
    assert_eq!(by_legacy.legacy_slugs, vec!["mara-lodge"]);
}

#[test_log::test(tokio::test)]
async fn not_found_is_none() {
    let origin = lookup_server().await;
    let lookup = HttpLookup::new(&origin, Duration::from_secs(5)).unwrap();

    assert!(lookup.by_id("hotels", "ZzZzZzZzZz0000000000").await.unwrap().is_none());
    assert!(lookup.by_slug("hotels", "serengeti").await.unwrap().is_none());
    assert!(lookup.by_slug("rooms", "masai-mara-lodge").await.unwrap().is_none());
}

#[test_log::test(tokio::test)]
async fn server_error_is_reported() {
    let origin = serve(Service::new(
        Router::with_path("{**rest}").get(unavailable),
    ))
    .await;
    let lookup = HttpLookup::new(&origin, Duration::from_secs(5)).unwrap();

    let result = lookup.by_slug("hotels", "masai-mara-lodge").await;

    match result {
        Err(ServiceError::LookupStatus { status, url }) => {
            assert_eq!(status, 503);
            assert!(url.ends_with("/api/hotels/slug/masai-mara-lodge"));
        }
        other => panic!("expected lookup status error, got {other:?}"),
    }
}

#[test_log::test(tokio::test)]
async fn slow_lookup_times_out() {
    // Accepts connections and never answers.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let origin = format!("http://{}", listener.local_addr().unwrap());
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((stream, _)) = listener.accept().await {
            held.push(stream);
        }
    });
    let lookup = HttpLookup::new(&origin, Duration::from_millis(200)).unwrap();

    let started = Instant::now();
    let result = lookup.by_id("hotels", MASAI_ID).await;

    assert!(matches!(result, Err(ServiceError::HttpError(ref e)) if e.is_timeout()));
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[test_log::test(tokio::test)]
async fn frontend_redirects_through_lookup_server() {
    let origin = lookup_server().await;
    let lookup = HttpLookup::new(&origin, Duration::from_secs(5)).unwrap();
    let frontend = service_with_lookup(Arc::new(lookup)).unwrap();

    let res = TestClient::get(format!("http://127.0.0.1:8698/hotels/{MASAI_ID}"))
        .send(&frontend)
        .await;

    assert_eq!(res.status_code, Some(StatusCode::PERMANENT_REDIRECT));
    assert_eq!(
        res.headers().get(LOCATION).and_then(|v| v.to_str().ok()),
        Some("/hotels/masai-mara-lodge")
    );
}

#[test_log::test(tokio::test)]
async fn unreachable_lookup_server_passes_through() {
    let origin = format!("http://127.0.0.1:{}", free_port());
    let lookup = HttpLookup::new(&origin, Duration::from_millis(500)).unwrap();
    let frontend = service_with_lookup(Arc::new(lookup)).unwrap();

    let res = TestClient::get(format!("http://127.0.0.1:8698/hotels/{MASAI_ID}"))
        .send(&frontend)
        .await;

    assert!(res.headers().get(LOCATION).is_none());
    assert_eq!(res.status_code, Some(StatusCode::OK));
}
