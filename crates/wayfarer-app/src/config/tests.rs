use salvo::prelude::*;
use salvo::test::{ResponseExt, TestClient};

use super::*;

const SETTINGS: &str = r#"
    [database]
    url = "postgres://localhost/wayfarer"

    [[collections]]
    name = "hotels"

    [[collections]]
    name = "packages"
    fallback_slug = "package"
"#;

#[handler]
async fn collection_names(depot: &mut Depot) -> String {
    match get_config_from_depot(depot) {
        Ok(settings) => settings
            .collections
            .iter()
            .map(|c| c.name.as_str())
            .collect::<Vec<_>>()
            .join(","),
        Err(e) => e.to_string(),
    }
}

#[test_log::test(tokio::test)]
async fn test_config_injected_into_depot() {
    let settings = Settings::from_toml(SETTINGS).unwrap();
    let service = Service::new(
        Router::new()
            .hoop(ConfigHandler::new(settings))
            .get(collection_names),
    );

    let mut res = TestClient::get("http://127.0.0.1:8698/")
        .send(&service)
        .await;
    let body = res.take_string().await.unwrap();

    assert_eq!(body, "hotels,packages");
}

#[test_log::test(tokio::test)]
async fn test_missing_config_is_reported() {
    let service = Service::new(Router::new().get(collection_names));

    let mut res = TestClient::get("http://127.0.0.1:8698/")
        .send(&service)
        .await;
    let body = res.take_string().await.unwrap();

    assert!(body.contains("Configuration not found in depot"));
}
