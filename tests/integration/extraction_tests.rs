use async_trait::async_trait;
use price_watcher::{
    fetcher::{FetchRequest, Fetcher},
    models::WatchTarget,
    plugins::extractors::OttoExtractor,
    watcher::Watcher,
    AppError,
};
use serde_json::json;
use std::sync::Arc;
use wiremock::MockServer;

use super::*;

/// Serves the same content for every request, standing in for a rendered DOM
struct StaticFetcher(String);

#[async_trait]
impl Fetcher for StaticFetcher {
    async fn fetch(&self, _request: &FetchRequest) -> price_watcher::Result<String> {
        Ok(self.0.clone())
    }
}

const TWO_VARIANTS: &str = r#"{
    "1786938267": {"labels": {"hd_Price": 799.0, "hd_Color": "Schwarz", "hd_Availability": "lieferbar", "hd_Retailer": "OTTO"}},
    "1786938268": {"labels": {"hd_Price": 829.0, "hd_Color": "Blau", "hd_Availability": "lieferbar", "hd_Retailer": "OTTO"}}
}"#;

#[tokio::test]
async fn test_observe_over_http() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    serve_page(&server, "/p/iphone-15", 200, product_page(TWO_VARIANTS)).await;

    let url = format!("{}/p/iphone-15", server.uri());
    let watcher = http_watcher(WatchTarget::new(&url, "iPhone 15", "otto"));

    let records = watcher.observe(run_timestamp()).await?;

    assert_eq!(records.len(), 2);
    assert!(records.iter().all(|r| r.url == url && r.description == "iPhone 15"));
    assert!(records.iter().all(|r| r.timestamp == run_timestamp()));
    assert_eq!(records[0].fields.get("color"), Some(&json!("Schwarz")));
    assert_eq!(records[1].price(), Some(&json!(829.0)));
    Ok(())
}

#[tokio::test]
async fn test_only_allow_listed_fields_survive() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    let payload = r#"[{
        "variationId": "1614884205",
        "labels": {
            "hd_Price": 99.99,
            "hd_Stock": 7,
            "hd_Discount": 0.15,
            "hd_Brand": "Belkin",
            "hd_Category": "Ladegeräte"
        },
        "tracking": {"campaign": "spring"}
    }]"#;
    serve_page(&server, "/p/ladepad", 200, product_page(payload)).await;

    let watcher = http_watcher(WatchTarget::new(
        format!("{}/p/ladepad", server.uri()),
        "Belkin Ladepad",
        "otto",
    ));
    let records = watcher.observe(run_timestamp()).await?;

    let value = serde_json::to_value(&records[0])?;
    let mut keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
    keys.sort();
    assert_eq!(keys, vec!["description", "discount", "price", "stock", "timestamp", "url"]);
    Ok(())
}

#[tokio::test]
async fn test_null_price_variant_is_excluded() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    let payload = r#"{
        "1": {"labels": {"hd_Price": 699.0, "hd_Color": "Mitternacht"}},
        "2": {"labels": {"hd_Price": null, "hd_Color": "Polarstern"}},
        "3": {"labels": {"hd_Price": 719.0, "hd_Color": "Rot"}}
    }"#;
    serve_page(&server, "/p/iphone-13", 200, product_page(payload)).await;

    let watcher = http_watcher(WatchTarget::new(
        format!("{}/p/iphone-13", server.uri()),
        "iPhone 13",
        "otto",
    ));
    let records = watcher.observe(run_timestamp()).await?;

    let colors: Vec<_> = records.iter().map(|r| r.fields["color"].clone()).collect();
    assert_eq!(colors, vec![json!("Mitternacht"), json!("Rot")]);
    Ok(())
}

#[tokio::test]
async fn test_not_found_status_fails_before_parsing() {
    let server = MockServer::start().await;
    // The body would parse; the status alone must reject it
    serve_page(&server, "/p/removed", 404, product_page(TWO_VARIANTS)).await;

    let watcher = http_watcher(WatchTarget::new(
        format!("{}/p/removed", server.uri()),
        "Removed product",
        "otto",
    ));
    let err = watcher.observe(run_timestamp()).await.unwrap_err();

    match err {
        AppError::Watcher { description, source } => {
            assert_eq!(description, "Removed product");
            assert!(matches!(*source, AppError::HttpStatus { status: 404, .. }));
        }
        other => panic!("expected Watcher error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_fetch_strategy_does_not_change_rows() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    serve_page(&server, "/p/iphone-15", 200, product_page(TWO_VARIANTS)).await;
    let url = format!("{}/p/iphone-15", server.uri());

    let over_http = http_watcher(WatchTarget::new(&url, "iPhone 15", "otto"))
        .observe(run_timestamp())
        .await?;

    let rendered = Watcher::new(
        WatchTarget::new(&url, "iPhone 15", "otto"),
        Arc::new(OttoExtractor::new()),
        Arc::new(StaticFetcher(product_page(TWO_VARIANTS))),
    )
    .observe(run_timestamp())
    .await?;

    assert_eq!(over_http, rendered);
    Ok(())
}

#[tokio::test]
async fn test_price_tag_extractor_over_http() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    serve_page(&server, "/p/iphone-15", 200, product_page(TWO_VARIANTS)).await;

    let watcher = http_watcher(WatchTarget::new(
        format!("{}/p/iphone-15", server.uri()),
        "iPhone 15",
        "otto-price-tag",
    ));
    let records = watcher.observe(run_timestamp()).await?;

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].price(), Some(&json!("799,00 €")));
    Ok(())
}
