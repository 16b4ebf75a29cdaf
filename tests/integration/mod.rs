// Integration tests for the price watcher
// These tests run whole watchers and runs against a local mock server

pub mod extraction_tests;

use chrono::{NaiveDate, NaiveDateTime};
use price_watcher::{
    config::{OutputConfig, OutputFormat, ScraperConfig},
    fetcher::{Fetcher, HttpFetcher},
    models::WatchTarget,
    plugins::ExtractorRegistry,
    watcher::Watcher,
};
use std::path::Path;
use std::sync::{Arc, Mutex};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Test configuration for integration tests
pub fn get_test_scraper_config() -> ScraperConfig {
    ScraperConfig {
        user_agent: "PriceWatcher-Test/1.0".to_string(),
        request_timeout: 5,
        wait_timeout: 2,
        request_delay_ms: 0,
        chrome_path: None,
    }
}

pub fn output_config(dir: &Path, format: OutputFormat) -> OutputConfig {
    OutputConfig {
        directory: dir.join("data").join("raw"),
        format,
    }
}

pub fn run_timestamp() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 9)
        .unwrap()
        .and_hms_micro_opt(6, 30, 0, 250_000)
        .unwrap()
}

/// A product page embedding `payload` the way otto.de does
pub fn product_page(payload: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="de">
<head>
    <title>Apple iPhone 15 | OTTO</title>
    <script id="variationTracking" type="application/json">{}</script>
</head>
<body>
    <h1 class="pdp_short-info__main-name">Apple iPhone 15</h1>
    <span class="js_pdp_price__retail-price__value">799,00 €</span>
</body>
</html>"#,
        payload
    )
}

pub async fn serve_page(server: &MockServer, page_path: &str, status: u16, body: String) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(server)
        .await;
}

/// Build an HTTP-backed watcher using the default extractor registry
pub fn http_watcher(target: WatchTarget) -> Watcher {
    let registry = ExtractorRegistry::with_defaults();
    let extractor = registry.get(&target.extractor).unwrap();
    let fetcher: Arc<dyn Fetcher> = Arc::new(HttpFetcher::new(&get_test_scraper_config()).unwrap());
    Watcher::new(target, extractor, fetcher)
}

/// Collects formatted log output so tests can assert on console lines
#[derive(Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl std::io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
