use pretty_assertions::assert_eq;
use serde_json::json;
use std::path::Path;
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use price_report::config::RetryPolicy;
use price_report::models::RateSource;
use price_report::report::load_report;
use price_report::Config;

const LISTING_HTML: &str = r#"
<html><body>
  <article class="prd _fb col c-prd">
    <img class="img" data-src="/img/15.jpg">
    <h3 class="name">Apple iPhone 15</h3>
    <div class="prc">MAD 10,000.00</div>
  </article>
  <article class="prd _fb col c-prd">
    <img class="img" data-src="/img/13.jpg">
    <h3 class="name">Apple iPhone 13</h3>
    <div class="prc">MAD 6,000.00</div>
  </article>
  <article class="prd _fb col c-prd">
    <h3 class="name">Apple iPhone 12 (no price)</h3>
  </article>
</body></html>
"#;

fn test_config(server: &MockServer, dir: &Path) -> Config {
    let fast = RetryPolicy {
        max_attempts: 2,
        timeout_secs: 1,
        backoff_ms: 10,
    };

    let mut config = Config::defaults().unwrap();
    config.listing.url = format!("{}/iphone/", server.uri());
    config.listing.fetch = fast;
    config.exchange_rate.api_url = format!("{}/latest/USD", server.uri());
    config.exchange_rate.fetch = fast;
    config.report.csv_path = dir.join("jumia_product.csv");
    config.report.chart_path = dir.join("jumia_product_prices.svg");
    config
}

async fn mount_listing(server: &MockServer, body: &str) {
    Mock::given(method("GET"))
        .and(path("/iphone/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(1)
        .mount(server)
        .await;
}

async fn mount_rate(server: &MockServer, payload: serde_json::Value, calls: u64) {
    Mock::given(method("GET"))
        .and(path("/latest/USD"))
        .respond_with(ResponseTemplate::new(200).set_body_json(payload))
        .expect(calls)
        .mount(server)
        .await;
}

#[tokio::test]
async fn full_run_writes_report_with_trailer() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    mount_listing(&server, LISTING_HTML).await;
    mount_rate(
        &server,
        json!({ "result": "success", "conversion_rates": { "MAD": 9.87 } }),
        1,
    )
    .await;

    let config = Arc::new(test_config(&server, dir.path()));
    let summary = price_report::run(config.clone()).await.unwrap();

    assert_eq!(summary.cards_found, 3);
    assert_eq!(summary.products_reported, 2);
    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.average_primary, 8000.0);
    assert_eq!(summary.average_secondary, 800.0);
    assert_eq!(summary.rate.value(), 9.87);
    assert_eq!(summary.rate.source(), RateSource::Live);
    assert!(summary.chart_path.is_some());

    let rows = load_report(&config.report.csv_path).unwrap();
    let titles: Vec<&str> = rows.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["Apple iPhone 15", "Apple iPhone 13", "AVERAGE PRICE"]);
    assert_eq!(rows[0].price_secondary, 1000.0);
    assert_eq!(rows[0].image_url, format!("{}/img/15.jpg", server.uri()));
    assert_eq!(rows[2].image_url, "");
}

#[tokio::test]
async fn rate_failure_falls_back_and_still_reports() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    mount_listing(&server, LISTING_HTML).await;
    mount_rate(
        &server,
        json!({ "result": "error", "error-type": "invalid-key" }),
        2,
    )
    .await;

    let config = Arc::new(test_config(&server, dir.path()));
    let summary = price_report::run(config.clone()).await.unwrap();

    assert!(summary.rate.is_fallback());
    assert_eq!(summary.rate.value(), 10.0);
    assert_eq!(summary.average_secondary, 800.0);
    assert!(config.report.csv_path.exists());
}

#[tokio::test]
async fn unreachable_listing_aborts_before_anything_else() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    Mock::given(method("GET"))
        .and(path("/iphone/"))
        .respond_with(ResponseTemplate::new(503))
        .expect(2)
        .mount(&server)
        .await;
    mount_rate(&server, json!({ "result": "success" }), 0).await;

    let config = Arc::new(test_config(&server, dir.path()));
    let err = price_report::run(config.clone()).await.unwrap_err();

    assert!(format!("{:#}", err).contains("after 2 attempts"));
    assert!(!config.report.csv_path.exists());
    assert!(!config.report.chart_path.exists());
}

#[tokio::test]
async fn listing_without_valid_prices_writes_nothing() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    mount_listing(
        &server,
        r#"<article class="prd _fb col c-prd"><h3 class="name">x</h3><div class="prc">Épuisé</div></article>"#,
    )
    .await;
    mount_rate(
        &server,
        json!({ "result": "success", "conversion_rates": { "MAD": 9.87 } }),
        1,
    )
    .await;

    let config = Arc::new(test_config(&server, dir.path()));
    let err = price_report::run(config.clone()).await.unwrap_err();

    assert!(format!("{:#}", err).contains("no valid products"));
    assert!(!config.report.csv_path.exists());
}
