use afritax::core::price::PriceProvider;
use afritax::poller::{PollerConfig, PricePoller};
use afritax::providers::CoinGeckoProvider;
use std::fs;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

mod test_utils {
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    pub async fn create_price_server(template: ResponseTemplate) -> MockServer {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v3/simple/price"))
            .and(query_param("ids", "usd-coin"))
            .respond_with(template)
            .mount(&mock_server)
            .await;

        mock_server
    }

    pub fn write_config(base_url: &str) -> tempfile::NamedTempFile {
        let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
        let config_content = format!(
            r#"
            providers:
              coingecko:
                base_url: {base_url}
            asset_id: "usd-coin"
            poll_interval_secs: 30
            country: "Kenya"
            structure: "fintech"
        "#
        );
        std::fs::write(config_file.path(), config_content).expect("Failed to write config file");
        config_file
    }
}

fn poller_config() -> PollerConfig {
    PollerConfig {
        asset_id: "usd-coin".to_string(),
        interval: Duration::from_secs(30),
        fallback_price: 1.0,
    }
}

#[test_log::test(tokio::test)]
async fn test_calc_flow_with_mock() {
    let mock_server = test_utils::create_price_server(
        wiremock::ResponseTemplate::new(200).set_body_string(r#"{"usd-coin":{"usd":1.0023}}"#),
    )
    .await;
    let config_file = test_utils::write_config(&mock_server.uri());

    let result = afritax::run_command(
        afritax::AppCommand::Calc {
            volume: "1000000".to_string(),
            country: Some(afritax::core::Country::Nigeria),
            structure: None,
        },
        Some(config_file.path().to_str().unwrap()),
    )
    .await;
    assert!(
        result.is_ok(),
        "Calc command failed with: {:?}",
        result.err()
    );

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
}

#[test_log::test(tokio::test)]
async fn test_calc_flow_survives_price_api_failure() {
    let mock_server =
        test_utils::create_price_server(wiremock::ResponseTemplate::new(500)).await;
    let config_file = test_utils::write_config(&mock_server.uri());

    let result = afritax::run_command(
        afritax::AppCommand::Calc {
            volume: "not a number".to_string(),
            country: None,
            structure: None,
        },
        Some(config_file.path().to_str().unwrap()),
    )
    .await;
    assert!(
        result.is_ok(),
        "Calc command failed with: {:?}",
        result.err()
    );
}

#[test_log::test(tokio::test)]
async fn test_countries_command() {
    let config_file = test_utils::write_config("http://127.0.0.1:1");
    let result = afritax::run_command(
        afritax::AppCommand::Countries,
        Some(config_file.path().to_str().unwrap()),
    )
    .await;
    assert!(result.is_ok());
}

#[test_log::test(tokio::test)]
async fn test_invalid_config_is_reported() {
    let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    fs::write(config_file.path(), "country: Atlantis\n").expect("Failed to write config file");

    let result = afritax::run_command(
        afritax::AppCommand::Countries,
        Some(config_file.path().to_str().unwrap()),
    )
    .await;
    let err = result.unwrap_err();
    assert!(
        err.to_string().contains("Failed to parse config file"),
        "{err:?}"
    );

    let result = afritax::run_command(
        afritax::AppCommand::Countries,
        Some("/nonexistent/afritax/config.yaml"),
    )
    .await;
    assert!(result.is_err());
}

#[test_log::test(tokio::test)]
async fn test_poller_publishes_live_price_then_stops() {
    let mock_server = test_utils::create_price_server(
        wiremock::ResponseTemplate::new(200).set_body_string(r#"{ "usd-coin": { "usd": 1.0023 } }"#),
    )
    .await;

    let provider: Arc<dyn PriceProvider> =
        Arc::new(CoinGeckoProvider::new(&mock_server.uri()).unwrap());
    let handle = PricePoller::spawn(provider, poller_config());
    let mut prices = handle.subscribe();

    tokio::time::timeout(Duration::from_secs(5), prices.changed())
        .await
        .expect("No price published in time")
        .expect("Poller dropped its sender");
    let live = prices.borrow_and_update().clone();
    info!(?live, "Received live price");
    assert_eq!(live.price, Some(1.0023));
    assert!(!live.loading);

    handle.shutdown().await;
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(mock_server.received_requests().await.unwrap().len(), 1);
}

#[test_log::test(tokio::test)]
async fn test_poller_falls_back_on_malformed_response() {
    let mock_server = test_utils::create_price_server(
        wiremock::ResponseTemplate::new(200).set_body_string(r#"{"bitcoin":{"usd":64000}}"#),
    )
    .await;

    let provider: Arc<dyn PriceProvider> =
        Arc::new(CoinGeckoProvider::new(&mock_server.uri()).unwrap());
    let handle = PricePoller::spawn(provider, poller_config());
    let mut prices = handle.subscribe();

    tokio::time::timeout(Duration::from_secs(5), prices.changed())
        .await
        .expect("No price published in time")
        .expect("Poller dropped its sender");
    assert_eq!(prices.borrow().price, Some(1.0));

    handle.shutdown().await;
}
