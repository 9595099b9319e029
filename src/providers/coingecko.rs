use anyhow::{Result, anyhow};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::core::price::PriceProvider;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
struct SimplePriceQuote {
    usd: Option<f64>,
}

/// Response of `/api/v3/simple/price`, keyed by asset id.
type SimplePriceResponse = HashMap<String, SimplePriceQuote>;

pub struct CoinGeckoProvider {
    base_url: String,
    client: reqwest::Client,
}

impl CoinGeckoProvider {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("afritax/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(CoinGeckoProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }
}

#[async_trait]
impl PriceProvider for CoinGeckoProvider {
    #[instrument(
        name = "CoinGeckoPriceFetch",
        skip(self),
        fields(asset_id = %asset_id)
    )]
    async fn fetch_usd_price(&self, asset_id: &str) -> Result<f64> {
        let url = format!(
            "{}/api/v3/simple/price?ids={}&vs_currencies=usd",
            self.base_url, asset_id
        );
        debug!("Requesting price from {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} for asset: {}", e, asset_id))?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "HTTP error: {} for asset: {}",
                response.status(),
                asset_id
            ));
        }

        let text = response.text().await?;

        let mut data: SimplePriceResponse = serde_json::from_str(&text)
            .map_err(|e| anyhow!("Failed to parse JSON response for {}: {}", asset_id, e))?;

        let price = data
            .remove(asset_id)
            .and_then(|quote| quote.usd)
            .ok_or_else(|| anyhow!("No USD price found for asset: {}", asset_id))?;

        if !price.is_finite() || price < 0.0 {
            return Err(anyhow!("Invalid USD price {} for asset: {}", price, asset_id));
        }

        Ok(price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn create_mock_server(asset_id: &str, template: ResponseTemplate) -> MockServer {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v3/simple/price"))
            .and(query_param("ids", asset_id))
            .and(query_param("vs_currencies", "usd"))
            .respond_with(template)
            .mount(&mock_server)
            .await;

        mock_server
    }

    #[tokio::test]
    async fn test_successful_price_fetch() {
        let mock_response = r#"{ "usd-coin": { "usd": 1.0023 } }"#;
        let mock_server = create_mock_server(
            "usd-coin",
            ResponseTemplate::new(200).set_body_string(mock_response),
        )
        .await;

        let provider = CoinGeckoProvider::new(&mock_server.uri()).unwrap();
        let price = provider.fetch_usd_price("usd-coin").await.unwrap();
        assert_eq!(price, 1.0023);
    }

    #[tokio::test]
    async fn test_trailing_slash_in_base_url() {
        let mock_server = create_mock_server(
            "tether",
            ResponseTemplate::new(200).set_body_string(r#"{"tether":{"usd":0.9998}}"#),
        )
        .await;

        let provider = CoinGeckoProvider::new(&format!("{}/", mock_server.uri())).unwrap();
        assert_eq!(provider.fetch_usd_price("tether").await.unwrap(), 0.9998);
    }

    #[tokio::test]
    async fn test_api_error_response() {
        let mock_server = create_mock_server("usd-coin", ResponseTemplate::new(429)).await;

        let provider = CoinGeckoProvider::new(&mock_server.uri()).unwrap();
        let result = provider.fetch_usd_price("usd-coin").await;
        assert!(result.is_err());
        assert_eq!(
            result.unwrap_err().to_string(),
            "HTTP error: 429 Too Many Requests for asset: usd-coin"
        );
    }

    #[tokio::test]
    async fn test_malformed_response() {
        let mock_server = create_mock_server(
            "usd-coin",
            ResponseTemplate::new(200).set_body_string("<html>rate limited</html>"),
        )
        .await;

        let provider = CoinGeckoProvider::new(&mock_server.uri()).unwrap();
        let result = provider.fetch_usd_price("usd-coin").await;
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to parse JSON response for usd-coin")
        );
    }

    #[tokio::test]
    async fn test_missing_asset_or_usd_field() {
        for body in [r#"{}"#, r#"{"usd-coin": {}}"#, r#"{"usd-coin": {"eur": 0.92}}"#] {
            let mock_server = create_mock_server(
                "usd-coin",
                ResponseTemplate::new(200).set_body_string(body),
            )
            .await;

            let provider = CoinGeckoProvider::new(&mock_server.uri()).unwrap();
            let result = provider.fetch_usd_price("usd-coin").await;
            assert_eq!(
                result.unwrap_err().to_string(),
                "No USD price found for asset: usd-coin",
                "body: {body}"
            );
        }
    }

    #[tokio::test]
    async fn test_connection_refused() {
        let provider = CoinGeckoProvider::new("http://127.0.0.1:1").unwrap();
        let result = provider.fetch_usd_price("usd-coin").await;
        assert!(result.unwrap_err().to_string().starts_with("Request error"));
    }
}
