use crate::core::rates::{BASE_CURRENCY, ExchangeRateProvider, ExchangeRates};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use reqwest::StatusCode;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, info, instrument};

pub const DEFAULT_BASE_URL: &str = "https://open.er-api.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Error, Debug)]
pub enum RateError {
    #[error("The exchange rate request timed out.")]
    Timeout,

    #[error("Connection error while fetching exchange rates: {0}")]
    Connection(#[source] reqwest::Error),

    #[error("HTTP error: {0} while fetching exchange rates")]
    Status(StatusCode),

    #[error("Invalid API response format: 'rates' key missing.")]
    MissingRates,

    #[error("Failed to parse exchange rate response: {0}")]
    MalformedBody(#[from] serde_json::Error),

    #[error("An unexpected exchange rate API error occurred: {0}")]
    Request(#[source] reqwest::Error),
}

impl From<reqwest::Error> for RateError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            RateError::Timeout
        } else if e.is_connect() {
            RateError::Connection(e)
        } else {
            RateError::Request(e)
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErApiResponse {
    base_code: Option<String>,
    time_last_update_unix: Option<i64>,
    rates: Option<HashMap<String, f64>>,
}

/// Client for the open.er-api.com latest-rates endpoint, USD based.
pub struct ErApiProvider {
    base_url: String,
    timeout: Duration,
}

impl ErApiProvider {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        ErApiProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        }
    }

    fn url(&self) -> String {
        format!("{}/v6/latest/{}", self.base_url, BASE_CURRENCY)
    }

    /// Single attempt at fetching the rate set, keeping the failure cause.
    pub async fn try_fetch_rates(&self) -> Result<ExchangeRates, RateError> {
        let url = self.url();
        info!("Fetching live exchange rates from {url}...");

        let client = reqwest::Client::builder()
            .user_agent("housedash/0.1")
            .timeout(self.timeout)
            .build()
            .map_err(RateError::Request)?;
        let response = client.get(&url).send().await?;

        debug!(response = ?response, "Received exchange rate response");
        if !response.status().is_success() {
            return Err(RateError::Status(response.status()));
        }

        let text = response.text().await?;
        let data: ErApiResponse = serde_json::from_str(&text)?;
        let rates = data.rates.ok_or(RateError::MissingRates)?;

        Ok(ExchangeRates {
            base: data.base_code.unwrap_or_else(|| BASE_CURRENCY.to_string()),
            rates,
            updated_at: data
                .time_last_update_unix
                .and_then(|ts| Utc.timestamp_opt(ts, 0).single()),
        })
    }
}

#[async_trait]
impl ExchangeRateProvider for ErApiProvider {
    #[instrument(name = "ErApiRatesFetch", skip(self), fields(base_url = %self.base_url))]
    async fn fetch_rates(&self) -> Option<ExchangeRates> {
        match self.try_fetch_rates().await {
            Ok(rates) => {
                info!("Successfully retrieved {} exchange rates.", rates.rates.len());
                Some(rates)
            }
            Err(e) => {
                error!("{e}");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn create_mock_server(response: ResponseTemplate) -> MockServer {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v6/latest/USD"))
            .respond_with(response)
            .mount(&mock_server)
            .await;

        mock_server
    }

    fn provider(server: &MockServer) -> ErApiProvider {
        ErApiProvider::new(&server.uri(), Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    #[tokio::test]
    async fn test_successful_rates_fetch() {
        let mock_response = r#"{
            "result": "success",
            "base_code": "USD",
            "time_last_update_unix": 1700000000,
            "rates": {"USD": 1, "EUR": 0.92, "GBP": 0.79}
        }"#;
        let mock_server =
            create_mock_server(ResponseTemplate::new(200).set_body_string(mock_response)).await;

        let rates = provider(&mock_server)
            .fetch_rates()
            .await
            .expect("Failed to get rates");

        assert_eq!(rates.base, "USD");
        assert_eq!(rates.rate("EUR"), Some(0.92));
        assert_eq!(rates.rate("USD"), Some(1.0));
        assert_eq!(rates.rates.len(), 3);
        assert_eq!(
            rates.updated_at.map(|t| t.timestamp()),
            Some(1_700_000_000)
        );
    }

    #[tokio::test]
    async fn test_server_error_response() {
        let mock_server = create_mock_server(ResponseTemplate::new(500)).await;
        let provider = provider(&mock_server);

        assert!(matches!(
            provider.try_fetch_rates().await,
            Err(RateError::Status(code)) if code == StatusCode::INTERNAL_SERVER_ERROR
        ));
        assert!(provider.fetch_rates().await.is_none());
    }

    #[tokio::test]
    async fn test_missing_rates_key() {
        let mock_response = r#"{"result": "error", "error-type": "unsupported-code"}"#;
        let mock_server =
            create_mock_server(ResponseTemplate::new(200).set_body_string(mock_response)).await;
        let provider = provider(&mock_server);

        let result = provider.try_fetch_rates().await;
        assert!(matches!(result, Err(RateError::MissingRates)));
        assert_eq!(
            result.unwrap_err().to_string(),
            "Invalid API response format: 'rates' key missing."
        );
        assert!(provider.fetch_rates().await.is_none());
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let mock_server =
            create_mock_server(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
                .await;

        assert!(matches!(
            provider(&mock_server).try_fetch_rates().await,
            Err(RateError::MalformedBody(_))
        ));
    }

    #[tokio::test]
    async fn test_request_timeout() {
        let mock_server = create_mock_server(
            ResponseTemplate::new(200)
                .set_body_string(r#"{"rates": {}}"#)
                .set_delay(Duration::from_secs(2)),
        )
        .await;
        let provider = ErApiProvider::new(&mock_server.uri(), Duration::from_millis(200));

        assert!(matches!(
            provider.try_fetch_rates().await,
            Err(RateError::Timeout)
        ));
    }

    #[tokio::test]
    async fn test_connection_refused() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let uri = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let provider = ErApiProvider::new(&uri, Duration::from_secs(1));
        let result = provider.try_fetch_rates().await;

        assert!(
            matches!(result, Err(RateError::Connection(_))),
            "unexpected result: {result:?}"
        );
        assert!(provider.fetch_rates().await.is_none());
    }
}
