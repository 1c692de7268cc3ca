use crate::clients::OptionsDataSource;
use crate::config::Config;
use crate::types::{OptionsData, Ticker};
use crate::{AppError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use url::Url;

const SERVICE: &str = "Options API";
const TIMEOUT_SECS: u64 = 30;

pub struct OptionsDataClient {
    client: Client,
    endpoint: Url,
    api_key: String,
}

impl OptionsDataClient {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(TIMEOUT_SECS))
            .build()
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: config.options_api_url.clone(),
            api_key: config.options_api_key.clone(),
        })
    }

    fn request_url(&self, ticker: &Ticker) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("symbol", ticker.as_str())
            .append_pair("apikey", &self.api_key);
        url
    }

    pub async fn fetch(&self, ticker: &Ticker) -> Result<OptionsData> {
        tracing::debug!(symbol = %ticker, "Fetching options data");

        let response = self
            .client
            .get(self.request_url(ticker))
            .send()
            .await
            .map_err(|e| AppError::transport(SERVICE, e.without_url()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::upstream_status(
                SERVICE,
                status.as_u16(),
                &error_text,
                &self.api_key,
            ));
        }

        let body = response
            .text()
            .await
            .map_err(|e| AppError::transport(SERVICE, e.without_url()))?;

        let value: serde_json::Value = serde_json::from_str(&body)
            .map_err(|e| AppError::unparseable(SERVICE, format!("body is not JSON: {}", e)))?;

        Ok(OptionsData(value))
    }
}

#[async_trait]
impl OptionsDataSource for OptionsDataClient {
    async fn fetch_options(&self, ticker: &Ticker) -> Result<OptionsData> {
        self.fetch(ticker).await
    }
}
