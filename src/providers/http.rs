use crate::core::config::ProviderConfig;
use crate::core::source::JsonSource;
use crate::providers::util::with_retry;
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, instrument};

/// Fetches the rate document with a plain HTTP GET.
pub struct HttpJsonSource {
    url: String,
    client: reqwest::Client,
    retries: usize,
    retry_delay_ms: u64,
}

impl HttpJsonSource {
    pub fn new(url: &str, timeout: Duration, retries: usize, retry_delay_ms: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("pricefx/1.0")
            .timeout(timeout)
            .build()?;
        Ok(HttpJsonSource {
            url: url.to_string(),
            client,
            retries,
            retry_delay_ms,
        })
    }

    pub fn from_config(config: &ProviderConfig) -> Result<Self> {
        Self::new(
            &config.url,
            Duration::from_secs(config.timeout_secs),
            config.retries,
            config.retry_delay_ms,
        )
    }

    async fn fetch_once(&self) -> Result<serde_json::Value> {
        debug!("Requesting rates from {}", self.url);

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} for URL: {}", e, self.url))?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "HTTP error: {} for URL: {}",
                response.status(),
                self.url
            ));
        }

        let text = response.text().await?;
        serde_json::from_str(&text)
            .map_err(|e| anyhow!("Failed to parse JSON response from {}: {}", self.url, e))
    }
}

#[async_trait]
impl JsonSource for HttpJsonSource {
    #[instrument(name = "RateFetch", skip(self), fields(url = %self.url))]
    async fn fetch_json(&self) -> Result<serde_json::Value> {
        with_retry(move || self.fetch_once(), self.retries, self.retry_delay_ms).await
    }
}
