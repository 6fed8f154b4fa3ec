use super::util::with_retry;
use crate::core::currency::RateProvider;
use crate::core::rates::{RateSnapshot, RateTable};
use anyhow::{Result, anyhow, bail};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, error, instrument};

/// ExchangeRate-API v6 response for `/latest/{base}`. Only the fields the
/// converter needs are decoded.
#[derive(Debug, Deserialize)]
struct LatestRatesResponse {
    result: String,
    #[serde(rename = "error-type")]
    error_type: Option<String>,
    base_code: Option<String>,
    conversion_rates: Option<RateTable>,
}

pub struct ExchangeRateApiProvider {
    base_url: String,
    api_key: String,
}

impl ExchangeRateApiProvider {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        ExchangeRateApiProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }
}

#[async_trait]
impl RateProvider for ExchangeRateApiProvider {
    #[instrument(name = "ExchangeRateFetch", skip(self), fields(base = %base))]
    async fn fetch_rates(&self, base: &str) -> Result<RateSnapshot> {
        if self.api_key.is_empty() {
            bail!(
                "Missing API key: set EXCHANGE_RATE_API_KEY or providers.exchangerate_api.api_key"
            );
        }

        let url = format!("{}/v6/{}/latest/{}", self.base_url, self.api_key, base);
        debug!("Requesting latest rates");

        let client = reqwest::Client::builder().user_agent("fxconv/0.1").build()?;
        let response = with_retry(|| client.get(&url).send(), 3, 500)
            .await
            .map_err(|e| anyhow!("Request error: {} for base currency: {}", e, base))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| anyhow!("Failed to read response for {}: {}", base, e.without_url()))?;

        let data: LatestRatesResponse = match serde_json::from_str(&text) {
            Ok(data) => data,
            Err(_) if !status.is_success() => {
                bail!("HTTP error: {} for base currency: {}", status, base);
            }
            Err(e) => {
                error!(error = ?e, response = %text, "Failed to parse rates response");
                bail!("Failed to parse JSON response for {}: {}", base, e);
            }
        };

        if data.result != "success" {
            bail!(
                "Rate API error: {} for base currency: {}",
                data.error_type.as_deref().unwrap_or("unknown"),
                base
            );
        }
        if !status.is_success() {
            bail!("HTTP error: {} for base currency: {}", status, base);
        }

        let mut table = data
            .conversion_rates
            .ok_or_else(|| anyhow!("No rate data found for base currency: {}", base))?;
        table.retain(|code, rate| {
            let usable = rate.is_finite() && *rate > 0.0;
            if !usable {
                debug!(code = %code, rate = *rate, "Dropping unusable rate");
            }
            usable
        });

        let base_code = data.base_code.unwrap_or_else(|| base.to_string());
        debug!(base_code = %base_code, rates = table.len(), "Received latest rates");
        Ok(RateSnapshot::new(base_code, table))
    }
}
