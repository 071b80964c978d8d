// Surfline forecast client
use crate::application::forecast_source::ForecastSource;
use crate::domain::forecast::ForecastCategory;
use crate::domain::spot::SpotId;
use crate::infrastructure::config::ForecastSettings;
use crate::infrastructure::retry::{with_retry, RetryError, RetryPolicy};
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct SurflineClient {
    client: reqwest::Client,
    base_url: String,
    swell_height_unit: String,
    wave_height_unit: String,
    wind_speed_unit: String,
    retry: RetryPolicy,
}

impl SurflineClient {
    pub fn new(settings: &ForecastSettings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            swell_height_unit: settings.swell_height_unit.clone(),
            wave_height_unit: settings.wave_height_unit.clone(),
            wind_speed_unit: settings.wind_speed_unit.clone(),
            retry: RetryPolicy::new(
                settings.max_retries,
                Duration::from_millis(settings.backoff_base_ms),
            ),
        })
    }

    fn build_forecast_url(&self, category: ForecastCategory, spot: &SpotId) -> String {
        format!(
            "{}/kbyg/spots/forecasts/{}?spotId={}&units[swellHeight]={}&units[waveHeight]={}&units[windSpeed]={}",
            self.base_url,
            category.path_segment(),
            urlencoding::encode(spot.as_str()),
            urlencoding::encode(&self.swell_height_unit),
            urlencoding::encode(&self.wave_height_unit),
            urlencoding::encode(&self.wind_speed_unit),
        )
    }

    async fn execute_request(&self, url: &str) -> Result<Value, RetryError> {
        let response = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| {
                let transient = e.is_timeout() || e.is_connect();
                let err = anyhow::Error::new(e).context("Failed to send request to forecast service");
                if transient {
                    RetryError::Retryable(err)
                } else {
                    RetryError::Permanent(err)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let err = anyhow::anyhow!("Forecast request failed with status {}: {}", status, body);
            return if status.is_server_error() || status.as_u16() == 429 {
                Err(RetryError::Retryable(err))
            } else {
                Err(RetryError::Permanent(err))
            };
        }

        response
            .json::<Value>()
            .await
            .context("Failed to parse forecast response")
            .map_err(RetryError::Permanent)
    }
}

#[async_trait]
impl ForecastSource for SurflineClient {
    async fn fetch(&self, category: ForecastCategory, spot: &SpotId) -> Result<Value> {
        let url = self.build_forecast_url(category, spot);
        tracing::debug!("Fetching forecast: {}", url);
        with_retry(&self.retry, || self.execute_request(&url)).await
    }
}
