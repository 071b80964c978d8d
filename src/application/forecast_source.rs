// Forecast source trait for the upstream forecast service
use crate::domain::forecast::ForecastCategory;
use crate::domain::spot::SpotId;
use async_trait::async_trait;
use serde_json::Value;

#[async_trait]
pub trait ForecastSource: Send + Sync {
    /// Fetch the raw JSON payload for one category at one spot
    async fn fetch(&self, category: ForecastCategory, spot: &SpotId) -> anyhow::Result<Value>;
}
