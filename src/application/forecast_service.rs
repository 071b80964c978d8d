// Forecast service - Fetch, normalize and merge forecasts per spot
use crate::application::error::ServiceError;
use crate::application::forecast_source::ForecastSource;
use crate::domain::forecast::{ForecastCategory, ForecastRecord, MergedRecord, SpotForecast};
use crate::domain::normalizer::normalize;
use crate::domain::spot::{SpotDirectory, SpotId};
use chrono_tz::Tz;
use std::sync::Arc;
use std::time::Instant;

#[derive(Clone)]
pub struct ForecastService {
    source: Arc<dyn ForecastSource>,
    spots: Arc<SpotDirectory>,
    timezone: Tz,
    default_spot: SpotId,
}

impl ForecastService {
    pub fn new(
        source: Arc<dyn ForecastSource>,
        spots: Arc<SpotDirectory>,
        timezone: Tz,
        default_spot: SpotId,
    ) -> Self {
        Self {
            source,
            spots,
            timezone,
            default_spot,
        }
    }

    pub fn spots(&self) -> &SpotDirectory {
        &self.spots
    }

    /// The requested spot, or the configured default when none is given
    pub fn spot_or_default(&self, requested: Option<&str>) -> SpotId {
        requested
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(SpotId::from)
            .unwrap_or_else(|| self.default_spot.clone())
    }

    /// Fetch and normalize a single category
    pub async fn category(
        &self,
        spot: &SpotId,
        category: ForecastCategory,
    ) -> Result<Vec<ForecastRecord>, ServiceError> {
        let started = Instant::now();
        let raw = self.source.fetch(category, spot).await.map_err(|e| {
            tracing::error!(spot = %spot, category = %category, "Forecast fetch failed: {:#}", e);
            ServiceError::Upstream(e)
        })?;

        tracing::debug!(
            spot = %spot,
            category = %category,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Fetched forecast"
        );

        normalize(category, &raw, spot).map_err(|e| {
            tracing::error!(spot = %spot, "{}", e);
            ServiceError::from(e)
        })
    }

    /// Fetch every category for a spot, one after another
    pub async fn spot_forecast(&self, spot: &SpotId) -> Result<SpotForecast, ServiceError> {
        Ok(SpotForecast {
            spot: spot.clone(),
            wave: self.category(spot, ForecastCategory::Wave).await?,
            wind: self.category(spot, ForecastCategory::Wind).await?,
            tides: self.category(spot, ForecastCategory::Tides).await?,
            weather: self.category(spot, ForecastCategory::Weather).await?,
            conditions: self.category(spot, ForecastCategory::Conditions).await?,
        })
    }

    /// Merged and presented forecast for one spot
    pub async fn merged_forecast(&self, spot: &SpotId) -> Result<Vec<MergedRecord>, ServiceError> {
        let forecast = self.spot_forecast(spot).await?;
        Ok(self.present(spot, forecast.merged()))
    }

    /// Merged forecasts for every spot in the directory
    pub async fn all_spots_forecast(&self) -> Result<Vec<MergedRecord>, ServiceError> {
        let mut records = Vec::new();
        for spot in self.spots.ids() {
            let merged = self.merged_forecast(spot).await?;
            tracing::info!(spot = %spot, rows = merged.len(), "Merged forecast");
            records.extend(merged);
        }
        Ok(records)
    }

    /// Attach the spot name and local time to each record
    pub fn present(&self, spot: &SpotId, records: Vec<ForecastRecord>) -> Vec<ForecastRecord> {
        let name = self.spots.resolve_spot_name(spot).to_string();
        records
            .into_iter()
            .map(|record| record.presented(&name, self.timezone))
            .collect()
    }
}
