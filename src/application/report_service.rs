// Report service - Photo-backed surf reports
use crate::application::error::ServiceError;
use crate::application::forecast_service::ForecastService;
use crate::application::sinks::{PhotoStore, ReportRepository};
use crate::domain::forecast::MergedRecord;
use crate::domain::report::{photo_key, SurfReport};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use bytes::Bytes;
use chrono::Utc;
use std::sync::Arc;

pub const NO_IMAGE_PROVIDED: &str = "No image provided";
pub const INVALID_IMAGE_ENCODING: &str = "Invalid image encoding";
pub const NO_LOCATION_PROVIDED: &str = "No location provided";

/// Inputs of a report invocation, straight from the caller
#[derive(Debug, Clone, Default)]
pub struct ReportSubmission {
    pub spot_id: Option<String>,
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
    /// Base64 image, optionally as a `data:` URL
    pub image: Option<String>,
}

#[derive(Clone)]
pub struct ReportService {
    forecasts: ForecastService,
    photos: Arc<dyn PhotoStore>,
    reports: Arc<dyn ReportRepository>,
    timestamped_keys: bool,
}

impl ReportService {
    pub fn new(
        forecasts: ForecastService,
        photos: Arc<dyn PhotoStore>,
        reports: Arc<dyn ReportRepository>,
        timestamped_keys: bool,
    ) -> Self {
        Self {
            forecasts,
            photos,
            reports,
            timestamped_keys,
        }
    }

    /// Stores the photo and a report row carrying the spot's forecast.
    /// Returns the merged forecast that was recorded.
    pub async fn submit(&self, submission: ReportSubmission) -> Result<Vec<MergedRecord>, ServiceError> {
        let image = decode_image(submission.image.as_deref())?;
        let (Some(longitude), Some(latitude)) = (submission.longitude, submission.latitude) else {
            return Err(ServiceError::ClientInput(NO_LOCATION_PROVIDED.to_string()));
        };

        let spot = self.forecasts.spot_or_default(submission.spot_id.as_deref());
        let forecast = self.forecasts.spot_forecast(&spot).await?;
        let merged = self.forecasts.present(&spot, forecast.merged());

        let key = photo_key(
            self.timestamped_keys.then(|| Utc::now().timestamp()),
            longitude,
            latitude,
        );
        self.photos
            .put_photo(&key, image)
            .await
            .map_err(ServiceError::Storage)?;

        let report = SurfReport {
            longitude,
            latitude,
            photo_key: key,
            waves: self.forecasts.present(&spot, forecast.wave),
            wind: self.forecasts.present(&spot, forecast.wind),
            tide: self.forecasts.present(&spot, forecast.tides),
            weather: self.forecasts.present(&spot, forecast.weather),
            report: self.forecasts.present(&spot, forecast.conditions),
        };
        self.reports
            .insert_report(&report)
            .await
            .map_err(ServiceError::Persistence)?;

        tracing::info!(
            spot = %spot,
            photo_key = %report.photo_key,
            rows = merged.len(),
            "Stored surf report"
        );
        Ok(merged)
    }
}

fn decode_image(image: Option<&str>) -> Result<Bytes, ServiceError> {
    let encoded = image
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ServiceError::ClientInput(NO_IMAGE_PROVIDED.to_string()))?;

    // Accept `data:image/jpeg;base64,...` as sent by browsers
    let encoded = match encoded.strip_prefix("data:") {
        Some(url) => url.split_once(',').map(|(_, data)| data).unwrap_or(""),
        None => encoded,
    };

    let bytes = STANDARD.decode(encoded).map_err(|e| {
        tracing::warn!("Rejected report image: {}", e);
        ServiceError::ClientInput(INVALID_IMAGE_ENCODING.to_string())
    })?;
    if bytes.is_empty() {
        return Err(ServiceError::ClientInput(NO_IMAGE_PROVIDED.to_string()));
    }
    Ok(Bytes::from(bytes))
}
