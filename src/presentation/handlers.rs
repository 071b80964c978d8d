// HTTP request handlers
use crate::application::error::ServiceError;
use crate::application::report_service::ReportSubmission;
use crate::domain::forecast::ForecastCategory;
use crate::domain::spot::{Spot, SpotId};
use crate::infrastructure::http_response::InvocationResponse;
use crate::presentation::app_state::AppState;
use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Path, Request, State},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

/// Invocation event as sent by the caller
#[derive(Debug, Default, Deserialize)]
pub struct InvocationEvent {
    pub spot_id: Option<String>,
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
    /// Base64-encoded image
    pub image: Option<String>,
}

impl From<InvocationEvent> for ReportSubmission {
    fn from(event: InvocationEvent) -> Self {
        ReportSubmission {
            spot_id: event.spot_id,
            longitude: event.longitude,
            latitude: event.latitude,
            image: event.image,
        }
    }
}

/// Invocation event extractor. An empty body is the default event; a body
/// that does not parse is answered with a 400 envelope.
pub struct Invocation(pub InvocationEvent);

#[async_trait]
impl<S> FromRequest<S> for Invocation
where
    S: Send + Sync,
{
    type Rejection = InvocationResponse;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| rejected(e.body_text()))?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self(InvocationEvent::default()));
        }

        let Json(event) = Json::<InvocationEvent>::from_bytes(&bytes)
            .map_err(|e| rejected(e.body_text()))?;
        Ok(Self(event))
    }
}

fn rejected(reason: String) -> InvocationResponse {
    tracing::warn!("Invalid invocation event: {}", reason);
    InvocationResponse::new(400, reason)
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Configured spot table
pub async fn list_spots(State(state): State<Arc<AppState>>) -> Json<Vec<Spot>> {
    Json(state.forecast_service.spots().spots())
}

/// Wave forecast for one spot
pub async fn invoke_wave(
    State(state): State<Arc<AppState>>,
    Invocation(event): Invocation,
) -> InvocationResponse {
    let forecasts = &state.forecast_service;
    let spot = forecasts.spot_or_default(event.spot_id.as_deref());
    let result = forecasts
        .category(&spot, ForecastCategory::Wave)
        .await
        .map(|records| forecasts.present(&spot, records));
    InvocationResponse::from_result(result)
}

/// Merged forecast for one spot
pub async fn invoke_forecast(
    State(state): State<Arc<AppState>>,
    Invocation(event): Invocation,
) -> InvocationResponse {
    let forecasts = &state.forecast_service;
    let spot = forecasts.spot_or_default(event.spot_id.as_deref());
    InvocationResponse::from_result(forecasts.merged_forecast(&spot).await)
}

/// Merged forecasts for every configured spot
pub async fn invoke_all_spots(State(state): State<Arc<AppState>>) -> InvocationResponse {
    InvocationResponse::from_result(state.forecast_service.all_spots_forecast().await)
}

/// Photo-backed report
pub async fn invoke_report(
    State(state): State<Arc<AppState>>,
    Invocation(event): Invocation,
) -> InvocationResponse {
    InvocationResponse::from_result(state.report_service.submit(event.into()).await)
}

/// One normalized category for one spot
pub async fn spot_category(
    Path((spot_id, category)): Path<(String, String)>,
    State(state): State<Arc<AppState>>,
) -> InvocationResponse {
    let category = match category.parse::<ForecastCategory>() {
        Ok(category) => category,
        Err(_) => return InvocationResponse::error(&ServiceError::UnknownCategory(category)),
    };

    let forecasts = &state.forecast_service;
    let spot = SpotId::new(spot_id);
    let result = forecasts
        .category(&spot, category)
        .await
        .map(|records| forecasts.present(&spot, records));
    InvocationResponse::from_result(result)
}
