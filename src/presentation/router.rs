// Route table
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    health_check, invoke_all_spots, invoke_forecast, invoke_report, invoke_wave, list_spots,
    spot_category,
};
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        .route("/spots", get(list_spots))
        .route("/spots/:spot_id/forecasts/:category", get(spot_category))
        .route("/invoke/wave", post(invoke_wave))
        .route("/invoke/forecast", post(invoke_forecast))
        .route("/invoke/forecasts", post(invoke_all_spots))
        .route("/invoke/report", post(invoke_report))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::fakes::{
        RecordingPhotoStore, RecordingReportRepository, StaticForecastSource,
    };
    use crate::application::forecast_service::ForecastService;
    use crate::application::report_service::ReportService;
    use crate::domain::forecast::ForecastRecord;
    use crate::domain::spot::{SpotDirectory, SpotId, DEFAULT_SPOT_ID};
    use crate::infrastructure::http_response::InvocationResponse;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde_json::json;
    use tower::ServiceExt;

    const BELLS: &str = "584204204e65fad6a77099c7";

    fn router() -> Router {
        let source = StaticForecastSource::new()
            .with_sample_spot(DEFAULT_SPOT_ID)
            .with_sample_spot(BELLS);
        let forecast_service = ForecastService::new(
            Arc::new(source),
            Arc::new(SpotDirectory::default()),
            chrono_tz::Australia::Sydney,
            SpotId::new(DEFAULT_SPOT_ID),
        );
        let report_service = ReportService::new(
            forecast_service.clone(),
            Arc::new(RecordingPhotoStore::default()),
            Arc::new(RecordingReportRepository::default()),
            true,
        );
        build_router(Arc::new(AppState {
            forecast_service,
            report_service,
        }))
    }

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn envelope(request: Request<Body>) -> (StatusCode, InvocationResponse) {
        let response = router().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health_check() {
        let response = router()
            .oneshot(Request::get("/healthz").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_report_without_image_is_400() {
        let (status, reply) = envelope(post_json(
            "/invoke/report",
            json!({"longitude": 144.28, "latitude": -38.37}),
        ))
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(reply, InvocationResponse::new(400, "No image provided"));
    }

    #[tokio::test]
    async fn test_wave_invocation_defaults_spot() {
        let (status, reply) = envelope(post_json("/invoke/wave", json!({}))).await;
        assert_eq!(status, StatusCode::OK);

        let records: Vec<ForecastRecord> = serde_json::from_str(&reply.body).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].surf_location(), Some(DEFAULT_SPOT_ID));
        assert_eq!(records[0].get("spot_name"), Some(&json!("Torquay Surf Beach")));
        assert!(!records[0].contains("swells"));
    }

    #[tokio::test]
    async fn test_bodyless_invocation_uses_default_event() {
        let (status, reply) =
            envelope(Request::post("/invoke/wave").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);

        let records: Vec<ForecastRecord> = serde_json::from_str(&reply.body).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].surf_location(), Some(DEFAULT_SPOT_ID));
    }

    #[tokio::test]
    async fn test_mistyped_event_is_400_envelope() {
        let (status, reply) = envelope(post_json(
            "/invoke/report",
            json!({"longitude": "144.28"}),
        ))
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(reply.status_code, 400);
        assert!(reply.body.starts_with("Failed to deserialize the JSON body"));

        let (status, reply) = envelope(
            Request::post("/invoke/forecast")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(reply.status_code, 400);
    }

    #[tokio::test]
    async fn test_forecast_invocation_merges() {
        let (status, reply) =
            envelope(post_json("/invoke/forecast", json!({"spot_id": BELLS}))).await;
        assert_eq!(status, StatusCode::OK);

        let records: Vec<ForecastRecord> = serde_json::from_str(&reply.body).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get("utcOffset_wind"), Some(&json!(11)));
        assert_eq!(records[0].get("forecaster"), Some(&json!("Ben Macartney")));
    }

    #[tokio::test]
    async fn test_unknown_spot_is_upstream_failure() {
        let (status, reply) =
            envelope(post_json("/invoke/forecast", json!({"spot_id": "nonexistent"}))).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(reply.body.starts_with("forecast fetch failed"));
    }

    #[tokio::test]
    async fn test_spot_category_route() {
        let (status, reply) = envelope(
            Request::get(format!("/spots/{}/forecasts/tides", BELLS))
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let records: Vec<ForecastRecord> = serde_json::from_str(&reply.body).unwrap();
        assert_eq!(records[1].get("type"), Some(&json!("HIGH")));

        let (status, reply) = envelope(
            Request::get(format!("/spots/{}/forecasts/swell", BELLS))
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(reply.status_code, 404);
    }

    #[tokio::test]
    async fn test_list_spots() {
        let response = router()
            .oneshot(Request::get("/spots").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let spots: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(spots.as_array().unwrap().len(), 2);
        assert!(spots
            .as_array()
            .unwrap()
            .contains(&json!({"id": BELLS, "name": "Bells Beach"})));
    }
}
