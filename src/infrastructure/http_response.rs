// Invocation response envelope: `{statusCode, body}`
use crate::application::error::ServiceError;
use crate::domain::forecast::ForecastRecord;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvocationResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    /// JSON-serialized records, or a plain diagnostic message
    pub body: String,
}

impl InvocationResponse {
    pub fn new(status_code: u16, body: impl Into<String>) -> Self {
        Self {
            status_code,
            body: body.into(),
        }
    }

    pub fn records(records: &[ForecastRecord]) -> Self {
        match serde_json::to_string(records) {
            Ok(body) => Self::new(200, body),
            Err(e) => {
                tracing::error!("Record serialization error: {}", e);
                Self::new(500, format!("Failed to serialize records: {}", e))
            }
        }
    }

    pub fn error(err: &ServiceError) -> Self {
        let status_code = err.status_code();
        if status_code >= 500 {
            tracing::error!(status = status_code, "Invocation failed: {}", err);
        } else {
            tracing::warn!(status = status_code, "Invocation rejected: {}", err);
        }
        Self::new(status_code, err.to_string())
    }

    pub fn from_result(result: Result<Vec<ForecastRecord>, ServiceError>) -> Self {
        match result {
            Ok(records) => Self::records(&records),
            Err(e) => Self::error(&e),
        }
    }
}

impl IntoResponse for InvocationResponse {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}
