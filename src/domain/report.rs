// Surf report domain model
use super::forecast::{ConditionsRecord, ForecastRecord, WaveRecord};
use serde::Serialize;

/// A photo-backed report: where it was taken, the stored photo, and the
/// forecast for the spot at submission time.
#[derive(Debug, Clone, Serialize)]
pub struct SurfReport {
    pub longitude: f64,
    pub latitude: f64,
    pub photo_key: String,
    pub waves: Vec<WaveRecord>,
    pub wind: Vec<ForecastRecord>,
    pub tide: Vec<ForecastRecord>,
    pub weather: Vec<ForecastRecord>,
    pub report: Vec<ConditionsRecord>,
}

/// Object key for a report photo: `{timestamp}_{longitude}_{latitude}.jpeg`,
/// or `{longitude}_{latitude}.jpeg` without a timestamp.
pub fn photo_key(timestamp: Option<i64>, longitude: f64, latitude: f64) -> String {
    match timestamp {
        Some(ts) => format!("{}_{}_{}.jpeg", ts, longitude, latitude),
        None => format!("{}_{}.jpeg", longitude, latitude),
    }
}
