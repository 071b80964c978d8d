// In-memory collaborators for service and handler tests
use crate::application::forecast_source::ForecastSource;
use crate::application::sinks::{PhotoStore, ReportRepository};
use crate::domain::forecast::ForecastCategory;
use crate::domain::report::SurfReport;
use crate::domain::spot::SpotId;
use async_trait::async_trait;
use bytes::Bytes;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Default)]
pub struct StaticForecastSource {
    payloads: HashMap<(ForecastCategory, SpotId), Value>,
    calls: Mutex<Vec<(ForecastCategory, SpotId)>>,
}

impl StaticForecastSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, category: ForecastCategory, spot: &str, payload: Value) -> Self {
        self.payloads.insert((category, SpotId::new(spot)), payload);
        self
    }

    /// Two hourly rows for every mandatory category and one conditions row.
    pub fn with_sample_spot(self, spot: &str) -> Self {
        self.with(ForecastCategory::Wave, spot, sample_wave())
            .with(ForecastCategory::Wind, spot, json!({
                "data": {"wind": [
                    {"timestamp": 1700000000, "utcOffset": 11, "speed": 8.4, "direction": 270.1},
                    {"timestamp": 1700003600, "utcOffset": 11, "speed": 9.2, "direction": 265.0}
                ]}
            }))
            .with(ForecastCategory::Tides, spot, json!({
                "data": {"tides": [
                    {"timestamp": 1700000000, "utcOffset": 11, "type": "NORMAL", "height": 0.92},
                    {"timestamp": 1700003600, "utcOffset": 11, "type": "HIGH", "height": 1.41}
                ]}
            }))
            .with(ForecastCategory::Weather, spot, json!({
                "data": {"weather": [
                    {"timestamp": 1700000000, "utcOffset": 11, "temperature": 17.3, "condition": "CLEAR"},
                    {"timestamp": 1700003600, "utcOffset": 11, "temperature": 18.1, "condition": "CLEAR"}
                ]}
            }))
            .with(ForecastCategory::Conditions, spot, json!({
                "data": {"conditions": [{
                    "timestamp": 1700000000,
                    "utcOffset": 11,
                    "human": true,
                    "observation": "Clean and glassy",
                    "forecaster": {"name": "Ben Macartney"},
                    "am": {"observation": "Fun waist high sets"},
                    "pm": {"observation": "Sea breeze by noon"}
                }]}
            }))
    }

    pub fn calls(&self) -> Vec<(ForecastCategory, SpotId)> {
        self.calls.lock().unwrap().clone()
    }
}

pub fn sample_wave() -> Value {
    let entry = |timestamp: i64, min: f64| {
        json!({
            "timestamp": timestamp,
            "utcOffset": 11,
            "probability": 100,
            "surf": {"min": min, "max": 1.5, "humanRelation": "Waist to chest"},
            "swells": [
                {"run": 1, "height": 0.5, "period": 10, "direction": 180},
                {"run": 2, "height": 0.3, "period": 8, "direction": 190},
                {"run": 3, "height": 0.1, "period": 6, "direction": 200}
            ]
        })
    };
    json!({"data": {"wave": [entry(1700000000, 1.0), entry(1700003600, 1.1)]}})
}

#[async_trait]
impl ForecastSource for StaticForecastSource {
    async fn fetch(&self, category: ForecastCategory, spot: &SpotId) -> anyhow::Result<Value> {
        self.calls.lock().unwrap().push((category, spot.clone()));
        self.payloads
            .get(&(category, spot.clone()))
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("no {} payload for spot {}", category, spot))
    }
}

#[derive(Default)]
pub struct RecordingPhotoStore {
    pub photos: Mutex<Vec<(String, Bytes)>>,
}

#[async_trait]
impl PhotoStore for RecordingPhotoStore {
    async fn put_photo(&self, key: &str, image: Bytes) -> anyhow::Result<()> {
        self.photos.lock().unwrap().push((key.to_string(), image));
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingReportRepository {
    pub reports: Mutex<Vec<SurfReport>>,
}

#[async_trait]
impl ReportRepository for RecordingReportRepository {
    async fn insert_report(&self, report: &SurfReport) -> anyhow::Result<()> {
        self.reports.lock().unwrap().push(report.clone());
        Ok(())
    }
}
