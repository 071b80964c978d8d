// Forecast record domain models
use super::spot::SpotId;
use chrono::TimeZone;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

pub const TIMESTAMP: &str = "timestamp";
pub const SURF_LOCATION: &str = "surf_location";
pub const SPOT_NAME: &str = "spot_name";
pub const LOCAL_TIME: &str = "local_time";

/// Data categories served by the forecast service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ForecastCategory {
    Wave,
    Wind,
    Tides,
    Weather,
    Conditions,
}

impl ForecastCategory {
    /// Path segment under `/kbyg/spots/forecasts/`, also the key under `data`.
    pub fn path_segment(&self) -> &'static str {
        match self {
            ForecastCategory::Wave => "wave",
            ForecastCategory::Wind => "wind",
            ForecastCategory::Tides => "tides",
            ForecastCategory::Weather => "weather",
            ForecastCategory::Conditions => "conditions",
        }
    }

    /// Suffix used to disambiguate colliding columns after a merge.
    pub fn column_suffix(&self) -> &'static str {
        match self {
            ForecastCategory::Wave => "wave",
            ForecastCategory::Wind => "wind",
            ForecastCategory::Tides => "tide",
            ForecastCategory::Weather => "weather",
            ForecastCategory::Conditions => "conditions",
        }
    }
}

impl fmt::Display for ForecastCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path_segment())
    }
}

impl FromStr for ForecastCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "wave" | "waves" => Ok(ForecastCategory::Wave),
            "wind" => Ok(ForecastCategory::Wind),
            "tide" | "tides" => Ok(ForecastCategory::Tides),
            "weather" => Ok(ForecastCategory::Weather),
            "conditions" => Ok(ForecastCategory::Conditions),
            other => Err(format!("unknown forecast category: {}", other)),
        }
    }
}

/// Join key shared by records of every category.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JoinKey {
    pub timestamp: i64,
    pub surf_location: String,
}

/// One flat forecast row: field name to scalar JSON value.
///
/// Every record produced by the normalizer carries `timestamp` (epoch
/// seconds) and `surf_location` (the raw spot id).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ForecastRecord(Map<String, Value>);

/// Wave rows: surf range and the first three swells flattened.
pub type WaveRecord = ForecastRecord;

/// Conditions rows: forecaster and am/pm observations flattened.
pub type ConditionsRecord = ForecastRecord;

/// Rows joined across categories.
pub type MergedRecord = ForecastRecord;

impl ForecastRecord {
    pub fn new(timestamp: i64, spot: &SpotId) -> Self {
        let mut fields = Map::new();
        fields.insert(TIMESTAMP.to_string(), Value::from(timestamp));
        fields.insert(SURF_LOCATION.to_string(), Value::from(spot.as_str()));
        Self(fields)
    }

    pub fn timestamp(&self) -> Option<i64> {
        self.0.get(TIMESTAMP).and_then(Value::as_i64)
    }

    pub fn surf_location(&self) -> Option<&str> {
        self.0.get(SURF_LOCATION).and_then(Value::as_str)
    }

    pub fn join_key(&self) -> Option<JoinKey> {
        Some(JoinKey {
            timestamp: self.timestamp()?,
            surf_location: self.surf_location()?.to_string(),
        })
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(field.into(), value.into());
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Adds the spot's display name and the timestamp rendered in `timezone`.
    pub fn presented(mut self, spot_name: &str, timezone: Tz) -> Self {
        self.insert(SPOT_NAME, spot_name);
        let local_time = self
            .timestamp()
            .and_then(|ts| timezone.timestamp_opt(ts, 0).single())
            .map(|dt| Value::from(dt.to_rfc3339()))
            .unwrap_or(Value::Null);
        self.insert(LOCAL_TIME, local_time);
        self
    }
}

/// Every category normalized for one spot.
#[derive(Debug, Clone)]
pub struct SpotForecast {
    pub spot: SpotId,
    pub wave: Vec<WaveRecord>,
    pub wind: Vec<ForecastRecord>,
    pub tides: Vec<ForecastRecord>,
    pub weather: Vec<ForecastRecord>,
    pub conditions: Vec<ConditionsRecord>,
}

impl SpotForecast {
    pub fn merged(&self) -> Vec<MergedRecord> {
        super::merge::merge_categories(
            &self.wave,
            &self.wind,
            &self.tides,
            &self.weather,
            Some(self.conditions.as_slice()),
        )
    }
}
