// Forecast normalizer - flattens raw forecast payloads into flat records
use super::forecast::{ConditionsRecord, ForecastCategory, ForecastRecord, TIMESTAMP, WaveRecord};
use super::spot::SpotId;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Number, Value};
use thiserror::Error;

/// Number of swell components flattened out of each wave entry.
pub const SWELL_COUNT: usize = 3;

pub const FORECASTER: &str = "forecaster";
pub const AM_OBSERVATION: &str = "am_observation";
pub const PM_OBSERVATION: &str = "pm_observation";

/// Columns every normalized conditions record carries.
pub const CONDITIONS_COLUMNS: [&str; 3] = [FORECASTER, AM_OBSERVATION, PM_OBSERVATION];

#[derive(Debug, Error, PartialEq)]
pub enum NormalizeError {
    #[error("malformed {category} response: {reason}")]
    MalformedResponse {
        category: ForecastCategory,
        reason: String,
    },
}

fn malformed(category: ForecastCategory, reason: impl Into<String>) -> NormalizeError {
    NormalizeError::MalformedResponse {
        category,
        reason: reason.into(),
    }
}

#[derive(Debug, Deserialize)]
struct RawSurf {
    min: Option<Number>,
    max: Option<Number>,
    #[serde(rename = "humanRelation")]
    human_relation: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawSwell {
    run: Option<Number>,
    height: Option<Number>,
    period: Option<Number>,
    direction: Option<Number>,
}

#[derive(Debug, Deserialize)]
struct RawObservation {
    observation: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawForecaster {
    name: Option<String>,
}

/// Normalizes the payload of any category.
pub fn normalize(
    category: ForecastCategory,
    raw: &Value,
    spot: &SpotId,
) -> Result<Vec<ForecastRecord>, NormalizeError> {
    match category {
        ForecastCategory::Wave => normalize_wave(raw, spot),
        ForecastCategory::Wind => normalize_wind(raw, spot),
        ForecastCategory::Tides => normalize_tide(raw, spot),
        ForecastCategory::Weather => normalize_weather(raw, spot),
        ForecastCategory::Conditions => normalize_conditions(raw, spot),
    }
}

/// Flattens `data.wave`: the `surf` range and the first three `swells`
/// replace the nested structures.
pub fn normalize_wave(raw: &Value, spot: &SpotId) -> Result<Vec<WaveRecord>, NormalizeError> {
    let category = ForecastCategory::Wave;
    let mut records = Vec::new();

    for (index, entry) in category_entries(raw, category)?.iter().enumerate() {
        let (mut fields, mut record) = split_entry(category, index, entry, spot)?;
        let surf: RawSurf = take_field(category, index, &mut fields, "surf")?;
        let swells: Vec<RawSwell> = take_field(category, index, &mut fields, "swells")?;

        if swells.len() < SWELL_COUNT {
            return Err(malformed(
                category,
                format!(
                    "entry {} has {} swells, expected at least {}",
                    index,
                    swells.len(),
                    SWELL_COUNT
                ),
            ));
        }

        pass_through(&mut record, fields);
        record.insert("min_height", surf.min);
        record.insert("max_height", surf.max);
        record.insert("human_relation", surf.human_relation);

        for (n, swell) in swells.into_iter().take(SWELL_COUNT).enumerate() {
            let suffix = n + 1;
            record.insert(format!("swell_run_{}", suffix), swell.run);
            record.insert(format!("swell_height_{}", suffix), swell.height);
            record.insert(format!("swell_period_{}", suffix), swell.period);
            record.insert(format!("swell_direction_{}", suffix), swell.direction);
        }

        records.push(record);
    }

    Ok(records)
}

pub fn normalize_wind(raw: &Value, spot: &SpotId) -> Result<Vec<ForecastRecord>, NormalizeError> {
    normalize_flat(ForecastCategory::Wind, raw, spot)
}

pub fn normalize_tide(raw: &Value, spot: &SpotId) -> Result<Vec<ForecastRecord>, NormalizeError> {
    normalize_flat(ForecastCategory::Tides, raw, spot)
}

pub fn normalize_weather(
    raw: &Value,
    spot: &SpotId,
) -> Result<Vec<ForecastRecord>, NormalizeError> {
    normalize_flat(ForecastCategory::Weather, raw, spot)
}

/// Flattens `data.conditions`: `forecaster.name`, `am.observation` and
/// `pm.observation` become top-level fields. A null `am`/`pm`/`forecaster`
/// yields null fields; any other non-object shape is rejected.
pub fn normalize_conditions(
    raw: &Value,
    spot: &SpotId,
) -> Result<Vec<ConditionsRecord>, NormalizeError> {
    let category = ForecastCategory::Conditions;
    let mut records = Vec::new();

    for (index, entry) in category_entries(raw, category)?.iter().enumerate() {
        let (mut fields, mut record) = split_entry(category, index, entry, spot)?;
        let am: Option<RawObservation> = take_field(category, index, &mut fields, "am")?;
        let pm: Option<RawObservation> = take_field(category, index, &mut fields, "pm")?;
        let forecaster: Option<RawForecaster> =
            take_field(category, index, &mut fields, "forecaster")?;

        pass_through(&mut record, fields);
        record.insert(FORECASTER, forecaster.and_then(|f| f.name));
        record.insert(AM_OBSERVATION, am.and_then(|o| o.observation));
        record.insert(PM_OBSERVATION, pm.and_then(|o| o.observation));

        records.push(record);
    }

    Ok(records)
}

fn normalize_flat(
    category: ForecastCategory,
    raw: &Value,
    spot: &SpotId,
) -> Result<Vec<ForecastRecord>, NormalizeError> {
    category_entries(raw, category)?
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let (fields, mut record) = split_entry(category, index, entry, spot)?;
            pass_through(&mut record, fields);
            Ok(record)
        })
        .collect()
}

fn category_entries(raw: &Value, category: ForecastCategory) -> Result<&Vec<Value>, NormalizeError> {
    let data = raw
        .get("data")
        .and_then(Value::as_object)
        .ok_or_else(|| malformed(category, "missing `data` object"))?;

    data.get(category.path_segment())
        .and_then(Value::as_array)
        .ok_or_else(|| malformed(category, format!("missing `data.{}` array", category.path_segment())))
}

/// Validates one entry and starts its record from the join key. Returns the
/// remaining fields for the caller to flatten or pass through.
fn split_entry(
    category: ForecastCategory,
    index: usize,
    entry: &Value,
    spot: &SpotId,
) -> Result<(Map<String, Value>, ForecastRecord), NormalizeError> {
    let mut fields = entry
        .as_object()
        .cloned()
        .ok_or_else(|| malformed(category, format!("entry {} is not an object", index)))?;

    let timestamp = fields
        .remove(TIMESTAMP)
        .as_ref()
        .and_then(Value::as_i64)
        .ok_or_else(|| malformed(category, format!("entry {} has no integer timestamp", index)))?;

    Ok((fields, ForecastRecord::new(timestamp, spot)))
}

fn take_field<T: DeserializeOwned>(
    category: ForecastCategory,
    index: usize,
    fields: &mut Map<String, Value>,
    key: &str,
) -> Result<T, NormalizeError> {
    let value = fields.remove(key).unwrap_or(Value::Null);
    serde_json::from_value(value)
        .map_err(|e| malformed(category, format!("entry {} field `{}`: {}", index, key, e)))
}

fn pass_through(record: &mut ForecastRecord, fields: Map<String, Value>) {
    for (key, value) in fields {
        // The join key set by the normalizer wins over upstream fields.
        if !record.contains(&key) {
            record.insert(key, value);
        }
    }
}
