use crate::domain::spot::{Spot, SpotDirectory, SpotId, DEFAULT_SPOT_ID};
use anyhow::Context;
use chrono_tz::Tz;
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub forecast: ForecastSettings,
    #[serde(default = "SpotDirectory::known_spots")]
    pub spots: Vec<Spot>,
    #[serde(default)]
    pub storage: StorageSettings,
    #[serde(default)]
    pub database: DatabaseSettings,
}

impl AppConfig {
    pub fn spot_directory(&self) -> SpotDirectory {
        SpotDirectory::new(self.spots.iter().cloned())
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub bind_address: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ForecastSettings {
    pub base_url: String,
    pub default_spot_id: String,
    pub timezone: String,
    pub swell_height_unit: String,
    pub wave_height_unit: String,
    pub wind_speed_unit: String,
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub backoff_base_ms: u64,
}

impl Default for ForecastSettings {
    fn default() -> Self {
        Self {
            base_url: "https://services.surfline.com".to_string(),
            default_spot_id: DEFAULT_SPOT_ID.to_string(),
            timezone: "Australia/Sydney".to_string(),
            swell_height_unit: "M".to_string(),
            wave_height_unit: "M".to_string(),
            wind_speed_unit: "KTS".to_string(),
            timeout_secs: 10,
            max_retries: 3,
            backoff_base_ms: 500,
        }
    }
}

impl ForecastSettings {
    pub fn timezone(&self) -> anyhow::Result<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|e| anyhow::anyhow!("invalid timezone {}: {}", self.timezone, e))
    }

    pub fn default_spot(&self) -> SpotId {
        SpotId::new(self.default_spot_id.as_str())
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Memory,
    Local,
    S3,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StorageSettings {
    pub backend: StorageBackend,
    pub bucket: String,
    pub region: String,
    pub endpoint: Option<String>,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    pub allow_http: bool,
    pub local_root: Option<PathBuf>,
    /// Prefix photo keys with the submission time
    pub timestamped_keys: bool,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Memory,
            bucket: "surf-reports".to_string(),
            region: "ap-southeast-2".to_string(),
            endpoint: None,
            access_key_id: None,
            secret_access_key: None,
            allow_http: false,
            local_root: None,
            timestamped_keys: true,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DatabaseSettings {
    pub url: Option<String>,
    pub max_connections: u32,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: 5,
        }
    }
}

/// Loads `config/forecast.{toml,...}` when present, overridden by
/// `SURF_FORECAST__SECTION__KEY` environment variables.
pub fn load_app_config() -> anyhow::Result<AppConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/forecast").required(false))
        .add_source(config::Environment::with_prefix("SURF_FORECAST").separator("__"))
        .build()
        .context("Failed to load configuration")?;

    Ok(settings.try_deserialize()?)
}
