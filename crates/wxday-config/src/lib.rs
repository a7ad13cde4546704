use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use wxday_core::{
    ConditionIconMapper, EngineSettings, ForecastEntry, PayloadUnits, SnapshotSeeds,
    DEFAULT_EVENING_ICON, DEFAULT_EVENING_TEMPERATURE, DEFAULT_NOON_ICON,
    DEFAULT_NOON_TEMPERATURE,
};

const DEFAULT_TIMEZONE: &str = "Europe/Berlin";
const DEFAULT_BIND: &str = "0.0.0.0:8080";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedsConfig {
    pub noon_icon: Option<String>,
    pub noon_temperature: Option<i32>,
    pub evening_icon: Option<String>,
    pub evening_temperature: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    pub timezone: Option<String>,
    pub units: Option<String>,
    pub seeds: Option<SeedsConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub bind: Option<String>,
    pub payload_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    pub engine: Option<EngineConfig>,
    pub server: Option<ServerConfig>,

    /// Condition code overrides merged over the default icon table
    pub icons: Option<HashMap<String, String>>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Unknown time zone: {0}")]
    TimeZone(String),
    #[error("Invalid units: {0}")]
    Units(#[from] wxday_core::UnitError),
}

/// OpenWeatherMap condition codes mapped to SF Symbols identifiers
pub fn default_icon_table() -> HashMap<String, String> {
    [
        ("01d", "sun.max.fill"),
        ("01n", "moon.stars.fill"),
        ("02d", "cloud.sun.fill"),
        ("02n", "cloud.moon.fill"),
        ("03d", "cloud.fill"),
        ("03n", "cloud.fill"),
        ("04d", "smoke.fill"),
        ("04n", "smoke.fill"),
        ("09d", "cloud.heavyrain.fill"),
        ("09n", "cloud.heavyrain.fill"),
        ("10d", "cloud.sun.rain.fill"),
        ("10n", "cloud.moon.rain.fill"),
        ("11d", "cloud.bolt.rain.fill"),
        ("11n", "cloud.bolt.rain.fill"),
        ("13d", "cloud.snow.fill"),
        ("13n", "cloud.snow.fill"),
        ("50d", "cloud.fog.fill"),
        ("50n", "cloud.fog.fill"),
    ]
    .into_iter()
    .map(|(code, icon)| (code.to_string(), icon.to_string()))
    .collect()
}

impl AppConfig {
    /// Load configuration from WXDAY_CONFIG path (TOML) if present, with reasonable defaults
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("WXDAY_CONFIG").unwrap_or_else(|_| "config.toml".to_string());
        Self::load_from(path)
    }

    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let cfg = if path.exists() {
            let s = fs::read_to_string(path)?;
            toml::from_str::<AppConfig>(&s)?
        } else {
            AppConfig::default()
        };
        Ok(cfg)
    }

    /// Get HTTP bind address (default 0.0.0.0:8080)
    pub fn http_bind(&self) -> String {
        self.server
            .as_ref()
            .and_then(|s| s.bind.clone())
            .unwrap_or_else(|| DEFAULT_BIND.to_string())
    }

    /// Payload file processed at startup, if any
    pub fn payload_path(&self) -> Option<String> {
        self.server.as_ref().and_then(|s| s.payload_path.clone())
    }

    /// Resolve engine settings, validating the zone and unit names
    pub fn engine_settings(&self) -> Result<EngineSettings, ConfigError> {
        let engine = self.engine.as_ref();

        let tz_name = engine
            .and_then(|e| e.timezone.as_deref())
            .unwrap_or(DEFAULT_TIMEZONE);
        let timezone: Tz = tz_name
            .parse()
            .map_err(|_| ConfigError::TimeZone(tz_name.to_string()))?;

        let units = match engine.and_then(|e| e.units.as_deref()) {
            Some(name) => name.parse::<PayloadUnits>()?,
            None => PayloadUnits::default(),
        };

        let seeds = engine.and_then(|e| e.seeds.as_ref());
        let seeds = SnapshotSeeds {
            noon: ForecastEntry::new(
                "",
                seeds
                    .and_then(|s| s.noon_icon.clone())
                    .unwrap_or_else(|| DEFAULT_NOON_ICON.to_string()),
                seeds
                    .and_then(|s| s.noon_temperature)
                    .unwrap_or(DEFAULT_NOON_TEMPERATURE),
            ),
            evening: ForecastEntry::new(
                "",
                seeds
                    .and_then(|s| s.evening_icon.clone())
                    .unwrap_or_else(|| DEFAULT_EVENING_ICON.to_string()),
                seeds
                    .and_then(|s| s.evening_temperature)
                    .unwrap_or(DEFAULT_EVENING_TEMPERATURE),
            ),
        };

        Ok(EngineSettings {
            timezone,
            units,
            seeds,
        })
    }

    /// Default icon table with the configured overrides applied
    pub fn icon_mapper(&self) -> ConditionIconMapper {
        let mut table = default_icon_table();
        if let Some(overrides) = &self.icons {
            table.extend(overrides.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        ConditionIconMapper::new(table)
    }
}
