use std::fs;
use log::LevelFilter;
use serde::Deserialize;
use crate::errors::ConfigError;
use crate::models::forecast::{check_location, Horizon};

/// Which synthetic path to produce forecasts from
#[derive(Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Simulated GFS run with diurnal variation
    #[default]
    Gfs,
    /// Plain simulated data without any attributed run
    Fallback,
}

#[derive(Deserialize, Clone, Debug)]
pub struct GeoRef {
    pub lat: f64,
    pub long: f64,
}

impl Default for GeoRef {
    fn default() -> Self {
        // Jakarta
        GeoRef { lat: -6.2, long: 106.8 }
    }
}

/// Parameters for the synthetic forecast
///
/// The no-rain threshold and the diurnal factors are placeholders rather than
/// calibrated meteorology, hence they are kept configurable.
#[derive(Deserialize, Clone, Debug)]
#[serde(default)]
pub struct ForecastParameters {
    pub hours: Horizon,
    pub source: SourceKind,
    pub seed: u64,
    /// Mean of the exponential distribution rainfall is drawn from (mm/h)
    pub scale: f64,
    /// Mean used for the fallback source (mm/h)
    pub fallback_scale: f64,
    /// Any value below this is considered no rain and set to zero (mm/h)
    pub no_rain_threshold: f64,
    pub afternoon_factor: f64,
    /// Inclusive hour range (UTC) where the afternoon factor applies
    pub afternoon_hours: (u32, u32),
    pub morning_factor: f64,
    /// Inclusive hour range (UTC) where the morning factor applies
    pub morning_hours: (u32, u32),
}

impl Default for ForecastParameters {
    fn default() -> Self {
        ForecastParameters {
            hours: Horizon::TwoDays,
            source: SourceKind::Gfs,
            seed: 42,
            scale: 2.0,
            fallback_scale: 1.5,
            no_rain_threshold: 0.1,
            afternoon_factor: 1.5,
            afternoon_hours: (14, 20),
            morning_factor: 0.8,
            morning_hours: (6, 12),
        }
    }
}

#[derive(Deserialize, Clone, Debug)]
#[serde(default)]
pub struct CacheParameters {
    pub ttl_secs: u64,
}

impl Default for CacheParameters {
    fn default() -> Self {
        CacheParameters { ttl_secs: 3600 }
    }
}

#[derive(Deserialize, Clone, Debug)]
#[serde(default)]
pub struct Files {
    pub export_dir: String,
}

impl Default for Files {
    fn default() -> Self {
        Files { export_dir: "exports/".to_string() }
    }
}

#[derive(Deserialize, Clone, Debug)]
#[serde(default)]
pub struct General {
    pub log_path: Option<String>,
    pub log_level: LevelFilter,
    /// Log to the console. Log lines go to stderr, stdout is kept for the report.
    pub log_to_console: bool,
}

impl Default for General {
    fn default() -> Self {
        General { log_path: None, log_level: LevelFilter::Info, log_to_console: true }
    }
}

#[derive(Deserialize, Clone, Debug, Default)]
pub struct Config {
    #[serde(default)]
    pub geo_ref: GeoRef,
    #[serde(default)]
    pub forecast: ForecastParameters,
    #[serde(default)]
    pub cache: CacheParameters,
    #[serde(default)]
    pub files: Files,
    #[serde(default)]
    pub general: General,
}

/// Loads the configuration file and returns a struct with all configuration items
///
/// # Arguments
///
/// * 'config_path' - path to the configuration file
pub fn load_config(config_path: &str) -> Result<Config, ConfigError> {
    let toml = fs::read_to_string(config_path)?;

    parse_config(&toml)
}

/// Parses and validates a configuration given as a TOML document
///
/// # Arguments
///
/// * 'toml' - the configuration document
pub fn parse_config(toml: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(toml)?;
    validate(&config)?;

    Ok(config)
}

/// Validates configuration values that serde can't check by itself
///
/// # Arguments
///
/// * 'config' - configuration to validate
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    check_location(config.geo_ref.lat, config.geo_ref.long)
        .map_err(|e| ConfigError(e.to_string()))?;

    let f = &config.forecast;
    for (name, scale) in [("scale", f.scale), ("fallback_scale", f.fallback_scale)] {
        if !(scale > 0.0 && scale.is_finite()) {
            return Err(ConfigError(format!("{} must be a finite number greater than zero, got {}", name, scale)));
        }
    }
    if !(f.no_rain_threshold >= 0.0) {
        return Err(ConfigError::from("no rain threshold must not be negative"));
    }
    if !(f.afternoon_factor >= 0.0) || !(f.morning_factor >= 0.0) {
        return Err(ConfigError::from("diurnal factors must not be negative"));
    }
    for (name, (start, end)) in [("afternoon_hours", f.afternoon_hours), ("morning_hours", f.morning_hours)] {
        if start > end || end > 23 {
            return Err(ConfigError(format!("{} must be an hour range within 0-23, got {}-{}", name, start, end)));
        }
    }
    if config.cache.ttl_secs == 0 {
        return Err(ConfigError::from("cache ttl must be at least one second"));
    }

    Ok(())
}
