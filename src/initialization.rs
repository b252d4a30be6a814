use log::info;
use log4rs::Handle;
use crate::config::{load_config, validate, Config};
use crate::errors::GfsRainInitError;
use crate::logging::setup_logger;
use crate::models::forecast::Horizon;

/// Values given on the command line that take precedence over the configuration file
#[derive(Default, Debug, Clone)]
pub struct Overrides {
    pub lat: Option<f64>,
    pub long: Option<f64>,
    pub hours: Option<u32>,
    pub export_dir: Option<String>,
}

/// Loads configuration, applies command line overrides and sets up logging
///
/// Without a configuration file built-in defaults are used.
///
/// # Arguments
///
/// * 'config_path' - optional path to the configuration file
/// * 'overrides' - values overriding the configuration
pub fn init(config_path: Option<&str>, overrides: &Overrides) -> Result<(Config, Handle), GfsRainInitError> {
    let mut config = match config_path {
        Some(path) => load_config(path)?,
        None => Config::default(),
    };

    apply_overrides(&mut config, overrides)?;
    let handle = setup_logger(&config.general)?;

    info!("gfsrain version: {}", env!("CARGO_PKG_VERSION"));
    info!("configuration: {}", config_path.unwrap_or("built-in defaults"));

    Ok((config, handle))
}

/// Applies overrides to the configuration and validates the result
///
/// # Arguments
///
/// * 'config' - configuration to update
/// * 'overrides' - values overriding the configuration
pub fn apply_overrides(config: &mut Config, overrides: &Overrides) -> Result<(), GfsRainInitError> {
    if let Some(lat) = overrides.lat {
        config.geo_ref.lat = lat;
    }
    if let Some(long) = overrides.long {
        config.geo_ref.long = long;
    }
    if let Some(hours) = overrides.hours {
        config.forecast.hours = Horizon::try_from(hours)?;
    }
    if let Some(dir) = &overrides.export_dir {
        config.files.export_dir = dir.clone();
    }
    validate(config)?;

    Ok(())
}
