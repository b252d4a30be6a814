use thiserror::Error;

/// Error depicting errors that occur while loading or validating the configuration
///
#[derive(Error, Debug)]
#[error("ConfigError: {0}")]
pub struct ConfigError(pub String);
impl From<&str> for ConfigError {
    fn from(e: &str) -> Self { ConfigError(e.to_string()) }
}
impl From<String> for ConfigError {
    fn from(e: String) -> Self { ConfigError(e) }
}
impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self { ConfigError(e.to_string()) }
}
impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self { ConfigError(e.to_string()) }
}

/// Error depicting a rejected forecast request, i.e. input that never reaches the generator
///
#[derive(Error, Debug, PartialEq)]
pub enum RequestError {
    #[error("latitude {0} outside -90..=90")]
    Latitude(f64),
    #[error("longitude {0} outside -180..=180")]
    Longitude(f64),
    #[error("forecast horizon of {0} hours not supported, use one of 24, 48, 72, 120 or 168")]
    Horizon(u32),
}

/// Error depicting a failed forecast generation. There is no partial result,
/// a generation either yields a complete series or this error.
///
#[derive(Error, Debug)]
#[error("generation failed: {0}")]
pub struct GenerationError(pub String);
impl From<chrono::RoundingError> for GenerationError {
    fn from(e: chrono::RoundingError) -> Self { GenerationError(format!("time rounding error: {}", e)) }
}

/// Error depicting why a forecast request yielded no forecast
///
#[derive(Error, Debug)]
pub enum ForecastRequestError {
    #[error("invalid request: {0}")]
    Request(#[from] RequestError),
    #[error(transparent)]
    Generation(#[from] GenerationError),
}

/// Error depicting errors that occur while writing or reading exports
///
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("ExportError::File: {0}")]
    File(String),
    #[error("ExportError::Document: {0}")]
    Document(String),
}
impl From<std::io::Error> for ExportError {
    fn from(e: std::io::Error) -> Self { ExportError::File(e.to_string()) }
}
impl From<csv::Error> for ExportError {
    fn from(e: csv::Error) -> Self { ExportError::Document(format!("csv: {}", e)) }
}
impl From<csv::IntoInnerError<csv::Writer<Vec<u8>>>> for ExportError {
    fn from(e: csv::IntoInnerError<csv::Writer<Vec<u8>>>) -> Self { ExportError::Document(format!("csv: {}", e)) }
}
impl From<std::string::FromUtf8Error> for ExportError {
    fn from(e: std::string::FromUtf8Error) -> Self { ExportError::Document(e.to_string()) }
}
impl From<serde_json::Error> for ExportError {
    fn from(e: serde_json::Error) -> Self { ExportError::Document(format!("json: {}", e)) }
}

/// Error depicting errors that occur while setting up the application
///
#[derive(Error, Debug)]
#[error("GfsRainInitError: {0}")]
pub struct GfsRainInitError(pub String);
impl From<ConfigError> for GfsRainInitError {
    fn from(e: ConfigError) -> Self { GfsRainInitError(e.to_string()) }
}
impl From<RequestError> for GfsRainInitError {
    fn from(e: RequestError) -> Self { GfsRainInitError(e.to_string()) }
}
impl From<log::SetLoggerError> for GfsRainInitError {
    fn from(e: log::SetLoggerError) -> Self { GfsRainInitError(e.to_string()) }
}
impl From<log4rs::config::runtime::ConfigErrors> for GfsRainInitError {
    fn from(e: log4rs::config::runtime::ConfigErrors) -> Self { GfsRainInitError(e.to_string()) }
}
impl From<std::io::Error> for GfsRainInitError {
    fn from(e: std::io::Error) -> Self { GfsRainInitError(e.to_string()) }
}

/// Error depicting errors that occur while serving requests and presenting their results
///
#[derive(Error, Debug)]
#[error("GfsRainWorkerError: {0}")]
pub struct GfsRainWorkerError(pub String);
impl From<std::io::Error> for GfsRainWorkerError {
    fn from(e: std::io::Error) -> Self { GfsRainWorkerError(e.to_string()) }
}
impl From<ExportError> for GfsRainWorkerError {
    fn from(e: ExportError) -> Self { GfsRainWorkerError(e.to_string()) }
}
