use std::fs;
use std::path::{Path, PathBuf};
use chrono::{DateTime, Local};
use log::info;
use crate::errors::ExportError;
use crate::models::forecast::{ForecastRow, ForecastSeries};

/// Builds the file name for an export, embedding the location and the time of export
///
/// # Arguments
///
/// * 'lat' - latitude of the forecast
/// * 'long' - longitude of the forecast
/// * 'date_time' - time of export
/// * 'extension' - file extension without dot
pub fn export_filename(lat: f64, long: f64, date_time: DateTime<Local>, extension: &str) -> String {
    format!("rainfall_{}_{}_{}.{}", lat, long, date_time.format("%Y%m%d_%H%M"), extension)
}

/// Renders the series as CSV with a header row
///
/// # Arguments
///
/// * 'series' - forecast series to render
pub fn to_csv(series: &ForecastSeries) -> Result<String, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in series.rows() {
        writer.serialize(row)?;
    }
    let bytes = writer.into_inner()?;

    Ok(String::from_utf8(bytes)?)
}

/// Renders the series as a JSON array with one object per hour
///
/// # Arguments
///
/// * 'series' - forecast series to render
pub fn to_json(series: &ForecastSeries) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(&series.rows())?)
}

/// Reads rows back from a CSV export
///
/// # Arguments
///
/// * 'csv' - the CSV document
pub fn from_csv(csv: &str) -> Result<Vec<ForecastRow>, ExportError> {
    let mut reader = csv::Reader::from_reader(csv.as_bytes());

    reader
        .deserialize::<ForecastRow>()
        .map(|r| r.map_err(ExportError::from))
        .collect()
}

/// Reads rows back from a JSON export
///
/// # Arguments
///
/// * 'json' - the JSON document
pub fn from_json(json: &str) -> Result<Vec<ForecastRow>, ExportError> {
    Ok(serde_json::from_str(json)?)
}

/// Writes CSV and JSON exports of the series to the export directory, which is created
/// if missing. Returns the paths of the two files.
///
/// # Arguments
///
/// * 'export_dir' - the directory to save the files to
/// * 'series' - forecast series to export
/// * 'lat' - latitude of the forecast
/// * 'long' - longitude of the forecast
/// * 'date_time' - time of export, used in the file names
pub fn save_exports(export_dir: &str, series: &ForecastSeries, lat: f64, long: f64, date_time: DateTime<Local>)
    -> Result<(PathBuf, PathBuf), ExportError> {

    let dir = Path::new(export_dir);
    fs::create_dir_all(dir)?;

    let csv_path = dir.join(export_filename(lat, long, date_time, "csv"));
    fs::write(&csv_path, to_csv(series)?)?;

    let json_path = dir.join(export_filename(lat, long, date_time, "json"));
    fs::write(&json_path, to_json(series)?)?;

    info!("exported {} and {}", csv_path.display(), json_path.display());

    Ok((csv_path, json_path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeDelta, TimeZone, Utc};
    use crate::models::forecast::ForecastRecord;

    fn series() -> ForecastSeries {
        let start = Utc.with_ymd_and_hms(2025, 4, 2, 23, 0, 0).unwrap();
        ForecastSeries::new([0.0, 1.2345678901, 0.35]
            .iter()
            .enumerate()
            .map(|(i, &r)| ForecastRecord {
                timestamp: start + TimeDelta::hours(i as i64),
                rainfall_mm: r,
                latitude: -6.2,
                longitude: 106.8,
            })
            .collect())
    }

    #[test]
    fn test_filename() {
        let t = Local.with_ymd_and_hms(2025, 4, 2, 9, 5, 0).unwrap();
        assert_eq!(export_filename(-6.2, 106.8, t, "csv"), "rainfall_-6.2_106.8_20250402_0905.csv");
    }

    #[test]
    fn test_csv_header_and_columns() {
        let csv = to_csv(&series()).unwrap();
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("timestamp,rainfall_mm,latitude,longitude,cumulative_rainfall,date,hour"));
        assert_eq!(lines.next(), Some("2025-04-02T23:00:00Z,0.0,-6.2,106.8,0.0,2025-04-02,23"));
        assert_eq!(csv.lines().count(), 4);
    }

    #[test]
    fn test_csv_round_trip() {
        let series = series();
        let rows = from_csv(&to_csv(&series).unwrap()).unwrap();
        assert_eq!(rows, series.rows());
    }

    #[test]
    fn test_json_is_array_of_records() {
        let json = to_json(&series()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let array = value.as_array().unwrap();
        assert_eq!(array.len(), 3);
        assert_eq!(array[1]["timestamp"], "2025-04-03T00:00:00Z");
        assert_eq!(array[1]["date"], "2025-04-03");
        assert_eq!(array[1]["hour"], 0);
    }

    #[test]
    fn test_json_round_trip() {
        let series = series();
        let rows = from_json(&to_json(&series).unwrap()).unwrap();
        assert_eq!(rows, series.rows());
    }

    #[test]
    fn test_broken_documents() {
        assert!(from_json("[{\"timestamp\": 1}]").is_err());
        assert!(from_csv("timestamp,rainfall_mm\nnot a time,1.0\n").is_err());
    }

    #[test]
    fn test_save_exports() {
        let dir = std::env::temp_dir().join(format!("gfsrain_export_test_{}", std::process::id()));
        let t = Local.with_ymd_and_hms(2025, 4, 2, 9, 5, 0).unwrap();

        let (csv_path, json_path) = save_exports(&dir.to_string_lossy(), &series(), -6.2, 106.8, t).unwrap();
        assert!(csv_path.ends_with("rainfall_-6.2_106.8_20250402_0905.csv"));
        assert_eq!(from_csv(&fs::read_to_string(&csv_path).unwrap()).unwrap().len(), 3);
        assert_eq!(from_json(&fs::read_to_string(&json_path).unwrap()).unwrap().len(), 3);

        let _ = fs::remove_dir_all(dir);
    }
}
