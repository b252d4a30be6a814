use chrono::{DateTime, Utc};
use crate::models::forecast::{ForecastSeries, Horizon};

/// Summary figures shown for a forecast
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub total_mm: f64,
    pub mean_mm: f64,
    pub max_mm: f64,
    pub max_at: DateTime<Utc>,
    pub rainy_hours: usize,
    pub rainy_share_pct: f64,
    pub horizon_hours: u32,
    pub horizon_days: f64,
}

/// Calculates summary statistics for a forecast series. Returns None for an empty series.
///
/// An hour counts as rainy when its rainfall is strictly above the no-rain threshold. The
/// maximum is reported at its first occurrence.
///
/// # Arguments
///
/// * 'series' - the forecast series
/// * 'horizon' - the horizon the series was generated for
/// * 'no_rain_threshold' - rainfall at or below this is not counted as a rainy hour
pub fn summarize(series: &ForecastSeries, horizon: Horizon, no_rain_threshold: f64) -> Option<Summary> {
    let records = series.records();
    let first = records.first()?;

    let total_mm = records.iter().map(|r| r.rainfall_mm).sum::<f64>();
    let mean_mm = total_mm / records.len() as f64;

    let max = records
        .iter()
        .fold(first, |max, r| if r.rainfall_mm > max.rainfall_mm { r } else { max });

    let rainy_hours = records.iter().filter(|r| r.rainfall_mm > no_rain_threshold).count();
    let rainy_share_pct = rainy_hours as f64 / records.len() as f64 * 100.0;

    Some(Summary {
        total_mm,
        mean_mm,
        max_mm: max.rainfall_mm,
        max_at: max.timestamp,
        rainy_hours,
        rainy_share_pct,
        horizon_hours: horizon.hours(),
        horizon_days: horizon.days(),
    })
}
