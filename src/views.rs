use std::collections::BTreeMap;
use chrono::{DateTime, NaiveDate, Timelike, Utc};
use crate::models::forecast::{ForecastSeries, Horizon};

/// Shortest horizon, in hours, for which the heatmap is shown
pub const HEATMAP_MIN_HOURS: u32 = 48;

/// The two curves of the rainfall chart
pub struct ChartProjection {
    pub hourly: Vec<(DateTime<Utc>, f64)>,
    pub cumulative: Vec<(DateTime<Utc>, f64)>,
}

/// Rainfall per calendar date (rows) and hour of day (columns)
#[derive(Debug, PartialEq)]
pub struct HeatMap {
    pub dates: Vec<NaiveDate>,
    pub cells: Vec<[f64; 24]>,
}

impl HeatMap {
    /// Returns the cell value for the given date and hour, if the date is in the map
    ///
    /// # Arguments
    ///
    /// * 'date' - row date
    /// * 'hour' - column hour, 0-23
    pub fn value(&self, date: NaiveDate, hour: usize) -> Option<f64> {
        let row = self.dates.iter().position(|d| *d == date)?;
        self.cells[row].get(hour).copied()
    }
}

/// Returns the hourly and cumulative rainfall curves
///
/// # Arguments
///
/// * 'series' - forecast series to project
pub fn chart_projection(series: &ForecastSeries) -> ChartProjection {
    let hourly = series.records()
        .iter()
        .map(|r| (r.timestamp, r.rainfall_mm))
        .collect();

    let cumulative = series.records()
        .iter()
        .zip(series.cumulative_rainfall())
        .map(|(r, &c)| (r.timestamp, c))
        .collect();

    ChartProjection { hourly, cumulative }
}

/// Whether a heatmap is meaningful for the given horizon
pub fn heatmap_available(horizon: Horizon) -> bool {
    horizon.hours() >= HEATMAP_MIN_HOURS
}

/// Builds the date by hour heatmap where each cell holds the mean rainfall of all records for
/// that date and hour, or zero where the series has no record.
///
/// # Arguments
///
/// * 'series' - forecast series to project
pub fn heatmap(series: &ForecastSeries) -> HeatMap {
    let mut sums: BTreeMap<NaiveDate, [(f64, u32); 24]> = BTreeMap::new();

    for r in series.records() {
        let row = sums.entry(r.timestamp.date_naive()).or_insert([(0.0, 0); 24]);
        let cell = &mut row[r.timestamp.hour() as usize];
        cell.0 += r.rainfall_mm;
        cell.1 += 1;
    }

    let mut dates = Vec::with_capacity(sums.len());
    let mut cells = Vec::with_capacity(sums.len());
    for (date, row) in sums {
        dates.push(date);
        cells.push(row.map(|(sum, n)| if n == 0 { 0.0 } else { sum / n as f64 }));
    }

    HeatMap { dates, cells }
}
