use std::fmt;
use chrono::{DateTime, NaiveDate, Timelike, Utc};
use serde::{Deserialize, Serialize};
use crate::errors::RequestError;

/// Forecast horizons offered, in hours
pub const HORIZONS: [u32; 5] = [24, 48, 72, 120, 168];

/// Number of hours into the future to forecast. Only a fixed set of horizons is accepted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum Horizon {
    OneDay,
    TwoDays,
    ThreeDays,
    FiveDays,
    OneWeek,
}

impl Horizon {
    /// Returns the number of hourly records a forecast of this horizon holds
    pub fn hours(&self) -> u32 {
        match self {
            Horizon::OneDay    => 24,
            Horizon::TwoDays   => 48,
            Horizon::ThreeDays => 72,
            Horizon::FiveDays  => 120,
            Horizon::OneWeek   => 168,
        }
    }

    /// Returns the horizon length in days
    pub fn days(&self) -> f64 {
        self.hours() as f64 / 24.0
    }
}

impl TryFrom<u32> for Horizon {
    type Error = RequestError;

    fn try_from(hours: u32) -> Result<Self, Self::Error> {
        match hours {
            24  => Ok(Horizon::OneDay),
            48  => Ok(Horizon::TwoDays),
            72  => Ok(Horizon::ThreeDays),
            120 => Ok(Horizon::FiveDays),
            168 => Ok(Horizon::OneWeek),
            _   => Err(RequestError::Horizon(hours)),
        }
    }
}

impl From<Horizon> for u32 {
    fn from(h: Horizon) -> Self { h.hours() }
}

impl fmt::Display for Horizon {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} hours", self.hours())
    }
}

/// Checks that a location is a valid point on the globe
///
/// # Arguments
///
/// * 'lat' - latitude in decimal degrees, -90..=90
/// * 'long' - longitude in decimal degrees, -180..=180
pub fn check_location(lat: f64, long: f64) -> Result<(), RequestError> {
    if !(-90.0..=90.0).contains(&lat) {
        return Err(RequestError::Latitude(lat));
    }
    if !(-180.0..=180.0).contains(&long) {
        return Err(RequestError::Longitude(long));
    }

    Ok(())
}

/// One forecast hour
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ForecastRecord {
    pub timestamp: DateTime<Utc>,
    pub rainfall_mm: f64,
    pub latitude: f64,
    pub longitude: f64,
}

/// Flat representation of a forecast hour including derived columns, as used in exports
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ForecastRow {
    pub timestamp: DateTime<Utc>,
    pub rainfall_mm: f64,
    pub latitude: f64,
    pub longitude: f64,
    pub cumulative_rainfall: f64,
    pub date: NaiveDate,
    pub hour: u32,
}

/// An ordered hourly rainfall forecast together with its running sum
///
/// The running sum is computed once when the series is built, so it always matches
/// the records it was built from.
#[derive(Clone, Debug, PartialEq)]
pub struct ForecastSeries {
    records: Vec<ForecastRecord>,
    cumulative: Vec<f64>,
}

impl ForecastSeries {
    /// Returns a new series from ordered records
    ///
    /// # Arguments
    ///
    /// * 'records' - forecast records ordered by timestamp
    pub fn new(records: Vec<ForecastRecord>) -> ForecastSeries {
        let cumulative = records
            .iter()
            .scan(0.0, |sum, r| {
                *sum += r.rainfall_mm;
                Some(*sum)
            })
            .collect::<Vec<f64>>();

        ForecastSeries { records, cumulative }
    }

    pub fn records(&self) -> &[ForecastRecord] {
        &self.records
    }

    /// Returns the running sum of rainfall over the series
    pub fn cumulative_rainfall(&self) -> &[f64] {
        &self.cumulative
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns the records flattened with the derived columns (cumulative rainfall, date and hour)
    pub fn rows(&self) -> Vec<ForecastRow> {
        self.records
            .iter()
            .zip(self.cumulative.iter())
            .map(|(r, &c)| ForecastRow {
                timestamp: r.timestamp,
                rainfall_mm: r.rainfall_mm,
                latitude: r.latitude,
                longitude: r.longitude,
                cumulative_rainfall: c,
                date: r.timestamp.date_naive(),
                hour: r.timestamp.hour(),
            })
            .collect()
    }
}

/// A generated forecast, i.e. the series and where it claims to come from
#[derive(Clone, Debug, PartialEq)]
pub struct Forecast {
    pub series: ForecastSeries,
    pub provenance: String,
    pub horizon: Horizon,
    pub generated_at: DateTime<Utc>,
}
