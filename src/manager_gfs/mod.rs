use chrono::{DateTime, DurationRound, TimeDelta, Timelike, Utc};
use log::debug;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Exp};
use crate::config::{ForecastParameters, SourceKind};
use crate::errors::GenerationError;
use crate::models::forecast::{Forecast, ForecastRecord, ForecastSeries, Horizon};

/// OPeNDAP root of the GFS 0.25 degree hourly product
const GFS_BASE_URL: &str = "https://nomads.ncep.noaa.gov/dods/gfs_0p25_1hr";

/// Provenance label used for forecasts from the fallback source
pub const FALLBACK_LABEL: &str = "Simulated data (connection to NOAA unavailable)";

/// Produces a simulated hourly rainfall forecast for the given location.
///
/// The forecast starts at the hour of `now` (minutes and seconds truncated) and holds one
/// record per hour of the horizon. Rainfall is drawn from an exponential distribution seeded
/// with `params.seed`, so the same parameters and horizon always give the same intensities.
///
/// With the GFS source every hour is scaled by its diurnal factor, and the forecast is
/// attributed to the 00z GFS run of the UTC date of `now`. The fallback source uses its
/// own mean, no diurnal factor and the fallback provenance label.
///
/// # Arguments
///
/// * 'lat' - latitude for the point to forecast, already validated
/// * 'long' - longitude for the point to forecast, already validated
/// * 'horizon' - number of hours to forecast
/// * 'now' - generation time
/// * 'params' - forecast parameters
pub fn generate(lat: f64, long: f64, horizon: Horizon, now: DateTime<Utc>, params: &ForecastParameters)
    -> Result<Forecast, GenerationError> {

    debug!("synthesizing {} from {:?} source for {:.4}, {:.4}", horizon, params.source, lat, long);

    let start = now.duration_trunc(TimeDelta::hours(1))?;
    let timestamps = hourly_timestamps(start, horizon.hours())?;

    let (rainfall, provenance) = match params.source {
        SourceKind::Gfs => {
            let samples = draw_samples(timestamps.len(), params.scale, params.seed)?;
            let rainfall = timestamps
                .iter()
                .zip(samples)
                .map(|(ts, s)| gfs_intensity(s, ts.hour(), params))
                .collect::<Vec<f64>>();

            (rainfall, run_url(now))
        },
        SourceKind::Fallback => {
            let rainfall = draw_samples(timestamps.len(), params.fallback_scale, params.seed)?
                .into_iter()
                .map(|s| apply_threshold(s, params.no_rain_threshold))
                .collect::<Vec<f64>>();

            (rainfall, FALLBACK_LABEL.to_string())
        },
    };

    let records = timestamps
        .into_iter()
        .zip(rainfall)
        .map(|(timestamp, rainfall_mm)| ForecastRecord { timestamp, rainfall_mm, latitude: lat, longitude: long })
        .collect::<Vec<ForecastRecord>>();

    Ok(Forecast {
        series: ForecastSeries::new(records),
        provenance,
        horizon,
        generated_at: now,
    })
}

/// Draws samples from an exponential distribution with the given mean
///
/// # Arguments
///
/// * 'count' - number of samples
/// * 'scale' - mean of the distribution
/// * 'seed' - seed for the random number generator
pub fn draw_samples(count: usize, scale: f64, seed: u64) -> Result<Vec<f64>, GenerationError> {
    if !(scale > 0.0 && scale.is_finite()) {
        return Err(GenerationError(format!("distribution scale must be positive and finite, got {}", scale)));
    }

    let exp = Exp::new(1.0 / scale)
        .map_err(|e| GenerationError(format!("distribution error for scale {}: {}", scale, e)))?;
    let mut rng = StdRng::seed_from_u64(seed);

    Ok(exp.sample_iter(&mut rng).take(count).collect())
}

/// Returns the diurnal factor for the given hour of day.
/// Afternoon hours take precedence should the two ranges overlap.
///
/// # Arguments
///
/// * 'hour' - hour of day, 0-23
/// * 'params' - forecast parameters holding factors and hour ranges
pub fn diurnal_factor(hour: u32, params: &ForecastParameters) -> f64 {
    let (a_start, a_end) = params.afternoon_hours;
    let (m_start, m_end) = params.morning_hours;

    if (a_start..=a_end).contains(&hour) {
        params.afternoon_factor
    } else if (m_start..=m_end).contains(&hour) {
        params.morning_factor
    } else {
        1.0
    }
}

/// Builds the OPeNDAP URL of the 00z GFS run for the UTC date of the given time
///
/// # Arguments
///
/// * 'date_time' - the time to find the run for
pub fn run_url(date_time: DateTime<Utc>) -> String {
    let date = date_time.format("%Y%m%d");

    format!("{}/gfs{}/gfs_0p25_1hr_{}_00z", GFS_BASE_URL, date, date)
}

/// Turns one base sample into a GFS intensity: threshold, diurnal factor and threshold again,
/// since a factor below one may push a value under the no-rain threshold.
///
/// # Arguments
///
/// * 'sample' - base sample from the exponential distribution
/// * 'hour' - hour of day the sample is for
/// * 'params' - forecast parameters
fn gfs_intensity(sample: f64, hour: u32, params: &ForecastParameters) -> f64 {
    let base = apply_threshold(sample, params.no_rain_threshold);

    apply_threshold(base * diurnal_factor(hour, params), params.no_rain_threshold)
}

fn apply_threshold(value: f64, threshold: f64) -> f64 {
    if value < threshold { 0.0 } else { value }
}

/// Returns `count` timestamps one hour apart, starting at `start`
///
/// # Arguments
///
/// * 'start' - first timestamp
/// * 'count' - number of timestamps
fn hourly_timestamps(start: DateTime<Utc>, count: u32) -> Result<Vec<DateTime<Utc>>, GenerationError> {
    (0..count)
        .map(|h| start
            .checked_add_signed(TimeDelta::hours(h as i64))
            .ok_or_else(|| GenerationError(format!("timestamp out of range at hour {}", h))))
        .collect()
}
