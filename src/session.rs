use chrono::{DateTime, Utc};
use log::{debug, error, info};
use crate::cache::ForecastCache;
use crate::config::ForecastParameters;
use crate::errors::ForecastRequestError;
use crate::manager_gfs;
use crate::models::forecast::{check_location, Forecast, Horizon};

/// One user session: the forecast cache and the forecast currently on display.
///
/// Every request replaces the current forecast. A failed request leaves no forecast at all,
/// never a partial one.
pub struct Session {
    params: ForecastParameters,
    cache: ForecastCache,
    current: Option<Forecast>,
}

impl Session {
    /// Returns a new session without any forecast
    ///
    /// # Arguments
    ///
    /// * 'params' - parameters used for every generated forecast
    /// * 'ttl_secs' - how long a generated forecast may be reused
    pub fn new(params: ForecastParameters, ttl_secs: u64) -> Session {
        Session { params, cache: ForecastCache::new(ttl_secs), current: None }
    }

    /// Requests a forecast and makes it the current one.
    ///
    /// Any failure is logged and results in None, which the caller should present as
    /// "try again".
    ///
    /// # Arguments
    ///
    /// * 'lat' - latitude, -90..=90
    /// * 'long' - longitude, -180..=180
    /// * 'hours' - forecast horizon, one of 24, 48, 72, 120 or 168
    /// * 'now' - time of the request
    pub fn request(&mut self, lat: f64, long: f64, hours: u32, now: DateTime<Utc>) -> Option<&Forecast> {
        match self.try_request(lat, long, hours, now) {
            Ok(forecast) => Some(forecast),
            Err(e) => {
                error!("failed to get forecast for {}, {} ({} hours): {}", lat, long, hours, e);
                None
            }
        }
    }

    /// Same as request but hands the reason for a failure back to the caller
    ///
    /// # Arguments
    ///
    /// * 'lat' - latitude, -90..=90
    /// * 'long' - longitude, -180..=180
    /// * 'hours' - forecast horizon, one of 24, 48, 72, 120 or 168
    /// * 'now' - time of the request
    pub fn try_request(&mut self, lat: f64, long: f64, hours: u32, now: DateTime<Utc>)
        -> Result<&Forecast, ForecastRequestError> {

        self.current = None;

        check_location(lat, long)?;
        let horizon = Horizon::try_from(hours)?;

        let purged = self.cache.purge_expired(now);
        if purged > 0 {
            debug!("purged {} expired forecasts", purged);
        }

        let params = &self.params;
        let (forecast, cached) = self.cache.get_or_generate(lat, long, horizon, now, || {
            manager_gfs::generate(lat, long, horizon, now, params)
        })?;

        if cached {
            info!("reusing forecast generated {} for {}, {}", forecast.generated_at.format("%Y-%m-%d %H:%M"), lat, long);
        } else {
            info!("generated {} forecast for {}, {} from {}", horizon, lat, long, forecast.provenance);
        }

        Ok(&*self.current.insert(forecast))
    }

    /// Returns the forecast from the latest successful request, if the latest request succeeded
    pub fn current(&self) -> Option<&Forecast> {
        self.current.as_ref()
    }

    pub fn params(&self) -> &ForecastParameters {
        &self.params
    }

    pub fn cache(&self) -> &ForecastCache {
        &self.cache
    }
}
