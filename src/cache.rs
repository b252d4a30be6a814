use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use chrono::{DateTime, TimeDelta, Utc};
use log::debug;
use crate::errors::GenerationError;
use crate::models::forecast::{Forecast, Horizon};

/// Cache key, coordinates are kept as bit patterns so that the key can be hashed
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct CacheKey {
    lat: u64,
    long: u64,
    horizon: Horizon,
}

impl CacheKey {
    fn new(lat: f64, long: f64, horizon: Horizon) -> CacheKey {
        // Adding zero folds -0.0 into 0.0
        CacheKey { lat: (lat + 0.0).to_bits(), long: (long + 0.0).to_bits(), horizon }
    }
}

struct CacheEntry {
    created: DateTime<Utc>,
    forecast: Forecast,
}

/// Time bounded memoization of generated forecasts.
///
/// An entry is valid for `ttl` from when it was stored. There is no eviction other than
/// expiry; an expired entry is simply overwritten by the next generation for the same key.
/// Forecasts are pure functions of their key and generation parameters, so concurrent
/// writers racing on the same key are fine, the last one wins.
pub struct ForecastCache {
    ttl: TimeDelta,
    entries: RwLock<HashMap<CacheKey, CacheEntry>>,
}

impl ForecastCache {
    /// Returns a new, empty cache
    ///
    /// # Arguments
    ///
    /// * 'ttl_secs' - validity window for an entry in seconds
    pub fn new(ttl_secs: u64) -> ForecastCache {
        let ttl = TimeDelta::try_seconds(ttl_secs.min(i64::MAX as u64 / 1000) as i64)
            .unwrap_or(TimeDelta::MAX);

        ForecastCache { ttl, entries: RwLock::new(HashMap::new()) }
    }

    /// Returns a copy of the cached forecast if there is one that is still valid at `now`
    ///
    /// # Arguments
    ///
    /// * 'lat' - latitude of the forecast
    /// * 'long' - longitude of the forecast
    /// * 'horizon' - horizon of the forecast
    /// * 'now' - time to check validity against
    pub fn get(&self, lat: f64, long: f64, horizon: Horizon, now: DateTime<Utc>) -> Option<Forecast> {
        self.read()
            .get(&CacheKey::new(lat, long, horizon))
            .filter(|e| self.is_valid(e, now))
            .map(|e| e.forecast.clone())
    }

    /// Stores a forecast, replacing whatever was stored for the same key
    ///
    /// # Arguments
    ///
    /// * 'lat' - latitude of the forecast
    /// * 'long' - longitude of the forecast
    /// * 'forecast' - the forecast to store
    /// * 'now' - time the validity window starts from
    pub fn insert(&self, lat: f64, long: f64, forecast: Forecast, now: DateTime<Utc>) {
        let key = CacheKey::new(lat, long, forecast.horizon);
        self.write().insert(key, CacheEntry { created: now, forecast });
    }

    /// Returns a valid cached forecast or generates, stores and returns a new one.
    /// Failed generations are not stored.
    ///
    /// The boolean in the result is true when the forecast came from the cache.
    ///
    /// # Arguments
    ///
    /// * 'lat' - latitude of the forecast
    /// * 'long' - longitude of the forecast
    /// * 'horizon' - horizon of the forecast
    /// * 'now' - current time
    /// * 'generator' - produces the forecast on a cache miss
    pub fn get_or_generate<F>(&self, lat: f64, long: f64, horizon: Horizon, now: DateTime<Utc>, generator: F)
        -> Result<(Forecast, bool), GenerationError>
    where
        F: FnOnce() -> Result<Forecast, GenerationError>,
    {
        if let Some(forecast) = self.get(lat, long, horizon, now) {
            debug!("cache hit for {:.4}, {:.4}, {}", lat, long, horizon);
            return Ok((forecast, true));
        }

        debug!("cache miss for {:.4}, {:.4}, {}", lat, long, horizon);
        let forecast = generator()?;
        self.insert(lat, long, forecast.clone(), now);

        Ok((forecast, false))
    }

    /// Removes all entries that have expired at `now` and returns how many were removed
    ///
    /// # Arguments
    ///
    /// * 'now' - time to check validity against
    pub fn purge_expired(&self, now: DateTime<Utc>) -> usize {
        let mut entries = self.write();
        let before = entries.len();
        entries.retain(|_, e| now - e.created < self.ttl);

        before - entries.len()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    fn is_valid(&self, entry: &CacheEntry, now: DateTime<Utc>) -> bool {
        now - entry.created < self.ttl
    }

    // A poisoned lock only means some writer panicked, the map itself holds complete entries
    fn read(&self) -> RwLockReadGuard<'_, HashMap<CacheKey, CacheEntry>> {
        self.entries.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<CacheKey, CacheEntry>> {
        self.entries.write().unwrap_or_else(|e| e.into_inner())
    }
}
