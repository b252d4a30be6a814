use approx::assert_relative_eq;
use chrono::{DateTime, TimeDelta, TimeZone, Timelike, Utc};
use gfsrain::cache::ForecastCache;
use gfsrain::config::{ForecastParameters, SourceKind};
use gfsrain::export::{from_csv, from_json, to_csv, to_json};
use gfsrain::manager_gfs::{diurnal_factor, draw_samples, generate, FALLBACK_LABEL};
use gfsrain::models::forecast::{Horizon, HORIZONS};
use gfsrain::session::Session;
use gfsrain::views::{heatmap, heatmap_available};

fn call_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 11, 3, 8, 41, 12).unwrap()
}

#[test]
fn test_length_equals_horizon_for_every_horizon() {
    let params = ForecastParameters::default();
    for hours in HORIZONS {
        let horizon = Horizon::try_from(hours).unwrap();
        let forecast = generate(45.0, -120.0, horizon, call_time(), &params).unwrap();
        assert_eq!(forecast.series.len(), hours as usize);
    }
}

#[test]
fn test_timestamps_strictly_hourly() {
    let forecast = generate(0.0, 0.0, Horizon::OneWeek, call_time(), &ForecastParameters::default()).unwrap();
    let records = forecast.series.records();

    for pair in records.windows(2) {
        assert_eq!(pair[1].timestamp - pair[0].timestamp, TimeDelta::hours(1));
    }
}

#[test]
fn test_rainfall_is_zero_or_above_threshold() {
    let params = ForecastParameters::default();
    for seed in 0..20 {
        let params = ForecastParameters { seed, ..params.clone() };
        let forecast = generate(10.0, 10.0, Horizon::OneWeek, call_time(), &params).unwrap();
        for r in forecast.series.records() {
            assert!(r.rainfall_mm == 0.0 || r.rainfall_mm >= 0.1, "got {}", r.rainfall_mm);
        }
    }
}

#[test]
fn test_cumulative_recurrence() {
    let forecast = generate(10.0, 10.0, Horizon::FiveDays, call_time(), &ForecastParameters::default()).unwrap();
    let records = forecast.series.records();
    let cumulative = forecast.series.cumulative_rainfall();

    assert_eq!(cumulative[0], records[0].rainfall_mm);
    for i in 1..records.len() {
        assert_eq!(cumulative[i], cumulative[i - 1] + records[i].rainfall_mm);
    }
}

#[test]
fn test_diurnal_scaling_against_seeded_samples() {
    // Without a threshold the intensity is exactly the base sample times the factor
    let params = ForecastParameters { no_rain_threshold: 0.0, ..Default::default() };
    let forecast = generate(-6.2, 106.8, Horizon::TwoDays, call_time(), &params).unwrap();
    let samples = draw_samples(48, params.scale, params.seed).unwrap();

    for (r, s) in forecast.series.records().iter().zip(samples) {
        let hour = r.timestamp.hour();
        let expected = match hour {
            14..=20 => s * 1.5,
            6..=12 => s * 0.8,
            _ => s,
        };
        assert_eq!(r.rainfall_mm, expected, "hour {}", hour);
        assert_eq!(r.rainfall_mm, s * diurnal_factor(hour, &params));
    }
}

#[test]
fn test_jakarta_one_day_example() {
    let forecast = generate(-6.2, 106.8, Horizon::OneDay, call_time(), &ForecastParameters::default()).unwrap();
    let records = forecast.series.records();

    assert_eq!(records.len(), 24);
    assert_eq!(records[0].timestamp, Utc.with_ymd_and_hms(2025, 11, 3, 8, 0, 0).unwrap());
    assert_eq!(records[23].timestamp, Utc.with_ymd_and_hms(2025, 11, 4, 7, 0, 0).unwrap());
    assert!(records.iter().all(|r| r.latitude == -6.2 && r.longitude == 106.8));

    let sum = records.iter().map(|r| r.rainfall_mm).sum::<f64>();
    assert_relative_eq!(forecast.series.cumulative_rainfall()[23], sum, epsilon = 1e-9);
    assert!(forecast.provenance.ends_with("gfs_0p25_1hr_20251103_00z"));
}

#[test]
fn test_heatmap_availability_follows_horizon() {
    assert!(!heatmap_available(Horizon::OneDay));
    for hours in [48, 72, 120, 168] {
        assert!(heatmap_available(Horizon::try_from(hours).unwrap()));
    }

    let forecast = generate(0.0, 0.0, Horizon::TwoDays, call_time(), &ForecastParameters::default()).unwrap();
    let map = heatmap(&forecast.series);
    // 08:00 on day one through 07:00 on day three
    assert_eq!(map.dates.len(), 3);
    for r in forecast.series.records() {
        assert_eq!(map.value(r.timestamp.date_naive(), r.timestamp.hour() as usize), Some(r.rainfall_mm));
    }
}

#[test]
fn test_exports_round_trip() {
    let forecast = generate(-6.2, 106.8, Horizon::ThreeDays, call_time(), &ForecastParameters::default()).unwrap();
    let records = forecast.series.records();

    let from_csv = from_csv(&to_csv(&forecast.series).unwrap()).unwrap();
    let from_json = from_json(&to_json(&forecast.series).unwrap()).unwrap();

    for rows in [from_csv, from_json] {
        assert_eq!(rows.len(), records.len());
        for (row, r) in rows.iter().zip(records) {
            assert_eq!(row.timestamp, r.timestamp);
            assert_relative_eq!(row.rainfall_mm, r.rainfall_mm, epsilon = 1e-12);
        }
    }
}

#[test]
fn test_cache_window() {
    let params = ForecastParameters::default();
    let cache = ForecastCache::new(3600);
    let t0 = call_time();

    let (first, _) = cache.get_or_generate(-6.2, 106.8, Horizon::OneDay, t0, || {
        generate(-6.2, 106.8, Horizon::OneDay, t0, &params)
    }).unwrap();

    let t1 = t0 + TimeDelta::minutes(30);
    let (second, cached) = cache.get_or_generate(-6.2, 106.8, Horizon::OneDay, t1, || {
        generate(-6.2, 106.8, Horizon::OneDay, t1, &params)
    }).unwrap();
    assert!(cached);
    assert_eq!(first, second);

    let t2 = t0 + TimeDelta::minutes(90);
    let (third, cached) = cache.get_or_generate(-6.2, 106.8, Horizon::OneDay, t2, || {
        generate(-6.2, 106.8, Horizon::OneDay, t2, &params)
    }).unwrap();
    assert!(!cached);
    assert_ne!(first.series, third.series);
}

#[test]
fn test_fallback_source_has_label_and_no_diurnal_factor() {
    let params = ForecastParameters { source: SourceKind::Fallback, no_rain_threshold: 0.0, ..Default::default() };
    let forecast = generate(1.0, 1.0, Horizon::OneDay, call_time(), &params).unwrap();
    let samples = draw_samples(24, 1.5, params.seed).unwrap();

    assert_eq!(forecast.provenance, FALLBACK_LABEL);
    let rain = forecast.series.records().iter().map(|r| r.rainfall_mm).collect::<Vec<f64>>();
    assert_eq!(rain, samples);
}

#[test]
fn test_session_rejects_before_generating() {
    let mut session = Session::new(ForecastParameters::default(), 3600);

    assert!(session.request(-6.2, 106.8, 25, call_time()).is_none());
    assert!(session.request(-90.1, 106.8, 24, call_time()).is_none());
    assert!(session.request(-6.2, 180.1, 24, call_time()).is_none());
    assert!(session.cache().is_empty());
}
