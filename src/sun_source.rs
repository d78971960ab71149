//! Sunrise and sunset times for a given day.
//!
//! Sun times come from the first source that works:
//!
//! 1. Configured coordinates, computed with the `sunrise` crate and shown in
//!    the configured timezone (or the system zone)
//! 2. Manual `sunrise`/`sunset` from the config
//! 3. Nothing: [`SunData::Unavailable`], which keeps the overlay clear
//!
//! A failing source only logs a warning and falls through to the next one.

use anyhow::{Context, Result, bail};
use chrono::{Local, NaiveDate, TimeZone};
use std::fmt;
use sunrise::{Coordinates, SolarDay, SolarEvent};

use crate::config::Config;
use crate::cycle_clock::{SunData, SunTimes};
use crate::logger::Log;

/// Where a day's sun times came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SunSource {
    Coordinates,
    Manual,
    Unavailable,
}

impl fmt::Display for SunSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SunSource::Coordinates => write!(f, "coordinates"),
            SunSource::Manual => write!(f, "manual times"),
            SunSource::Unavailable => write!(f, "none"),
        }
    }
}

/// Compute sunrise and sunset at a location, as wall-clock times in `tz`.
pub fn compute_sun_times<Z: TimeZone>(
    latitude: f64,
    longitude: f64,
    date: NaiveDate,
    tz: &Z,
) -> Result<SunTimes> {
    if !(-90.0..=90.0).contains(&latitude) {
        bail!("Invalid latitude: {}. Must be between -90 and 90 degrees", latitude);
    }
    if !(-180.0..=180.0).contains(&longitude) {
        bail!("Invalid longitude: {}. Must be between -180 and 180 degrees", longitude);
    }

    let coord = Coordinates::new(latitude, longitude)
        .with_context(|| format!("Failed to create coordinates {}, {}", latitude, longitude))?;
    let solar_day = SolarDay::new(coord, date);

    let sunrise = solar_day
        .event_time(SolarEvent::Sunrise)
        .with_timezone(tz)
        .time();
    let sunset = solar_day
        .event_time(SolarEvent::Sunset)
        .with_timezone(tz)
        .time();

    Ok(SunTimes::new(sunrise, sunset))
}

/// Sun times for `date` from the best available source.
pub fn resolve_sun_data_with_source(config: &Config, date: NaiveDate) -> (SunData, SunSource) {
    if let Some((latitude, longitude)) = config.coordinates() {
        let computed = match config.timezone() {
            Some(tz) => compute_sun_times(latitude, longitude, date, &tz),
            None => compute_sun_times(latitude, longitude, date, &Local),
        };
        match computed {
            Ok(times) => return (SunData::Known(times), SunSource::Coordinates),
            Err(e) => Log::log_warning(&format!(
                "Could not compute sun times from coordinates: {}. Trying manual times.",
                e
            )),
        }
    }

    if let Some(times) = config.manual_sun_times() {
        return (SunData::Known(times), SunSource::Manual);
    }

    Log::log_debug(&format!("No sun times available for {}", date));
    (SunData::Unavailable, SunSource::Unavailable)
}

pub fn resolve_sun_data(config: &Config, date: NaiveDate) -> SunData {
    resolve_sun_data_with_source(config, date).0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveTime, Utc};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn hms(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_equator_has_twelve_hour_days() {
        let times = compute_sun_times(0.0, 0.0, date(2024, 3, 20), &Utc).unwrap();
        assert!(times.sunrise > hms(5, 45) && times.sunrise < hms(6, 15));
        assert!(times.sunset > hms(17, 45) && times.sunset < hms(18, 30));
    }

    #[test]
    fn test_times_follow_timezone() {
        let berlin = chrono_tz::Europe::Berlin;
        let times = compute_sun_times(52.52, 13.405, date(2024, 6, 21), &berlin).unwrap();
        // Around 04:43 and 21:33 CEST
        assert!(times.sunrise > hms(4, 30) && times.sunrise < hms(5, 0));
        assert!(times.sunset > hms(21, 15) && times.sunset < hms(21, 50));
    }

    #[test]
    fn test_invalid_coordinates() {
        assert!(compute_sun_times(95.0, 0.0, date(2024, 1, 1), &Utc).is_err());
        assert!(compute_sun_times(0.0, -200.0, date(2024, 1, 1), &Utc).is_err());
    }

    #[test]
    fn test_coordinates_take_priority() {
        let config = Config {
            sunrise: Some("09:00:00".to_string()),
            sunset: Some("10:00:00".to_string()),
            latitude: Some(0.0),
            longitude: Some(0.0),
            timezone: Some("UTC".to_string()),
            ..Config::default()
        };
        let (data, source) = resolve_sun_data_with_source(&config, date(2024, 3, 20));
        assert_eq!(source, SunSource::Coordinates);
        let times = data.times().unwrap();
        assert!(times.sunrise < hms(7, 0));
    }

    #[test]
    fn test_manual_times_without_coordinates() {
        let config = Config {
            sunrise: Some("07:15:00".to_string()),
            sunset: Some("19:45:00".to_string()),
            ..Config::default()
        };
        let (data, source) = resolve_sun_data_with_source(&config, date(2024, 1, 1));
        assert_eq!(source, SunSource::Manual);
        assert_eq!(
            data,
            SunData::Known(SunTimes::new(
                NaiveTime::from_hms_opt(7, 15, 0).unwrap(),
                NaiveTime::from_hms_opt(19, 45, 0).unwrap()
            ))
        );
    }

    #[test]
    fn test_no_source_is_unavailable() {
        let config = Config::default();
        assert_eq!(resolve_sun_data(&config, date(2024, 1, 1)), SunData::Unavailable);
    }
}
