//! Normalized position of the sun within the 24-hour cycle.
//!
//! The cycle clock maps wall-clock time onto the interval [0, 1), anchored at
//! local midnight, and places sunrise on that same interval. Everything that
//! draws or colors the overlay works from these two numbers:
//!
//! - **Position**: how far through the day the current instant is
//! - **Offset**: where sunrise falls, i.e. the phase shift of the drawn curve
//!
//! Both values wrap at 1 → 0. Callers evaluating successive ticks must expect
//! the position to jump from just below 1 back to 0 at midnight.

use anyhow::{Result, bail};
use chrono::{DateTime, NaiveTime, TimeZone, Timelike};

use crate::constants::{
    DEFAULT_CYCLE_OFFSET, DEFAULT_SUN_POSITION, MINIMUM_DAY_SEPARATION, SECONDS_PER_DAY,
};

// Largest fraction strictly below one full cycle.
const LAST_FRACTION: f64 = 1.0 - f64::EPSILON;

/// Wrap a fraction into [0, 1), rejecting NaN and infinities.
fn normalize_fraction(value: f64, what: &str) -> Result<f64> {
    if !value.is_finite() {
        bail!("{} must be a finite number (got {})", what, value);
    }

    let wrapped = value.rem_euclid(1.0);

    // rem_euclid rounds tiny negative inputs up to exactly 1.0
    if wrapped >= 1.0 { Ok(0.0) } else { Ok(wrapped) }
}

/// Where in the 24h loop we are. Always in [0, 1).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct CyclePosition {
    horizontal: f64,
}

impl CyclePosition {
    /// Create a position from any finite fraction, taken modulo 1.
    pub fn new(horizontal: f64) -> Result<Self> {
        Ok(Self {
            horizontal: normalize_fraction(horizontal, "Cycle position")?,
        })
    }

    pub fn horizontal(self) -> f64 {
        self.horizontal
    }
}

impl Default for CyclePosition {
    fn default() -> Self {
        Self {
            horizontal: DEFAULT_SUN_POSITION,
        }
    }
}

/// Phase shift of the drawn cycle: where sunrise sits. Always in [0, 1).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct CycleOffset {
    horizontal: f64,
}

impl CycleOffset {
    /// Create an offset from any finite fraction, taken modulo 1.
    pub fn new(horizontal: f64) -> Result<Self> {
        Ok(Self {
            horizontal: normalize_fraction(horizontal, "Cycle offset")?,
        })
    }

    pub fn horizontal(self) -> f64 {
        self.horizontal
    }
}

impl Default for CycleOffset {
    fn default() -> Self {
        Self {
            horizontal: DEFAULT_CYCLE_OFFSET,
        }
    }
}

/// Fraction of the day elapsed at `time`, measured from local midnight.
///
/// A leap second (`23:59:60`) stays inside the current cycle instead of
/// spilling over into the next one.
pub fn fraction_of_day(time: NaiveTime) -> f64 {
    let seconds =
        time.num_seconds_from_midnight() as f64 + time.nanosecond() as f64 / 1_000_000_000.0;
    (seconds / SECONDS_PER_DAY).min(LAST_FRACTION)
}

/// Convert a duration since the cycle anchor into a fraction of the day.
///
/// Durations longer than a day wrap around.
///
/// # Errors
/// Negative or non-finite durations are contract violations.
pub fn fraction_from_seconds(seconds: f64) -> Result<f64> {
    if !seconds.is_finite() || seconds < 0.0 {
        bail!(
            "Elapsed time must be a finite, non-negative number of seconds (got {})",
            seconds
        );
    }
    normalize_fraction(seconds / SECONDS_PER_DAY, "Elapsed time")
}

/// Sunrise and sunset as local wall-clock times for the day being drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SunTimes {
    pub sunrise: NaiveTime,
    pub sunset: NaiveTime,
}

impl SunTimes {
    pub fn new(sunrise: NaiveTime, sunset: NaiveTime) -> Self {
        Self { sunrise, sunset }
    }

    pub fn sunrise_fraction(&self) -> f64 {
        fraction_of_day(self.sunrise)
    }

    pub fn sunset_fraction(&self) -> f64 {
        fraction_of_day(self.sunset)
    }

    /// Length of the day (sunrise → sunset) as a fraction of the cycle.
    ///
    /// Measured forward from sunrise, so a sunset that lands past midnight
    /// still yields the right span. The result never collapses to zero or to
    /// a full cycle: identical times (polar day or night) are widened to
    /// `MINIMUM_DAY_SEPARATION`.
    pub fn day_span(&self) -> f64 {
        let span = (self.sunset_fraction() - self.sunrise_fraction()).rem_euclid(1.0);
        span.clamp(MINIMUM_DAY_SEPARATION, 1.0 - MINIMUM_DAY_SEPARATION)
    }
}

/// Sun times as delivered by the external data source.
///
/// `Unavailable` is a legitimate input, not an error: location or lookup
/// failures degrade to it and consumers fall back to documented defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SunData {
    Known(SunTimes),
    Unavailable,
}

impl SunData {
    pub fn times(&self) -> Option<SunTimes> {
        match self {
            SunData::Known(times) => Some(*times),
            SunData::Unavailable => None,
        }
    }
}

/// Position and offset computed for a single instant.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CycleReading {
    pub position: CyclePosition,
    pub offset: CycleOffset,
}

impl CycleReading {
    /// Portion of the cycle that has elapsed since sunrise, in [0, 1).
    pub fn since_sunrise(&self) -> f64 {
        let elapsed = (self.position.horizontal - self.offset.horizontal).rem_euclid(1.0);
        if elapsed >= 1.0 { 0.0 } else { elapsed }
    }
}

/// Converts wall-clock instants into cycle readings for one set of sun times.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CycleClock {
    sun_times: SunTimes,
}

impl CycleClock {
    pub fn new(sun_times: SunTimes) -> Self {
        Self { sun_times }
    }

    pub fn sun_times(&self) -> SunTimes {
        self.sun_times
    }

    /// Sunrise placed on the cycle.
    pub fn offset(&self) -> CycleOffset {
        CycleOffset {
            horizontal: self.sun_times.sunrise_fraction(),
        }
    }

    /// Day length as a fraction of the cycle, see [`SunTimes::day_span`].
    pub fn day_span(&self) -> f64 {
        self.sun_times.day_span()
    }

    /// Reading for a local wall-clock time.
    pub fn reading_at_time(&self, time: NaiveTime) -> CycleReading {
        CycleReading {
            position: CyclePosition {
                horizontal: fraction_of_day(time),
            },
            offset: self.offset(),
        }
    }

    /// Reading for a timezone-aware instant, using its own local time of day.
    pub fn reading_at<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> CycleReading {
        self.reading_at_time(now.time())
    }

    /// Reading for a number of seconds elapsed since local midnight.
    ///
    /// # Errors
    /// Fails for negative or non-finite durations.
    pub fn reading_after(&self, seconds_since_midnight: f64) -> Result<CycleReading> {
        Ok(CycleReading {
            position: CyclePosition {
                horizontal: fraction_from_seconds(seconds_since_midnight)?,
            },
            offset: self.offset(),
        })
    }
}
