//! Overlay color resolution for each scheduled tick.
//!
//! This module turns a cycle reading into the single ARGB value applied to the
//! full-screen darkening layer. The day is split into three tiers:
//!
//! - **Day**: from sunrise up to sunset, minimal dimming
//! - **Twilight**: a fixed band leading into sunrise and one following sunset
//! - **Night**: everything else, the darkest configured dimming
//!
//! Each tier has its own [`DimnessPercent`], shaped through the dimness curve
//! into an alpha and combined with the configured tint. Within a tier the
//! color is constant, so closely spaced ticks never flicker; the only changes
//! happen at the band edges.
//!
//! When no sun data is available the resolver treats the whole day as
//! daytime and returns a fully transparent color.

use anyhow::{Context, Result, bail};
use chrono::{DateTime, TimeZone};
use std::fmt;
use std::str::FromStr;

use crate::constants::{
    DEFAULT_DAY_DIMNESS, DEFAULT_NIGHT_DIMNESS, DEFAULT_TWILIGHT_DIMNESS,
    DEFAULT_TWILIGHT_DURATION, MINUTES_PER_DAY,
};
use crate::cycle_clock::{CycleClock, CycleReading, SunData, SunTimes};
use crate::dimness::{DimnessPercent, overlay_alpha};

// Band edges are inclusive; this absorbs the rounding of fractional positions.
const BOUNDARY_EPSILON: f64 = 1e-9;

/// Parse two hex digits starting at `index`.
fn hex_byte(digits: &str, index: usize) -> Result<u8> {
    let pair = digits
        .get(index..index + 2)
        .with_context(|| format!("Color '{}' is too short", digits))?;
    // from_str_radix would also take a sign
    if !pair.bytes().all(|b| b.is_ascii_hexdigit()) {
        bail!("Invalid hex digits '{}'", pair);
    }
    u8::from_str_radix(pair, 16).with_context(|| format!("Invalid hex digits '{}'", pair))
}

/// RGB tint of the overlay. Black by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Tint {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Tint {
    pub const BLACK: Tint = Tint {
        red: 0,
        green: 0,
        blue: 0,
    };

    pub fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }
}

impl FromStr for Tint {
    type Err = anyhow::Error;

    /// Parse `#RRGGBB` (the leading `#` is optional).
    fn from_str(s: &str) -> Result<Self> {
        let digits = s.trim().trim_start_matches('#');
        if digits.len() != 6 {
            bail!("Tint must be in #RRGGBB format (got '{}')", s);
        }
        Ok(Self {
            red: hex_byte(digits, 0)?,
            green: hex_byte(digits, 2)?,
            blue: hex_byte(digits, 4)?,
        })
    }
}

impl fmt::Display for Tint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.red, self.green, self.blue)
    }
}

/// ARGB color applied to the overlay surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OverlayColor {
    pub alpha: u8,
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl OverlayColor {
    pub const TRANSPARENT: OverlayColor = OverlayColor {
        alpha: 0,
        red: 0,
        green: 0,
        blue: 0,
    };

    pub fn new(alpha: u8, red: u8, green: u8, blue: u8) -> Self {
        Self {
            alpha,
            red,
            green,
            blue,
        }
    }

    /// A tint at the given alpha. The alpha math never looks at the tint.
    pub fn tinted(tint: Tint, alpha: u8) -> Self {
        Self::new(alpha, tint.red, tint.green, tint.blue)
    }

    /// Pack as `0xAARRGGBB`.
    pub fn to_argb(self) -> u32 {
        u32::from_be_bytes([self.alpha, self.red, self.green, self.blue])
    }

    pub fn from_argb(argb: u32) -> Self {
        let [alpha, red, green, blue] = argb.to_be_bytes();
        Self::new(alpha, red, green, blue)
    }
}

impl FromStr for OverlayColor {
    type Err = anyhow::Error;

    /// Parse `#AARRGGBB`, or `#RRGGBB` as a fully opaque color.
    fn from_str(s: &str) -> Result<Self> {
        let digits = s.trim().trim_start_matches('#');
        match digits.len() {
            8 => Ok(Self::new(
                hex_byte(digits, 0)?,
                hex_byte(digits, 2)?,
                hex_byte(digits, 4)?,
                hex_byte(digits, 6)?,
            )),
            6 => Ok(Self::tinted(digits.parse()?, u8::MAX)),
            _ => bail!("Color must be in #AARRGGBB or #RRGGBB format (got '{}')", s),
        }
    }
}

impl fmt::Display for OverlayColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:08X}", self.to_argb())
    }
}

/// Day-phase tier of the current position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DayPhase {
    Day,      // Sun up, outside the twilight bands
    Twilight, // Within the band before sunrise or after sunset
    Night,    // Sun down, outside the twilight bands
}

impl fmt::Display for DayPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DayPhase::Day => write!(f, "day"),
            DayPhase::Twilight => write!(f, "twilight"),
            DayPhase::Night => write!(f, "night"),
        }
    }
}

/// Dimness target for each day-phase tier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DimnessTiers {
    pub day: DimnessPercent,
    pub twilight: DimnessPercent,
    pub night: DimnessPercent,
}

impl DimnessTiers {
    pub fn for_phase(&self, phase: DayPhase) -> DimnessPercent {
        match phase {
            DayPhase::Day => self.day,
            DayPhase::Twilight => self.twilight,
            DayPhase::Night => self.night,
        }
    }
}

impl Default for DimnessTiers {
    fn default() -> Self {
        Self {
            day: DimnessPercent::new(DEFAULT_DAY_DIMNESS).unwrap_or_default(),
            twilight: DimnessPercent::new(DEFAULT_TWILIGHT_DIMNESS).unwrap_or_default(),
            night: DimnessPercent::new(DEFAULT_NIGHT_DIMNESS).unwrap_or_default(),
        }
    }
}

/// Everything the resolver needs besides the time itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlaySettings {
    pub tiers: DimnessTiers,
    pub tint: Tint,
    /// Width of each twilight band, in minutes.
    pub twilight_duration: u64,
}

impl OverlaySettings {
    /// Width of one twilight band as a fraction of the cycle.
    pub fn twilight_width(&self) -> f64 {
        self.twilight_duration as f64 / MINUTES_PER_DAY
    }
}

impl Default for OverlaySettings {
    fn default() -> Self {
        Self {
            tiers: DimnessTiers::default(),
            tint: Tint::BLACK,
            twilight_duration: DEFAULT_TWILIGHT_DURATION,
        }
    }
}

/// Outcome of one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution {
    pub reading: CycleReading,
    pub phase: DayPhase,
    pub color: OverlayColor,
}

/// Stateless resolver from cycle readings to overlay colors.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OverlayColorResolver {
    settings: OverlaySettings,
}

impl OverlayColorResolver {
    pub fn new(settings: OverlaySettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &OverlaySettings {
        &self.settings
    }

    /// Classify a reading against the day's sunrise and sunset.
    ///
    /// Sunrise comes from the reading's offset and the day length from
    /// `sun_times`. Day is `[sunrise, sunset)`. Twilight is
    /// `[sunrise - d, sunrise)` and `[sunset, sunset + d]`, so sunset itself is
    /// the first twilight instant. Overlapping bands (very short nights)
    /// resolve to twilight.
    pub fn classify(&self, reading: CycleReading, sun_times: SunTimes) -> DayPhase {
        let mut since_sunrise = reading.since_sunrise();
        // Rounding can land sunrise just below the wrap point
        if since_sunrise >= 1.0 - BOUNDARY_EPSILON {
            since_sunrise = 0.0;
        }
        let day_span = sun_times.day_span();

        if since_sunrise < day_span - BOUNDARY_EPSILON {
            return DayPhase::Day;
        }

        let width = self.settings.twilight_width();
        if width > 0.0 {
            let after_sunset = since_sunrise <= day_span + width + BOUNDARY_EPSILON;
            let before_sunrise = since_sunrise >= 1.0 - width - BOUNDARY_EPSILON;
            if after_sunset || before_sunrise {
                return DayPhase::Twilight;
            }
        }

        DayPhase::Night
    }

    /// The color shown throughout a tier.
    pub fn tier_color(&self, phase: DayPhase) -> OverlayColor {
        let dimness = self.settings.tiers.for_phase(phase);
        OverlayColor::tinted(self.settings.tint, overlay_alpha(dimness))
    }

    /// Resolve the overlay color for a reading.
    ///
    /// Total over all inputs: missing sun data yields
    /// [`OverlayColor::TRANSPARENT`].
    pub fn resolve(&self, reading: CycleReading, sun: SunData) -> OverlayColor {
        self.resolve_phase(reading, sun).1
    }

    fn resolve_phase(&self, reading: CycleReading, sun: SunData) -> (DayPhase, OverlayColor) {
        match sun {
            SunData::Known(times) => {
                let phase = self.classify(reading, times);
                (phase, self.tier_color(phase))
            }
            SunData::Unavailable => (DayPhase::Day, OverlayColor::TRANSPARENT),
        }
    }

    /// Read the clock at `now` and resolve the color in one step.
    pub fn resolve_at<Tz: TimeZone>(&self, sun: SunData, now: &DateTime<Tz>) -> Resolution {
        let reading = match sun {
            SunData::Known(times) => CycleClock::new(times).reading_at(now),
            SunData::Unavailable => CycleReading::default(),
        };
        let (phase, color) = self.resolve_phase(reading, sun);
        Resolution {
            reading,
            phase,
            color,
        }
    }
}
