//! Application constants and default values for lightly.
//!
//! This module contains the configuration defaults, validation limits,
//! and the geometric constants of the sun-cycle diagram used throughout
//! the application.

// ═══ Application Configuration Defaults ═══
// These values are used when config options are not specified by the user

pub const DEFAULT_DAY_DIMNESS: f64 = 0.0; // percent - practically no overlay during the day
pub const DEFAULT_SUNRISE: &str = "06:00:00"; // manual times written to a new config
pub const DEFAULT_SUNSET: &str = "18:00:00";
pub const DEFAULT_TWILIGHT_DIMNESS: f64 = 40.0; // percent - noticeable but light
pub const DEFAULT_NIGHT_DIMNESS: f64 = 70.0; // percent - darkest configured tier
pub const DEFAULT_TWILIGHT_DURATION: u64 = 60; // minutes - band before sunrise and after sunset
pub const DEFAULT_UPDATE_INTERVAL: u64 = 60; // seconds between overlay ticks
pub const DEFAULT_TINT: &str = "#000000"; // pure black overlay
pub const DEFAULT_ACCENT_COLOR: &str = "#009688"; // teal, used for the diagram path and sun

// ═══ Validation Limits ═══
// These limits ensure user inputs are within reasonable and safe ranges

pub const MINIMUM_DIMNESS: f64 = 0.0; // no dimming
pub const MAXIMUM_DIMNESS: f64 = 100.0; // maximal dimming

pub const MINIMUM_TWILIGHT_DURATION: u64 = 0; // minutes (no twilight tier at all)
pub const MAXIMUM_TWILIGHT_DURATION: u64 = 240; // minutes (4 hours)

pub const MINIMUM_UPDATE_INTERVAL: u64 = 10; // seconds (prevents needless wakeups)
pub const MAXIMUM_UPDATE_INTERVAL: u64 = 300; // seconds (5 minutes max for responsive tiers)

// Solar calculations get unreliable close to the poles
pub const MAXIMUM_LATITUDE: f64 = 65.0;
pub const MAXIMUM_VALID_LATITUDE: f64 = 90.0;
pub const MAXIMUM_VALID_LONGITUDE: f64 = 180.0;

// ═══ Cycle Constants ═══

pub const SECONDS_PER_DAY: f64 = 86_400.0;
pub const MINUTES_PER_DAY: f64 = 1_440.0;

// Smallest sunrise→sunset span the clock accepts (one minute of the cycle).
// Identical sunrise and sunset times are widened to this.
pub const MINIMUM_DAY_SEPARATION: f64 = 1.0 / MINUTES_PER_DAY;

// ═══ Dimness Curve Constants ═══
// alpha = 255 - round(255 * e^(GAIN * percent/100 - GAIN))
//
// The exponential shaping keeps perceived darkness roughly linear in the
// configured percentage.

pub const DIMNESS_CURVE_GAIN: f64 = 4.0;
pub const ALPHA_MAX: f64 = 255.0;

// ═══ Diagram Constants ═══
// Geometry of the sun-cycle diagram, in pixels unless stated otherwise

pub const PATH_ITERATIONS: usize = 100; // samples per sweep (path holds one more point)
pub const PATH_HEIGHT_SCALE: f64 = 0.80; // vertical amplitude relative to half the canvas
pub const VIEW_HEIGHT_RATIO: f64 = 0.314; // measured view height relative to its width
pub const DIVIDER_POINT_HEIGHT: f64 = 20.0; // tick drawn across the twilight divider
pub const SUN_MARKER_RADIUS: f64 = 22.0; // plain circle used when no icons are supplied

// Values a freshly created diagram shows before the first reading arrives
pub const DEFAULT_SUN_POSITION: f64 = 0.5;
pub const DEFAULT_CYCLE_OFFSET: f64 = 0.25;
pub const DEFAULT_TWILIGHT_LEVEL: f64 = 0.5;

// ═══ Operational Timing Constants ═══

pub const CHECK_INTERVAL_SECS: u64 = 1; // How often to check the running flag during sleep
pub const SLEEP_DETECTION_THRESHOLD_SECS: u64 = 300; // 5 minutes - detect system sleep/resume

// ═══ Exit Codes ═══

pub const EXIT_FAILURE: i32 = 1; // General failure
