//! # Lightly
//!
//! Screen dimming that follows the sun.
//!
//! Lightly maps the current time onto the day's sun cycle and darkens the
//! screen with a full-screen overlay whose strength depends on whether it is
//! day, twilight or night. The same cycle drives a small diagram of the sun's
//! path across the day.
//!
//! ## Architecture
//!
//! Pure engine, no I/O:
//!
//! - **cycle_clock**: time of day and sunrise as fractions of the cycle
//! - **curve**: sampled sun path for the diagram
//! - **phase**: which sun icon belongs to the current position
//! - **dimness**: perceptual dimness curve
//! - **overlay**: overlay color for the current tier
//! - **diagram**: full diagram geometry
//!
//! Around it:
//!
//! - **config**: configuration loading, validation and default generation
//! - **sun_source**: sunrise and sunset from coordinates or manual times
//! - **state**: last applied color on disk
//! - **surface**: the overlay being drawn on
//! - **logger**: structured terminal output

pub mod config;
pub mod constants;
pub mod curve;
pub mod cycle_clock;
pub mod diagram;
pub mod dimness;
pub mod logger;
pub mod overlay;
pub mod phase;
pub mod state;
pub mod sun_source;
pub mod surface;
pub mod utils;

pub use config::Config;
pub use cycle_clock::{CycleClock, CycleOffset, CyclePosition, CycleReading, SunData, SunTimes};
pub use dimness::{DimnessPercent, overlay_alpha, transmission_alpha};
pub use logger::{Log, LogLevel};
pub use overlay::{DayPhase, OverlayColor, OverlayColorResolver, OverlaySettings, Tint};
pub use phase::{select_phase, select_phase_index};
pub use surface::{OverlaySurface, TerminalSurface, apply_tick};
