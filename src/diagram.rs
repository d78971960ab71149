//! Geometry of the sun-cycle diagram.
//!
//! The diagram shows the sun path across the full width of a canvas, a
//! horizontal divider marking the twilight height and the sun itself at the
//! current position. All `y` values are relative to the vertical center of the
//! canvas and grow downward.

use anyhow::{Result, bail};
use std::f64::consts::TAU;

use crate::constants::{
    DEFAULT_CYCLE_OFFSET, DEFAULT_SUN_POSITION, DEFAULT_TWILIGHT_LEVEL, DIVIDER_POINT_HEIGHT,
    MINUTES_PER_DAY, PATH_HEIGHT_SCALE, PATH_ITERATIONS, SUN_MARKER_RADIUS, VIEW_HEIGHT_RATIO,
};
use crate::curve::{PathPoint, SampledPath, curve_height, sample_path, validate_canvas};
use crate::cycle_clock::{CycleOffset, CyclePosition};
use crate::phase::select_phase_index;

/// Height of the twilight divider as a fraction of the curve amplitude.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct TwilightLevel(f64);

impl TwilightLevel {
    /// Clamp a finite level into [0, 1].
    pub fn new(level: f64) -> Result<Self> {
        if !level.is_finite() {
            bail!("Twilight level must be finite (got {})", level);
        }
        Ok(Self(level.clamp(0.0, 1.0)))
    }

    /// Curve height reached at the far edge of a twilight band.
    ///
    /// `width` is the band as a fraction of the cycle. A quarter cycle or
    /// more puts the divider at the top of the curve.
    pub fn from_band(width: f64) -> Result<Self> {
        if !width.is_finite() || width < 0.0 {
            bail!("Twilight band must be finite and non-negative (got {})", width);
        }
        Self::new((width.min(0.25) * TAU).sin())
    }

    /// Level for a twilight band of `minutes` next to sunrise.
    pub fn from_duration(minutes: u64) -> Self {
        Self::from_band(minutes as f64 / MINUTES_PER_DAY).unwrap_or_default()
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl Default for TwilightLevel {
    fn default() -> Self {
        Self(DEFAULT_TWILIGHT_LEVEL)
    }
}

/// What to draw at the sun's position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SunMarker {
    /// Index into the caller's icon set.
    Icon(usize),
    /// Plain filled circle, used when there are no icons.
    Circle { radius: f64 },
}

impl SunMarker {
    pub fn choose(icon_count: usize, offset: CycleOffset, position: CyclePosition) -> Self {
        match select_phase_index(icon_count, offset, position) {
            Some(index) => SunMarker::Icon(index),
            None => SunMarker::Circle {
                radius: SUN_MARKER_RADIUS,
            },
        }
    }
}

/// Horizontal twilight line plus the short vertical tick at its middle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Divider {
    pub start: PathPoint,
    pub end: PathPoint,
    pub tick_top: PathPoint,
    pub tick_bottom: PathPoint,
}

/// Everything needed to draw one frame of the diagram.
#[derive(Debug, Clone, PartialEq)]
pub struct DiagramGeometry {
    pub path: SampledPath,
    pub sun_center: PathPoint,
    pub divider: Divider,
    pub width: f64,
    pub height: f64,
}

impl DiagramGeometry {
    pub fn compute(
        position: CyclePosition,
        offset: CycleOffset,
        twilight: TwilightLevel,
        width: f64,
        height: f64,
        iterations: usize,
    ) -> Result<Self> {
        validate_canvas(width, height)?;
        let path = sample_path(offset, width, height, iterations)?;

        let amplitude = PATH_HEIGHT_SCALE * height / 2.0;
        let sun_center = PathPoint {
            x: position.horizontal() * width,
            y: curve_height(position.horizontal(), offset) * amplitude,
        };

        let divider_y = -twilight.value() * amplitude;
        let middle = width / 2.0;
        let half_tick = DIVIDER_POINT_HEIGHT / 2.0;
        let divider = Divider {
            start: PathPoint { x: 0.0, y: divider_y },
            end: PathPoint {
                x: width,
                y: divider_y,
            },
            tick_top: PathPoint {
                x: middle,
                y: divider_y - half_tick,
            },
            tick_bottom: PathPoint {
                x: middle,
                y: divider_y + half_tick,
            },
        };

        Ok(Self {
            path,
            sun_center,
            divider,
            width,
            height,
        })
    }

    /// Frame drawn before any sun data has arrived.
    pub fn placeholder(width: f64, height: f64) -> Result<Self> {
        Self::compute(
            CyclePosition::new(DEFAULT_SUN_POSITION)?,
            CycleOffset::new(DEFAULT_CYCLE_OFFSET)?,
            TwilightLevel::default(),
            width,
            height,
            PATH_ITERATIONS,
        )
    }

    /// Whether the sun sits above the twilight divider.
    pub fn sun_above_divider(&self) -> bool {
        self.sun_center.y < self.divider.start.y
    }
}

/// View height for a given width, keeping the diagram's aspect ratio.
pub fn measured_height(width: u32) -> u32 {
    (f64::from(width) * VIEW_HEIGHT_RATIO).floor() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn position(value: f64) -> CyclePosition {
        CyclePosition::new(value).unwrap()
    }

    fn offset(value: f64) -> CycleOffset {
        CycleOffset::new(value).unwrap()
    }

    #[test]
    fn test_sun_at_noon_is_at_top_of_curve() {
        let geometry = DiagramGeometry::compute(
            position(0.5),
            offset(0.25),
            TwilightLevel::default(),
            1000.0,
            400.0,
            PATH_ITERATIONS,
        )
        .unwrap();

        assert!((geometry.sun_center.x - 500.0).abs() < EPSILON);
        assert!((geometry.sun_center.y + 160.0).abs() < EPSILON);
        assert!(geometry.sun_above_divider());
    }

    #[test]
    fn test_sun_marker_lies_on_path() {
        let geometry = DiagramGeometry::compute(
            position(0.5),
            offset(0.3),
            TwilightLevel::default(),
            800.0,
            300.0,
            100,
        )
        .unwrap();
        let on_path = geometry.path.points()[50];
        assert!((on_path.x - geometry.sun_center.x).abs() < EPSILON);
        assert!((on_path.y - geometry.sun_center.y).abs() < EPSILON);
    }

    #[test]
    fn test_divider_and_tick() {
        let geometry = DiagramGeometry::compute(
            position(0.0),
            offset(0.25),
            TwilightLevel::new(0.5).unwrap(),
            600.0,
            200.0,
            10,
        )
        .unwrap();

        let divider = geometry.divider;
        assert!((divider.start.y + 40.0).abs() < EPSILON);
        assert_eq!(divider.start.x, 0.0);
        assert_eq!(divider.end.x, 600.0);
        assert_eq!(divider.start.y, divider.end.y);
        assert_eq!(divider.tick_top.x, 300.0);
        assert!((divider.tick_top.y - (divider.start.y - 10.0)).abs() < EPSILON);
        assert!((divider.tick_bottom.y - (divider.start.y + 10.0)).abs() < EPSILON);
    }

    #[test]
    fn test_midnight_sun_below_divider() {
        let geometry = DiagramGeometry::compute(
            position(0.0),
            offset(0.25),
            TwilightLevel::default(),
            600.0,
            200.0,
            10,
        )
        .unwrap();
        assert!(!geometry.sun_above_divider());
    }

    #[test]
    fn test_placeholder_frame() {
        let geometry = DiagramGeometry::placeholder(1080.0, 339.0).unwrap();
        assert_eq!(geometry.path.len(), PATH_ITERATIONS + 1);
        assert!((geometry.sun_center.x - 540.0).abs() < EPSILON);
    }

    #[test]
    fn test_invalid_canvas_is_rejected() {
        assert!(DiagramGeometry::placeholder(-5.0, 100.0).is_err());
        assert!(DiagramGeometry::placeholder(100.0, f64::NAN).is_err());
    }

    #[test]
    fn test_twilight_level_from_band() {
        assert_eq!(TwilightLevel::from_band(0.0).unwrap().value(), 0.0);
        assert!((TwilightLevel::from_band(0.25).unwrap().value() - 1.0).abs() < EPSILON);
        assert!((TwilightLevel::from_band(0.4).unwrap().value() - 1.0).abs() < EPSILON);
        assert!(TwilightLevel::from_band(-0.1).is_err());

        // 60 minute band: sin(2π/24)
        let level = TwilightLevel::from_duration(60).value();
        assert!((level - (TAU / 24.0).sin()).abs() < EPSILON);
    }

    #[test]
    fn test_twilight_level_is_clamped() {
        assert_eq!(TwilightLevel::new(1.5).unwrap().value(), 1.0);
        assert_eq!(TwilightLevel::new(-0.5).unwrap().value(), 0.0);
        assert!(TwilightLevel::new(f64::NAN).is_err());
    }

    #[test]
    fn test_sun_marker_choice() {
        assert_eq!(
            SunMarker::choose(0, offset(0.25), position(0.5)),
            SunMarker::Circle { radius: 22.0 }
        );
        assert_eq!(SunMarker::choose(2, offset(0.25), position(0.25)), SunMarker::Icon(0));
        assert_eq!(SunMarker::choose(2, offset(0.25), position(0.75)), SunMarker::Icon(1));
    }

    #[test]
    fn test_measured_height() {
        assert_eq!(measured_height(1080), 339);
        assert_eq!(measured_height(1000), 314);
        assert_eq!(measured_height(0), 0);
    }
}
