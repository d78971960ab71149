//! Discretized sun path for the cycle diagram.
//!
//! The sun's height over the day is drawn as a single sinusoid,
//! `y = -sin(2π·t - 2π·offset)`, shifted so that it crosses the center line
//! going up at sunrise. Canvas coordinates grow downward, hence the sign.

use anyhow::{Result, bail};
use std::f64::consts::TAU;

use crate::constants::PATH_HEIGHT_SCALE;
use crate::cycle_clock::CycleOffset;

/// Unscaled curve value at `position` for a cycle shifted by `offset`.
///
/// Shared by the path sampler and the sun marker so both always agree.
pub fn curve_height(position: f64, offset: CycleOffset) -> f64 {
    -(position * TAU - offset.horizontal() * TAU).sin()
}

/// One sample of the path, in pixels relative to the vertical center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathPoint {
    pub x: f64,
    pub y: f64,
}

/// Ordered samples of one full horizontal sweep of the curve.
#[derive(Debug, Clone, PartialEq)]
pub struct SampledPath {
    points: Vec<PathPoint>,
}

impl SampledPath {
    pub fn points(&self) -> &[PathPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<&PathPoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&PathPoint> {
        self.points.last()
    }
}

/// Reject canvas dimensions that would turn into NaN geometry.
pub(crate) fn validate_canvas(width: f64, height: f64) -> Result<()> {
    if !width.is_finite() || width < 0.0 {
        bail!("Canvas width must be a finite, non-negative number (got {})", width);
    }
    if !height.is_finite() || height < 0.0 {
        bail!("Canvas height must be a finite, non-negative number (got {})", height);
    }
    Ok(())
}

/// Sample the curve across the whole canvas width.
///
/// Produces `iterations + 1` points. Point `i` sits at
/// `x = (i / iterations) · width` and
/// `y = curve_height(i / iterations) · PATH_HEIGHT_SCALE · height / 2`.
/// The first point goes through the same formula as the others.
///
/// # Errors
/// Fails on negative or non-finite canvas dimensions and on a zero
/// iteration count.
pub fn sample_path(
    offset: CycleOffset,
    width: f64,
    height: f64,
    iterations: usize,
) -> Result<SampledPath> {
    validate_canvas(width, height)?;
    if iterations == 0 {
        bail!("Path needs at least one iteration");
    }

    let half_height = height / 2.0;
    let points = (0..=iterations)
        .map(|i| {
            let percent = i as f64 / iterations as f64;
            PathPoint {
                x: percent * width,
                y: curve_height(percent, offset) * PATH_HEIGHT_SCALE * half_height,
            }
        })
        .collect();

    Ok(SampledPath { points })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::PATH_ITERATIONS;

    const EPSILON: f64 = 1e-9;

    #[test]
    fn test_small_path_matches_formula() {
        let path = sample_path(CycleOffset::new(0.0).unwrap(), 360.0, 100.0, 4).unwrap();
        let points = path.points();
        assert_eq!(points.len(), 5);

        assert_eq!(points[0], PathPoint { x: 0.0, y: 0.0 });

        // Quarter cycle: peak of the sun, drawn upward
        assert!((points[1].x - 90.0).abs() < EPSILON);
        assert!((points[1].y + 40.0).abs() < EPSILON);

        assert!((points[2].x - 180.0).abs() < EPSILON);
        assert!(points[2].y.abs() < EPSILON);

        assert!((points[3].y - 40.0).abs() < EPSILON);
        assert!((points[4].x - 360.0).abs() < EPSILON);
    }

    #[test]
    fn test_default_iteration_count() {
        let path = sample_path(CycleOffset::default(), 1080.0, 339.0, PATH_ITERATIONS).unwrap();
        assert_eq!(path.len(), PATH_ITERATIONS + 1);
        assert_eq!(path.last().unwrap().x, 1080.0);
    }

    #[test]
    fn test_first_point_uses_offset() {
        // Sunrise at 06:00: at midnight the sun is a quarter cycle below the line
        let path = sample_path(CycleOffset::new(0.25).unwrap(), 400.0, 200.0, 100).unwrap();
        let first = path.first().unwrap();
        assert_eq!(first.x, 0.0);
        assert!((first.y - PATH_HEIGHT_SCALE * 100.0).abs() < EPSILON);
    }

    #[test]
    fn test_sampling_is_deterministic() {
        let offset = CycleOffset::new(0.3141).unwrap();
        let a = sample_path(offset, 720.0, 226.0, 100).unwrap();
        let b = sample_path(offset, 720.0, 226.0, 100).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_rejects_invalid_canvas() {
        let offset = CycleOffset::default();
        assert!(sample_path(offset, -1.0, 100.0, 10).is_err());
        assert!(sample_path(offset, 100.0, f64::NAN, 10).is_err());
        assert!(sample_path(offset, f64::INFINITY, 100.0, 10).is_err());
        assert!(
            sample_path(offset, 100.0, 100.0, 0)
                .unwrap_err()
                .to_string()
                .contains("at least one iteration")
        );
    }

    #[test]
    fn test_zero_sized_canvas_is_flat() {
        let path = sample_path(CycleOffset::default(), 0.0, 0.0, 10).unwrap();
        assert!(path.points().iter().all(|p| p.x == 0.0 && p.y == 0.0));
    }
}
