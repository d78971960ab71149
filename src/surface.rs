//! The full-screen overlay the resolved colors are applied to.
//!
//! Drawing is platform specific, so the daemon only talks to an
//! [`OverlaySurface`]. [`TerminalSurface`] is the built-in implementation and
//! reports every change through the logger.

use anyhow::Result;
use chrono::{DateTime, TimeZone};

use crate::cycle_clock::SunData;
use crate::logger::Log;
use crate::overlay::{OverlayColor, OverlayColorResolver, Resolution};
use crate::state::StateStore;

#[cfg_attr(test, mockall::automock)]
pub trait OverlaySurface {
    /// Show `color` over the whole screen.
    fn apply(&mut self, color: OverlayColor) -> Result<()>;

    /// Remove the overlay entirely.
    fn clear(&mut self) -> Result<()>;

    /// The color currently shown, if any.
    fn current(&self) -> Option<OverlayColor>;
}

/// Surface that prints color changes instead of drawing them.
#[derive(Debug, Default)]
pub struct TerminalSurface {
    current: Option<OverlayColor>,
}

impl TerminalSurface {
    pub fn new() -> Self {
        Self::default()
    }
}

impl OverlaySurface for TerminalSurface {
    fn apply(&mut self, color: OverlayColor) -> Result<()> {
        Log::log_decorated(&format!("Overlay color: {}", color));
        self.current = Some(color);
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        if self.current.is_some() {
            Log::log_decorated("Overlay cleared");
        }
        self.current = None;
        Ok(())
    }

    fn current(&self) -> Option<OverlayColor> {
        self.current
    }
}

/// Result of one scheduled update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickOutcome {
    pub resolution: Resolution,
    /// Whether the surface was touched.
    pub changed: bool,
}

/// Resolve the color for `now`, apply it if it differs from what the surface
/// shows and remember it in `store`.
///
/// A failure to persist is only reported; the surface is what matters.
pub fn apply_tick<S, Tz>(
    surface: &mut S,
    resolver: &OverlayColorResolver,
    sun: SunData,
    now: &DateTime<Tz>,
    store: Option<&StateStore>,
) -> Result<TickOutcome>
where
    S: OverlaySurface + ?Sized,
    Tz: TimeZone,
{
    let resolution = resolver.resolve_at(sun, now);

    if surface.current() == Some(resolution.color) {
        return Ok(TickOutcome {
            resolution,
            changed: false,
        });
    }

    surface.apply(resolution.color)?;
    Log::log_debug(&format!(
        "Applied {} ({} tier)",
        resolution.color, resolution.phase
    ));

    if let Some(store) = store {
        if let Err(e) = store.save(resolution.color) {
            Log::log_warning(&format!("Could not save overlay state: {}", e));
        }
    }

    Ok(TickOutcome {
        resolution,
        changed: true,
    })
}

/// Put the last saved color back on the surface, if there is one.
pub fn restore_last_color<S: OverlaySurface + ?Sized>(
    surface: &mut S,
    store: &StateStore,
) -> Result<Option<OverlayColor>> {
    let Some(color) = store.load()? else {
        return Ok(None);
    };
    surface.apply(color)?;
    Ok(Some(color))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cycle_clock::SunTimes;
    use crate::overlay::DayPhase;
    use chrono::{NaiveTime, Utc};
    use mockall::predicate::eq;
    use tempfile::tempdir;

    fn standard_sun() -> SunData {
        SunData::Known(SunTimes::new(
            NaiveTime::from_hms_opt(6, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
        ))
    }

    #[test]
    fn test_tick_applies_new_color() {
        let resolver = OverlayColorResolver::default();
        let night = resolver.tier_color(DayPhase::Night);

        let mut surface = MockOverlaySurface::new();
        surface.expect_current().return_const(None::<OverlayColor>);
        surface
            .expect_apply()
            .with(eq(night))
            .times(1)
            .returning(|_| Ok(()));

        let now = Utc.with_ymd_and_hms(2024, 3, 1, 23, 0, 0).unwrap();
        let outcome = apply_tick(&mut surface, &resolver, standard_sun(), &now, None).unwrap();
        assert!(outcome.changed);
        assert_eq!(outcome.resolution.phase, DayPhase::Night);
    }

    #[test]
    fn test_tick_skips_unchanged_color() {
        let resolver = OverlayColorResolver::default();
        let day = resolver.tier_color(DayPhase::Day);

        let mut surface = MockOverlaySurface::new();
        surface.expect_current().return_const(Some(day));
        surface.expect_apply().never();

        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let outcome = apply_tick(&mut surface, &resolver, standard_sun(), &now, None).unwrap();
        assert!(!outcome.changed);
    }

    #[test]
    fn test_tick_propagates_surface_errors() {
        let mut surface = MockOverlaySurface::new();
        surface.expect_current().return_const(None::<OverlayColor>);
        surface
            .expect_apply()
            .returning(|_| Err(anyhow::anyhow!("surface gone")));

        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let result = apply_tick(
            &mut surface,
            &OverlayColorResolver::default(),
            standard_sun(),
            &now,
            None,
        );
        assert!(result.unwrap_err().to_string().contains("surface gone"));
    }

    #[test]
    fn test_tick_persists_and_restores() {
        let dir = tempdir().unwrap();
        let store = StateStore::new(dir.path().join("state.toml"));
        let resolver = OverlayColorResolver::default();

        let mut surface = TerminalSurface::new();
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 18, 0, 0).unwrap();
        let outcome =
            apply_tick(&mut surface, &resolver, standard_sun(), &now, Some(&store)).unwrap();
        assert_eq!(outcome.resolution.phase, DayPhase::Twilight);
        assert_eq!(store.load().unwrap(), Some(outcome.resolution.color));

        let mut fresh = TerminalSurface::new();
        let restored = restore_last_color(&mut fresh, &store).unwrap();
        assert_eq!(restored, Some(outcome.resolution.color));
        assert_eq!(fresh.current(), restored);
    }

    #[test]
    fn test_unavailable_sun_data_clears_overlay() {
        let mut surface = TerminalSurface::new();
        surface.apply(OverlayColor::new(200, 0, 0, 0)).unwrap();

        let now = Utc.with_ymd_and_hms(2024, 3, 1, 23, 0, 0).unwrap();
        let outcome = apply_tick(
            &mut surface,
            &OverlayColorResolver::default(),
            SunData::Unavailable,
            &now,
            None,
        )
        .unwrap();
        assert!(outcome.changed);
        assert_eq!(surface.current(), Some(OverlayColor::TRANSPARENT));

        surface.clear().unwrap();
        assert_eq!(surface.current(), None);
    }
}
