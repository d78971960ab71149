use chrono::{NaiveTime, TimeZone, Utc};
use proptest::prelude::*;

use lightly::constants::{PATH_HEIGHT_SCALE, SECONDS_PER_DAY};
use lightly::curve::sample_path;
use lightly::cycle_clock::{CycleClock, CycleOffset, CyclePosition, SunData, SunTimes};
use lightly::dimness::{DimnessPercent, overlay_alpha, transmission_alpha};
use lightly::overlay::{DayPhase, OverlayColorResolver, OverlaySettings};
use lightly::phase::select_phase_index;

fn time_from_seconds(seconds: u32) -> NaiveTime {
    NaiveTime::from_num_seconds_from_midnight_opt(seconds % 86_400, 0).unwrap()
}

proptest! {
    #[test]
    fn position_is_always_normalized(value in -1.0e6f64..1.0e6) {
        let position = CyclePosition::new(value).unwrap();
        prop_assert!((0.0..1.0).contains(&position.horizontal()));
    }

    #[test]
    fn readings_repeat_every_day(seconds in 0.0f64..(10.0 * SECONDS_PER_DAY), sunrise in 0u32..86_400) {
        let clock = CycleClock::new(SunTimes::new(
            time_from_seconds(sunrise),
            time_from_seconds(sunrise + 43_200),
        ));
        let today = clock.reading_after(seconds).unwrap();
        let tomorrow = clock.reading_after(seconds + SECONDS_PER_DAY).unwrap();

        let drift = (today.position.horizontal() - tomorrow.position.horizontal()).abs();
        // Either equal, or split across the wrap point by rounding
        prop_assert!(drift < 1e-9 || (1.0 - drift) < 1e-9);
        prop_assert_eq!(today.offset, tomorrow.offset);
    }

    #[test]
    fn transmission_never_rises_with_dimness(a in 0.0f64..100.0, b in 0.0f64..100.0) {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        let low_t = transmission_alpha(DimnessPercent::new(low).unwrap());
        let high_t = transmission_alpha(DimnessPercent::new(high).unwrap());
        prop_assert!(high_t <= low_t);
    }

    #[test]
    fn overlay_alpha_stays_in_range(percent in -50.0f64..150.0) {
        let alpha = overlay_alpha(DimnessPercent::new(percent).unwrap());
        prop_assert!((5..=255).contains(&alpha));
    }

    #[test]
    fn phase_index_is_in_range(
        count in 1usize..16,
        offset in 0.0f64..1.0,
        position in 0.0f64..1.0,
    ) {
        let index = select_phase_index(
            count,
            CycleOffset::new(offset).unwrap(),
            CyclePosition::new(position).unwrap(),
        );
        prop_assert!(matches!(index, Some(i) if i < count));
    }

    #[test]
    fn sampled_path_fits_canvas(
        offset in 0.0f64..1.0,
        width in 0.0f64..4000.0,
        height in 0.0f64..2000.0,
        iterations in 1usize..400,
    ) {
        let path = sample_path(CycleOffset::new(offset).unwrap(), width, height, iterations).unwrap();
        prop_assert_eq!(path.len(), iterations + 1);

        let limit = PATH_HEIGHT_SCALE * height / 2.0 + 1e-9;
        let mut previous_x = -1.0;
        for point in path.points() {
            prop_assert!(point.x >= previous_x);
            prop_assert!(point.y.abs() <= limit);
            previous_x = point.x;
        }
    }

    #[test]
    fn resolver_is_deterministic_and_uses_tier_colors(
        sunrise in 0u32..86_400,
        day_length in 60u32..86_340,
        now in 0i64..86_400,
    ) {
        let sun = SunData::Known(SunTimes::new(
            time_from_seconds(sunrise),
            time_from_seconds(sunrise + day_length),
        ));
        let resolver = OverlayColorResolver::new(OverlaySettings::default());
        let instant = Utc.timestamp_opt(1_700_000_000 - 1_700_000_000 % 86_400 + now, 0).unwrap();

        let first = resolver.resolve_at(sun, &instant);
        let second = resolver.resolve_at(sun, &instant);
        prop_assert_eq!(first, second);

        let tiers = [DayPhase::Day, DayPhase::Twilight, DayPhase::Night]
            .map(|phase| resolver.tier_color(phase));
        prop_assert!(tiers.contains(&first.color));
        prop_assert_eq!(first.color, resolver.tier_color(first.phase));
    }
}
