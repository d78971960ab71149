//! Selection of the sun icon for the current point of the cycle.
//!
//! A caller supplies an ordered set of N icons describing the cycle from
//! sunrise onward, for example `[sun, moon]` or
//! `[sunrise, sun, sunset, moon]`. Each icon owns an equal window of `1/N` of
//! the cycle. The windows are shifted back by half a window so that icon 0 is
//! centered on sunrise rather than starting there.

use crate::cycle_clock::{CycleOffset, CyclePosition};

/// Map a raw window index onto `[0, count - 1]`.
///
/// Values past either end are clamped, not wrapped. Rounding can push the
/// index to exactly `count` at the cycle seam; that case resolves to the last
/// icon.
fn clamp_phase_index(raw: f64, count: usize) -> usize {
    if raw <= 0.0 {
        return 0;
    }

    let index = raw as usize;
    index.min(count - 1)
}

/// Index of the icon whose window contains `position`.
///
/// `progress = (position - offset + 1/(2N) + 1) mod 1` and
/// `index = floor(progress · N)`, clamped into `[0, N - 1]`.
/// Returns `None` for an empty icon set.
pub fn select_phase_index(
    count: usize,
    offset: CycleOffset,
    position: CyclePosition,
) -> Option<usize> {
    if count == 0 {
        return None;
    }

    let window_shift = (1.0 / count as f64) / 2.0;
    let progress =
        (position.horizontal() - offset.horizontal() + window_shift + 1.0).rem_euclid(1.0);

    Some(clamp_phase_index((progress * count as f64).floor(), count))
}

/// The icon whose window contains `position`, or `None` if `icons` is empty.
pub fn select_phase<T>(icons: &[T], offset: CycleOffset, position: CyclePosition) -> Option<&T> {
    select_phase_index(icons.len(), offset, position).map(|index| &icons[index])
}
