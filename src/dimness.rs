//! Perceptual response curve for the dimming overlay.
//!
//! The user picks a dimness between 0 and 100 percent. Linear alpha steps look
//! very uneven to the eye, so the percentage is shaped exponentially:
//!
//! ```text
//! transmission = 255 - round(255 · e^(4 · percent/100 - 4))
//! ```
//!
//! `transmission` is how much light the overlay lets through: 250 at 0%,
//! 0 at 100%. The overlay's own alpha is its complement, see
//! [`overlay_alpha`].

use anyhow::{Result, bail};

use crate::constants::{ALPHA_MAX, DIMNESS_CURVE_GAIN, MAXIMUM_DIMNESS, MINIMUM_DIMNESS};

/// Dimness requested by the user, always within [0, 100].
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct DimnessPercent(f64);

impl DimnessPercent {
    pub const NONE: DimnessPercent = DimnessPercent(MINIMUM_DIMNESS);
    pub const FULL: DimnessPercent = DimnessPercent(MAXIMUM_DIMNESS);

    /// Clamp any finite value into [0, 100].
    ///
    /// # Errors
    /// NaN and infinities are rejected.
    pub fn new(percent: f64) -> Result<Self> {
        if !percent.is_finite() {
            bail!("Dimness must be a finite percentage (got {})", percent);
        }
        Ok(Self(percent.clamp(MINIMUM_DIMNESS, MAXIMUM_DIMNESS)))
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

/// Exponentially shaped light transmission for a dimness, in [0, 255].
///
/// Monotonically non-increasing in `percent`.
pub fn transmission_alpha(percent: DimnessPercent) -> u8 {
    let fraction = percent.value() / 100.0;
    let shaped = (ALPHA_MAX * (DIMNESS_CURVE_GAIN * fraction - DIMNESS_CURVE_GAIN).exp()).round();
    (ALPHA_MAX - shaped).clamp(0.0, ALPHA_MAX) as u8
}

/// Alpha of the darkening layer for a dimness: `255 - transmission_alpha`.
pub fn overlay_alpha(percent: DimnessPercent) -> u8 {
    u8::MAX - transmission_alpha(percent)
}
