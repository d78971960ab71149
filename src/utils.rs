//! Small helpers shared by the configuration layer and the binary.

use std::path::Path;

use crate::constants::SECONDS_PER_DAY;

/// Render a path with the home directory shortened to `~`.
pub fn path_for_display(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(rest) = path.strip_prefix(&home) {
            return format!("~/{}", rest.display());
        }
    }
    path.display().to_string()
}

/// Format a fraction of the day as `HH:MM:SS`.
///
/// Values outside [0, 1) are wrapped onto the cycle first.
///
/// # Examples
/// ```
/// use lightly::utils::format_fraction_as_time;
/// assert_eq!(format_fraction_as_time(0.5), "12:00:00");
/// assert_eq!(format_fraction_as_time(0.25), "06:00:00");
/// ```
pub fn format_fraction_as_time(fraction: f64) -> String {
    if !fraction.is_finite() {
        return "--:--:--".to_string();
    }
    let seconds = (fraction.rem_euclid(1.0) * SECONDS_PER_DAY).round() as u64 % 86_400;
    format!(
        "{:02}:{:02}:{:02}",
        seconds / 3600,
        (seconds % 3600) / 60,
        seconds % 60
    )
}
