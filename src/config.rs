//! Configuration loading and validation for lightly.
//!
//! Settings live in `lightly.toml` under the user's config directory
//! (`$XDG_CONFIG_HOME/lightly/lightly.toml` on Linux). A commented default file
//! is written the first time lightly runs.
//!
//! ```toml
//! #[Sun times]
//! sunrise = "06:00:00"        # Manual sunrise (HH:MM:SS)
//! sunset = "18:00:00"         # Manual sunset (HH:MM:SS)
//! latitude = 52.5200          # Optional, takes priority over manual times
//! longitude = 13.4050
//! timezone = "Europe/Berlin"  # Optional, defaults to the system zone
//!
//! #[Dimming]
//! day_dimness = 0             # Percent of darkening per tier (0-100)
//! twilight_dimness = 40
//! night_dimness = 70
//! twilight_duration = 60      # Minutes before sunrise and after sunset
//!
//! #[Appearance]
//! tint = "#000000"            # Overlay tint (#RRGGBB)
//! accent_color = "#009688"    # Diagram accent (#RRGGBB)
//! update_interval = 60        # Seconds between overlay updates
//! ```
//!
//! Every field is optional. Missing values fall back to the defaults in
//! [`crate::constants`]. Dimness values outside 0-100 are clamped with a
//! warning; all other out-of-range values are rejected.

use anyhow::{Context, Result, bail};
use chrono::NaiveTime;
use chrono_tz::Tz;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::*;
use crate::cycle_clock::SunTimes;
use crate::dimness::DimnessPercent;
use crate::logger::Log;
use crate::overlay::{DimnessTiers, OverlaySettings, Tint};
use crate::utils::path_for_display;

const TIME_FORMAT: &str = "%H:%M:%S";

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct Config {
    pub sunrise: Option<String>,
    pub sunset: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub timezone: Option<String>, // IANA name, e.g. "Europe/Berlin"
    pub day_dimness: Option<f64>,
    pub twilight_dimness: Option<f64>,
    pub night_dimness: Option<f64>,
    pub twilight_duration: Option<u64>, // minutes
    pub tint: Option<String>,
    pub update_interval: Option<u64>, // seconds
    pub accent_color: Option<String>,
}

impl Config {
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("Could not determine config directory")?;
        Ok(config_dir.join("lightly").join("lightly.toml"))
    }

    /// Write a commented default configuration to `path`.
    pub fn create_default_config(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let content = ConfigBuilder::new()
            .add_section("Sun times")
            .add_setting(
                "sunrise",
                &format!("\"{}\"", DEFAULT_SUNRISE),
                "Manual sunrise (HH:MM:SS)",
            )
            .add_setting(
                "sunset",
                &format!("\"{}\"", DEFAULT_SUNSET),
                "Manual sunset (HH:MM:SS)",
            )
            .add_section("Dimming")
            .add_setting(
                "day_dimness",
                &DEFAULT_DAY_DIMNESS.to_string(),
                "Darkening during the day (0-100%)",
            )
            .add_setting(
                "twilight_dimness",
                &DEFAULT_TWILIGHT_DIMNESS.to_string(),
                "Darkening around sunrise and sunset (0-100%)",
            )
            .add_setting(
                "night_dimness",
                &DEFAULT_NIGHT_DIMNESS.to_string(),
                "Darkening at night (0-100%)",
            )
            .add_setting(
                "twilight_duration",
                &DEFAULT_TWILIGHT_DURATION.to_string(),
                &format!(
                    "Twilight band in minutes ({}-{})",
                    MINIMUM_TWILIGHT_DURATION, MAXIMUM_TWILIGHT_DURATION
                ),
            )
            .add_section("Appearance")
            .add_setting(
                "tint",
                &format!("\"{}\"", DEFAULT_TINT),
                "Overlay tint (#RRGGBB)",
            )
            .add_setting(
                "accent_color",
                &format!("\"{}\"", DEFAULT_ACCENT_COLOR),
                "Diagram accent (#RRGGBB)",
            )
            .add_setting(
                "update_interval",
                &DEFAULT_UPDATE_INTERVAL.to_string(),
                &format!(
                    "Seconds between updates ({}-{})",
                    MINIMUM_UPDATE_INTERVAL, MAXIMUM_UPDATE_INTERVAL
                ),
            )
            .build();

        fs::write(path, content)
            .with_context(|| format!("Failed to write default config to {}", path.display()))?;

        Log::log_indented(&format!(
            "Created default configuration at {}",
            path_for_display(path)
        ));
        Ok(())
    }

    fn apply_defaults_and_validate_fields(config: &mut Config) -> Result<()> {
        config.day_dimness = Some(checked_dimness(
            "day_dimness",
            config.day_dimness,
            DEFAULT_DAY_DIMNESS,
        )?);
        config.twilight_dimness = Some(checked_dimness(
            "twilight_dimness",
            config.twilight_dimness,
            DEFAULT_TWILIGHT_DIMNESS,
        )?);
        config.night_dimness = Some(checked_dimness(
            "night_dimness",
            config.night_dimness,
            DEFAULT_NIGHT_DIMNESS,
        )?);

        let twilight_duration = config.twilight_duration.unwrap_or(DEFAULT_TWILIGHT_DURATION);
        if !(MINIMUM_TWILIGHT_DURATION..=MAXIMUM_TWILIGHT_DURATION).contains(&twilight_duration) {
            bail!(
                "Twilight duration ({} minutes) must be between {} and {} minutes",
                twilight_duration,
                MINIMUM_TWILIGHT_DURATION,
                MAXIMUM_TWILIGHT_DURATION
            );
        }
        config.twilight_duration = Some(twilight_duration);

        let update_interval = config.update_interval.unwrap_or(DEFAULT_UPDATE_INTERVAL);
        if !(MINIMUM_UPDATE_INTERVAL..=MAXIMUM_UPDATE_INTERVAL).contains(&update_interval) {
            bail!(
                "Update interval ({} seconds) must be between {} and {} seconds",
                update_interval,
                MINIMUM_UPDATE_INTERVAL,
                MAXIMUM_UPDATE_INTERVAL
            );
        }
        config.update_interval = Some(update_interval);

        let tint = config.tint.get_or_insert_with(|| DEFAULT_TINT.to_string());
        tint.parse::<Tint>().context("Invalid tint in config")?;
        let accent = config
            .accent_color
            .get_or_insert_with(|| DEFAULT_ACCENT_COLOR.to_string());
        accent.parse::<Tint>().context("Invalid accent_color in config")?;

        if let Some(lat) = config.latitude {
            if !lat.is_finite() || lat.abs() > MAXIMUM_VALID_LATITUDE {
                bail!("Latitude must be between -90 and 90 degrees (got {})", lat);
            }
            if lat.abs() > MAXIMUM_LATITUDE {
                Log::log_warning(&format!(
                    "Latitude {:.4}° capped at ±{}° for reliable sun times",
                    lat, MAXIMUM_LATITUDE
                ));
                config.latitude = Some(MAXIMUM_LATITUDE * lat.signum());
            }
        }
        if let Some(lon) = config.longitude {
            if !lon.is_finite() || lon.abs() > MAXIMUM_VALID_LONGITUDE {
                bail!("Longitude must be between -180 and 180 degrees (got {})", lon);
            }
        }

        if let Some(name) = &config.timezone {
            name.parse::<Tz>()
                .map_err(|e| anyhow::anyhow!("Invalid timezone '{}' in config: {}", name, e))?;
        }

        Ok(())
    }

    /// Load and validate the configuration at `path`.
    ///
    /// Unlike [`Config::load`], a missing file is an error here.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            bail!(
                "Configuration file not found at specified path: {}",
                path.display()
            );
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        let mut config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;

        Self::apply_defaults_and_validate_fields(&mut config)?;
        validate_config(&config)?;

        Ok(config)
    }

    /// Load the user's configuration, creating the default file if needed.
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)
                .context("Failed to create default config during load")?;
        }

        Self::load_from_path(&config_path).with_context(|| {
            format!(
                "Failed to load configuration from {}",
                config_path.display()
            )
        })
    }

    /// Manual sunrise and sunset, if both are configured.
    pub fn manual_sun_times(&self) -> Option<SunTimes> {
        let sunrise = parse_time(self.sunrise.as_deref()?).ok()?;
        let sunset = parse_time(self.sunset.as_deref()?).ok()?;
        Some(SunTimes::new(sunrise, sunset))
    }

    pub fn coordinates(&self) -> Option<(f64, f64)> {
        Some((self.latitude?, self.longitude?))
    }

    /// Configured timezone, `None` meaning the system zone.
    pub fn timezone(&self) -> Option<Tz> {
        self.timezone.as_deref()?.parse().ok()
    }

    pub fn update_interval(&self) -> u64 {
        self.update_interval.unwrap_or(DEFAULT_UPDATE_INTERVAL)
    }

    pub fn twilight_duration(&self) -> u64 {
        self.twilight_duration.unwrap_or(DEFAULT_TWILIGHT_DURATION)
    }

    pub fn accent_color(&self) -> Tint {
        self.accent_color
            .as_deref()
            .unwrap_or(DEFAULT_ACCENT_COLOR)
            .parse()
            .unwrap_or_default()
    }

    /// Resolver settings built from the dimming and appearance fields.
    pub fn overlay_settings(&self) -> Result<OverlaySettings> {
        let tiers = DimnessTiers {
            day: DimnessPercent::new(self.day_dimness.unwrap_or(DEFAULT_DAY_DIMNESS))?,
            twilight: DimnessPercent::new(
                self.twilight_dimness.unwrap_or(DEFAULT_TWILIGHT_DIMNESS),
            )?,
            night: DimnessPercent::new(self.night_dimness.unwrap_or(DEFAULT_NIGHT_DIMNESS))?,
        };
        let tint = self
            .tint
            .as_deref()
            .unwrap_or(DEFAULT_TINT)
            .parse::<Tint>()
            .context("Invalid tint in config")?;

        Ok(OverlaySettings {
            tiers,
            tint,
            twilight_duration: self.twilight_duration(),
        })
    }

    pub fn log_config(&self) {
        let config_path = Self::get_config_path()
            .unwrap_or_else(|_| PathBuf::from("~/.config/lightly/lightly.toml"));

        Log::log_block_start(&format!(
            "Loaded configuration from {}",
            path_for_display(&config_path)
        ));

        if let Some((lat, lon)) = self.coordinates() {
            let lat_dir = if lat >= 0.0 { "N" } else { "S" };
            let lon_dir = if lon >= 0.0 { "E" } else { "W" };
            Log::log_indented(&format!(
                "Location: {:.4}°{}, {:.4}°{}",
                lat.abs(),
                lat_dir,
                lon.abs(),
                lon_dir
            ));
        }
        if let (Some(sunrise), Some(sunset)) = (&self.sunrise, &self.sunset) {
            Log::log_indented(&format!("Manual sun times: {} - {}", sunrise, sunset));
        }
        Log::log_indented(&format!(
            "Timezone: {}",
            self.timezone.as_deref().unwrap_or("system")
        ));
        Log::log_indented(&format!(
            "Dimness (day/twilight/night): {}% / {}% / {}%",
            self.day_dimness.unwrap_or(DEFAULT_DAY_DIMNESS),
            self.twilight_dimness.unwrap_or(DEFAULT_TWILIGHT_DIMNESS),
            self.night_dimness.unwrap_or(DEFAULT_NIGHT_DIMNESS)
        ));
        Log::log_indented(&format!(
            "Twilight duration: {} minutes",
            self.twilight_duration()
        ));
        Log::log_indented(&format!(
            "Tint: {}",
            self.tint.as_deref().unwrap_or(DEFAULT_TINT)
        ));
        Log::log_indented(&format!(
            "Update interval: {} seconds",
            self.update_interval()
        ));
    }
}

fn parse_time(value: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(value, TIME_FORMAT)
        .with_context(|| format!("Invalid time '{}'. Use HH:MM:SS format", value))
}

/// Default, reject non-finite and clamp a dimness field.
fn checked_dimness(key: &str, value: Option<f64>, default: f64) -> Result<f64> {
    let Some(value) = value else {
        return Ok(default);
    };
    if !value.is_finite() {
        bail!("{} must be a finite percentage (got {})", key, value);
    }
    let clamped = value.clamp(MINIMUM_DIMNESS, MAXIMUM_DIMNESS);
    if clamped != value {
        Log::log_warning(&format!(
            "{} = {} is outside {}-{}%, using {}",
            key, value, MINIMUM_DIMNESS, MAXIMUM_DIMNESS, clamped
        ));
    }
    Ok(clamped)
}

/// Cross-field checks that single-field validation cannot catch.
pub fn validate_config(config: &Config) -> Result<()> {
    match (&config.sunrise, &config.sunset) {
        (Some(sunrise), Some(sunset)) => {
            let sunrise = parse_time(sunrise).context("Invalid sunrise time format")?;
            let sunset = parse_time(sunset).context("Invalid sunset time format")?;
            if sunrise == sunset {
                bail!("Sunrise and sunset cannot be the same time");
            }
        }
        (Some(_), None) => bail!("Sunrise is set but sunset is missing"),
        (None, Some(_)) => bail!("Sunset is set but sunrise is missing"),
        (None, None) => {}
    }

    match (config.latitude, config.longitude) {
        (Some(_), None) => bail!("Latitude is set but longitude is missing"),
        (None, Some(_)) => bail!("Longitude is set but latitude is missing"),
        _ => {}
    }

    if config.manual_sun_times().is_none() && config.coordinates().is_none() {
        Log::log_warning("No sun times or coordinates configured, the overlay stays clear");
    }

    Ok(())
}

/// Builds the default config file with comments aligned in one column.
struct ConfigBuilder {
    entries: Vec<ConfigEntry>,
}

enum ConfigEntry {
    Section(String),
    Setting { line: String, comment: String },
}

impl ConfigBuilder {
    fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    fn add_section(mut self, title: &str) -> Self {
        self.entries.push(ConfigEntry::Section(format!("#[{}]", title)));
        self
    }

    fn add_setting(mut self, key: &str, value: &str, comment: &str) -> Self {
        self.entries.push(ConfigEntry::Setting {
            line: format!("{} = {}", key, value),
            comment: format!("# {}", comment),
        });
        self
    }

    fn build(self) -> String {
        let max_width = self
            .entries
            .iter()
            .filter_map(|entry| match entry {
                ConfigEntry::Setting { line, .. } => Some(line.len()),
                ConfigEntry::Section(_) => None,
            })
            .max()
            .unwrap_or(0)
            + 1;

        let mut lines = Vec::new();
        for (i, entry) in self.entries.into_iter().enumerate() {
            match entry {
                ConfigEntry::Section(title) => {
                    if i > 0 {
                        lines.push(String::new());
                    }
                    lines.push(title);
                }
                ConfigEntry::Setting { line, comment } => {
                    let padding = " ".repeat(max_width - line.len());
                    lines.push(format!("{}{}{}", line, padding, comment));
                }
            }
        }

        lines.push(String::new());
        lines.join("\n")
    }
}
