use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset, Local, Utc};
use fs2::FileExt;
use signal_hook::{
    consts::signal::{SIGINT, SIGTERM},
    iterator::Signals,
};
use std::{
    fs::File,
    path::{Path, PathBuf},
    sync::Arc,
    sync::atomic::{AtomicBool, Ordering},
    thread,
    time::{Duration, Instant},
};

mod args;

use args::{CliAction, ParsedArgs};
use lightly::config::Config;
use lightly::constants::*;
use lightly::cycle_clock::{CycleClock, CycleReading, SunData};
use lightly::diagram::{DiagramGeometry, SunMarker, TwilightLevel, measured_height};
use lightly::logger::Log;
use lightly::overlay::{OverlayColor, OverlayColorResolver};
use lightly::phase::select_phase_index;
use lightly::state::StateStore;
use lightly::sun_source::resolve_sun_data_with_source;
use lightly::surface::{OverlaySurface, TerminalSurface, apply_tick, restore_last_color};
use lightly::utils::format_fraction_as_time;

const CHECK_INTERVAL: Duration = Duration::from_secs(CHECK_INTERVAL_SECS);

// Icons the status report names; the first is centered on sunrise
const STATUS_ICONS: [&str; 4] = ["sunrise", "sun", "sunset", "moon"];

/// Current wall-clock time in the configured zone, or the system zone.
fn current_local_time(config: &Config) -> DateTime<FixedOffset> {
    match config.timezone() {
        Some(tz) => Utc::now().with_timezone(&tz).fixed_offset(),
        None => Local::now().fixed_offset(),
    }
}

fn reading_for(sun: SunData, now: &DateTime<FixedOffset>) -> CycleReading {
    match sun {
        SunData::Known(times) => CycleClock::new(times).reading_at(now),
        SunData::Unavailable => CycleReading::default(),
    }
}

fn open_state_store() -> Option<StateStore> {
    match StateStore::open_default() {
        Ok(store) => Some(store),
        Err(e) => {
            Log::log_warning(&format!("Overlay state will not be saved: {}", e));
            None
        }
    }
}

fn lock_path() -> PathBuf {
    let runtime_dir = std::env::var("XDG_RUNTIME_DIR").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(runtime_dir).join("lightly.lock")
}

/// Release the lock and clear the overlay on shutdown.
fn cleanup(surface: &mut dyn OverlaySurface, lock_file: File, lock_path: &Path) {
    Log::log_decorated("Performing cleanup...");

    if let Err(e) = surface.clear() {
        Log::log_error(&format!("Error clearing overlay: {}", e));
    }

    drop(lock_file);

    if let Err(e) = std::fs::remove_file(lock_path) {
        Log::log_decorated(&format!("Warning: Failed to remove lock file: {}", e));
    } else {
        Log::log_decorated("Lock file removed successfully");
    }

    Log::log_decorated("Cleanup complete");
}

fn run_daemon() -> Result<()> {
    Log::log_version();

    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();

    let mut signals = Signals::new([SIGTERM, SIGINT])?;
    thread::spawn(move || {
        if let Some(signal) = signals.forever().next() {
            Log::log_pipe();
            Log::log_info(&format!("Shutdown signal received: {:?}", signal));
            r.store(false, Ordering::SeqCst);
        }
    });

    let lock_path = lock_path();
    let lock_file = File::create(&lock_path)
        .with_context(|| format!("Failed to create lock file {}", lock_path.display()))?;

    if lock_file.try_lock_exclusive().is_err() {
        Log::log_error(
            "Another instance of lightly is already running.\n\
            • Stop it before starting a new one.",
        );
        std::process::exit(EXIT_FAILURE);
    }
    Log::log_decorated("Lock acquired, starting lightly...");

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            Log::log_critical("Cannot start without a valid configuration.");
            cleanup(&mut TerminalSurface::new(), lock_file, &lock_path);
            return Err(e);
        }
    };
    config.log_config();

    let resolver = OverlayColorResolver::new(config.overlay_settings()?);
    let store = open_state_store();
    let mut surface = TerminalSurface::new();

    if let Some(store) = &store {
        match restore_last_color(&mut surface, store) {
            Ok(Some(color)) => Log::log_indented(&format!("Restored last overlay {}", color)),
            Ok(None) => {}
            Err(e) => Log::log_warning(&format!("Could not restore overlay state: {}", e)),
        }
    }

    let interval = Duration::from_secs(config.update_interval());
    let mut last_check_time = Instant::now();
    let mut last_source = None;

    while running.load(Ordering::SeqCst) {
        let current_time = Instant::now();
        let since_last = current_time.duration_since(last_check_time);
        if since_last > Duration::from_secs(SLEEP_DETECTION_THRESHOLD_SECS) {
            Log::log_decorated(&format!(
                "Large time jump detected ({} minutes). System may have resumed from sleep.",
                since_last.as_secs() / 60
            ));
        }
        last_check_time = current_time;

        let now = current_local_time(&config);
        let (sun, source) = resolve_sun_data_with_source(&config, now.date_naive());
        if last_source != Some(source) {
            Log::log_block_start(&format!("Sun times from {}", source));
            if let Some(times) = sun.times() {
                Log::log_indented(&format!("Sunrise {} / sunset {}", times.sunrise, times.sunset));
            }
            last_source = Some(source);
        }

        match apply_tick(&mut surface, &resolver, sun, &now, store.as_ref()) {
            Ok(outcome) if outcome.changed => {
                Log::log_indented(&format!("Now in {} tier", outcome.resolution.phase));
            }
            Ok(_) => {}
            Err(e) => {
                Log::log_warning(&format!("Failed to apply overlay: {}", e));
                Log::log_decorated("Will retry on next cycle...");
            }
        }

        let mut slept = Duration::from_secs(0);
        while slept < interval && running.load(Ordering::SeqCst) {
            let sleep_chunk = CHECK_INTERVAL.min(interval - slept);
            thread::sleep(sleep_chunk);
            slept += sleep_chunk;
        }
    }

    Log::log_block_start("Shutting down lightly...");
    cleanup(&mut surface, lock_file, &lock_path);
    Log::log_end();
    Ok(())
}

fn run_status() -> Result<()> {
    let config = Config::load()?;
    let resolver = OverlayColorResolver::new(config.overlay_settings()?);

    let now = current_local_time(&config);
    let (sun, source) = resolve_sun_data_with_source(&config, now.date_naive());
    let resolution = resolver.resolve_at(sun, &now);
    let reading = resolution.reading;

    Log::log_version();
    Log::log_decorated(&format!("Time: {}", now.format("%Y-%m-%d %H:%M:%S %:z")));
    Log::log_decorated(&format!("Sun times from {}", source));
    if let Some(times) = sun.times() {
        Log::log_indented(&format!("Sunrise: {}", times.sunrise));
        Log::log_indented(&format!("Sunset: {}", times.sunset));
    }
    Log::log_decorated(&format!(
        "Position: {:.4} ({})",
        reading.position.horizontal(),
        format_fraction_as_time(reading.position.horizontal())
    ));
    Log::log_decorated(&format!(
        "Offset: {:.4} ({})",
        reading.offset.horizontal(),
        format_fraction_as_time(reading.offset.horizontal())
    ));
    Log::log_decorated(&format!("Tier: {}", resolution.phase));
    if let Some(index) = select_phase_index(STATUS_ICONS.len(), reading.offset, reading.position) {
        Log::log_decorated(&format!("Phase: {}", STATUS_ICONS[index]));
    }
    Log::log_decorated(&format!("Overlay: {}", resolution.color));
    Log::log_end();
    Ok(())
}

fn run_diagram(width: f64, height: f64) -> Result<()> {
    let config = Config::load()?;
    let now = current_local_time(&config);
    let (sun, _) = resolve_sun_data_with_source(&config, now.date_naive());
    let reading = reading_for(sun, &now);

    let geometry = match sun {
        SunData::Known(_) => DiagramGeometry::compute(
            reading.position,
            reading.offset,
            TwilightLevel::from_duration(config.twilight_duration()),
            width,
            height,
            PATH_ITERATIONS,
        )?,
        SunData::Unavailable => DiagramGeometry::placeholder(width, height)?,
    };

    Log::log_version();
    Log::log_decorated(&format!(
        "Canvas: {} x {} (view height for this width: {})",
        width,
        height,
        measured_height(width as u32)
    ));
    Log::log_decorated(&format!("Accent: {}", config.accent_color()));
    Log::log_decorated(&format!("Path: {} points", geometry.path.len()));
    for point in geometry.path.points() {
        Log::log_indented(&format!("{:.2}, {:.2}", point.x, point.y));
    }
    Log::log_decorated(&format!(
        "Sun: {:.2}, {:.2} ({:?})",
        geometry.sun_center.x,
        geometry.sun_center.y,
        SunMarker::choose(STATUS_ICONS.len(), reading.offset, reading.position)
    ));
    Log::log_decorated(&format!(
        "Divider: y = {:.2}, tick {:.2} to {:.2}",
        geometry.divider.start.y, geometry.divider.tick_top.y, geometry.divider.tick_bottom.y
    ));
    Log::log_end();
    Ok(())
}

fn run_set_color(color: OverlayColor) -> Result<()> {
    let mut surface = TerminalSurface::new();
    surface.apply(color)?;
    if let Some(store) = open_state_store() {
        store.save(color)?;
        Log::log_indented(&format!("Saved to {}", store.path().display()));
    }
    Ok(())
}

fn main() -> Result<()> {
    let parsed = ParsedArgs::from_env();

    let debug_enabled = match &parsed.action {
        CliAction::Run { debug_enabled }
        | CliAction::Status { debug_enabled }
        | CliAction::Diagram { debug_enabled, .. }
        | CliAction::SetColor { debug_enabled, .. } => *debug_enabled,
        _ => false,
    };
    Log::init_debug_from_env();
    if debug_enabled {
        Log::set_debug(true);
    }

    match parsed.action {
        CliAction::ShowVersion => {
            args::display_version_info();
            Ok(())
        }
        CliAction::ShowHelp => {
            args::display_help();
            Ok(())
        }
        CliAction::ShowHelpDueToError => {
            args::display_help();
            std::process::exit(EXIT_FAILURE);
        }
        CliAction::Status { .. } => run_status(),
        CliAction::Diagram { width, height, .. } => run_diagram(width, height),
        CliAction::SetColor { color, .. } => run_set_color(color),
        CliAction::Run { .. } => run_daemon(),
    }
}
