//! Terminal logging with box-drawing decorations.
//!
//! All output of the daemon goes through [`Log`]. Messages carry a level
//! prefix and the decorated helpers build the tree-like layout used for
//! startup and per-tick reports:
//!
//! ```text
//! ┏ lightly v0.3.0 ━━╸
//! ┃
//! ┣ Loaded configuration
//! ┃   Night dimness: 70%
//! ╹
//! ```
//!
//! Output can be switched off entirely (tests, `--status` piping) and debug
//! lines are only printed when the debug flag is set, either with `--debug`
//! or the `LIGHTLY_DEBUG` environment variable.

use std::sync::atomic::{AtomicBool, Ordering};

static LOGGING_ENABLED: AtomicBool = AtomicBool::new(true);
static DEBUG_ENABLED: AtomicBool = AtomicBool::new(false);

/// Environment variable that turns on debug output when set to anything
/// other than `0` or an empty string.
pub const DEBUG_ENV_VAR: &str = "LIGHTLY_DEBUG";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Log,  // Regular operation
    Warn, // Recoverable problems, e.g. a fallback was used
    Err,  // A failed operation
    Crit, // Startup cannot continue
    Info, // Status updates
}

impl LogLevel {
    fn prefix(self) -> &'static str {
        match self {
            LogLevel::Log => "[LOG]",
            LogLevel::Warn => "[WARN]",
            LogLevel::Err => "[ERR]",
            LogLevel::Crit => "[CRIT]",
            LogLevel::Info => "[INFO]",
        }
    }
}

pub struct Log;

impl Log {
    pub fn set_enabled(enabled: bool) {
        LOGGING_ENABLED.store(enabled, Ordering::SeqCst);
    }

    pub fn is_enabled() -> bool {
        LOGGING_ENABLED.load(Ordering::SeqCst)
    }

    pub fn set_debug(enabled: bool) {
        DEBUG_ENABLED.store(enabled, Ordering::SeqCst);
    }

    pub fn is_debug() -> bool {
        DEBUG_ENABLED.load(Ordering::SeqCst)
    }

    /// Turn on debug output if [`DEBUG_ENV_VAR`] asks for it.
    pub fn init_debug_from_env() {
        if let Ok(value) = std::env::var(DEBUG_ENV_VAR) {
            let value = value.trim();
            if !value.is_empty() && value != "0" {
                Self::set_debug(true);
            }
        }
    }

    /// Format a line without printing it.
    pub fn format(level: LogLevel, message: &str) -> String {
        format!("{} {}", level.prefix(), message)
    }

    pub fn log(level: LogLevel, message: &str) {
        if !Self::is_enabled() {
            return;
        }
        // Errors go to stderr so `--status` output stays clean on stdout
        match level {
            LogLevel::Err | LogLevel::Crit => eprintln!("{}", Self::format(level, message)),
            _ => println!("{}", Self::format(level, message)),
        }
    }

    // ═══ Level shortcuts ═══

    pub fn log_error(message: &str) {
        Self::log(LogLevel::Err, message);
    }

    pub fn log_warning(message: &str) {
        Self::log(LogLevel::Warn, message);
    }

    pub fn log_info(message: &str) {
        Self::log(LogLevel::Info, message);
    }

    pub fn log_critical(message: &str) {
        Self::log(LogLevel::Crit, message);
    }

    /// Operational detail, printed only in debug mode.
    pub fn log_debug(message: &str) {
        if Self::is_debug() {
            Self::log(LogLevel::Log, message);
        }
    }

    // ═══ Decorations ═══

    pub fn log_decorated(message: &str) {
        if Self::is_enabled() {
            println!("┣ {}", message);
        }
    }

    pub fn log_indented(message: &str) {
        if Self::is_enabled() {
            println!("┃   {}", message);
        }
    }

    pub fn log_pipe() {
        if Self::is_enabled() {
            println!("┃");
        }
    }

    /// Blank pipe line followed by a branch, for a new section of output.
    pub fn log_block_start(message: &str) {
        if Self::is_enabled() {
            println!("┃");
            println!("┣ {}", message);
        }
    }

    pub fn log_version() {
        if Self::is_enabled() {
            println!("┏ lightly v{} ━━╸", env!("CARGO_PKG_VERSION"));
            println!("┃");
        }
    }

    pub fn log_end() {
        if Self::is_enabled() {
            println!("╹");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_format_prefixes() {
        assert_eq!(Log::format(LogLevel::Warn, "fallback"), "[WARN] fallback");
        assert_eq!(Log::format(LogLevel::Crit, "stop"), "[CRIT] stop");
        assert_eq!(Log::format(LogLevel::Log, "tick"), "[LOG] tick");
    }

    #[test]
    #[serial]
    fn test_toggle_enabled() {
        Log::set_enabled(false);
        assert!(!Log::is_enabled());
        // Must not print or panic while disabled
        Log::log_error("hidden");
        Log::log_critical("hidden");
        Log::set_enabled(true);
        assert!(Log::is_enabled());
    }

    #[test]
    #[serial]
    fn test_debug_from_env() {
        Log::set_debug(false);
        unsafe {
            std::env::set_var(DEBUG_ENV_VAR, "0");
        }
        Log::init_debug_from_env();
        assert!(!Log::is_debug());

        unsafe {
            std::env::set_var(DEBUG_ENV_VAR, "1");
        }
        Log::init_debug_from_env();
        assert!(Log::is_debug());

        unsafe {
            std::env::remove_var(DEBUG_ENV_VAR);
        }
        Log::set_debug(false);
    }
}
