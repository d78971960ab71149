//! Command-line argument parsing.
//!
//! Arguments are parsed by hand into a [`CliAction`]. Unknown options and
//! malformed values never abort the parse; they produce
//! [`CliAction::ShowHelpDueToError`] after a warning.

use lightly::logger::Log;
use lightly::overlay::OverlayColor;

#[derive(Debug, PartialEq)]
pub enum CliAction {
    /// Run the overlay daemon
    Run { debug_enabled: bool },
    /// Print the current reading once and exit
    Status { debug_enabled: bool },
    /// Print the diagram geometry for a canvas and exit
    Diagram {
        debug_enabled: bool,
        width: f64,
        height: f64,
    },
    /// Apply and remember a fixed overlay color
    SetColor {
        debug_enabled: bool,
        color: OverlayColor,
    },
    ShowHelp,
    ShowVersion,
    /// Unknown or malformed arguments
    ShowHelpDueToError,
}

pub struct ParsedArgs {
    pub action: CliAction,
}

/// Parse a canvas dimension, warning on failure.
fn parse_dimension(name: &str, value: &str) -> Option<f64> {
    match value.parse::<f64>() {
        Ok(parsed) if parsed.is_finite() && parsed >= 0.0 => Some(parsed),
        _ => {
            Log::log_warning(&format!("Invalid diagram {}: {}", name, value));
            None
        }
    }
}

impl ParsedArgs {
    /// Parse arguments, skipping the program name.
    pub fn parse<I, S>(args: I) -> ParsedArgs
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut debug_enabled = false;
        let mut display_help = false;
        let mut display_version = false;
        let mut show_status = false;
        let mut diagram_requested = false;
        let mut diagram_size: Option<(f64, f64)> = None;
        let mut color_requested = false;
        let mut color: Option<OverlayColor> = None;
        let mut unknown_arg_found = false;

        let args_vec: Vec<String> = args
            .into_iter()
            .skip(1)
            .map(|s| s.as_ref().to_string())
            .collect();

        let mut i = 0;
        while i < args_vec.len() {
            let arg_str = &args_vec[i];
            match arg_str.as_str() {
                "--help" | "-h" => display_help = true,
                "--version" | "-V" | "-v" => display_version = true,
                "--debug" | "-d" => debug_enabled = true,
                "--status" | "-s" => show_status = true,
                "--diagram" | "-D" => {
                    diagram_requested = true;
                    // --diagram <width> <height>
                    if i + 2 < args_vec.len() {
                        let width = parse_dimension("width", &args_vec[i + 1]);
                        let height = parse_dimension("height", &args_vec[i + 2]);
                        match (width, height) {
                            (Some(w), Some(h)) => diagram_size = Some((w, h)),
                            _ => unknown_arg_found = true,
                        }
                        i += 2;
                    } else {
                        Log::log_warning(
                            "Missing arguments for --diagram. Usage: --diagram <width> <height>",
                        );
                        unknown_arg_found = true;
                    }
                }
                "--color" | "-c" => {
                    color_requested = true;
                    if i + 1 < args_vec.len() {
                        match args_vec[i + 1].parse::<OverlayColor>() {
                            Ok(parsed) => color = Some(parsed),
                            Err(e) => {
                                Log::log_warning(&format!("Invalid color: {}", e));
                                unknown_arg_found = true;
                            }
                        }
                        i += 1;
                    } else {
                        Log::log_warning("Missing argument for --color. Usage: --color <#AARRGGBB>");
                        unknown_arg_found = true;
                    }
                }
                _ => {
                    if arg_str.starts_with('-') {
                        Log::log_warning(&format!("Unknown option: {}", arg_str));
                        unknown_arg_found = true;
                    }
                }
            }
            i += 1;
        }

        let action = if display_version {
            CliAction::ShowVersion
        } else if unknown_arg_found {
            CliAction::ShowHelpDueToError
        } else if display_help {
            CliAction::ShowHelp
        } else if color_requested {
            match color {
                Some(color) => CliAction::SetColor {
                    debug_enabled,
                    color,
                },
                None => CliAction::ShowHelpDueToError,
            }
        } else if diagram_requested {
            match diagram_size {
                Some((width, height)) => CliAction::Diagram {
                    debug_enabled,
                    width,
                    height,
                },
                None => CliAction::ShowHelpDueToError,
            }
        } else if show_status {
            CliAction::Status { debug_enabled }
        } else {
            CliAction::Run { debug_enabled }
        };

        ParsedArgs { action }
    }

    pub fn from_env() -> ParsedArgs {
        Self::parse(std::env::args())
    }
}

pub fn display_version_info() {
    Log::log_version();
    println!("┗ {}", env!("CARGO_PKG_DESCRIPTION"));
}

pub fn display_help() {
    Log::log_version();
    Log::log_decorated(env!("CARGO_PKG_DESCRIPTION"));
    Log::log_block_start("Usage: lightly [OPTIONS]");
    Log::log_block_start("Options:");
    Log::log_indented("-c, --color <#AARRGGBB>     Apply a fixed overlay color");
    Log::log_indented("-d, --debug                 Enable detailed debug output");
    Log::log_indented("-D, --diagram <w> <h>       Print the sun diagram geometry");
    Log::log_indented("-h, --help                  Print help information");
    Log::log_indented("-s, --status                Print the current sun cycle reading");
    Log::log_indented("-V, --version               Print version information");
    Log::log_end();
}
