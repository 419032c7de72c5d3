//! Terminal status messages.
//!
//! Short, human-facing lines printed to stderr alongside the tracing output.

mod messages;

pub use messages::{error, info, success, warning};

/// Check if color output should be enabled.
///
/// Respects NO_COLOR and FORCE_COLOR environment variables, falls back to
/// terminal capability detection.
pub fn should_use_color() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }

    if std::env::var_os("FORCE_COLOR").is_some() {
        return true;
    }

    console::user_attended_stderr()
}

/// Initialize color support based on environment.
///
/// `owo-colors` is switched off globally when colors are not wanted or
/// `--no-color` was passed.
pub fn init_colors(no_color: bool) {
    owo_colors::set_override(!no_color && should_use_color());
}
