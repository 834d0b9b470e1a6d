//! Terminal output: status lines and the build summary.
//!
//! Everything goes to stderr so stdout stays clean for piping.
//!
//! # Examples
//!
//! ```no_run
//! use bunder_cli::ui;
//!
//! ui::init_colors(false);
//! ui::success("Bundled 3 bundles");
//! ui::error("Site: failed to read /js/missing.js");
//! ```

mod format;
mod messages;

use std::sync::atomic::{AtomicBool, Ordering};

pub use format::{format_duration, format_size, print_build_summary, status_symbol};
pub use messages::{debug, error, info, item, success, warning};

static COLORS: AtomicBool = AtomicBool::new(true);

/// Check if running in a CI environment.
pub fn is_ci() -> bool {
    std::env::var("CI").is_ok()
        || std::env::var("GITHUB_ACTIONS").is_ok()
        || std::env::var("GITLAB_CI").is_ok()
        || std::env::var("CIRCLECI").is_ok()
        || std::env::var("TRAVIS").is_ok()
}

/// Check if color output should be enabled.
///
/// `NO_COLOR` disables colors, `FORCE_COLOR` forces them, otherwise colors
/// follow whether stderr is attended.
pub fn should_use_color() -> bool {
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    if std::env::var("FORCE_COLOR").is_ok() {
        return true;
    }

    console::user_attended_stderr()
}

/// Decide once whether status lines are colored.
///
/// `--no-color` always wins over the environment.
pub fn init_colors(no_color: bool) {
    COLORS.store(!no_color && should_use_color(), Ordering::Relaxed);
}

/// Whether status lines are currently colored.
pub fn colors_enabled() -> bool {
    COLORS.load(Ordering::Relaxed)
}
