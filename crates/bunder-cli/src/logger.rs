//! Logging setup for the bunder CLI.
//!
//! The library logs progress through `tracing` (`Bundling Site ...`,
//! `*** Bundling process complete. ***`). This module decides how much of it
//! reaches stderr.
//!
//! # Example
//!
//! ```rust,no_run
//! use bunder_cli::logger::init_logger;
//!
//! init_logger(false, false, false);
//! tracing::info!("Starting build");
//! ```

use bunder::LogLevel;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Pick the log level for the given flags.
///
/// `--verbose` wins over `--quiet`. `None` means neither flag was given and
/// `RUST_LOG` may decide.
pub fn level_for_flags(verbose: bool, quiet: bool) -> Option<LogLevel> {
    if verbose {
        Some(LogLevel::Debug)
    } else if quiet {
        Some(LogLevel::Error)
    } else {
        None
    }
}

/// Build the filter for the given flags.
///
/// Without flags, `RUST_LOG` is honored and the default is info for the
/// bunder crates.
pub fn filter_for_flags(verbose: bool, quiet: bool) -> EnvFilter {
    match level_for_flags(verbose, quiet) {
        Some(level) => EnvFilter::new(level.directives()),
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(LogLevel::Info.directives())),
    }
}

/// Initialize the tracing subscriber.
///
/// Call once at startup. A second call leaves the first subscriber in place.
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool) {
    init_logger_with_filter(filter_for_flags(verbose, quiet), no_color);
}

/// Initialize the tracing subscriber with a custom filter.
pub fn init_logger_with_filter(filter: EnvFilter, no_color: bool) {
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color && should_use_colors())
        .compact();

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}

/// Check whether log output should be colored.
///
/// `NO_COLOR` disables colors, `FORCE_COLOR` forces them, otherwise the
/// terminal decides.
pub fn should_use_colors() -> bool {
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    if std::env::var("FORCE_COLOR").is_ok() {
        return true;
    }

    console::Term::stderr().features().colors_supported()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_verbose_overrides_quiet() {
        assert_eq!(level_for_flags(true, true), Some(LogLevel::Debug));
        assert_eq!(level_for_flags(false, true), Some(LogLevel::Error));
        assert_eq!(level_for_flags(false, false), None);
    }

    #[test]
    #[serial]
    fn test_should_use_colors_respects_no_color() {
        unsafe {
            std::env::set_var("NO_COLOR", "1");
            std::env::set_var("FORCE_COLOR", "1");
        }
        assert!(!should_use_colors());
        unsafe {
            std::env::remove_var("NO_COLOR");
            std::env::remove_var("FORCE_COLOR");
        }
    }

    #[test]
    #[serial]
    fn test_should_use_colors_respects_force_color() {
        unsafe {
            std::env::remove_var("NO_COLOR");
            std::env::set_var("FORCE_COLOR", "1");
        }
        assert!(should_use_colors());
        unsafe {
            std::env::remove_var("FORCE_COLOR");
        }
    }

    #[test]
    fn test_filters_build() {
        let _verbose = filter_for_flags(true, false);
        let _quiet = filter_for_flags(false, true);
    }

    #[test]
    fn test_init_twice_does_not_panic() {
        init_logger(false, true, true);
        init_logger(true, false, true);
    }
}
