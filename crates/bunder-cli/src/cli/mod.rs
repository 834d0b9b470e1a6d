//! Command-line interface definition for bunder.
//!
//! # Command Structure
//!
//! - `bunder build` - Clean (optionally), then build every bundle
//! - `bunder clean` - Empty the configured output directories
//! - `bunder check` - Validate settings and bundles, print resolved file lists

mod commands;

use clap::Parser;

pub use commands::{BuildArgs, CheckArgs, CleanArgs, Command, SettingsArgs, parse_flag};

/// Bunder - concatenate and minify JS/CSS bundles
#[derive(Parser, Debug)]
#[command(
    name = "bunder",
    version,
    about = "Concatenate and minify JS/CSS bundles from static config",
    long_about = "Bunder reads named bundles from a JSON records file, expands bundles that\n\
                  reference other bundles, and writes one concatenated, minified file per\n\
                  bundle into the output directory configured for its extension."
)]
pub struct Cli {
    /// Enable verbose logging (debug level)
    ///
    /// Shows every source file included in each bundle and every path
    /// removed while cleaning.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}
