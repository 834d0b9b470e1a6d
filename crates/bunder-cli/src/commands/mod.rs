//! Command implementations for the bunder CLI.
//!
//! - [`build`] - Build every bundle
//! - [`clean`] - Empty the output directories
//! - [`check`] - Validate configuration and resolve file lists

pub mod build;
pub mod check;
pub mod clean;
pub(crate) mod utils;

pub use build::execute as build_execute;
pub use check::execute as check_execute;
pub use clean::execute as clean_execute;
