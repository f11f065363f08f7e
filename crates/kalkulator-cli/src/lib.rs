//! Kalkulator CLI library
//!
//! Command-line and terminal frontend for the [`kalkulator`] engine.

#![warn(missing_docs)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

mod commands;
mod config;
mod error;
pub mod handlers;
pub mod logging;
mod output;

pub use commands::{Cli, ColorArg, Commands, ConfigArgs, PressArgs, TuiArgs};
pub use config::{CliConfig, ColorChoice, Verbosity};
pub use error::{CliError, CliResult};
pub use output::{OutputFormat, Renderer, Step};

/// Builds the effective configuration: defaults, then the config file, then flags
pub fn build_config(cli: &Cli) -> CliResult<CliConfig> {
    let mut config = match &cli.config {
        Some(path) => CliConfig::load(path)?,
        None => CliConfig::default(),
    };

    if cli.quiet || cli.verbose > 0 {
        config.verbosity = Verbosity::from_flags(cli.quiet, cli.verbose);
    }
    if let Some(color) = cli.color {
        config.color = color.into();
    }
    if let Some(path) = &cli.log_file {
        config.log_file = Some(path.clone());
    }
    Ok(config)
}
