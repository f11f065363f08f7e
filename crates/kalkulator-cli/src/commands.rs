//! CLI command definitions using clap

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::config::ColorChoice;
use crate::output::OutputFormat;

/// Kalkulator: a button-driven calculator for the terminal
#[derive(Parser, Debug)]
#[command(name = "kalkulator")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output (auto, always, never)
    #[arg(long, global = true)]
    pub color: Option<ColorArg>,

    /// YAML configuration file
    #[arg(long, global = true, env = "KALKULATOR_CONFIG")]
    pub config: Option<PathBuf>,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the interactive terminal calculator
    Tui(TuiArgs),

    /// Press keys in order and print the display
    Press(PressArgs),

    /// Show the effective configuration
    Config(ConfigArgs),
}

/// Arguments for the tui command
#[derive(Args, Debug, Default)]
pub struct TuiArgs {
    /// Do not capture the mouse (keyboard focus only)
    #[arg(long)]
    pub no_mouse: bool,
}

/// Arguments for the press command
#[derive(Args, Debug)]
pub struct PressArgs {
    /// Key tokens: 0-9 . + - * x × / ÷ % = C DEL
    #[arg(required = true, value_name = "KEY")]
    pub keys: Vec<String>,

    /// Output format (defaults to the configured one)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Print the display after every key
    #[arg(long)]
    pub steps: bool,

    /// Print the session tape after the display
    #[arg(long)]
    pub history: bool,
}

/// Arguments for the config command
#[derive(Args, Debug, Default)]
pub struct ConfigArgs {
    /// Print the built-in defaults instead of the effective configuration
    #[arg(long)]
    pub defaults: bool,
}

/// Color argument for CLI
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorArg {
    /// Auto-detect
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl From<ColorArg> for ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => Self::Auto,
            ColorArg::Always => Self::Always,
            ColorArg::Never => Self::Never,
        }
    }
}
