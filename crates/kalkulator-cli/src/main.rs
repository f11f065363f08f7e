//! Kalkulator: button-driven calculator
//!
//! ## Usage
//!
//! ```bash
//! kalkulator tui                    # Interactive keypad
//! kalkulator press 3 + 4 x 2 =      # Prints "7 × 2" and "= 14"
//! kalkulator press --steps 9 / 0 =  # Every intermediate display
//! kalkulator config                 # Effective configuration
//! ```

use clap::Parser;
use kalkulator_cli::{
    build_config,
    handlers::{config::execute_config, press::execute_press, tui::execute_tui},
    logging, Cli, CliResult, Commands,
};
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> CliResult<()> {
    let cli = Cli::parse();
    let config = build_config(&cli)?;
    logging::init(&config, matches!(cli.command, Commands::Tui(_)))?;

    match cli.command {
        Commands::Tui(args) => execute_tui(&args),
        Commands::Press(args) => {
            println!("{}", execute_press(&config, &args)?);
            Ok(())
        }
        Commands::Config(args) => {
            print!("{}", execute_config(&config, &args)?);
            Ok(())
        }
    }
}
