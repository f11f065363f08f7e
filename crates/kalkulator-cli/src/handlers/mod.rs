//! Subcommand handlers

pub mod config;
pub mod press;
pub mod tui;
