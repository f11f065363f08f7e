//! Logging setup
//!
//! `RUST_LOG` takes precedence; otherwise the level follows verbosity.
//! The interactive calculator owns the terminal, so it only logs to a file.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::config::{CliConfig, Verbosity};
use crate::error::{CliError, CliResult};

/// Where log output goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogSink {
    /// No subscriber is installed
    Off,
    /// Standard error
    Stderr,
    /// Appended to a file
    File(PathBuf),
}

impl LogSink {
    /// Picks the sink for a run; `interactive` runs never log to stderr
    #[must_use]
    pub fn resolve(config: &CliConfig, interactive: bool) -> Self {
        match (&config.log_file, interactive) {
            (Some(path), _) => Self::File(path.clone()),
            (None, true) => Self::Off,
            (None, false) => Self::Stderr,
        }
    }
}

/// Builds the level filter for a verbosity
#[must_use]
pub fn build_filter(verbosity: Verbosity) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(verbosity.filter_directive()))
}

/// Installs the global subscriber
pub fn init(config: &CliConfig, interactive: bool) -> CliResult<()> {
    let filter = build_filter(config.verbosity);
    match LogSink::resolve(config, interactive) {
        LogSink::Off => Ok(()),
        LogSink::Stderr => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .try_init()
            .map_err(|e| CliError::logging(e.to_string())),
        LogSink::File(path) => {
            let file = open_log_file(&path)?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
                .map_err(|e| CliError::logging(e.to_string()))
        }
    }
}

fn open_log_file(path: &Path) -> CliResult<std::fs::File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| CliError::logging(format!("cannot open {}: {e}", path.display())))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_sink_defaults_to_stderr() {
        let config = CliConfig::new();
        assert_eq!(LogSink::resolve(&config, false), LogSink::Stderr);
    }

    #[test]
    fn test_sink_interactive_without_file_is_off() {
        let config = CliConfig::new();
        assert_eq!(LogSink::resolve(&config, true), LogSink::Off);
    }

    #[test]
    fn test_sink_file_wins() {
        let config = CliConfig::new().with_log_file("calc.log");
        let expected = LogSink::File(PathBuf::from("calc.log"));
        assert_eq!(LogSink::resolve(&config, false), expected);
        assert_eq!(LogSink::resolve(&config, true), expected);
    }

    #[test]
    fn test_open_log_file_in_missing_dir_fails() {
        let err = open_log_file(Path::new("/nonexistent/dir/calc.log")).unwrap_err();
        assert!(matches!(err, CliError::Logging { .. }));
    }

    #[test]
    fn test_open_log_file_creates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("calc.log");
        open_log_file(&path).unwrap();
        assert!(path.exists());
    }
}
