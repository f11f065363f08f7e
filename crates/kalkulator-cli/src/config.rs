//! CLI configuration
//!
//! Defaults, then an optional YAML file, then command-line flags.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{CliError, CliResult};
use crate::output::OutputFormat;

/// CLI verbosity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verbosity {
    /// Quiet - errors only
    Quiet,
    /// Normal - default output
    #[default]
    Normal,
    /// Verbose - extra output
    Verbose,
    /// Debug - maximum output
    Debug,
}

impl Verbosity {
    /// Maps `-q` and the `-v` count to a level; quiet wins
    #[must_use]
    pub const fn from_flags(quiet: bool, verbose: u8) -> Self {
        if quiet {
            return Self::Quiet;
        }
        match verbose {
            0 => Self::Normal,
            1 => Self::Verbose,
            _ => Self::Debug,
        }
    }

    /// Check if quiet mode
    #[must_use]
    pub const fn is_quiet(self) -> bool {
        matches!(self, Self::Quiet)
    }

    /// Check if verbose or higher
    #[must_use]
    pub const fn is_verbose(self) -> bool {
        matches!(self, Self::Verbose | Self::Debug)
    }

    /// Default `tracing` filter directive for this level
    #[must_use]
    pub const fn filter_directive(self) -> &'static str {
        match self {
            Self::Quiet => "error",
            Self::Normal => "warn",
            Self::Verbose => "info",
            Self::Debug => "debug",
        }
    }
}

/// Color output choice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorChoice {
    /// Always use colors
    Always,
    /// Use colors when output is a terminal
    #[default]
    Auto,
    /// Never use colors
    Never,
}

impl ColorChoice {
    /// Should use colors based on output detection
    #[must_use]
    pub fn should_color(self) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => std::io::IsTerminal::is_terminal(&std::io::stdout()),
        }
    }
}

/// CLI configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Verbosity level
    pub verbosity: Verbosity,
    /// Color output choice
    pub color: ColorChoice,
    /// Where logs go instead of stderr
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
    /// Output format for `press`
    pub output_format: OutputFormat,
}

impl CliConfig {
    /// Create new default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a YAML config file; missing keys keep their defaults
    pub fn load(path: &Path) -> CliResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            CliError::config(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_yaml(&text)
    }

    /// Parses a YAML document
    pub fn from_yaml(text: &str) -> CliResult<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml_ng::from_str(text)?)
    }

    /// Serializes the configuration as YAML
    pub fn to_yaml(&self) -> CliResult<String> {
        Ok(serde_yaml_ng::to_string(self)?)
    }

    /// Set verbosity
    #[must_use]
    pub const fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Set color choice
    #[must_use]
    pub const fn with_color(mut self, color: ColorChoice) -> Self {
        self.color = color;
        self
    }

    /// Set the log file
    #[must_use]
    pub fn with_log_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_file = Some(path.into());
        self
    }

    /// Set the output format
    #[must_use]
    pub const fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Write;

    // ===== Verbosity tests =====

    #[test]
    fn test_verbosity_from_flags() {
        assert_eq!(Verbosity::from_flags(false, 0), Verbosity::Normal);
        assert_eq!(Verbosity::from_flags(false, 1), Verbosity::Verbose);
        assert_eq!(Verbosity::from_flags(false, 5), Verbosity::Debug);
        assert_eq!(Verbosity::from_flags(true, 2), Verbosity::Quiet);
    }

    #[test]
    fn test_verbosity_filter_directive() {
        assert_eq!(Verbosity::Quiet.filter_directive(), "error");
        assert_eq!(Verbosity::Normal.filter_directive(), "warn");
        assert_eq!(Verbosity::Verbose.filter_directive(), "info");
        assert_eq!(Verbosity::Debug.filter_directive(), "debug");
    }

    #[test]
    fn test_verbosity_predicates() {
        assert!(Verbosity::Quiet.is_quiet());
        assert!(!Verbosity::Normal.is_verbose());
        assert!(Verbosity::Debug.is_verbose());
    }

    // ===== Color tests =====

    #[test]
    fn test_color_fixed_choices() {
        assert!(ColorChoice::Always.should_color());
        assert!(!ColorChoice::Never.should_color());
    }

    // ===== CliConfig tests =====

    #[test]
    fn test_config_builders() {
        let config = CliConfig::new()
            .with_verbosity(Verbosity::Verbose)
            .with_color(ColorChoice::Never)
            .with_log_file("calc.log")
            .with_output_format(OutputFormat::Json);
        assert_eq!(config.verbosity, Verbosity::Verbose);
        assert_eq!(config.color, ColorChoice::Never);
        assert_eq!(config.log_file, Some(PathBuf::from("calc.log")));
        assert_eq!(config.output_format, OutputFormat::Json);
    }

    #[test]
    fn test_config_from_partial_yaml() {
        let config = CliConfig::from_yaml("color: never\n").unwrap();
        assert_eq!(config.color, ColorChoice::Never);
        assert_eq!(config.verbosity, Verbosity::Normal);
        assert_eq!(config.output_format, OutputFormat::Text);
    }

    #[test]
    fn test_config_from_empty_yaml() {
        assert_eq!(CliConfig::from_yaml("").unwrap(), CliConfig::default());
    }

    #[test]
    fn test_config_rejects_unknown_value() {
        assert!(CliConfig::from_yaml("verbosity: shouty\n").is_err());
    }

    #[test]
    fn test_config_yaml_round_trip() {
        let config = CliConfig::new()
            .with_verbosity(Verbosity::Debug)
            .with_output_format(OutputFormat::Json);
        let yaml = config.to_yaml().unwrap();
        assert!(yaml.contains("verbosity: debug"));
        assert!(yaml.contains("output_format: json"));
        assert!(!yaml.contains("log_file"));
        assert_eq!(CliConfig::from_yaml(&yaml).unwrap(), config);
    }

    #[test]
    fn test_config_load_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "verbosity: quiet\nlog_file: /tmp/kalkulator.log").unwrap();
        let config = CliConfig::load(file.path()).unwrap();
        assert_eq!(config.verbosity, Verbosity::Quiet);
        assert_eq!(config.log_file, Some(PathBuf::from("/tmp/kalkulator.log")));
    }

    #[test]
    fn test_config_load_missing_file() {
        let err = CliConfig::load(Path::new("/nonexistent/kalkulator.yaml")).unwrap_err();
        assert!(matches!(err, CliError::Config { .. }));
    }
}
