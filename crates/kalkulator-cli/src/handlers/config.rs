//! Config command handler

use crate::commands::ConfigArgs;
use crate::config::CliConfig;
use crate::error::CliResult;

/// Renders the configuration as YAML
pub fn execute_config(config: &CliConfig, args: &ConfigArgs) -> CliResult<String> {
    if args.defaults {
        CliConfig::default().to_yaml()
    } else {
        config.to_yaml()
    }
}
