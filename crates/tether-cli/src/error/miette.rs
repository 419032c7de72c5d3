//! Miette diagnostic conversion for CLI errors.

use crate::error::CliError;
use miette::Report;
use tether_config::ConfigError;

/// Convert CliError to miette Report
pub fn cli_error_to_miette(err: CliError) -> Report {
    match err {
        CliError::Config(e) => config_error_to_miette(e),
        _ => miette::miette!("{}", err),
    }
}

/// Convert a configuration error to a miette Report with a hint.
pub fn config_error_to_miette(err: ConfigError) -> Report {
    match err {
        ConfigError::NotFound(path) => miette::miette!(
            help = "Run 'tether init' to create one, or drop --config to use defaults",
            "Config file not found: {}",
            path.display()
        ),
        ConfigError::Extract(e) => miette::miette!(
            help = "Check tether.config.json syntax, field names and types",
            "Invalid configuration: {}",
            e
        ),
        ConfigError::InvalidGlob { pattern, source } => miette::miette!(
            help = "Watch patterns use glob syntax, e.g. dist/*.{html,css,js}",
            "Invalid watch pattern '{}': {}",
            pattern,
            source
        ),
        ConfigError::InvalidRewrite { pattern, source } => miette::miette!(
            help = "Rewrite 'from' values are regular expressions",
            "Invalid rewrite pattern '{}': {}",
            pattern,
            source
        ),
        other => miette::miette!("Configuration error: {}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_not_found_has_help() {
        let report = cli_error_to_miette(CliError::Config(ConfigError::NotFound(
            PathBuf::from("custom.json"),
        )));
        assert!(report.to_string().contains("custom.json"));
        assert!(report.help().is_some());
    }

    #[test]
    fn test_other_errors_keep_message() {
        let report = cli_error_to_miette(CliError::Server("bind failed".to_string()));
        assert!(report.to_string().contains("bind failed"));
    }
}
