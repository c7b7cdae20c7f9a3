//! Command handlers -- one module per subcommand

pub mod config;
pub mod run;

use std::path::Path;

use logwatch_core::config::LogwatchConfig;

use crate::error::CliError;

/// Load the effective configuration.
///
/// An explicit path must exist; without one, defaults plus `LOGWATCH_*`
/// environment overrides are used.
pub async fn load_config(path: Option<&Path>) -> Result<LogwatchConfig, CliError> {
    let config = match path {
        Some(path) => LogwatchConfig::load(path).await?,
        None => LogwatchConfig::from_env()?,
    };
    Ok(config)
}
