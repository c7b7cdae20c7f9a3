//! `logwatch config` command handler

use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use logwatch_core::config::LogwatchConfig;

use crate::cli::{ConfigAction, ConfigArgs};
use crate::commands::load_config;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Source label when no configuration file is given.
const DEFAULTS_SOURCE: &str = "(defaults + env)";

/// Execute the `config` command.
pub async fn execute(
    args: ConfigArgs,
    config_path: Option<&Path>,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    match args.action {
        ConfigAction::Validate => execute_validate(config_path, writer).await,
        ConfigAction::Show { section } => execute_show(config_path, section, writer).await,
    }
}

fn source_label(config_path: Option<&Path>) -> String {
    config_path
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| DEFAULTS_SOURCE.to_owned())
}

/// Execute the config validate subcommand.
///
/// # Errors
///
/// Returns `CliError::Config` if validation fails (parse errors, invalid values).
async fn execute_validate(config_path: Option<&Path>, writer: &OutputWriter) -> Result<(), CliError> {
    let source = source_label(config_path);
    info!(source = %source, "validating configuration");

    let report = match load_config(config_path).await {
        Ok(_) => ConfigValidationReport {
            source,
            valid: true,
            errors: Vec::new(),
        },
        Err(e) => ConfigValidationReport {
            source,
            valid: false,
            errors: vec![e.to_string()],
        },
    };

    writer.render(&report)?;

    if !report.valid {
        return Err(CliError::Config("configuration is invalid".to_owned()));
    }

    Ok(())
}

/// Execute the config show subcommand.
///
/// Displays the effective configuration with the log API license key redacted.
async fn execute_show(
    config_path: Option<&Path>,
    section: Option<String>,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let source = source_label(config_path);
    info!(source = %source, "loading configuration");

    let config = load_config(config_path).await?.redacted();
    let report = build_config_report(&config, source, section)?;

    writer.render(&report)?;

    Ok(())
}

/// Build the report for the whole configuration or a single section.
pub fn build_config_report(
    config: &LogwatchConfig,
    source: String,
    section: Option<String>,
) -> Result<ConfigReport, CliError> {
    let (config_toml, config_json) = match section.as_deref() {
        None => (toml_text(config), serde_json::to_value(config)?),
        Some("general") => (toml_text(&config.general), serde_json::to_value(&config.general)?),
        Some("scan") => (toml_text(&config.scan), serde_json::to_value(&config.scan)?),
        Some("mail") => (toml_text(&config.mail), serde_json::to_value(&config.mail)?),
        Some("log_api") => (toml_text(&config.log_api), serde_json::to_value(&config.log_api)?),
        Some(other) => {
            return Err(CliError::Command(format!(
                "unknown section: {} (expected: general, scan, mail, log_api)",
                other
            )));
        }
    };

    Ok(ConfigReport {
        source,
        section,
        config: config_json,
        config_toml,
    })
}

fn toml_text<T: Serialize>(value: &T) -> String {
    toml::to_string_pretty(value).unwrap_or_else(|e| format!("(serialization error: {})", e))
}

/// Configuration display report.
///
/// Text output shows the TOML form; JSON output carries the same values as an object.
#[derive(Serialize)]
pub struct ConfigReport {
    /// Configuration source
    pub source: String,
    /// Optional section name (None = full config)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    /// Effective configuration values
    pub config: serde_json::Value,
    /// Serialized TOML configuration (text rendering only)
    #[serde(skip)]
    pub config_toml: String,
}

impl Render for ConfigReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        if let Some(ref section) = self.section {
            let section_label = format!("[{}]", section);
            writeln!(
                w,
                "Configuration {} (source: {})",
                section_label.bold(),
                self.source
            )?;
        } else {
            writeln!(w, "Configuration (source: {})", self.source.bold())?;
        }

        writeln!(w)?;
        write!(w, "{}", self.config_toml)?;

        Ok(())
    }
}

/// Configuration validation report.
#[derive(Serialize)]
pub struct ConfigValidationReport {
    /// Configuration source
    pub source: String,
    /// Whether the configuration is valid
    pub valid: bool,
    /// Validation error messages (empty if valid)
    pub errors: Vec<String>,
}

impl Render for ConfigValidationReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(w, "Config Validation: {}", self.source.bold())?;

        if self.valid {
            writeln!(w, "  Result: {}", "VALID".green().bold())?;
        } else {
            writeln!(w, "  Result: {}", "INVALID".red().bold())?;
            for err in &self.errors {
                writeln!(w, "  Error: {}", err.red())?;
            }
        }

        Ok(())
    }
}
