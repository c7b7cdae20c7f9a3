//! CLI argument parsing using clap derive API
//!
//! This module defines the command-line interface structure using clap's derive macros.
//! It is purely declarative with no side effects or I/O.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use logwatch_core::config::MailBackend;

/// logwatch -- scan log files for recent matches and mail a report.
///
/// Use `logwatch <COMMAND> --help` for subcommand details.
#[derive(Parser, Debug)]
#[command(name = "logwatch", version, about, long_about = None)]
pub struct Cli {
    /// Path to a logwatch.toml configuration file (defaults + env when omitted).
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Output format.
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable progress lines and summary.
    Text,
    /// Machine-readable JSON summary.
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan log files for recent matches and send an alert if any are found.
    Run(RunArgs),

    /// Manage configuration.
    Config(ConfigArgs),
}

// ---- run ----

/// Scan the last N minutes of one or more log files.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Comma-separated list of log files.
    #[arg(long)]
    pub files: String,

    /// Search term (literal unless --regex is given).
    #[arg(long)]
    pub pattern: String,

    /// Comma-separated list of recipient addresses.
    #[arg(long, required_unless_present = "dry_run")]
    pub emails: Option<String>,

    /// Sender address.
    #[arg(long, required_unless_present = "dry_run")]
    pub email_from: Option<String>,

    /// strftime format of the timestamps in the log files.
    #[arg(long)]
    pub time_format: Option<String>,

    /// IANA timezone the log timestamps are written in.
    #[arg(long)]
    pub timezone: Option<String>,

    /// Lookback interval in minutes.
    #[arg(long)]
    pub interval: Option<u32>,

    /// Also post matched lines to the external log API.
    #[arg(long)]
    pub log_api: bool,

    /// Mail backend.
    #[arg(long)]
    pub mail_backend: Option<MailBackendArg>,

    /// Interpret the pattern as a regular expression.
    #[arg(long)]
    pub regex: bool,

    /// Scan and print the report without sending anything.
    #[arg(long)]
    pub dry_run: bool,
}

/// Mail backend selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MailBackendArg {
    /// SMTP relay.
    Smtp,
    /// Host sendmail binary.
    Sendmail,
}

impl From<MailBackendArg> for MailBackend {
    fn from(arg: MailBackendArg) -> Self {
        match arg {
            MailBackendArg::Smtp => MailBackend::Smtp,
            MailBackendArg::Sendmail => MailBackend::Sendmail,
        }
    }
}

// ---- config ----

/// Manage logwatch configuration.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Validate the configuration and report errors.
    Validate,
    /// Show the effective configuration (file + env overrides + defaults).
    Show {
        /// Show only a specific section (general, scan, mail, log_api).
        #[arg(long)]
        section: Option<String>,
    },
}
