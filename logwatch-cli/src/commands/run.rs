//! `logwatch run` command handler
//!
//! One invocation evaluates one pattern over one time window:
//! window generation, scan, suppression gate, then dispatch.

use std::io::Write;
use std::time::Duration;

use colored::Colorize;
use serde::Serialize;
use tracing::{Instrument, info, info_span};
use uuid::Uuid;

use logwatch_core::config::{LogwatchConfig, PatternMode, ScanConfig};
use logwatch_core::types::{ScanReport, ScanRequest, Verdict};
use logwatch_dispatch::{
    AlertDispatcher, DispatchOutcome, HttpLogIngest, LogApiOutcome, LogIngest, MailTransport,
    Mailer, SecondaryChannel,
};
use logwatch_scanner::{
    FileTextSearch, LogScanner, ScanWindow, TextSearch, WindowGenerator, evaluate,
};

use crate::cli::RunArgs;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Recipient label used when `--dry-run` is given without `--emails`.
const DRY_RUN_RECIPIENTS: &str = "(dry run)";

/// Execute the `run` command.
pub async fn execute(
    args: RunArgs,
    mut config: LogwatchConfig,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let run_id = Uuid::new_v4();
    let span = info_span!("run", run_id = %run_id);

    async move {
        apply_run_overrides(&mut config, &args);
        config.validate()?;

        let request = build_request(&args, &config.scan);
        request
            .validate()
            .map_err(|e| CliError::Config(e.to_string()))?;

        // Unknown timezones and bad time formats fail here, before any file is read.
        let generator = WindowGenerator::from_request(&request)?;
        let scanner = LogScanner::new(
            FileTextSearch::new(Duration::from_secs(config.scan.search_timeout_secs)),
            config.scan.on_read_error,
        );
        let emails = args
            .emails
            .clone()
            .unwrap_or_else(|| DRY_RUN_RECIPIENTS.to_owned());

        info!(
            files = request.files.len(),
            pattern = %request.pattern,
            interval_minutes = request.interval_minutes,
            timezone = %request.timezone,
            dry_run = args.dry_run,
            "starting logwatch run"
        );

        let mut progress = writer.progress();
        let mut summary = if args.dry_run {
            run_once::<_, MailTransport, HttpLogIngest>(
                &request,
                &generator.generate(),
                &scanner,
                None,
                &emails,
                &mut *progress,
            )
            .await?
        } else {
            let secondary =
                SecondaryChannel::from_config(&config.log_api, config.log_api.enabled).await;
            let dispatcher = AlertDispatcher::builder(MailTransport::from_config(&config.mail))
                .recipients(&emails)
                .from(args.email_from.clone().unwrap_or_default())
                .secondary(secondary)
                .build()
                .map_err(|e| CliError::Config(e.to_string()))?;

            run_once(
                &request,
                &generator.generate(),
                &scanner,
                Some(&dispatcher),
                &emails,
                &mut *progress,
            )
            .await?
        };
        progress.flush()?;

        summary.run_id = run_id.to_string();
        writer.render(&summary)
    }
    .instrument(span)
    .await
}

/// Apply `run` flags on top of the loaded configuration.
pub fn apply_run_overrides(config: &mut LogwatchConfig, args: &RunArgs) {
    if let Some(time_format) = &args.time_format {
        config.scan.time_format = time_format.clone();
    }
    if let Some(timezone) = &args.timezone {
        config.scan.timezone = timezone.clone();
    }
    if let Some(interval) = args.interval {
        config.scan.interval_minutes = interval;
    }
    if args.regex {
        config.scan.pattern_mode = PatternMode::Regex;
    }
    if let Some(backend) = args.mail_backend {
        config.mail.backend = backend.into();
    }
    if args.log_api {
        config.log_api.enabled = true;
    }
}

/// Build the scan request from the `run` flags and the effective scan settings.
pub fn build_request(args: &RunArgs, scan: &ScanConfig) -> ScanRequest {
    ScanRequest {
        files: ScanRequest::parse_files(&args.files),
        pattern: args.pattern.clone(),
        pattern_mode: scan.pattern_mode,
        time_format: scan.time_format.clone(),
        timezone: scan.timezone.clone(),
        interval_minutes: scan.interval_minutes,
    }
}

/// Scan, gate and (unless `dispatcher` is `None`) dispatch once.
///
/// Progress lines go to `progress`. Mail failures are returned as
/// `CliError::Mail`; log API failures only show up in the summary.
pub async fn run_once<S, M, L>(
    request: &ScanRequest,
    window: &ScanWindow,
    scanner: &LogScanner<S>,
    dispatcher: Option<&AlertDispatcher<M, L>>,
    emails: &str,
    progress: &mut dyn Write,
) -> Result<RunSummary, CliError>
where
    S: TextSearch,
    M: Mailer,
    L: LogIngest,
{
    let report = scanner.scan(request, window).await?;
    write_progress(progress, &report)?;

    let verdict = evaluate(&report);
    let dispatch = match (verdict, dispatcher) {
        (Verdict::Suppress, _) => {
            writeln!(progress, "### No email has been sent to {emails} ###")?;
            info!(recipients = emails, "no match found, alert suppressed");
            None
        }
        (Verdict::Send, None) => {
            write!(progress, "{}", report.render())?;
            writeln!(progress, "### Dry run: no email has been sent to {emails} ###")?;
            None
        }
        (Verdict::Send, Some(dispatcher)) => {
            let outcome = dispatcher.dispatch(&report).await?;
            writeln!(
                progress,
                "### An email has been sent to {emails} via {} ###",
                outcome.mail_backend
            )?;
            Some(outcome)
        }
    };

    Ok(RunSummary::new(
        &report,
        verdict,
        dispatch,
        dispatcher.is_none(),
    ))
}

/// Write one hit/miss line per (file, window key).
fn write_progress(w: &mut dyn Write, report: &ScanReport) -> std::io::Result<()> {
    let pattern = &report.pattern;
    let tz = &report.timezone;

    for file in &report.files {
        let path = file.path.display();
        if let Some(error) = &file.read_error {
            writeln!(w, "### Skipped {path}: {error} ###")?;
            continue;
        }

        for window in &file.windows {
            let key = &window.key;
            if window.is_hit() {
                writeln!(w, "##### Found matching {pattern} log at {key} {tz} in {path} #####")?;
            } else {
                writeln!(w, "### Can't find any {pattern} log at {key} {tz} in {path} ###")?;
            }
        }
    }

    Ok(())
}

/// Result of one `run` invocation.
#[derive(Debug, Serialize)]
pub struct RunSummary {
    /// Correlates the summary with the `run` span in the logs.
    pub run_id: String,
    pub pattern: String,
    pub timezone: String,
    pub interval_minutes: u32,
    pub since: String,
    pub files: Vec<FileSummary>,
    pub matches: usize,
    pub verdict: Verdict,
    pub dry_run: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dispatch: Option<DispatchOutcome>,
}

/// Per-file part of [`RunSummary`].
#[derive(Debug, Serialize)]
pub struct FileSummary {
    pub path: String,
    pub matches: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_error: Option<String>,
    pub lines: Vec<String>,
}

impl RunSummary {
    fn new(
        report: &ScanReport,
        verdict: Verdict,
        dispatch: Option<DispatchOutcome>,
        dry_run: bool,
    ) -> Self {
        let files = report
            .files
            .iter()
            .map(|f| FileSummary {
                path: f.path.display().to_string(),
                matches: f.match_count(),
                read_error: f.read_error.clone(),
                lines: f.matched_lines().map(str::to_owned).collect(),
            })
            .collect();

        Self {
            run_id: String::new(),
            pattern: report.pattern.clone(),
            timezone: report.timezone.clone(),
            interval_minutes: report.interval_minutes,
            since: report.since.clone(),
            files,
            matches: report.match_count(),
            verdict,
            dry_run,
            dispatch,
        }
    }
}

impl Render for RunSummary {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        let verdict = match self.verdict {
            Verdict::Send => self.verdict.to_string().red().bold(),
            Verdict::Suppress => self.verdict.to_string().green(),
        };
        writeln!(
            w,
            "Verdict: {} ({} matches in {} files)",
            verdict,
            self.matches,
            self.files.len()
        )?;

        if let Some(dispatch) = &self.dispatch {
            let log_api = match &dispatch.log_api {
                LogApiOutcome::Disabled => "disabled".normal(),
                LogApiOutcome::Skipped { reason } => format!("skipped ({reason})").yellow(),
                LogApiOutcome::Sent { status } => format!("sent ({status})").green(),
                LogApiOutcome::Failed { reason } => format!("failed ({reason})").red(),
            };
            writeln!(w, "Log API: {log_api}")?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    use logwatch_core::config::MailBackend;
    use logwatch_core::types::{FileReport, WindowHits, WindowKey};

    use crate::cli::MailBackendArg;

    fn args() -> RunArgs {
        RunArgs {
            files: "/tmp/a.log, /tmp/b.log".to_owned(),
            pattern: "ERROR".to_owned(),
            emails: Some("ops@example.com".to_owned()),
            email_from: Some("logwatch@example.com".to_owned()),
            time_format: None,
            timezone: None,
            interval: None,
            log_api: false,
            mail_backend: None,
            regex: false,
            dry_run: false,
        }
    }

    fn report(hit: bool, read_error: Option<&str>) -> ScanReport {
        ScanReport {
            pattern: "ERROR".to_owned(),
            timezone: "UTC".to_owned(),
            interval_minutes: 1,
            since: "10:01".to_owned(),
            files: vec![FileReport {
                path: PathBuf::from("/tmp/a.log"),
                heading: ScanReport::format_heading("ERROR", "/tmp/a.log", 1, "10:01", "UTC"),
                windows: vec![WindowHits {
                    key: WindowKey::new("2024-01-01 10:00"),
                    lines: if hit {
                        vec!["2024-01-01 10:00:05 ERROR disk full".to_owned()]
                    } else {
                        Vec::new()
                    },
                }],
                read_error: read_error.map(str::to_owned),
            }],
        }
    }

    #[test]
    fn overrides_keep_config_when_flags_absent() {
        let mut config = LogwatchConfig::default();
        apply_run_overrides(&mut config, &args());
        assert_eq!(config.scan.timezone, "UTC");
        assert_eq!(config.scan.interval_minutes, 5);
        assert_eq!(config.scan.pattern_mode, PatternMode::Literal);
        assert!(!config.log_api.enabled);
    }

    #[test]
    fn overrides_apply_flags() {
        let mut config = LogwatchConfig::default();
        let mut run = args();
        run.timezone = Some("Asia/Tokyo".to_owned());
        run.interval = Some(15);
        run.time_format = Some("%H:%M".to_owned());
        run.regex = true;
        run.log_api = true;
        run.mail_backend = Some(MailBackendArg::Sendmail);

        apply_run_overrides(&mut config, &run);

        assert_eq!(config.scan.timezone, "Asia/Tokyo");
        assert_eq!(config.scan.interval_minutes, 15);
        assert_eq!(config.scan.time_format, "%H:%M");
        assert_eq!(config.scan.pattern_mode, PatternMode::Regex);
        assert_eq!(config.mail.backend, MailBackend::Sendmail);
        assert!(config.log_api.enabled);
    }

    #[test]
    fn oversized_interval_fails_validation() {
        let mut config = LogwatchConfig::default();
        let mut run = args();
        run.interval = Some(10_000);
        apply_run_overrides(&mut config, &run);
        assert!(config.validate().is_err());
    }

    #[test]
    fn request_splits_files() {
        let request = build_request(&args(), &ScanConfig::default());
        assert_eq!(
            request.files,
            vec![PathBuf::from("/tmp/a.log"), PathBuf::from("/tmp/b.log")]
        );
        assert_eq!(request.interval_minutes, 5);
        assert_eq!(request.time_format, "%Y-%m-%d %H:%M");
    }

    #[test]
    fn progress_reports_hit_and_miss() {
        let mut out = Vec::new();
        write_progress(&mut out, &report(true, None)).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "##### Found matching ERROR log at 2024-01-01 10:00 UTC in /tmp/a.log #####\n"
        );

        let mut out = Vec::new();
        write_progress(&mut out, &report(false, None)).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "### Can't find any ERROR log at 2024-01-01 10:00 UTC in /tmp/a.log ###\n"
        );
    }

    #[test]
    fn progress_reports_skipped_file() {
        let mut out = Vec::new();
        write_progress(&mut out, &report(false, Some("permission denied"))).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("### Skipped /tmp/a.log: permission denied"));
        assert_eq!(text.lines().count(), 1);
    }

    #[test]
    fn summary_collects_lines_and_serializes() {
        let summary = RunSummary::new(&report(true, None), Verdict::Send, None, true);
        assert_eq!(summary.matches, 1);
        assert_eq!(summary.files[0].lines.len(), 1);

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["verdict"], "send");
        assert_eq!(json["dry_run"], true);
        assert!(json.get("dispatch").is_none());
        assert!(json["files"][0].get("read_error").is_none());
    }

    #[test]
    fn summary_renders_verdict_line() {
        colored::control::set_override(false);
        let summary = RunSummary::new(&report(false, None), Verdict::Suppress, None, false);
        let mut out = Vec::new();
        summary.render_text(&mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Verdict: suppress (0 matches in 1 files)\n"
        );
    }
}
