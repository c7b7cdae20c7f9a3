//! 설정 관리 -- logwatch.toml 파싱 및 런타임 설정
//!
//! [`LogwatchConfig`]는 한 번의 실행에 필요한 모든 설정을 담는 최상위 구조체입니다.
//!
//! # 설정 로딩 우선순위
//! 1. CLI 인자 (최고 우선)
//! 2. 환경변수 (`LOGWATCH_SCAN_TIMEZONE=Asia/Tokyo` 형식)
//! 3. 설정 파일 (`logwatch.toml`)
//! 4. 기본값 (`Default` 구현)
//!
//! # 사용 예시
//! ```no_run
//! # async fn example() -> Result<(), logwatch_core::error::LogwatchError> {
//! use logwatch_core::config::LogwatchConfig;
//!
//! // 파일에서 로드 + 환경변수 오버라이드
//! let config = LogwatchConfig::load("logwatch.toml").await?;
//!
//! // TOML 문자열에서 직접 파싱
//! let config = LogwatchConfig::parse("[scan]\ninterval_minutes = 10")?;
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{ConfigError, LogwatchError};

/// 되돌아보기 구간 상한 (하루)
pub const MAX_INTERVAL_MINUTES: u32 = 1440;

/// 외부 로그 수집 API 기본 엔드포인트
pub const DEFAULT_LOG_API_URL: &str = "https://log-api.newrelic.com/log/v1";

/// logwatch 통합 설정
///
/// `logwatch.toml` 파일의 최상위 구조를 나타냅니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogwatchConfig {
    /// 일반 설정
    #[serde(default)]
    pub general: GeneralConfig,
    /// 스캔 설정
    #[serde(default)]
    pub scan: ScanConfig,
    /// 메일 채널 설정
    #[serde(default)]
    pub mail: MailConfig,
    /// 외부 로그 API 채널 설정
    #[serde(default)]
    pub log_api: LogApiConfig,
}

impl LogwatchConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, LogwatchError> {
        let mut config = Self::from_file(path).await?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// 설정 파일 없이 기본값에 환경변수 오버라이드만 적용합니다.
    pub fn from_env() -> Result<Self, LogwatchError> {
        let mut config = Self::default();
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// TOML 파일에서 설정을 로드합니다 (환경변수 오버라이드 없음).
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, LogwatchError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                LogwatchError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                LogwatchError::Io(e)
            }
        })?;
        let config = Self::parse(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, LogwatchError> {
        toml::from_str(toml_str).map_err(|e| {
            LogwatchError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `LOGWATCH_{SECTION}_{FIELD}`
    pub fn apply_env_overrides(&mut self) {
        // General
        override_string(&mut self.general.log_level, "LOGWATCH_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.log_format, "LOGWATCH_GENERAL_LOG_FORMAT");

        // Scan
        override_string(&mut self.scan.time_format, "LOGWATCH_SCAN_TIME_FORMAT");
        override_string(&mut self.scan.timezone, "LOGWATCH_SCAN_TIMEZONE");
        override_parsed(
            &mut self.scan.interval_minutes,
            "LOGWATCH_SCAN_INTERVAL_MINUTES",
        );
        override_parsed(&mut self.scan.pattern_mode, "LOGWATCH_SCAN_PATTERN_MODE");
        override_parsed(&mut self.scan.on_read_error, "LOGWATCH_SCAN_ON_READ_ERROR");
        override_parsed(
            &mut self.scan.search_timeout_secs,
            "LOGWATCH_SCAN_SEARCH_TIMEOUT_SECS",
        );

        // Mail
        override_parsed(&mut self.mail.backend, "LOGWATCH_MAIL_BACKEND");
        override_string(&mut self.mail.smtp_host, "LOGWATCH_MAIL_SMTP_HOST");
        override_parsed(&mut self.mail.smtp_port, "LOGWATCH_MAIL_SMTP_PORT");
        override_string(
            &mut self.mail.sendmail_command,
            "LOGWATCH_MAIL_SENDMAIL_COMMAND",
        );
        override_parsed(&mut self.mail.timeout_secs, "LOGWATCH_MAIL_TIMEOUT_SECS");

        // Log API
        override_parsed(&mut self.log_api.enabled, "LOGWATCH_LOG_API_ENABLED");
        override_string(&mut self.log_api.url, "LOGWATCH_LOG_API_URL");
        override_optional(&mut self.log_api.license_key, "LOGWATCH_LOG_API_LICENSE_KEY");
        override_optional(
            &mut self.log_api.credentials_path,
            "LOGWATCH_LOG_API_CREDENTIALS_PATH",
        );
        override_string(
            &mut self.log_api.credentials_section,
            "LOGWATCH_LOG_API_CREDENTIALS_SECTION",
        );
        override_parsed(
            &mut self.log_api.timeout_secs,
            "LOGWATCH_LOG_API_TIMEOUT_SECS",
        );
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), LogwatchError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.as_str()) {
            return Err(ConfigError::invalid(
                "general.log_level",
                format!("must be one of: {}", valid_levels.join(", ")),
            )
            .into());
        }

        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.general.log_format.as_str()) {
            return Err(ConfigError::invalid(
                "general.log_format",
                format!("must be one of: {}", valid_formats.join(", ")),
            )
            .into());
        }

        self.scan.validate()?;
        self.mail.validate()?;
        self.log_api.validate()?;

        Ok(())
    }

    /// 민감 정보(라이선스 키)를 가린 사본을 반환합니다.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if copy.log_api.license_key.is_some() {
            copy.log_api.license_key = Some("***REDACTED***".to_owned());
        }
        copy
    }
}

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 로그 형식 (json, pretty)
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            log_format: "json".to_owned(),
        }
    }
}

/// 검색어 해석 방식
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternMode {
    /// 검색어를 문자 그대로 매칭 (기본값)
    #[default]
    Literal,
    /// 검색어를 정규식으로 해석
    Regex,
}

impl FromStr for PatternMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "literal" => Ok(Self::Literal),
            "regex" => Ok(Self::Regex),
            _ => Err(ConfigError::invalid(
                "scan.pattern_mode",
                format!("unknown mode '{s}' (expected: literal, regex)"),
            )),
        }
    }
}

/// 파일을 읽지 못했을 때의 처리 정책
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadErrorPolicy {
    /// 경고를 남기고 매칭 0건으로 취급 (기본값)
    #[default]
    Skip,
    /// 실행 전체를 실패로 종료
    Fail,
}

impl FromStr for ReadErrorPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "skip" => Ok(Self::Skip),
            "fail" => Ok(Self::Fail),
            _ => Err(ConfigError::invalid(
                "scan.on_read_error",
                format!("unknown policy '{s}' (expected: skip, fail)"),
            )),
        }
    }
}

/// 스캔 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// 윈도우 키 strftime 형식
    pub time_format: String,
    /// IANA 타임존
    pub timezone: String,
    /// 되돌아볼 분 수
    pub interval_minutes: u32,
    /// 검색어 해석 방식
    pub pattern_mode: PatternMode,
    /// 파일 읽기 실패 정책
    pub on_read_error: ReadErrorPolicy,
    /// 파일 하나를 검색하는 데 허용되는 최대 시간 (초)
    pub search_timeout_secs: u64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            time_format: "%Y-%m-%d %H:%M".to_owned(),
            timezone: "UTC".to_owned(),
            interval_minutes: 5,
            pattern_mode: PatternMode::Literal,
            on_read_error: ReadErrorPolicy::Skip,
            search_timeout_secs: 30,
        }
    }
}

impl ScanConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.time_format.is_empty() {
            return Err(ConfigError::invalid("scan.time_format", "must not be empty"));
        }

        if self.timezone.is_empty() {
            return Err(ConfigError::invalid("scan.timezone", "must not be empty"));
        }

        if self.interval_minutes == 0 || self.interval_minutes > MAX_INTERVAL_MINUTES {
            return Err(ConfigError::invalid(
                "scan.interval_minutes",
                format!("must be 1-{MAX_INTERVAL_MINUTES}"),
            ));
        }

        if self.search_timeout_secs == 0 {
            return Err(ConfigError::invalid(
                "scan.search_timeout_secs",
                "must be greater than 0",
            ));
        }

        Ok(())
    }
}

/// 메일 전송 백엔드
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MailBackend {
    /// SMTP 릴레이로 직접 전송 (기본값)
    #[default]
    Smtp,
    /// 호스트의 sendmail 호환 바이너리에 위임
    Sendmail,
}

impl fmt::Display for MailBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Smtp => f.write_str("SMTP"),
            Self::Sendmail => f.write_str("sendmail"),
        }
    }
}

impl FromStr for MailBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "smtp" => Ok(Self::Smtp),
            "sendmail" => Ok(Self::Sendmail),
            _ => Err(ConfigError::invalid(
                "mail.backend",
                format!("unknown backend '{s}' (expected: smtp, sendmail)"),
            )),
        }
    }
}

/// 메일 채널 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MailConfig {
    /// 전송 백엔드
    pub backend: MailBackend,
    /// SMTP 릴레이 호스트
    pub smtp_host: String,
    /// SMTP 릴레이 포트
    pub smtp_port: u16,
    /// sendmail 호환 바이너리
    pub sendmail_command: String,
    /// 전송 타임아웃 (초)
    pub timeout_secs: u64,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            backend: MailBackend::Smtp,
            smtp_host: "localhost".to_owned(),
            smtp_port: 25,
            sendmail_command: "sendmail".to_owned(),
            timeout_secs: 30,
        }
    }
}

impl MailConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        match self.backend {
            MailBackend::Smtp => {
                if self.smtp_host.is_empty() {
                    return Err(ConfigError::invalid("mail.smtp_host", "must not be empty"));
                }
                if self.smtp_port == 0 {
                    return Err(ConfigError::invalid("mail.smtp_port", "must not be 0"));
                }
            }
            MailBackend::Sendmail => {
                if self.sendmail_command.is_empty() {
                    return Err(ConfigError::invalid(
                        "mail.sendmail_command",
                        "must not be empty",
                    ));
                }
            }
        }

        if self.timeout_secs == 0 {
            return Err(ConfigError::invalid(
                "mail.timeout_secs",
                "must be greater than 0",
            ));
        }

        Ok(())
    }
}

/// 외부 로그 수집 API 인증 정보
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogApiCredentials {
    /// 수집 엔드포인트
    pub url: String,
    /// `X-License-Key` 헤더 값
    pub license_key: String,
}

/// 외부 로그 API 채널 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogApiConfig {
    /// 보조 채널 사용 여부
    pub enabled: bool,
    /// 수집 엔드포인트
    pub url: String,
    /// 라이선스 키 (설정 시 인증 파일보다 우선)
    pub license_key: Option<String>,
    /// 인증 파일 경로 (TOML)
    pub credentials_path: Option<String>,
    /// 인증 파일 안의 섹션 이름
    pub credentials_section: String,
    /// 요청 타임아웃 (초)
    pub timeout_secs: u64,
}

impl Default for LogApiConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            url: DEFAULT_LOG_API_URL.to_owned(),
            license_key: None,
            credentials_path: None,
            credentials_section: "newrelic".to_owned(),
            timeout_secs: 10,
        }
    }
}

impl LogApiConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if !self.enabled {
            return Ok(());
        }

        if !(self.url.starts_with("http://") || self.url.starts_with("https://")) {
            return Err(ConfigError::invalid(
                "log_api.url",
                "must start with http:// or https://",
            ));
        }

        if self.timeout_secs == 0 {
            return Err(ConfigError::invalid(
                "log_api.timeout_secs",
                "must be greater than 0",
            ));
        }

        Ok(())
    }

    /// 인증 정보를 해석합니다.
    ///
    /// 인라인 `license_key`가 우선이며, 없으면 인증 파일의
    /// `[credentials_section]` 테이블에서 `license_key`와 `url`을 읽습니다.
    /// 파일, 섹션, 키 중 하나라도 없으면 `None`을 반환합니다 (에러 아님).
    pub async fn credentials(&self) -> Option<LogApiCredentials> {
        if let Some(key) = self.license_key.as_deref().map(str::trim)
            && !key.is_empty()
        {
            return Some(LogApiCredentials {
                url: self.url.clone(),
                license_key: key.to_owned(),
            });
        }

        let path = self.credentials_path.as_deref()?;
        let content = match tokio::fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) => {
                debug!(path, error = %e, "log api credentials file not readable");
                return None;
            }
        };

        Self::credentials_from_toml(&content, &self.credentials_section, &self.url)
    }

    /// 인증 파일 내용에서 섹션을 찾아 인증 정보를 만듭니다.
    pub fn credentials_from_toml(
        content: &str,
        section: &str,
        default_url: &str,
    ) -> Option<LogApiCredentials> {
        let table: toml::Table = match toml::from_str(content) {
            Ok(table) => table,
            Err(e) => {
                warn!(error = %e, "failed to parse log api credentials file");
                return None;
            }
        };

        let section = table.get(section)?.as_table()?;
        let license_key = section.get("license_key")?.as_str()?.trim();
        if license_key.is_empty() {
            return None;
        }

        let url = section
            .get("url")
            .and_then(|v| v.as_str())
            .filter(|u| !u.is_empty())
            .unwrap_or(default_url);

        Some(LogApiCredentials {
            url: url.to_owned(),
            license_key: license_key.to_owned(),
        })
    }
}

// --- 환경변수 오버라이드 헬퍼 ---

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val;
    }
}

fn override_optional(target: &mut Option<String>, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = if val.is_empty() { None } else { Some(val) };
    }
}

fn override_parsed<T: FromStr>(target: &mut T, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<T>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse env var override, ignoring"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_sane_values() {
        let config = LogwatchConfig::default();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.scan.time_format, "%Y-%m-%d %H:%M");
        assert_eq!(config.scan.timezone, "UTC");
        assert_eq!(config.scan.interval_minutes, 5);
        assert_eq!(config.mail.backend, MailBackend::Smtp);
        assert_eq!(config.mail.smtp_host, "localhost");
        assert_eq!(config.mail.smtp_port, 25);
        assert!(!config.log_api.enabled);
        assert_eq!(config.log_api.url, DEFAULT_LOG_API_URL);
    }

    #[test]
    fn default_config_passes_validation() {
        LogwatchConfig::default().validate().unwrap();
    }

    #[test]
    fn partial_toml_merges_with_defaults() {
        let toml = r#"
[scan]
timezone = "Asia/Tokyo"
interval_minutes = 15
pattern_mode = "regex"

[mail]
backend = "sendmail"
"#;
        let config = LogwatchConfig::parse(toml).unwrap();
        assert_eq!(config.scan.timezone, "Asia/Tokyo");
        assert_eq!(config.scan.interval_minutes, 15);
        assert_eq!(config.scan.pattern_mode, PatternMode::Regex);
        // time_format은 기본값 유지
        assert_eq!(config.scan.time_format, "%Y-%m-%d %H:%M");
        assert_eq!(config.mail.backend, MailBackend::Sendmail);
        assert_eq!(config.mail.sendmail_command, "sendmail");
    }

    #[test]
    fn invalid_toml_returns_parse_error() {
        let err = LogwatchConfig::parse("invalid = [[[toml").unwrap_err();
        assert!(matches!(
            err,
            LogwatchError::Config(ConfigError::ParseFailed { .. })
        ));
    }

    #[test]
    fn unknown_backend_is_parse_error() {
        let err = LogwatchConfig::parse("[mail]\nbackend = \"pigeon\"").unwrap_err();
        assert!(matches!(
            err,
            LogwatchError::Config(ConfigError::ParseFailed { .. })
        ));
    }

    #[test]
    fn validate_rejects_zero_interval() {
        let mut config = LogwatchConfig::default();
        config.scan.interval_minutes = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("interval_minutes"));
    }

    #[test]
    fn validate_rejects_oversized_interval() {
        let mut config = LogwatchConfig::default();
        config.scan.interval_minutes = MAX_INTERVAL_MINUTES + 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_invalid_log_format() {
        let mut config = LogwatchConfig::default();
        config.general.log_format = "xml".to_owned();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("log_format"));
    }

    #[test]
    fn validate_rejects_empty_smtp_host_for_smtp_backend() {
        let mut config = LogwatchConfig::default();
        config.mail.smtp_host = String::new();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("smtp_host"));
    }

    #[test]
    fn validate_ignores_smtp_host_for_sendmail_backend() {
        let mut config = LogwatchConfig::default();
        config.mail.backend = MailBackend::Sendmail;
        config.mail.smtp_host = String::new();
        config.validate().unwrap();
    }

    #[test]
    fn validate_rejects_non_http_url_when_log_api_enabled() {
        let mut config = LogwatchConfig::default();
        config.log_api.enabled = true;
        config.log_api.url = "ftp://example.com".to_owned();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("log_api.url"));
    }

    #[test]
    fn enum_from_str_is_case_insensitive() {
        assert_eq!("SMTP".parse::<MailBackend>().unwrap(), MailBackend::Smtp);
        assert_eq!("Regex".parse::<PatternMode>().unwrap(), PatternMode::Regex);
        assert_eq!("FAIL".parse::<ReadErrorPolicy>().unwrap(), ReadErrorPolicy::Fail);
        assert!("pigeon".parse::<MailBackend>().is_err());
    }

    #[test]
    fn redacted_hides_license_key() {
        let mut config = LogwatchConfig::default();
        config.log_api.license_key = Some("secret-key".to_owned());
        let redacted = config.redacted();
        assert_ne!(redacted.log_api.license_key.as_deref(), Some("secret-key"));
        assert_eq!(config.log_api.license_key.as_deref(), Some("secret-key"));
    }

    #[test]
    fn credentials_from_toml_reads_section() {
        let content = r#"
[newrelic]
url = "https://log-api.eu.newrelic.com/log/v1"
license_key = "abc123"
"#;
        let creds =
            LogApiConfig::credentials_from_toml(content, "newrelic", DEFAULT_LOG_API_URL).unwrap();
        assert_eq!(creds.license_key, "abc123");
        assert_eq!(creds.url, "https://log-api.eu.newrelic.com/log/v1");
    }

    #[test]
    fn credentials_from_toml_defaults_url() {
        let content = "[newrelic]\nlicense_key = \"abc123\"\n";
        let creds =
            LogApiConfig::credentials_from_toml(content, "newrelic", DEFAULT_LOG_API_URL).unwrap();
        assert_eq!(creds.url, DEFAULT_LOG_API_URL);
    }

    #[test]
    fn credentials_from_toml_missing_key_is_none() {
        let content = "[newrelic]\nurl = \"https://example.com\"\n";
        assert!(
            LogApiConfig::credentials_from_toml(content, "newrelic", DEFAULT_LOG_API_URL).is_none()
        );
    }

    #[test]
    fn credentials_from_toml_missing_section_is_none() {
        let content = "[other]\nlicense_key = \"abc123\"\n";
        assert!(
            LogApiConfig::credentials_from_toml(content, "newrelic", DEFAULT_LOG_API_URL).is_none()
        );
    }

    #[test]
    fn credentials_from_toml_garbage_is_none() {
        assert!(
            LogApiConfig::credentials_from_toml("[[[", "newrelic", DEFAULT_LOG_API_URL).is_none()
        );
    }

    #[tokio::test]
    async fn inline_license_key_wins() {
        let config = LogApiConfig {
            license_key: Some("inline".to_owned()),
            credentials_path: Some("/nonexistent/credentials.toml".to_owned()),
            ..Default::default()
        };
        let creds = config.credentials().await.unwrap();
        assert_eq!(creds.license_key, "inline");
    }

    #[tokio::test]
    async fn missing_credentials_file_is_none() {
        let config = LogApiConfig {
            credentials_path: Some("/nonexistent/credentials.toml".to_owned()),
            ..Default::default()
        };
        assert!(config.credentials().await.is_none());
    }

    #[tokio::test]
    async fn no_credentials_configured_is_none() {
        assert!(LogApiConfig::default().credentials().await.is_none());
    }

    #[test]
    #[serial_test::serial]
    fn env_override_parsed_valid() {
        let mut val = 5u32;
        // SAFETY: serial 테스트로 직렬화되어 환경변수 조작이 안전합니다.
        unsafe { std::env::set_var("TEST_LOGWATCH_U32", "15") };
        override_parsed(&mut val, "TEST_LOGWATCH_U32");
        assert_eq!(val, 15);
        unsafe { std::env::remove_var("TEST_LOGWATCH_U32") };
    }

    #[test]
    #[serial_test::serial]
    fn env_override_parsed_invalid_keeps_original() {
        let mut val = MailBackend::Smtp;
        // SAFETY: serial 테스트로 직렬화되어 환경변수 조작이 안전합니다.
        unsafe { std::env::set_var("TEST_LOGWATCH_BACKEND", "pigeon") };
        override_parsed(&mut val, "TEST_LOGWATCH_BACKEND");
        assert_eq!(val, MailBackend::Smtp);
        unsafe { std::env::remove_var("TEST_LOGWATCH_BACKEND") };
    }

    #[test]
    #[serial_test::serial]
    fn env_override_optional_empty_clears() {
        let mut val = Some("key".to_owned());
        // SAFETY: serial 테스트로 직렬화되어 환경변수 조작이 안전합니다.
        unsafe { std::env::set_var("TEST_LOGWATCH_OPT", "") };
        override_optional(&mut val, "TEST_LOGWATCH_OPT");
        assert!(val.is_none());
        unsafe { std::env::remove_var("TEST_LOGWATCH_OPT") };
    }
}
