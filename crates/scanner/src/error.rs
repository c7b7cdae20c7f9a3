//! 스캐너 에러 타입
//!
//! [`ScanError`]는 윈도우 생성과 파일 검색 중 발생하는 모든 에러를 표현합니다.
//! `From<ScanError> for LogwatchError` 변환이 구현되어 있어
//! 상위 레이어에서 `?` 연산자로 전파할 수 있습니다.

use std::path::PathBuf;

use logwatch_core::error::{ConfigError, LogwatchError};

/// 스캐너 도메인 에러
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    /// 알 수 없는 IANA 타임존
    #[error("unknown timezone: {0}")]
    UnknownTimezone(String),

    /// 해석할 수 없는 strftime 형식
    #[error("invalid time format '{format}': {reason}")]
    InvalidTimeFormat {
        /// 문제가 된 형식 문자열
        format: String,
        /// 실패 사유
        reason: String,
    },

    /// 검색 토큰 정규식 컴파일 실패
    #[error("invalid search pattern '{pattern}': {source}")]
    InvalidPattern {
        /// 문제가 된 검색어
        pattern: String,
        /// 정규식 에러
        #[source]
        source: regex::Error,
    },

    /// 요청 검증 실패
    #[error("invalid scan request: {0}")]
    InvalidRequest(#[from] ConfigError),

    /// 파일 읽기 실패
    #[error("failed to read {path}: {source}")]
    Io {
        /// 대상 파일
        path: PathBuf,
        /// I/O 에러
        #[source]
        source: std::io::Error,
    },

    /// 검색 타임아웃
    #[error("search in {path} timed out after {secs}s")]
    Timeout {
        /// 대상 파일
        path: PathBuf,
        /// 허용 시간 (초)
        secs: u64,
    },
}

impl ScanError {
    /// 스캔 시작 전에 발생하는 설정 계열 에러인지 확인합니다.
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            Self::UnknownTimezone(_)
                | Self::InvalidTimeFormat { .. }
                | Self::InvalidPattern { .. }
                | Self::InvalidRequest(_)
        )
    }
}

impl From<ScanError> for LogwatchError {
    fn from(err: ScanError) -> Self {
        match err {
            ScanError::InvalidRequest(config) => LogwatchError::Config(config),
            ScanError::UnknownTimezone(tz) => LogwatchError::Config(ConfigError::invalid(
                "timezone",
                format!("unknown timezone: {tz}"),
            )),
            other => LogwatchError::Scan(other.to_string()),
        }
    }
}
