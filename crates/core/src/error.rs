//! 에러 타입 -- 도메인별 에러 정의

/// logwatch 최상위 에러 타입
///
/// 각 크레이트의 도메인 에러는 `From` 구현을 통해 이 타입으로 변환됩니다.
#[derive(Debug, thiserror::Error)]
pub enum LogwatchError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// 로그 스캔 에러
    #[error("scan error: {0}")]
    Scan(String),

    /// 알림 전송 에러
    #[error("dispatch error: {0}")]
    Dispatch(String),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 설정 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 설정 파일을 찾을 수 없음
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// 설정 파싱 실패
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// 유효하지 않은 설정 값
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

impl ConfigError {
    /// `InvalidValue` 에러를 생성하는 헬퍼
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }
}
