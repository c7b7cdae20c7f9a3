//! 알림 전송 에러 타입
//!
//! 메일 채널 에러([`DispatchError::is_mail`])는 실행을 실패시키고,
//! 로그 API 에러는 디스패처 안에서 기록된 뒤 버려집니다.

use logwatch_core::error::LogwatchError;

/// 알림 전송 도메인 에러
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// 수신자 목록이 비어 있음
    #[error("no recipients given")]
    NoRecipients,

    /// 메일 주소 파싱 실패
    #[error("invalid email address '{address}': {reason}")]
    InvalidAddress {
        /// 문제가 된 주소
        address: String,
        /// 실패 사유
        reason: String,
    },

    /// 메일 메시지 조립 실패
    #[error("failed to build mail message: {0}")]
    MessageBuild(String),

    /// SMTP 전송 실패
    #[error("smtp delivery failed: {0}")]
    Smtp(String),

    /// sendmail 전송 실패
    #[error("sendmail delivery failed: {0}")]
    Sendmail(String),

    /// 메일 전송 타임아웃
    #[error("mail delivery timed out after {secs}s")]
    Timeout {
        /// 허용 시간 (초)
        secs: u64,
    },

    /// 외부 로그 API 요청 실패
    #[error("log api request failed: {0}")]
    LogApi(String),
}

impl DispatchError {
    /// 메일 채널에서 발생한 에러인지 확인합니다.
    pub fn is_mail(&self) -> bool {
        !matches!(self, Self::LogApi(_))
    }
}

impl From<DispatchError> for LogwatchError {
    fn from(err: DispatchError) -> Self {
        LogwatchError::Dispatch(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mail_errors_are_classified() {
        assert!(DispatchError::Smtp("refused".to_owned()).is_mail());
        assert!(DispatchError::NoRecipients.is_mail());
        assert!(DispatchError::Timeout { secs: 30 }.is_mail());
        assert!(!DispatchError::LogApi("503".to_owned()).is_mail());
    }

    #[test]
    fn converts_to_logwatch_error() {
        let err: LogwatchError = DispatchError::Sendmail("exit status 75".to_owned()).into();
        assert!(matches!(err, LogwatchError::Dispatch(_)));
        assert!(err.to_string().contains("exit status 75"));
    }
}
