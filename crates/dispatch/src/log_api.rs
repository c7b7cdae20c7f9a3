//! 외부 로그 수집 API 채널 -- 보조(secondary) 알림 경로
//!
//! 매칭된 라인을 New Relic Log API 형식의 JSON으로 POST합니다.
//!
//! ```json
//! [{
//!   "common": { "attributes": { "logtype": "<pattern>", "hostname": "<host>" } },
//!   "logs": [ { "message": "<line>" } ]
//! }]
//! ```
//!
//! 이 채널의 실패는 디스패처가 기록만 하고 버립니다.

use std::future::Future;
use std::time::Duration;

use reqwest::Client;
use serde::Serialize;

use logwatch_core::config::LogApiCredentials;
use logwatch_core::types::ScanReport;

use crate::error::DispatchError;

/// 인증 헤더 이름
pub const LICENSE_KEY_HEADER: &str = "X-License-Key";

/// 로그 배치 하나
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogBatch {
    /// 배치 공통 속성
    pub common: LogCommon,
    /// 로그 라인
    pub logs: Vec<LogLine>,
}

/// 배치 공통 블록
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogCommon {
    /// 속성
    pub attributes: LogAttributes,
}

/// 배치 공통 속성
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogAttributes {
    /// 검색어
    pub logtype: String,
    /// 전송 호스트
    pub hostname: String,
}

/// 로그 라인 하나
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogLine {
    /// 원본 라인
    pub message: String,
}

/// 리포트로 API 페이로드를 만듭니다.
///
/// 헤딩 라인은 제외하고 매칭된 라인만 담은 배치 하나를 반환합니다.
pub fn build_payload(report: &ScanReport, hostname: &str) -> Vec<LogBatch> {
    let logs = report
        .files
        .iter()
        .flat_map(|f| f.matched_lines())
        .map(|line| LogLine {
            message: line.to_owned(),
        })
        .collect();

    vec![LogBatch {
        common: LogCommon {
            attributes: LogAttributes {
                logtype: report.pattern.clone(),
                hostname: hostname.to_owned(),
            },
        },
        logs,
    }]
}

/// 로그 수집 API 추상화
pub trait LogIngest: Send + Sync {
    /// 페이로드를 전송하고 HTTP 상태 코드를 반환합니다.
    ///
    /// # Errors
    ///
    /// 요청이 실패하거나 2xx가 아닌 응답이면 `DispatchError::LogApi`를 반환합니다.
    fn ingest(&self, payload: &[LogBatch]) -> impl Future<Output = Result<u16, DispatchError>> + Send;
}

/// reqwest 기반 HTTP 구현
#[derive(Debug, Clone)]
pub struct HttpLogIngest {
    client: Client,
    url: String,
    license_key: String,
}

impl HttpLogIngest {
    /// 인증 정보와 요청 타임아웃으로 클라이언트를 만듭니다.
    pub fn new(credentials: LogApiCredentials, timeout: Duration) -> Result<Self, DispatchError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DispatchError::LogApi(format!("failed to build http client: {e}")))?;

        Ok(Self {
            client,
            url: credentials.url,
            license_key: credentials.license_key,
        })
    }

    /// 대상 엔드포인트
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl LogIngest for HttpLogIngest {
    async fn ingest(&self, payload: &[LogBatch]) -> Result<u16, DispatchError> {
        let response = self
            .client
            .post(&self.url)
            .header(LICENSE_KEY_HEADER, &self.license_key)
            .json(payload)
            .send()
            .await
            .map_err(|e| DispatchError::LogApi(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DispatchError::LogApi(format!(
                "unexpected status {status} from {}",
                self.url
            )));
        }

        Ok(status.as_u16())
    }
}
