//! 알림 디스패처 -- 억제되지 않은 리포트를 채널로 전송
//!
//! 메일(기본 채널)을 먼저 보내고, 요청된 경우 외부 로그 API(보조 채널)를
//! 이어서 호출합니다. 두 채널은 순차적으로 실행됩니다.
//!
//! | 채널 | 실패 시 |
//! |------|---------|
//! | 메일 | 에러 반환 (실행 실패) |
//! | 로그 API | 기록 후 무시 |
//!
//! 메일이 실패해도 보조 채널은 시도하며, 메일 에러는 그 뒤에 반환합니다.

use std::time::Duration;

use serde::Serialize;
use tracing::{error, info, warn};

use logwatch_core::config::{LogApiConfig, MailBackend};
use logwatch_core::types::ScanReport;

use crate::error::DispatchError;
use crate::log_api::{HttpLogIngest, LogIngest, build_payload};
use crate::mail::{MailMessage, Mailer, build_subject, local_hostname, parse_recipients};

/// 보조 채널 상태
pub enum SecondaryChannel<L> {
    /// 요청되지 않음
    Off,
    /// 요청되었으나 라이선스 키가 없음 (네트워크 호출 없음)
    MissingCredentials,
    /// 활성
    On(L),
}

impl SecondaryChannel<HttpLogIngest> {
    /// 설정과 요청 여부로 보조 채널을 구성합니다.
    ///
    /// 인증 정보가 없거나 클라이언트를 만들 수 없으면 채널이 꺼질 뿐
    /// 에러를 반환하지 않습니다.
    pub async fn from_config(config: &LogApiConfig, requested: bool) -> Self {
        if !requested {
            return Self::Off;
        }

        let Some(credentials) = config.credentials().await else {
            return Self::MissingCredentials;
        };

        match HttpLogIngest::new(credentials, Duration::from_secs(config.timeout_secs)) {
            Ok(ingest) => Self::On(ingest),
            Err(e) => {
                warn!(error = %e, "log api channel unavailable");
                Self::Off
            }
        }
    }
}

/// 보조 채널 결과
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum LogApiOutcome {
    /// 요청되지 않음
    Disabled,
    /// 건너뜀
    Skipped {
        /// 사유
        reason: String,
    },
    /// 전송 성공
    Sent {
        /// HTTP 상태 코드
        status: u16,
    },
    /// 전송 실패 (실행에는 영향 없음)
    Failed {
        /// 사유
        reason: String,
    },
}

/// 디스패치 결과
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DispatchOutcome {
    /// 메일 전송에 사용한 백엔드
    pub mail_backend: MailBackend,
    /// 메일 수신자
    pub recipients: Vec<String>,
    /// 보조 채널 결과
    pub log_api: LogApiOutcome,
}

/// 알림 디스패처
pub struct AlertDispatcher<M: Mailer, L: LogIngest> {
    mailer: M,
    secondary: SecondaryChannel<L>,
    hostname: String,
    recipients: Vec<String>,
    from: String,
}

impl<M: Mailer, L: LogIngest> AlertDispatcher<M, L> {
    /// 빌더를 생성합니다.
    pub fn builder(mailer: M) -> AlertDispatcherBuilder<M, L> {
        AlertDispatcherBuilder::new(mailer)
    }

    /// 메일 수신자
    pub fn recipients(&self) -> &[String] {
        &self.recipients
    }

    /// 리포트로 메일 메시지를 만듭니다.
    pub fn compose(&self, report: &ScanReport) -> MailMessage {
        MailMessage {
            subject: build_subject(&self.hostname, &report.pattern, &report.paths()),
            body: report.render(),
            from: self.from.clone(),
            to: self.recipients.clone(),
        }
    }

    /// 리포트를 전송합니다.
    ///
    /// # Errors
    ///
    /// 메일 전송이 실패하면 보조 채널을 시도한 뒤 메일 에러를 반환합니다.
    pub async fn dispatch(&self, report: &ScanReport) -> Result<DispatchOutcome, DispatchError> {
        let message = self.compose(report);
        let backend = self.mailer.backend();

        let mail_result = self.mailer.send(&message).await;
        match &mail_result {
            Ok(()) => info!(
                backend = %backend,
                recipients = %self.recipients.join(","),
                subject = %message.subject,
                "alert mail sent"
            ),
            Err(e) => error!(backend = %backend, error = %e, "alert mail failed"),
        }

        let log_api = self.send_secondary(report).await;
        mail_result?;

        Ok(DispatchOutcome {
            mail_backend: backend,
            recipients: self.recipients.clone(),
            log_api,
        })
    }

    async fn send_secondary(&self, report: &ScanReport) -> LogApiOutcome {
        match &self.secondary {
            SecondaryChannel::Off => LogApiOutcome::Disabled,
            SecondaryChannel::MissingCredentials => {
                info!("log api requested but no license key configured, skipping");
                LogApiOutcome::Skipped {
                    reason: "no license key configured".to_owned(),
                }
            }
            SecondaryChannel::On(ingest) => {
                let payload = build_payload(report, &self.hostname);
                match ingest.ingest(&payload).await {
                    Ok(status) => {
                        info!(status, "report posted to log api");
                        LogApiOutcome::Sent { status }
                    }
                    Err(e) => {
                        warn!(error = %e, "log api post failed, continuing");
                        LogApiOutcome::Failed {
                            reason: e.to_string(),
                        }
                    }
                }
            }
        }
    }
}

/// 디스패처 빌더
pub struct AlertDispatcherBuilder<M: Mailer, L: LogIngest> {
    mailer: M,
    secondary: SecondaryChannel<L>,
    hostname: Option<String>,
    recipients: Vec<String>,
    from: String,
}

impl<M: Mailer, L: LogIngest> AlertDispatcherBuilder<M, L> {
    fn new(mailer: M) -> Self {
        Self {
            mailer,
            secondary: SecondaryChannel::Off,
            hostname: None,
            recipients: Vec::new(),
            from: String::new(),
        }
    }

    /// 쉼표로 구분된 수신자 목록을 설정합니다.
    pub fn recipients(mut self, csv: &str) -> Self {
        self.recipients = parse_recipients(csv);
        self
    }

    /// 발신 주소를 설정합니다.
    pub fn from(mut self, from: impl Into<String>) -> Self {
        self.from = from.into();
        self
    }

    /// 제목과 로그 속성에 쓸 호스트 이름을 설정합니다. 기본값은 로컬 호스트 이름입니다.
    pub fn hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = Some(hostname.into());
        self
    }

    /// 보조 채널을 설정합니다.
    pub fn secondary(mut self, secondary: SecondaryChannel<L>) -> Self {
        self.secondary = secondary;
        self
    }

    /// 디스패처를 생성합니다.
    ///
    /// # Errors
    ///
    /// 수신자가 없으면 `DispatchError::NoRecipients`를 반환합니다.
    pub fn build(self) -> Result<AlertDispatcher<M, L>, DispatchError> {
        if self.recipients.is_empty() {
            return Err(DispatchError::NoRecipients);
        }

        Ok(AlertDispatcher {
            mailer: self.mailer,
            secondary: self.secondary,
            hostname: self.hostname.unwrap_or_else(local_hostname),
            recipients: self.recipients,
            from: self.from,
        })
    }
}
