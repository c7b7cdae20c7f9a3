//! 메일 채널 -- 기본(primary) 알림 경로
//!
//! [`Mailer`] trait은 메일 전송을 추상화합니다. 백엔드는 설정의
//! [`MailBackend`]로 명시적으로 선택합니다.
//!
//! - [`SmtpMailer`]: SMTP 릴레이(기본 `localhost:25`)로 직접 전송
//! - [`SendmailMailer`]: 호스트의 sendmail 호환 바이너리에 위임
//!
//! 메일 전송 실패는 실행 전체를 실패시킵니다.

use std::future::Future;
use std::time::Duration;

use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::{AsyncSendmailTransport, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::debug;

use logwatch_core::config::{MailBackend, MailConfig};

use crate::error::DispatchError;

/// 제목 접두사
const SUBJECT_TAG: &str = "[logwatch]";

/// 로컬 호스트 이름을 반환합니다. 조회에 실패하면 `"unknown"`입니다.
pub fn local_hostname() -> String {
    hostname::get()
        .map(|h| h.to_string_lossy().to_string())
        .unwrap_or_else(|_| "unknown".to_string())
}

/// 쉼표로 구분된 수신자 목록을 파싱합니다. 빈 항목은 버립니다.
pub fn parse_recipients(csv: &str) -> Vec<String> {
    csv.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}

/// 알림 메일 제목을 만듭니다.
///
/// `[logwatch][<hostname>] <pattern> REPORT at <path>, <path>...`
pub fn build_subject(hostname: &str, pattern: &str, paths: &[String]) -> String {
    format!(
        "{SUBJECT_TAG}[{hostname}] {pattern} REPORT at {}",
        paths.join(", ")
    )
}

/// 전송할 메일
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailMessage {
    /// 제목
    pub subject: String,
    /// 평문 본문 (렌더링된 리포트)
    pub body: String,
    /// 발신 주소
    pub from: String,
    /// 수신 주소
    pub to: Vec<String>,
}

impl MailMessage {
    /// 주소를 검증하고 text/plain MIME 메시지로 조립합니다.
    pub fn to_email(&self) -> Result<Message, DispatchError> {
        if self.to.is_empty() {
            return Err(DispatchError::NoRecipients);
        }

        let mut builder = Message::builder()
            .from(parse_mailbox(&self.from)?)
            .subject(self.subject.as_str())
            .header(ContentType::TEXT_PLAIN);
        for address in &self.to {
            builder = builder.to(parse_mailbox(address)?);
        }

        builder
            .body(self.body.clone())
            .map_err(|e| DispatchError::MessageBuild(e.to_string()))
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, DispatchError> {
    address
        .parse::<Mailbox>()
        .map_err(|e| DispatchError::InvalidAddress {
            address: address.to_owned(),
            reason: e.to_string(),
        })
}

/// 메일 전송 추상화
pub trait Mailer: Send + Sync {
    /// 사용하는 백엔드
    fn backend(&self) -> MailBackend;

    /// 메일을 전송합니다.
    ///
    /// # Errors
    ///
    /// 주소가 잘못되었거나 전송이 실패하면 에러를 반환합니다.
    fn send(&self, message: &MailMessage) -> impl Future<Output = Result<(), DispatchError>> + Send;
}

/// SMTP 릴레이 전송
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    host: String,
    port: u16,
}

impl SmtpMailer {
    /// 평문 SMTP 릴레이 전송기를 생성합니다.
    ///
    /// 로컬 릴레이를 가정하므로 TLS를 사용하지 않습니다.
    pub fn new(host: impl Into<String>, port: u16, timeout: Duration) -> Self {
        let host = host.into();
        let transport = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host.as_str())
            .port(port)
            .timeout(Some(timeout))
            .build();

        Self {
            transport,
            host,
            port,
        }
    }
}

impl Mailer for SmtpMailer {
    fn backend(&self) -> MailBackend {
        MailBackend::Smtp
    }

    async fn send(&self, message: &MailMessage) -> Result<(), DispatchError> {
        let email = message.to_email()?;
        let response = self
            .transport
            .send(email)
            .await
            .map_err(|e| DispatchError::Smtp(e.to_string()))?;

        debug!(
            host = %self.host,
            port = self.port,
            code = %response.code(),
            "smtp relay accepted message"
        );
        Ok(())
    }
}

/// sendmail 호환 바이너리 전송
pub struct SendmailMailer {
    transport: AsyncSendmailTransport<Tokio1Executor>,
    timeout: Duration,
}

impl SendmailMailer {
    /// 지정한 명령으로 전송기를 생성합니다.
    pub fn new(command: impl Into<String>, timeout: Duration) -> Self {
        Self {
            transport: AsyncSendmailTransport::<Tokio1Executor>::new_with_command(command.into()),
            timeout,
        }
    }
}

impl Mailer for SendmailMailer {
    fn backend(&self) -> MailBackend {
        MailBackend::Sendmail
    }

    async fn send(&self, message: &MailMessage) -> Result<(), DispatchError> {
        let email = message.to_email()?;
        match tokio::time::timeout(self.timeout, self.transport.send(email)).await {
            Ok(result) => result.map_err(|e| DispatchError::Sendmail(e.to_string())),
            Err(_) => Err(DispatchError::Timeout {
                secs: self.timeout.as_secs(),
            }),
        }
    }
}

/// 설정으로 선택된 메일 백엔드
pub enum MailTransport {
    /// SMTP 릴레이
    Smtp(SmtpMailer),
    /// sendmail 바이너리
    Sendmail(SendmailMailer),
}

impl MailTransport {
    /// 메일 설정에 따라 백엔드를 만듭니다.
    pub fn from_config(config: &MailConfig) -> Self {
        let timeout = Duration::from_secs(config.timeout_secs);
        match config.backend {
            MailBackend::Smtp => {
                Self::Smtp(SmtpMailer::new(&config.smtp_host, config.smtp_port, timeout))
            }
            MailBackend::Sendmail => {
                Self::Sendmail(SendmailMailer::new(&config.sendmail_command, timeout))
            }
        }
    }
}

impl Mailer for MailTransport {
    fn backend(&self) -> MailBackend {
        match self {
            Self::Smtp(m) => m.backend(),
            Self::Sendmail(m) => m.backend(),
        }
    }

    async fn send(&self, message: &MailMessage) -> Result<(), DispatchError> {
        match self {
            Self::Smtp(m) => m.send(message).await,
            Self::Sendmail(m) => m.send(message).await,
        }
    }
}
