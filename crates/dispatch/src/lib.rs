//! # logwatch-dispatch
//!
//! 억제되지 않은 스캔 리포트를 알림 채널로 전송합니다.
//!
//! - [`mail`]: 기본 채널. SMTP 릴레이 또는 sendmail 바이너리 (설정으로 선택)
//! - [`log_api`]: 보조 채널. 외부 로그 수집 HTTP API
//! - [`dispatcher`]: 채널 순서와 실패 격리
//!
//! # 사용 예시
//!
//! ```ignore
//! use logwatch_dispatch::{AlertDispatcher, MailTransport, SecondaryChannel};
//!
//! let dispatcher = AlertDispatcher::builder(MailTransport::from_config(&config.mail))
//!     .recipients("ops@example.com")
//!     .from("logwatch@example.com")
//!     .secondary(SecondaryChannel::from_config(&config.log_api, true).await)
//!     .build()?;
//! let outcome = dispatcher.dispatch(&report).await?;
//! ```

pub mod dispatcher;
pub mod error;
pub mod log_api;
pub mod mail;

pub use dispatcher::{
    AlertDispatcher, AlertDispatcherBuilder, DispatchOutcome, LogApiOutcome, SecondaryChannel,
};
pub use error::DispatchError;
pub use log_api::{HttpLogIngest, LogBatch, LogIngest, build_payload};
pub use mail::{
    MailMessage, MailTransport, Mailer, SendmailMailer, SmtpMailer, build_subject,
    local_hostname, parse_recipients,
};
