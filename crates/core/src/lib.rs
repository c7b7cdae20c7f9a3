//! logwatch 공통 크레이트
//!
//! 스캐너(`logwatch-scanner`)와 디스패처(`logwatch-dispatch`), CLI가 공유하는
//! 타입, 에러, 설정을 정의합니다.
//!
//! # 모듈 구성
//!
//! - [`types`]: 스캔 요청, 윈도우 키, 스캔 리포트, 억제 판정
//! - [`config`]: `logwatch.toml` 파싱 및 환경변수 오버라이드
//! - [`error`]: 최상위 에러 타입

pub mod config;
pub mod error;
pub mod types;

// --- 주요 타입 re-export ---

// 에러
pub use error::{ConfigError, LogwatchError};

// 설정
pub use config::{
    GeneralConfig, LogApiConfig, LogwatchConfig, MailBackend, MailConfig, PatternMode,
    ReadErrorPolicy, ScanConfig,
};

// 도메인 타입
pub use types::{FileReport, ScanReport, ScanRequest, Verdict, WindowHits, WindowKey};
