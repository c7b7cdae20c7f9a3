//! # logwatch-scanner
//!
//! 시간 윈도우 기반 로그 스캐너입니다.
//!
//! # 아키텍처
//!
//! ```text
//! WindowGenerator --> ScanWindow --> LogScanner<TextSearch> --> ScanReport --> evaluate --> Verdict
//! ```
//!
//! - [`window`]: "최근 N분" 윈도우 키 생성
//! - [`search`]: 윈도우 키 + 검색어 토큰과 파일 검색 trait
//! - [`scanner`]: 파일별 매칭 수집과 리포트 조립
//! - [`gate`]: 매칭 수 기반 억제 판정

pub mod error;
pub mod gate;
pub mod scanner;
pub mod search;
pub mod window;

pub use error::ScanError;
pub use gate::evaluate;
pub use scanner::LogScanner;
pub use search::{FileTextSearch, SearchToken, TextSearch};
pub use window::{ScanWindow, WindowGenerator, resolve_timezone, validate_time_format};
