//! 도메인 타입 -- 스캔 요청부터 알림 판정까지 공유되는 데이터 구조
//!
//! 모든 타입은 한 번의 실행(run) 범위에서만 존재합니다.
//! 실행 간에 유지되는 상태(중복 제거 기록, 파일 오프셋 등)는 없습니다.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::PatternMode;
use crate::error::ConfigError;

/// 스캔 요청
///
/// 한 번의 실행에서 검사할 파일 목록과 패턴, 시간 윈도우 파라미터를 담습니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanRequest {
    /// 검사할 로그 파일 (입력 순서 유지)
    pub files: Vec<PathBuf>,
    /// 검색어
    pub pattern: String,
    /// 검색어 해석 방식 (literal / regex)
    pub pattern_mode: PatternMode,
    /// 윈도우 키 생성과 매칭에 함께 쓰이는 strftime 형식
    pub time_format: String,
    /// IANA 타임존 식별자
    pub timezone: String,
    /// 되돌아볼 분 수
    pub interval_minutes: u32,
}

impl ScanRequest {
    /// 쉼표로 구분된 파일 목록을 파싱합니다.
    ///
    /// 앞뒤 공백은 제거하고, 빈 항목은 건너뜁니다.
    pub fn parse_files(csv: &str) -> Vec<PathBuf> {
        csv.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
            .collect()
    }

    /// 요청 불변식을 검증합니다.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.files.is_empty() {
            return Err(ConfigError::invalid("files", "at least one file is required"));
        }

        if self.interval_minutes == 0 {
            return Err(ConfigError::invalid(
                "interval_minutes",
                "must be greater than 0",
            ));
        }

        if self.time_format.is_empty() {
            return Err(ConfigError::invalid("time_format", "must not be empty"));
        }

        if self.timezone.is_empty() {
            return Err(ConfigError::invalid("timezone", "must not be empty"));
        }

        Ok(())
    }
}

/// 윈도우 키
///
/// 되돌아보기 구간 안의 한 분을 `time_format`으로 포맷한 문자열입니다.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WindowKey(String);

impl WindowKey {
    /// 포맷된 타임스탬프로 키를 만듭니다.
    pub fn new(formatted: impl Into<String>) -> Self {
        Self(formatted.into())
    }

    /// 키 문자열을 반환합니다.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WindowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 한 윈도우 키에 대한 매칭 결과
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowHits {
    /// 검색에 사용한 윈도우 키
    pub key: WindowKey,
    /// 매칭된 원본 로그 라인
    pub lines: Vec<String>,
}

impl WindowHits {
    /// 매칭된 라인이 있는지 확인합니다.
    pub fn is_hit(&self) -> bool {
        !self.lines.is_empty()
    }
}

/// 파일 하나의 스캔 결과
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileReport {
    /// 절대 경로
    pub path: PathBuf,
    /// 리포트 헤딩 라인
    pub heading: String,
    /// 윈도우 키별 결과 (오래된 순)
    pub windows: Vec<WindowHits>,
    /// 파일을 읽지 못한 경우의 사유
    pub read_error: Option<String>,
}

impl FileReport {
    /// 이 파일에서 매칭된 라인 수
    pub fn match_count(&self) -> usize {
        self.windows.iter().map(|w| w.lines.len()).sum()
    }

    /// 윈도우 순서대로 매칭된 라인을 순회합니다.
    pub fn matched_lines(&self) -> impl Iterator<Item = &str> {
        self.windows
            .iter()
            .flat_map(|w| w.lines.iter().map(String::as_str))
    }
}

/// 스캔 리포트
///
/// 파일별 헤딩과 매칭 라인을 누적한 결과입니다. 억제 여부는 헤딩 문자열이 아니라
/// [`ScanReport::match_count`]로 판단합니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanReport {
    /// 검색어
    pub pattern: String,
    /// 타임존
    pub timezone: String,
    /// 되돌아본 분 수
    pub interval_minutes: u32,
    /// 실행 시점 (`%H:%M`, 타임존 기준)
    pub since: String,
    /// 파일별 결과 (입력 순서)
    pub files: Vec<FileReport>,
}

impl ScanReport {
    /// 파일 헤딩 라인을 만듭니다.
    pub fn format_heading(
        pattern: &str,
        abspath: &str,
        interval_minutes: u32,
        since: &str,
        timezone: &str,
    ) -> String {
        format!(
            "### Looking for {pattern} log in {abspath} the last {interval_minutes} minutes since {since} {timezone} ###"
        )
    }

    /// 전체 매칭 라인 수
    pub fn match_count(&self) -> usize {
        self.files.iter().map(FileReport::match_count).sum()
    }

    /// 매칭된 라인이 하나라도 있는지 확인합니다.
    pub fn has_matches(&self) -> bool {
        self.match_count() > 0
    }

    /// 스캔한 파일의 절대 경로 목록
    pub fn paths(&self) -> Vec<String> {
        self.files
            .iter()
            .map(|f| f.path.display().to_string())
            .collect()
    }

    /// 사람이 읽는 텍스트 리포트를 만듭니다.
    ///
    /// 파일마다 헤딩 한 줄 뒤에 매칭 라인이 이어집니다.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for file in &self.files {
            out.push_str(&file.heading);
            out.push('\n');
            for line in file.matched_lines() {
                out.push_str(line);
                out.push('\n');
            }
        }
        out
    }
}

/// 억제 게이트 판정
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    /// 알림 전송
    Send,
    /// 매칭 없음 -- 알림 억제
    Suppress,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Send => f.write_str("send"),
            Self::Suppress => f.write_str("suppress"),
        }
    }
}
