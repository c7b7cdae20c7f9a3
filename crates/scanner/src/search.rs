//! 텍스트 검색 -- 윈도우 키와 검색어를 결합한 토큰으로 로그 라인을 찾습니다.
//!
//! [`TextSearch`] trait은 파일 검색을 추상화하여, 운영 코드는
//! [`FileTextSearch`]를, 테스트는 메모리 기반 구현을 사용할 수 있게 합니다.
//!
//! # 검색 토큰
//!
//! ```text
//! escape(window_key) ":" ".*" pattern
//! ```
//!
//! 키 뒤에 `:`를 붙여 `HH:MM` 키가 다른 위치의 `MM:SS`와 매칭되지 않도록 합니다.

use std::future::Future;
use std::path::Path;
use std::time::Duration;

use regex::Regex;
use tokio::io::{AsyncBufReadExt, BufReader};

use logwatch_core::config::PatternMode;
use logwatch_core::types::WindowKey;

use crate::error::ScanError;

/// 윈도우 키와 검색어를 결합한 검색 토큰
#[derive(Debug, Clone)]
pub struct SearchToken {
    key: WindowKey,
    regex: Regex,
}

impl SearchToken {
    /// 윈도우 키와 검색어로 토큰을 만듭니다.
    ///
    /// `Literal` 모드에서는 검색어를 이스케이프하고, `Regex` 모드에서는
    /// 비캡처 그룹으로 감싸 대안(`|`)이 키 조건을 벗어나지 않게 합니다.
    pub fn build(key: &WindowKey, pattern: &str, mode: PatternMode) -> Result<Self, ScanError> {
        let pattern_expr = match mode {
            PatternMode::Literal => regex::escape(pattern),
            PatternMode::Regex => format!("(?:{pattern})"),
        };
        let expr = format!("{}:.*{}", regex::escape(key.as_str()), pattern_expr);

        let regex = Regex::new(&expr).map_err(|source| ScanError::InvalidPattern {
            pattern: pattern.to_owned(),
            source,
        })?;

        Ok(Self {
            key: key.clone(),
            regex,
        })
    }

    /// 토큰을 만든 윈도우 키
    pub fn key(&self) -> &WindowKey {
        &self.key
    }

    /// 컴파일된 정규식 문자열
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    /// 라인이 토큰에 매칭되는지 확인합니다.
    pub fn is_match(&self, line: &str) -> bool {
        self.regex.is_match(line)
    }
}

/// 파일 검색 추상화
///
/// 파일 하나에 대해 모든 토큰을 한 번에 검색하고, 토큰 순서와 같은 순서로
/// 토큰별 매칭 라인을 반환합니다.
///
/// # Errors
///
/// 파일을 열거나 읽을 수 없으면 `ScanError::Io`, 허용 시간을 넘기면
/// `ScanError::Timeout`을 반환합니다.
pub trait TextSearch: Send + Sync {
    /// 파일에서 각 토큰에 매칭되는 라인을 찾습니다.
    fn search(
        &self,
        path: &Path,
        tokens: &[SearchToken],
    ) -> impl Future<Output = Result<Vec<Vec<String>>, ScanError>> + Send;
}

/// 파일 기반 검색 구현
///
/// 파일을 한 번만 스트리밍으로 읽으며 모든 토큰을 평가합니다.
/// UTF-8이 아닌 바이트는 손실 변환하므로 바이너리 조각이 섞인 로그도 검색할 수 있습니다.
#[derive(Debug, Clone)]
pub struct FileTextSearch {
    timeout: Duration,
}

impl FileTextSearch {
    /// 파일당 검색 허용 시간을 지정해 생성합니다.
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for FileTextSearch {
    fn default() -> Self {
        Self::new(Duration::from_secs(30))
    }
}

impl TextSearch for FileTextSearch {
    async fn search(
        &self,
        path: &Path,
        tokens: &[SearchToken],
    ) -> Result<Vec<Vec<String>>, ScanError> {
        match tokio::time::timeout(self.timeout, scan_lines(path, tokens)).await {
            Ok(result) => result,
            Err(_) => Err(ScanError::Timeout {
                path: path.to_path_buf(),
                secs: self.timeout.as_secs(),
            }),
        }
    }
}

async fn scan_lines(path: &Path, tokens: &[SearchToken]) -> Result<Vec<Vec<String>>, ScanError> {
    let io_err = |source| ScanError::Io {
        path: path.to_path_buf(),
        source,
    };

    let file = tokio::fs::File::open(path).await.map_err(io_err)?;
    let mut reader = BufReader::new(file);
    let mut hits = vec![Vec::new(); tokens.len()];
    let mut buf = Vec::new();

    loop {
        buf.clear();
        let read = reader.read_until(b'\n', &mut buf).await.map_err(io_err)?;
        if read == 0 {
            break;
        }

        let line = String::from_utf8_lossy(&buf);
        let line = line.trim_end_matches(['\n', '\r']);

        for (idx, token) in tokens.iter().enumerate() {
            if token.is_match(line) {
                hits[idx].push(line.to_owned());
            }
        }
    }

    Ok(hits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn token(key: &str, pattern: &str) -> SearchToken {
        SearchToken::build(&WindowKey::new(key), pattern, PatternMode::Literal).unwrap()
    }

    #[test]
    fn token_matches_key_then_pattern() {
        let t = token("2024-01-01 10:00", "ERROR");
        assert!(t.is_match("2024-01-01 10:00:05 ERROR disk full"));
        assert!(!t.is_match("2024-01-01 10:01:05 ERROR disk full"));
        assert!(!t.is_match("2024-01-01 10:00:05 INFO all good"));
    }

    #[test]
    fn token_requires_pattern_after_key() {
        let t = token("2024-01-01 10:00", "ERROR");
        assert!(!t.is_match("ERROR 2024-01-01 10:00:05 disk full"));
    }

    #[test]
    fn minute_delimiter_prevents_seconds_confusion() {
        // "10:00" 키가 "09:10:00"의 "10:00"(분:초)에 매칭되면 안 됨
        let t = token("10:00", "ERROR");
        assert!(!t.is_match("09:10:00 ERROR something"));
        assert!(t.is_match("10:00:59 ERROR something"));
    }

    #[test]
    fn literal_pattern_is_escaped() {
        let t = token("10:00", "a.b");
        assert!(t.is_match("10:00:01 a.b"));
        assert!(!t.is_match("10:00:01 axb"));
    }

    #[test]
    fn key_metacharacters_are_escaped() {
        let t = token("[10.00]", "ERROR");
        assert!(t.is_match("[10.00]: ERROR"));
        assert!(!t.is_match("1: ERROR"));
    }

    #[test]
    fn regex_mode_alternation_stays_bound_to_key() {
        let key = WindowKey::new("10:00");
        let t = SearchToken::build(&key, "ERROR|FATAL", PatternMode::Regex).unwrap();
        assert!(t.is_match("10:00:01 FATAL boom"));
        assert!(!t.is_match("11:00:01 FATAL boom"));
    }

    #[test]
    fn invalid_regex_is_rejected() {
        let key = WindowKey::new("10:00");
        let err = SearchToken::build(&key, "(unclosed", PatternMode::Regex).unwrap_err();
        assert!(matches!(err, ScanError::InvalidPattern { .. }));
    }

    #[tokio::test]
    async fn file_search_groups_hits_by_token() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "2024-01-01 09:59:10 ERROR first").unwrap();
        writeln!(file, "2024-01-01 10:00:05 ERROR second").unwrap();
        writeln!(file, "2024-01-01 10:00:07 INFO noise").unwrap();
        writeln!(file, "2024-01-01 10:00:09 ERROR third").unwrap();
        file.flush().unwrap();

        let tokens = vec![
            token("2024-01-01 09:59", "ERROR"),
            token("2024-01-01 10:00", "ERROR"),
        ];
        let hits = FileTextSearch::default()
            .search(file.path(), &tokens)
            .await
            .unwrap();

        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0], vec!["2024-01-01 09:59:10 ERROR first"]);
        assert_eq!(
            hits[1],
            vec![
                "2024-01-01 10:00:05 ERROR second",
                "2024-01-01 10:00:09 ERROR third"
            ]
        );
    }

    #[tokio::test]
    async fn file_search_tolerates_invalid_utf8_and_crlf() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"10:00:01 ERROR \xff\xfe bad bytes\r\n").unwrap();
        file.write_all(b"10:00:02 ERROR last line without newline").unwrap();
        file.flush().unwrap();

        let hits = FileTextSearch::default()
            .search(file.path(), &[token("10:00", "ERROR")])
            .await
            .unwrap();

        assert_eq!(hits[0].len(), 2);
        assert!(!hits[0][0].ends_with('\r'));
        assert_eq!(hits[0][1], "10:00:02 ERROR last line without newline");
    }

    #[tokio::test]
    async fn file_search_missing_file_is_io_error() {
        let err = FileTextSearch::default()
            .search(Path::new("/nonexistent/logwatch.log"), &[token("10:00", "ERROR")])
            .await
            .unwrap_err();
        assert!(matches!(err, ScanError::Io { .. }));
    }
}
