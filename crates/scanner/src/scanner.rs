//! 로그 스캐너 -- 파일별 윈도우 매칭과 리포트 조립
//!
//! [`LogScanner`]는 요청된 파일을 입력 순서대로 하나씩 검사합니다.
//!
//! ```text
//! ScanRequest + ScanWindow
//!         |
//!   SearchToken (윈도우 키마다 1개)
//!         |
//!   TextSearch::search (파일마다 1회)
//!         |
//!   FileReport (헤딩 + 윈도우별 매칭) --> ScanReport
//! ```
//!
//! 파일 읽기 실패는 [`ReadErrorPolicy`]에 따라 처리됩니다.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use logwatch_core::config::ReadErrorPolicy;
use logwatch_core::types::{FileReport, ScanReport, ScanRequest, WindowHits};

use crate::error::ScanError;
use crate::search::{SearchToken, TextSearch};
use crate::window::ScanWindow;

/// 로그 스캐너
///
/// 검색 구현(`S`)을 주입받아 실제 파일 또는 테스트용 메모리 데이터를 검사합니다.
pub struct LogScanner<S: TextSearch> {
    search: S,
    on_read_error: ReadErrorPolicy,
}

impl<S: TextSearch> LogScanner<S> {
    /// 새 스캐너를 생성합니다.
    pub fn new(search: S, on_read_error: ReadErrorPolicy) -> Self {
        Self {
            search,
            on_read_error,
        }
    }

    /// 읽기 실패 정책
    pub fn read_error_policy(&self) -> ReadErrorPolicy {
        self.on_read_error
    }

    /// 요청된 모든 파일을 스캔하여 리포트를 만듭니다.
    ///
    /// # Errors
    ///
    /// - 요청이 유효하지 않거나 검색어가 컴파일되지 않으면 설정 에러
    /// - `ReadErrorPolicy::Fail`에서 파일 읽기가 실패하면 해당 에러
    pub async fn scan(
        &self,
        request: &ScanRequest,
        window: &ScanWindow,
    ) -> Result<ScanReport, ScanError> {
        request.validate()?;

        let tokens = window
            .keys
            .iter()
            .map(|key| SearchToken::build(key, &request.pattern, request.pattern_mode))
            .collect::<Result<Vec<_>, _>>()?;

        let mut files = Vec::with_capacity(request.files.len());
        for path in &request.files {
            files.push(self.scan_file(path, request, window, &tokens).await?);
        }

        let report = ScanReport {
            pattern: request.pattern.clone(),
            timezone: window.timezone.clone(),
            interval_minutes: request.interval_minutes,
            since: window.since.clone(),
            files,
        };

        info!(
            files = report.files.len(),
            matches = report.match_count(),
            "scan completed"
        );

        Ok(report)
    }

    async fn scan_file(
        &self,
        path: &Path,
        request: &ScanRequest,
        window: &ScanWindow,
        tokens: &[SearchToken],
    ) -> Result<FileReport, ScanError> {
        let abspath = absolute_path(path);
        let heading = ScanReport::format_heading(
            &request.pattern,
            &abspath.display().to_string(),
            request.interval_minutes,
            &window.since,
            &window.timezone,
        );

        let (mut hits, read_error) = match self.search.search(&abspath, tokens).await {
            Ok(hits) => (hits, None),
            Err(e) => match self.on_read_error {
                ReadErrorPolicy::Fail => return Err(e),
                ReadErrorPolicy::Skip => {
                    warn!(
                        path = %abspath.display(),
                        error = %e,
                        "failed to search file, treating as no match"
                    );
                    (Vec::new(), Some(e.to_string()))
                }
            },
        };

        // 검색 구현이 토큰 수보다 적게 반환해도 윈도우마다 항목이 있어야 함
        hits.resize_with(tokens.len(), Vec::new);

        let windows: Vec<WindowHits> = tokens
            .iter()
            .zip(hits)
            .map(|(token, lines)| {
                if lines.is_empty() {
                    debug!(
                        path = %abspath.display(),
                        key = %token.key(),
                        "no match in window"
                    );
                } else {
                    info!(
                        path = %abspath.display(),
                        key = %token.key(),
                        lines = lines.len(),
                        "match found in window"
                    );
                }
                WindowHits {
                    key: token.key().clone(),
                    lines,
                }
            })
            .collect();

        Ok(FileReport {
            path: abspath,
            heading,
            windows,
            read_error,
        })
    }
}

/// 경로를 절대 경로로 바꿉니다. 실패하면 원래 경로를 그대로 씁니다.
fn absolute_path(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}
