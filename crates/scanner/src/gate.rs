//! 억제 게이트 -- 알림 전송 여부 판정

use tracing::info;

use logwatch_core::types::{ScanReport, Verdict};

/// 리포트의 매칭 수로 알림 전송 여부를 판정합니다.
///
/// 헤딩만 있는 리포트(모든 파일에서 매칭 없음)는 `Suppress`입니다.
pub fn evaluate(report: &ScanReport) -> Verdict {
    let matches = report.match_count();
    let verdict = if matches > 0 {
        Verdict::Send
    } else {
        Verdict::Suppress
    };

    info!(
        pattern = %report.pattern,
        matches,
        verdict = %verdict,
        "suppression gate evaluated"
    );

    verdict
}
