//! 시간 윈도우 생성기
//!
//! "최근 N분"을 구성하는 분 단위 타임스탬프 키를 만듭니다.
//! 키는 오래된 순으로 정렬되며 `now - N분`부터 `now - 1분`까지입니다.
//! 아직 진행 중인 현재 분은 포함하지 않습니다.
//!
//! 분 단위 정밀도가 없는 형식(예: `%Y-%m-%d`)은 중복 키를 만들 수 있으며,
//! 생성기는 이를 제거하지 않습니다.

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, TimeDelta, Utc};
use chrono_tz::Tz;
use tracing::debug;

use logwatch_core::error::ConfigError;
use logwatch_core::types::{ScanRequest, WindowKey};

use crate::error::ScanError;

/// 헤딩의 "since" 표기 형식
const SINCE_FORMAT: &str = "%H:%M";

/// IANA 타임존 식별자를 해석합니다.
pub fn resolve_timezone(name: &str) -> Result<Tz, ScanError> {
    name.parse::<Tz>()
        .map_err(|_| ScanError::UnknownTimezone(name.to_owned()))
}

/// strftime 형식 문자열을 검증합니다.
///
/// chrono는 잘못된 지정자를 포맷할 때 패닉하므로 미리 걸러냅니다.
pub fn validate_time_format(format: &str) -> Result<(), ScanError> {
    if format.is_empty() {
        return Err(ScanError::InvalidTimeFormat {
            format: format.to_owned(),
            reason: "format must not be empty".to_owned(),
        });
    }

    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return Err(ScanError::InvalidTimeFormat {
            format: format.to_owned(),
            reason: "contains an unsupported strftime specifier".to_owned(),
        });
    }

    Ok(())
}

/// `now` 기준 윈도우 키를 생성합니다.
///
/// 정확히 `interval_minutes`개의 키를 오래된 순으로 반환합니다.
pub fn window_keys(now: &DateTime<Tz>, time_format: &str, interval_minutes: u32) -> Vec<WindowKey> {
    (1..=interval_minutes)
        .rev()
        .map(|offset| {
            let minute = *now - TimeDelta::minutes(i64::from(offset));
            WindowKey::new(minute.format(time_format).to_string())
        })
        .collect()
}

/// 한 번의 실행에 사용할 윈도우
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanWindow {
    /// 윈도우 키 (오래된 순)
    pub keys: Vec<WindowKey>,
    /// 실행 시점 (`%H:%M`, 타임존 기준)
    pub since: String,
    /// 타임존 이름
    pub timezone: String,
}

/// 시간 윈도우 생성기
///
/// 타임존과 형식은 생성 시점에 검증되므로, 알 수 없는 타임존은
/// 스캔이 시작되기 전에 에러로 드러납니다.
#[derive(Debug, Clone)]
pub struct WindowGenerator {
    tz: Tz,
    time_format: String,
    interval_minutes: u32,
}

impl WindowGenerator {
    /// 새 생성기를 만듭니다.
    pub fn new(
        timezone: &str,
        time_format: impl Into<String>,
        interval_minutes: u32,
    ) -> Result<Self, ScanError> {
        let tz = resolve_timezone(timezone)?;
        let time_format = time_format.into();
        validate_time_format(&time_format)?;

        if interval_minutes == 0 {
            return Err(ConfigError::invalid("interval_minutes", "must be greater than 0").into());
        }

        Ok(Self {
            tz,
            time_format,
            interval_minutes,
        })
    }

    /// 스캔 요청의 파라미터로 생성기를 만듭니다.
    pub fn from_request(request: &ScanRequest) -> Result<Self, ScanError> {
        Self::new(
            &request.timezone,
            request.time_format.clone(),
            request.interval_minutes,
        )
    }

    /// 대상 타임존
    pub fn timezone(&self) -> Tz {
        self.tz
    }

    /// 현재 시각 기준으로 윈도우를 생성합니다.
    pub fn generate(&self) -> ScanWindow {
        self.generate_at(Utc::now())
    }

    /// 주어진 UTC 시각 기준으로 윈도우를 생성합니다.
    pub fn generate_at(&self, now: DateTime<Utc>) -> ScanWindow {
        let local = now.with_timezone(&self.tz);
        let keys = window_keys(&local, &self.time_format, self.interval_minutes);

        debug!(
            timezone = self.tz.name(),
            interval_minutes = self.interval_minutes,
            first = keys.first().map(WindowKey::as_str),
            last = keys.last().map(WindowKey::as_str),
            "window keys generated"
        );

        ScanWindow {
            keys,
            since: local.format(SINCE_FORMAT).to_string(),
            timezone: self.tz.name().to_owned(),
        }
    }
}
