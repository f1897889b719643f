//! 날짜/시각 포맷 포트.
//!
//! 로케일별 포맷 규칙은 구현체의 몫이며, 파이프라인은 결과 문자열만 사용한다.

use chrono::{DateTime, Utc};

use crate::error::CoreError;

/// 로케일 인식 시계 포맷터
pub trait ClockFormatter {
    /// 시각 문자열 ("10:42" / "22:42")
    fn format_time(&self, ts: DateTime<Utc>, hour24: bool) -> Result<String, CoreError>;

    /// 날짜 문자열
    fn format_date(&self, ts: DateTime<Utc>) -> Result<String, CoreError>;

    /// 오전/오후 문자열
    fn format_ampm(&self, ts: DateTime<Utc>) -> Result<String, CoreError>;

    /// 현재 로케일 (예: "ko_KR", "ar_AE")
    fn locale(&self) -> String;

    /// 24시간제 여부
    fn is_24_hour(&self) -> bool;

    /// 오전/오후 표기가 시각 앞에 오는지
    fn ampm_leading(&self) -> bool;

    /// 현지 시각의 시 (0..24)
    fn local_hour(&self, ts: DateTime<Utc>) -> u32;

    /// 시간대/로케일/시간제 설정 다시 읽기
    fn reload(&self) -> Result<(), CoreError>;
}
