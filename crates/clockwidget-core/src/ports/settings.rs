//! 원격 설정 XML 파서 포트.
//!
//! 구현: `clockwidget-app` (quick-xml)

use crate::error::CoreError;
use crate::models::clock::ClockSettings;

/// 설정 결과 XML → 시계 설정
pub trait SettingsParser {
    /// 형식 오류/필수 항목 누락 시 `CoreError::Settings`
    fn parse_settings(&self, xml: &str) -> Result<ClockSettings, CoreError>;
}
