//! 입력 메시지 (stdin JSON 줄).
//!
//! ```text
//! {"type":"launch","operation":"http://tizen.org/appcontrol/operation/clock/capture","reply_to":"c1"}
//! {"type":"signal","signal":"power_state_changed","state":"lcd_off"}
//! ```

use clockwidget_core::models::request::{AppRequest, SystemSignal};
use serde::Deserialize;

/// 입력 한 줄
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InboundMessage {
    Launch(AppRequest),
    Signal(SystemSignal),
}

/// 한 줄 파싱 (빈 줄은 None)
pub fn parse_line(line: &str) -> Result<Option<InboundMessage>, serde_json::Error> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    serde_json::from_str(line).map(Some)
}
