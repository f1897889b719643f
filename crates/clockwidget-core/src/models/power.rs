//! 디스플레이 전원 상태.

use serde::{Deserialize, Serialize};

/// 디스플레이 전원 상태 (저장소 정수값 1/2/3)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerState {
    #[default]
    Normal = 1,
    Dim = 2,
    LcdOff = 3,
}

impl PowerState {
    /// 저장소 정수값 변환 (알 수 없는 값은 None)
    pub fn from_raw(raw: i32) -> Option<Self> {
        match raw {
            1 => Some(PowerState::Normal),
            2 => Some(PowerState::Dim),
            3 => Some(PowerState::LcdOff),
            _ => None,
        }
    }

    pub fn as_raw(self) -> i32 {
        self as i32
    }

    pub fn is_lcd_off(self) -> bool {
        self == PowerState::LcdOff
    }
}
