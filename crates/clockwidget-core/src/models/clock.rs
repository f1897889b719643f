//! 시계 표시 모델.
//!
//! 폰트/색상 설정, 렌더링된 텍스트, 표시 상태, 서피스로 전달되는 장면 스냅샷.

use serde::{Deserialize, Serialize};

use crate::models::background::BackgroundInfo;

/// 시계 폰트 프리셋
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClockFont {
    #[default]
    Default = 1,
    Light = 2,
    Dynamic = 3,
}

impl ClockFont {
    /// 저장소 정수값 → 폰트 (알 수 없는 값은 Default)
    pub fn from_index(index: i32) -> Self {
        match index {
            2 => ClockFont::Light,
            3 => ClockFont::Dynamic,
            _ => ClockFont::Default,
        }
    }

    pub fn index(self) -> i32 {
        self as i32
    }
}

/// 고정 글자색 팔레트 (1부터 시작하는 인덱스)
pub const FONT_COLOR_PALETTE: [&str; 12] = [
    "000000", "CEFF00", "FF6519", "BCFFFB", "F03880", "FFEA00", "673E27", "FFFFFF", "042860",
    "F2DCC5", "F62E00", "595959",
];

/// 범위를 벗어난 인덱스 대체값 (흰색)
pub const DEFAULT_FONT_COLOR_INDEX: i32 = 8;

/// RGB 색상
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// `RRGGBB` 16진 문자열 파싱 (앞 6자리만 사용)
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().trim_start_matches('#');
        let channel = |i: usize| {
            hex.get(i..i + 2)
                .and_then(|c| u8::from_str_radix(c, 16).ok())
        };
        Some(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }

    /// 불투명 ARGB8888 값
    pub fn to_argb(self) -> u32 {
        0xFF00_0000 | (u32::from(self.r) << 16) | (u32::from(self.g) << 8) | u32::from(self.b)
    }
}

/// 글자색 팔레트 인덱스
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontColor(i32);

impl FontColor {
    /// 1..=12 밖의 값은 기본 흰색으로 대체
    pub fn from_index(index: i32) -> Self {
        if (1..=FONT_COLOR_PALETTE.len() as i32).contains(&index) {
            Self(index)
        } else {
            Self(DEFAULT_FONT_COLOR_INDEX)
        }
    }

    pub fn index(self) -> i32 {
        self.0
    }

    pub fn hex(self) -> &'static str {
        FONT_COLOR_PALETTE[(self.0 - 1) as usize]
    }

    pub fn rgb(self) -> Rgb {
        // 팔레트 항목은 모두 유효한 6자리 16진수
        Rgb::from_hex(self.hex()).unwrap_or(Rgb::new(0xFF, 0xFF, 0xFF))
    }
}

impl Default for FontColor {
    fn default() -> Self {
        Self(DEFAULT_FONT_COLOR_INDEX)
    }
}

/// 원격 설정 결과 (설정 XML 파서 출력)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockSettings {
    /// 날짜 표시 여부
    pub show_date: bool,
    /// 폰트 프리셋
    pub font: ClockFont,
    /// 글자색
    pub font_color: FontColor,
}

/// 렌더링된 시계 텍스트
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockText {
    /// 시각 ("10:42")
    pub time: String,
    /// 날짜 (날짜 표시 꺼짐이면 None)
    pub date: Option<String>,
    /// 오전/오후 (24시간제면 None)
    pub ampm: Option<String>,
    /// 오전/오후가 시각 앞에 오는 로케일인지
    pub ampm_leading: bool,
}

/// 시계 표시 상태
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClockVisualState {
    /// 표시 여부
    pub is_shown: bool,
    /// 현재 텍스트
    pub text: ClockText,
}

/// 서피스에 그릴 장면 스냅샷
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClockScene {
    pub shown: bool,
    pub text: ClockText,
    pub font: ClockFont,
    pub color: FontColor,
    pub background: Option<BackgroundInfo>,
}
