//! 홈 화면 배경 정보.
//!
//! 캡처 세션마다 저장소에서 한 번 갱신되며 세션 동안 읽기 전용.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// 배경 모드 (저장소 정수값 0/1/2)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BackgroundMode {
    /// 단색 팔레트
    #[default]
    Palette = 0,
    /// 배경화면 이미지
    Wallpaper = 1,
    /// 사용자 지정 이미지
    SetImage = 2,
}

impl BackgroundMode {
    pub fn from_index(index: i32) -> Self {
        match index {
            1 => BackgroundMode::Wallpaper,
            2 => BackgroundMode::SetImage,
            _ => BackgroundMode::Palette,
        }
    }
}

/// 배경 정보 스냅샷
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackgroundInfo {
    pub mode: BackgroundMode,
    /// 팔레트 색상 (`RRGGBB`)
    pub palette: Option<String>,
    /// 배경화면 전체 경로
    pub wallpaper: Option<PathBuf>,
    /// 사용자 지정 이미지 경로
    pub set_image: Option<PathBuf>,
}
