//! 드로잉 서피스 모델.
//!
//! 서피스 종류, 크기/지오메트리, ARGB8888 픽셀 버퍼, 드로잉 상태를 정의.

use serde::{Deserialize, Serialize};

/// 드로잉 대상 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurfaceKind {
    /// 일반 최상위 창
    OnscreenWindow,
    /// 화면에 붙지 않은 오프스크린 버퍼
    OffscreenBuffer,
    /// 홈 화면 미니컨트롤 창
    MinicontrolWindow,
}

impl SurfaceKind {
    /// 창에 붙은(합성되는) 서피스인지 여부
    pub fn is_onscreen(self) -> bool {
        !matches!(self, SurfaceKind::OffscreenBuffer)
    }
}

/// 서피스 크기
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dims {
    pub width: u32,
    pub height: u32,
}

impl Dims {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// 픽셀 수 (오버플로 시 None)
    pub fn pixel_count(self) -> Option<usize> {
        (self.width as usize).checked_mul(self.height as usize)
    }
}

/// 창의 실제 위치/크기
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Geometry {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Geometry {
    pub fn dims(&self) -> Dims {
        Dims::new(self.width, self.height)
    }
}

/// ARGB8888 픽셀 버퍼 (0xAARRGGBB, straight alpha)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u32>,
}

impl PixelBuffer {
    pub fn dims(&self) -> Dims {
        Dims::new(self.width, self.height)
    }
}

/// 캡처 진행 상태 게이트
///
/// 0이 아닌 동안 새 캡처 세션은 시작되지 않는다.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum DrawingState {
    /// 진행 중인 캡처 없음
    #[default]
    Idle = 0,
    /// 오프스크린 캡처 진행 중
    CaptureOffscreenInProgress = 1,
    /// 온스크린(창) 캡처 진행 중
    CaptureOnscreenInProgress = 2,
}

impl DrawingState {
    /// 서피스 종류에 대응하는 진행 상태
    pub fn for_kind(kind: SurfaceKind) -> Self {
        if kind.is_onscreen() {
            DrawingState::CaptureOnscreenInProgress
        } else {
            DrawingState::CaptureOffscreenInProgress
        }
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn is_idle(self) -> bool {
        self == DrawingState::Idle
    }
}

/// 창 생성 시 역할
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WindowRole {
    /// 미니컨트롤 창
    Minicontrol,
    /// 일반 최상위 창
    Basic,
}

/// 창 시스템이 발급한 불투명 핸들
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WindowHandle(pub u64);
