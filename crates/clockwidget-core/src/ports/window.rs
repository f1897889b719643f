//! 창 시스템 포트.
//!
//! 최상위 창(미니컨트롤/일반)을 만들고, 장면을 표시하고,
//! 합성된 픽셀을 읽어온다.

use crate::error::CoreError;
use crate::models::clock::ClockScene;
use crate::models::surface::{Dims, Geometry, PixelBuffer, WindowHandle, WindowRole};

/// 창 시스템
pub trait WindowSystem {
    /// 창 생성
    fn create(&self, name: &str, role: WindowRole, dims: Dims) -> Result<WindowHandle, CoreError>;

    fn resize(&self, handle: WindowHandle, dims: Dims) -> Result<(), CoreError>;

    fn move_to(&self, handle: WindowHandle, x: i32, y: i32) -> Result<(), CoreError>;

    /// 현재 창 위치/크기 (실제 값은 요청한 크기와 다를 수 있음)
    fn geometry(&self, handle: WindowHandle) -> Result<Geometry, CoreError>;

    /// 장면 표시
    fn present(&self, handle: WindowHandle, scene: &ClockScene) -> Result<(), CoreError>;

    /// 창 버퍼의 ARGB8888 픽셀 (현재 지오메트리 크기)
    fn pixels(&self, handle: WindowHandle) -> Result<PixelBuffer, CoreError>;

    fn destroy(&self, handle: WindowHandle);
}
