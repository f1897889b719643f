//! 가상 캔버스 관리.
//!
//! 창에 붙지 않은 ARGB8888 드로잉 서피스를 만들고 해제한다.
//! 기본은 수동 렌더 모드이며, 장면을 바꿔도 `render()`를 호출하기 전까지
//! 픽셀 버퍼는 갱신되지 않는다.

use std::cell::Cell;
use std::sync::atomic::{AtomicU64, Ordering};

use clockwidget_core::error::CoreError;
use clockwidget_core::models::clock::ClockScene;
use clockwidget_core::models::surface::Dims;
use tracing::debug;

use crate::painter;

static NEXT_CANVAS_ID: AtomicU64 = AtomicU64::new(1);

thread_local! {
    static LIVE_CANVASES: Cell<usize> = const { Cell::new(0) };
}

/// 현재 스레드에서 살아있는 캔버스 수
pub fn live_canvases() -> usize {
    LIVE_CANVASES.with(Cell::get)
}

/// 렌더 모드
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// 명시적으로 `render()`를 호출할 때만 렌더
    Manual,
    /// 장면이 바뀔 때마다 즉시 렌더
    Auto,
}

/// 오프스크린 드로잉 서피스
#[derive(Debug)]
pub struct VirtualCanvas {
    id: u64,
    dims: Dims,
    mode: RenderMode,
    alpha: bool,
    pixels: Vec<u32>,
    scene: Option<ClockScene>,
    dirty: bool,
}

/// 캔버스 생성 (알파 채널 사용, 수동 렌더 모드)
pub fn create_canvas(width: u32, height: u32) -> Result<VirtualCanvas, CoreError> {
    let dims = Dims::new(width, height);
    let pixels = allocate(dims)?;
    let id = NEXT_CANVAS_ID.fetch_add(1, Ordering::Relaxed);
    LIVE_CANVASES.with(|c| c.set(c.get() + 1));
    debug!("캔버스 생성: #{} {}x{}", id, width, height);

    Ok(VirtualCanvas {
        id,
        dims,
        mode: RenderMode::Manual,
        alpha: true,
        pixels,
        scene: None,
        dirty: false,
    })
}

/// 캔버스 해제 (None이면 아무 것도 하지 않음)
pub fn destroy_canvas(canvas: Option<VirtualCanvas>) {
    if let Some(canvas) = canvas {
        debug!("캔버스 해제: #{}", canvas.id);
        drop(canvas);
    }
}

fn allocate(dims: Dims) -> Result<Vec<u32>, CoreError> {
    if dims.width == 0 || dims.height == 0 {
        return Err(CoreError::AllocationFailed(format!(
            "캔버스 크기 0: {}x{}",
            dims.width, dims.height
        )));
    }
    let count = dims
        .pixel_count()
        .filter(|n| n.checked_mul(4).is_some())
        .ok_or_else(|| {
            CoreError::AllocationFailed(format!(
                "캔버스 크기 초과: {}x{}",
                dims.width, dims.height
            ))
        })?;

    let mut pixels = Vec::new();
    pixels.try_reserve_exact(count).map_err(|e| {
        CoreError::AllocationFailed(format!(
            "픽셀 버퍼 할당 실패 ({}x{}): {e}",
            dims.width, dims.height
        ))
    })?;
    pixels.resize(count, 0);
    Ok(pixels)
}

impl VirtualCanvas {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn dims(&self) -> Dims {
        self.dims
    }

    pub fn has_alpha(&self) -> bool {
        self.alpha
    }

    pub fn render_mode(&self) -> RenderMode {
        self.mode
    }

    pub fn set_render_mode(&mut self, mode: RenderMode) {
        self.mode = mode;
        if mode == RenderMode::Auto && self.dirty {
            self.render();
        }
    }

    /// 그릴 장면 교체 (자동 모드면 즉시 렌더)
    pub fn set_scene(&mut self, scene: ClockScene) {
        self.scene = Some(scene);
        self.dirty = true;
        if self.mode == RenderMode::Auto {
            self.render();
        }
    }

    pub fn scene(&self) -> Option<&ClockScene> {
        self.scene.as_ref()
    }

    /// 렌더되지 않은 장면 변경이 있는지
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// 동기 렌더 패스
    pub fn render(&mut self) {
        painter::paint(&mut self.pixels, self.dims, self.scene.as_ref());
        self.dirty = false;
    }

    /// 크기 변경 (버퍼 재할당 후 현재 장면 다시 렌더)
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), CoreError> {
        let dims = Dims::new(width, height);
        if dims == self.dims {
            return Ok(());
        }
        self.pixels = allocate(dims)?;
        self.dims = dims;
        self.dirty = true;
        if self.mode == RenderMode::Auto {
            self.render();
        }
        Ok(())
    }

    /// 렌더된 ARGB8888 픽셀 (읽기 전용)
    pub fn pixels(&self) -> Result<&[u32], CoreError> {
        match self.dims.pixel_count() {
            Some(n) if n == self.pixels.len() => Ok(&self.pixels),
            _ => Err(CoreError::PixelAccessFailed(format!(
                "캔버스 #{} 버퍼 크기 불일치",
                self.id
            ))),
        }
    }
}

impl Drop for VirtualCanvas {
    fn drop(&mut self) {
        LIVE_CANVASES.with(|c| c.set(c.get().saturating_sub(1)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clockwidget_core::models::clock::{ClockFont, ClockText, FontColor};

    fn scene(time: &str) -> ClockScene {
        ClockScene {
            shown: true,
            text: ClockText {
                time: time.to_string(),
                ..Default::default()
            },
            font: ClockFont::Default,
            color: FontColor::from_index(2),
            background: None,
        }
    }

    #[test]
    fn create_and_destroy_tracks_live_count() {
        let before = live_canvases();
        let canvas = create_canvas(64, 32).unwrap();
        assert_eq!(live_canvases(), before + 1);
        assert_eq!(canvas.dims(), Dims::new(64, 32));
        assert!(canvas.has_alpha());
        assert_eq!(canvas.render_mode(), RenderMode::Manual);
        assert_eq!(canvas.pixels().unwrap().len(), 64 * 32);

        destroy_canvas(Some(canvas));
        assert_eq!(live_canvases(), before);
        destroy_canvas(None);
        assert_eq!(live_canvases(), before);
    }

    #[test]
    fn zero_size_is_allocation_failure() {
        assert!(matches!(
            create_canvas(0, 10),
            Err(CoreError::AllocationFailed(_))
        ));
        assert!(matches!(
            create_canvas(10, 0),
            Err(CoreError::AllocationFailed(_))
        ));
    }

    #[test]
    fn manual_mode_renders_only_on_request() {
        let mut canvas = create_canvas(100, 50).unwrap();
        canvas.set_scene(scene("88:88"));
        assert!(canvas.is_dirty());
        assert!(canvas.pixels().unwrap().iter().all(|&p| p == 0));

        canvas.render();
        assert!(!canvas.is_dirty());
        assert!(canvas.pixels().unwrap().iter().any(|&p| p != 0));
    }

    #[test]
    fn auto_mode_renders_on_scene_change() {
        let mut canvas = create_canvas(100, 50).unwrap();
        canvas.set_render_mode(RenderMode::Auto);
        canvas.set_scene(scene("12:34"));
        assert!(!canvas.is_dirty());
        assert!(canvas.pixels().unwrap().iter().any(|&p| p != 0));
    }

    #[test]
    fn canvas_ids_are_unique() {
        let a = create_canvas(4, 4).unwrap();
        let b = create_canvas(4, 4).unwrap();
        assert_ne!(a.id(), b.id());
    }
}
