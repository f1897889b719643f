//! 헤드리스 창 시스템.
//!
//! 실제 디스플레이 서버 없이 창마다 자동 렌더 모드 가상 캔버스를 하나씩 둔다.
//! 창 버퍼 직접 읽기는 캔버스 픽셀 복사로 대신한다.

use std::collections::BTreeMap;

use clockwidget_capture::canvas::{create_canvas, RenderMode, VirtualCanvas};
use clockwidget_core::error::CoreError;
use clockwidget_core::models::clock::ClockScene;
use clockwidget_core::models::surface::{Dims, Geometry, PixelBuffer, WindowHandle, WindowRole};
use clockwidget_core::ports::window::WindowSystem;
use parking_lot::Mutex;
use tracing::{debug, info};

#[derive(Debug)]
struct HeadlessWindow {
    name: String,
    role: WindowRole,
    x: i32,
    y: i32,
    canvas: VirtualCanvas,
}

#[derive(Debug, Default)]
struct Registry {
    next_id: u64,
    windows: BTreeMap<u64, HeadlessWindow>,
}

/// 캔버스 기반 창 시스템
#[derive(Debug, Default)]
pub struct HeadlessWindowSystem {
    registry: Mutex<Registry>,
}

impl HeadlessWindowSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// 살아있는 창 수
    pub fn window_count(&self) -> usize {
        self.registry.lock().windows.len()
    }

    fn with_window<T>(
        &self,
        handle: WindowHandle,
        f: impl FnOnce(&mut HeadlessWindow) -> Result<T, CoreError>,
    ) -> Result<T, CoreError> {
        let mut registry = self.registry.lock();
        let window = registry
            .windows
            .get_mut(&handle.0)
            .ok_or_else(|| CoreError::InvalidArgument(format!("알 수 없는 창: {}", handle.0)))?;
        f(window)
    }
}

impl WindowSystem for HeadlessWindowSystem {
    fn create(&self, name: &str, role: WindowRole, dims: Dims) -> Result<WindowHandle, CoreError> {
        let mut canvas = create_canvas(dims.width, dims.height)?;
        canvas.set_render_mode(RenderMode::Auto);

        let mut registry = self.registry.lock();
        registry.next_id += 1;
        let id = registry.next_id;
        registry.windows.insert(
            id,
            HeadlessWindow {
                name: name.to_string(),
                role,
                x: 0,
                y: 0,
                canvas,
            },
        );
        info!("창 생성: #{id} {name} ({:?}, {}x{})", role, dims.width, dims.height);
        Ok(WindowHandle(id))
    }

    fn resize(&self, handle: WindowHandle, dims: Dims) -> Result<(), CoreError> {
        self.with_window(handle, |w| w.canvas.resize(dims.width, dims.height))
    }

    fn move_to(&self, handle: WindowHandle, x: i32, y: i32) -> Result<(), CoreError> {
        self.with_window(handle, |w| {
            w.x = x;
            w.y = y;
            Ok(())
        })
    }

    fn geometry(&self, handle: WindowHandle) -> Result<Geometry, CoreError> {
        self.with_window(handle, |w| {
            let dims = w.canvas.dims();
            Ok(Geometry {
                x: w.x,
                y: w.y,
                width: dims.width,
                height: dims.height,
            })
        })
    }

    fn present(&self, handle: WindowHandle, scene: &ClockScene) -> Result<(), CoreError> {
        self.with_window(handle, |w| {
            w.canvas.set_scene(scene.clone());
            Ok(())
        })
    }

    fn pixels(&self, handle: WindowHandle) -> Result<PixelBuffer, CoreError> {
        self.with_window(handle, |w| {
            let dims = w.canvas.dims();
            Ok(PixelBuffer {
                width: dims.width,
                height: dims.height,
                data: w.canvas.pixels()?.to_vec(),
            })
        })
    }

    fn destroy(&self, handle: WindowHandle) {
        match self.registry.lock().windows.remove(&handle.0) {
            Some(w) => debug!("창 해제: #{} {} ({:?})", handle.0, w.name, w.role),
            None => debug!("이미 해제된 창: #{}", handle.0),
        }
    }
}
