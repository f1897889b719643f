//! 창/서피스 셀렉터.
//!
//! 요청마다 드로잉 대상을 고른다. 이미 활성 대상이 있으면 그대로 돌려주고,
//! 없으면 이전 세션의 서피스를 모두 해제한 뒤 새로 만든다.
//! 종류별로 최대 하나의 서피스만 살아있다.

use std::collections::BTreeMap;

use clockwidget_core::error::CoreError;
use clockwidget_core::models::clock::ClockScene;
use clockwidget_core::models::surface::{Dims, SurfaceKind, WindowHandle, WindowRole};
use clockwidget_core::ports::window::WindowSystem;
use tracing::{debug, info, warn};

use crate::canvas::{create_canvas, destroy_canvas, VirtualCanvas};

/// 드로잉 대상
#[derive(Debug)]
pub enum Surface {
    /// 창 없는 오프스크린 캔버스
    Offscreen(VirtualCanvas),
    /// 창 시스템의 최상위 창
    Window {
        kind: SurfaceKind,
        handle: WindowHandle,
    },
}

impl Surface {
    pub fn kind(&self) -> SurfaceKind {
        match self {
            Surface::Offscreen(_) => SurfaceKind::OffscreenBuffer,
            Surface::Window { kind, .. } => *kind,
        }
    }

    /// 장면 반영 (캔버스는 다음 렌더 패스에서 그려짐)
    pub fn present(&mut self, scene: &ClockScene, windows: &dyn WindowSystem) {
        match self {
            Surface::Offscreen(canvas) => canvas.set_scene(scene.clone()),
            Surface::Window { handle, .. } => {
                if let Err(e) = windows.present(*handle, scene) {
                    warn!("창 장면 표시 실패: {e}");
                }
            }
        }
    }
}

/// 서피스 셀렉터
#[derive(Debug)]
pub struct SurfaceSelector {
    surfaces: BTreeMap<SurfaceKind, Surface>,
    active: Option<SurfaceKind>,
    footprint: Dims,
    window_name: String,
}

impl SurfaceSelector {
    pub fn new(footprint: Dims, window_name: impl Into<String>) -> Self {
        Self {
            surfaces: BTreeMap::new(),
            active: None,
            footprint,
            window_name: window_name.into(),
        }
    }

    /// 위젯 풋프린트
    pub fn footprint(&self) -> Dims {
        self.footprint
    }

    pub fn active_kind(&self) -> Option<SurfaceKind> {
        self.active
    }

    pub fn active(&self) -> Option<&Surface> {
        self.active.and_then(|kind| self.surfaces.get(&kind))
    }

    pub fn active_mut(&mut self) -> Option<&mut Surface> {
        let kind = self.active?;
        self.surfaces.get_mut(&kind)
    }

    /// 살아있는 서피스 수
    pub fn live_count(&self) -> usize {
        self.surfaces.len()
    }

    /// 활성 대상 반환, 없으면 `kind`로 생성
    ///
    /// 이미 활성 대상이 있으면 요청 종류와 달라도 그것을 돌려준다.
    pub fn select_or_create(
        &mut self,
        kind: SurfaceKind,
        windows: &dyn WindowSystem,
    ) -> Result<&mut Surface, CoreError> {
        if let Some(active) = self.active {
            debug!("활성 서피스 재사용: {:?} (요청 {:?})", active, kind);
            return self.surfaces.get_mut(&active).ok_or_else(|| {
                CoreError::InvalidArgument(format!("활성 서피스 누락: {active:?}"))
            });
        }

        self.release_all(windows);

        let surface = match kind {
            SurfaceKind::OffscreenBuffer => {
                Surface::Offscreen(create_canvas(self.footprint.width, self.footprint.height)?)
            }
            SurfaceKind::MinicontrolWindow => self.create_window(kind, WindowRole::Minicontrol, windows)?,
            SurfaceKind::OnscreenWindow => self.create_window(kind, WindowRole::Basic, windows)?,
        };
        info!("서피스 생성: {:?}", kind);

        self.surfaces.insert(kind, surface);
        self.active = Some(kind);
        self.surfaces
            .get_mut(&kind)
            .ok_or_else(|| CoreError::InvalidArgument(format!("서피스 등록 실패: {kind:?}")))
    }

    fn create_window(
        &self,
        kind: SurfaceKind,
        role: WindowRole,
        windows: &dyn WindowSystem,
    ) -> Result<Surface, CoreError> {
        let handle = windows.create(&self.window_name, role, self.footprint)?;
        let placed = windows
            .resize(handle, self.footprint)
            .and_then(|()| windows.move_to(handle, 0, 0));
        if let Err(e) = placed {
            windows.destroy(handle);
            return Err(e);
        }
        Ok(Surface::Window { kind, handle })
    }

    /// 오프스크린 캔버스만 해제 (살아있는 창은 유지)
    pub fn release_offscreen(&mut self) {
        if let Some(Surface::Offscreen(canvas)) = self.surfaces.remove(&SurfaceKind::OffscreenBuffer) {
            destroy_canvas(Some(canvas));
            debug!("오프스크린 서피스 해제");
        }
        if self.active == Some(SurfaceKind::OffscreenBuffer) {
            self.active = None;
        }
    }

    /// 모든 서피스 해제
    pub fn release_all(&mut self, windows: &dyn WindowSystem) {
        if self.surfaces.is_empty() {
            self.active = None;
            return;
        }
        for (kind, surface) in std::mem::take(&mut self.surfaces) {
            match surface {
                Surface::Offscreen(canvas) => destroy_canvas(Some(canvas)),
                Surface::Window { handle, .. } => windows.destroy(handle),
            }
            debug!("서피스 해제: {:?}", kind);
        }
        self.active = None;
    }
}
