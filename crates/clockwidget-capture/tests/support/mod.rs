//! 통합 테스트용 포트 더블.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use std::rc::Rc;

use chrono::{DateTime, TimeZone, Timelike, Utc};
use clockwidget_capture::{CaptureManager, Collaborators};
use clockwidget_core::config::AppConfig;
use clockwidget_core::error::CoreError;
use clockwidget_core::models::clock::{ClockFont, ClockScene, ClockSettings, FontColor};
use clockwidget_core::models::power::PowerState;
use clockwidget_core::models::request::{operation, AppRequest, LaunchReply, EXTRA_RESULT};
use clockwidget_core::models::surface::{Dims, Geometry, PixelBuffer, WindowHandle, WindowRole};
use clockwidget_core::ports::clock::WallClock;
use clockwidget_core::ports::display::DisplayControl;
use clockwidget_core::ports::formatter::ClockFormatter;
use clockwidget_core::ports::reply::ReplySender;
use clockwidget_core::ports::settings::SettingsParser;
use clockwidget_core::ports::store::KeyValueStore;
use clockwidget_core::ports::window::WindowSystem;
use tempfile::TempDir;

// ============================================================
// 포맷터 / 시계
// ============================================================

pub struct FakeFormatter {
    pub reloads: Rc<Cell<usize>>,
}

impl ClockFormatter for FakeFormatter {
    fn format_time(&self, ts: DateTime<Utc>, _hour24: bool) -> Result<String, CoreError> {
        Ok(format!("{:02}:{:02}", ts.hour(), ts.minute()))
    }
    fn format_date(&self, ts: DateTime<Utc>) -> Result<String, CoreError> {
        Ok(ts.format("%a %d").to_string())
    }
    fn format_ampm(&self, _ts: DateTime<Utc>) -> Result<String, CoreError> {
        Ok(String::new())
    }
    fn locale(&self) -> String {
        "en_US".to_string()
    }
    fn is_24_hour(&self) -> bool {
        true
    }
    fn ampm_leading(&self) -> bool {
        false
    }
    fn local_hour(&self, ts: DateTime<Utc>) -> u32 {
        ts.hour()
    }
    fn reload(&self) -> Result<(), CoreError> {
        self.reloads.set(self.reloads.get() + 1);
        Ok(())
    }
}

pub struct FixedClock;

impl WallClock for FixedClock {
    fn now_utc(&self) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 10, 42, 15).unwrap()
    }
}

// ============================================================
// 설정 파서 / 저장소 / 디스플레이
// ============================================================

/// "bad"가 들어간 XML은 실패, 그 외에는 고정 설정
pub struct FakeSettingsParser;

pub fn parsed_settings() -> ClockSettings {
    ClockSettings {
        show_date: true,
        font: ClockFont::Dynamic,
        font_color: FontColor::from_index(5),
    }
}

impl SettingsParser for FakeSettingsParser {
    fn parse_settings(&self, xml: &str) -> Result<ClockSettings, CoreError> {
        if xml.contains("bad") {
            return Err(CoreError::Settings("형식 오류".to_string()));
        }
        Ok(parsed_settings())
    }
}

#[derive(Clone, Default)]
pub struct SharedStore(pub Rc<RefCell<HashMap<String, String>>>);

impl KeyValueStore for SharedStore {
    fn get_int(&self, key: &str) -> Result<Option<i32>, CoreError> {
        Ok(self.0.borrow().get(key).and_then(|v| v.parse().ok()))
    }
    fn set_int(&self, key: &str, value: i32) -> Result<(), CoreError> {
        self.0.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }
    fn get_str(&self, key: &str) -> Result<Option<String>, CoreError> {
        Ok(self.0.borrow().get(key).cloned())
    }
    fn set_str(&self, key: &str, value: &str) -> Result<(), CoreError> {
        self.0.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

pub struct FakeDisplay {
    pub state: Rc<Cell<PowerState>>,
    pub wake_requests: Rc<Cell<usize>>,
}

impl DisplayControl for FakeDisplay {
    fn power_state(&self) -> Result<PowerState, CoreError> {
        Ok(self.state.get())
    }
    fn request_normal(&self) -> Result<(), CoreError> {
        self.wake_requests.set(self.wake_requests.get() + 1);
        self.state.set(PowerState::Normal);
        Ok(())
    }
}

// ============================================================
// 창 시스템
// ============================================================

#[derive(Debug, Clone)]
pub struct FakeWindow {
    pub role: WindowRole,
    pub dims: Dims,
    pub position: (i32, i32),
    pub scene: Option<ClockScene>,
}

/// 창 상태 기록 (테스트에서 공유)
#[derive(Default)]
pub struct WindowState {
    next: Cell<u64>,
    pub windows: RefCell<BTreeMap<u64, FakeWindow>>,
    pub created: RefCell<Vec<WindowRole>>,
    pub destroyed: RefCell<Vec<u64>>,
    pub resizes: Cell<usize>,
}

impl WindowState {
    /// 외부에서 창 크기를 바꾼 상황 재현
    pub fn force_size(&self, dims: Dims) {
        for window in self.windows.borrow_mut().values_mut() {
            window.dims = dims;
        }
    }

    pub fn only_window(&self) -> Option<FakeWindow> {
        let windows = self.windows.borrow();
        (windows.len() == 1)
            .then(|| windows.values().next().cloned())
            .flatten()
    }
}

pub struct FakeWindows(pub Rc<WindowState>);

/// 표시 중인 창 픽셀 색
pub const SHOWN_PIXEL: u32 = 0xFF20_4060;

impl WindowSystem for FakeWindows {
    fn create(&self, _name: &str, role: WindowRole, dims: Dims) -> Result<WindowHandle, CoreError> {
        let id = self.0.next.get() + 1;
        self.0.next.set(id);
        self.0.created.borrow_mut().push(role);
        self.0.windows.borrow_mut().insert(
            id,
            FakeWindow {
                role,
                dims,
                position: (-1, -1),
                scene: None,
            },
        );
        Ok(WindowHandle(id))
    }

    fn resize(&self, handle: WindowHandle, dims: Dims) -> Result<(), CoreError> {
        self.0.resizes.set(self.0.resizes.get() + 1);
        self.with_window(handle, |w| w.dims = dims)
    }

    fn move_to(&self, handle: WindowHandle, x: i32, y: i32) -> Result<(), CoreError> {
        self.with_window(handle, |w| w.position = (x, y))
    }

    fn geometry(&self, handle: WindowHandle) -> Result<Geometry, CoreError> {
        let windows = self.0.windows.borrow();
        let w = windows
            .get(&handle.0)
            .ok_or_else(|| CoreError::InvalidArgument("창 없음".to_string()))?;
        Ok(Geometry {
            x: w.position.0,
            y: w.position.1,
            width: w.dims.width,
            height: w.dims.height,
        })
    }

    fn present(&self, handle: WindowHandle, scene: &ClockScene) -> Result<(), CoreError> {
        self.with_window(handle, |w| w.scene = Some(scene.clone()))
    }

    fn pixels(&self, handle: WindowHandle) -> Result<PixelBuffer, CoreError> {
        let windows = self.0.windows.borrow();
        let w = windows
            .get(&handle.0)
            .ok_or_else(|| CoreError::PixelAccessFailed("창 없음".to_string()))?;
        let shown = w.scene.as_ref().is_some_and(|s| s.shown);
        let fill = if shown { SHOWN_PIXEL } else { 0 };
        Ok(PixelBuffer {
            width: w.dims.width,
            height: w.dims.height,
            data: vec![fill; (w.dims.width * w.dims.height) as usize],
        })
    }

    fn destroy(&self, handle: WindowHandle) {
        self.0.windows.borrow_mut().remove(&handle.0);
        self.0.destroyed.borrow_mut().push(handle.0);
    }
}

impl FakeWindows {
    fn with_window(
        &self,
        handle: WindowHandle,
        f: impl FnOnce(&mut FakeWindow),
    ) -> Result<(), CoreError> {
        let mut windows = self.0.windows.borrow_mut();
        let w = windows
            .get_mut(&handle.0)
            .ok_or_else(|| CoreError::InvalidArgument("창 없음".to_string()))?;
        f(w);
        Ok(())
    }
}

// ============================================================
// 응답
// ============================================================

pub struct CollectReplies(pub Rc<RefCell<Vec<LaunchReply>>>);

impl ReplySender for CollectReplies {
    fn send(&self, reply: &LaunchReply) -> Result<(), CoreError> {
        self.0.borrow_mut().push(reply.clone());
        Ok(())
    }
}

// ============================================================
// 하네스
// ============================================================

pub struct Harness {
    pub manager: CaptureManager,
    pub replies: Rc<RefCell<Vec<LaunchReply>>>,
    pub power: Rc<Cell<PowerState>>,
    pub wake_requests: Rc<Cell<usize>>,
    pub reloads: Rc<Cell<usize>>,
    pub windows: Rc<WindowState>,
    pub store: SharedStore,
    pub offscreen_path: PathBuf,
    pub minicontrol_path: PathBuf,
    _dir: TempDir,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(|_| {})
    }

    pub fn with_config(adjust: impl FnOnce(&mut AppConfig)) -> Self {
        let dir = TempDir::new().unwrap();
        let mut config = AppConfig::default_config();
        config.capture.offscreen_path = dir.path().join("dump_offscreen.png");
        config.capture.minicontrol_path = dir.path().join("dump_minicontrol.png");
        adjust(&mut config);

        let replies = Rc::new(RefCell::new(Vec::new()));
        let power = Rc::new(Cell::new(PowerState::Normal));
        let wake_requests = Rc::new(Cell::new(0));
        let reloads = Rc::new(Cell::new(0));
        let windows = Rc::new(WindowState::default());
        let store = SharedStore::default();

        let manager = CaptureManager::new(
            &config,
            Collaborators {
                formatter: Box::new(FakeFormatter {
                    reloads: reloads.clone(),
                }),
                settings: Box::new(FakeSettingsParser),
                store: Box::new(store.clone()),
                display: Box::new(FakeDisplay {
                    state: power.clone(),
                    wake_requests: wake_requests.clone(),
                }),
                windows: Box::new(FakeWindows(windows.clone())),
                reply: Box::new(CollectReplies(replies.clone())),
                clock: Box::new(FixedClock),
            },
        );

        Self {
            manager,
            replies,
            power,
            wake_requests,
            reloads,
            windows,
            store,
            offscreen_path: config.capture.offscreen_path.clone(),
            minicontrol_path: config.capture.minicontrol_path.clone(),
            _dir: dir,
        }
    }

    pub fn reply_count(&self) -> usize {
        self.replies.borrow().len()
    }

    /// i번째 응답의 `result` 경로
    pub fn reply_path(&self, index: usize) -> PathBuf {
        PathBuf::from(&self.replies.borrow()[index].extra[EXTRA_RESULT])
    }

    pub fn reply_token(&self, index: usize) -> String {
        self.replies.borrow()[index].reply_to.clone()
    }
}

pub fn capture(token: &str) -> AppRequest {
    AppRequest::new(operation::CLOCK_CAPTURE).with_reply_to(token)
}

pub fn main_view() -> AppRequest {
    AppRequest::new(operation::MAIN)
}
