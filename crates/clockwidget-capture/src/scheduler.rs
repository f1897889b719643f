//! 캡처 스케줄러.
//!
//! `CaptureManager`가 서피스, 시계 뷰, 태스크 큐, 드로잉 상태 게이트를 모두 소유하고
//! 이벤트 루프가 넘겨주는 단조 시각(밀리초)에 맞춰 다음 흐름을 진행한다.
//!
//! ```text
//! Idle → ShowPending → RenderWait → Capturing → Replying → Idle
//! ```
//!
//! - 캡처 요청: 서피스 선택 → 텍스트 갱신 → 렌더 대기 타이머 → 플러시 → 응답
//! - 드로잉 상태가 0이 아닐 때 온 캡처 요청은 요청별 폴링 타이머로 미뤄진다.
//! - 오프스크린 세션은 응답 후 프로세스 종료를 요청한다 (`LoopControl::Exit`).

use std::path::PathBuf;

use clockwidget_core::config::{AppConfig, CaptureConfig};
use clockwidget_core::error::CoreError;
use clockwidget_core::models::background::BackgroundInfo;
use clockwidget_core::models::power::PowerState;
use clockwidget_core::models::request::{AppRequest, Operation, SystemSignal, EXTRA_RESULT_XML};
use clockwidget_core::models::surface::{Dims, DrawingState, SurfaceKind, WindowHandle};
use clockwidget_core::ports::clock::WallClock;
use clockwidget_core::ports::display::DisplayControl;
use clockwidget_core::ports::formatter::ClockFormatter;
use clockwidget_core::ports::reply::ReplySender;
use clockwidget_core::ports::settings::SettingsParser;
use clockwidget_core::ports::store::KeyValueStore;
use clockwidget_core::ports::window::WindowSystem;
use tracing::{debug, error, info, warn};

use crate::background::load_background;
use crate::flush::{flush_pixels_to_file, flush_to_file};
use crate::reply::{send_reply, OutputPaths};
use crate::selector::{Surface, SurfaceSelector};
use crate::timer::{TaskId, TaskQueue};
use crate::view::{next_minute_delay, persist_style, style_from_store, ClockView};

/// 스케줄러가 소비하는 외부 기능 묶음
pub struct Collaborators {
    pub formatter: Box<dyn ClockFormatter>,
    pub settings: Box<dyn SettingsParser>,
    pub store: Box<dyn KeyValueStore>,
    pub display: Box<dyn DisplayControl>,
    pub windows: Box<dyn WindowSystem>,
    pub reply: Box<dyn ReplySender>,
    pub clock: Box<dyn WallClock>,
}

/// 캡처 세션 단계
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    ShowPending,
    RenderWait,
    Capturing,
    Replying,
}

/// 이벤트 루프 진행 여부
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Exit,
}

#[derive(Debug)]
enum Task {
    /// 게이트가 열리길 기다리는 캡처 요청
    DeferredCapture(AppRequest),
    /// 렌더 대기 종료
    Drawing,
    /// 표시 직후 유휴 차례의 캡처
    IdleCapture,
    /// main 요청의 동기화 폴링
    SyncPoll,
    /// 지연 종료
    Close,
    /// 분 단위 텍스트 갱신
    MinuteTick,
}

/// 진행 중인 캡처 세션
#[derive(Debug)]
struct CaptureSession {
    request: AppRequest,
    kind: SurfaceKind,
}

/// 캡처 파이프라인 상태 소유자
pub struct CaptureManager {
    capture: CaptureConfig,
    paths: OutputPaths,
    wallpaper_dir: PathBuf,
    selector: SurfaceSelector,
    view: ClockView,
    queue: TaskQueue<Task>,
    ports: Collaborators,

    drawing_state: DrawingState,
    phase: Phase,
    background: Option<BackgroundInfo>,
    session: Option<CaptureSession>,
    /// 게이트가 열리길 기다리는 캡처 요청 수
    deferred_captures: usize,

    drawing_timer: Option<TaskId>,
    idle_capture: Option<TaskId>,
    sync_timer: Option<TaskId>,
    close_timer: Option<TaskId>,
    minute_timer: Option<TaskId>,

    now_ms: u64,
}

impl CaptureManager {
    pub fn new(config: &AppConfig, ports: Collaborators) -> Self {
        let view = ClockView::new(style_from_store(ports.store.as_ref()));
        Self {
            capture: config.capture.clone(),
            paths: OutputPaths::from_config(&config.capture),
            wallpaper_dir: config.background.wallpaper_dir.clone(),
            selector: SurfaceSelector::new(config.widget.dims(), config.widget.window_name.clone()),
            view,
            queue: TaskQueue::new(),
            ports,
            drawing_state: DrawingState::Idle,
            phase: Phase::Idle,
            background: None,
            session: None,
            deferred_captures: 0,
            drawing_timer: None,
            idle_capture: None,
            sync_timer: None,
            close_timer: None,
            minute_timer: None,
            now_ms: 0,
        }
    }

    // ============================================================
    // 조회
    // ============================================================

    pub fn drawing_state(&self) -> DrawingState {
        self.drawing_state
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn active_surface_kind(&self) -> Option<SurfaceKind> {
        self.selector.active_kind()
    }

    pub fn live_surfaces(&self) -> usize {
        self.selector.live_count()
    }

    pub fn view(&self) -> &ClockView {
        &self.view
    }

    pub fn background(&self) -> Option<&BackgroundInfo> {
        self.background.as_ref()
    }

    /// 다음으로 `run_pending`을 불러야 할 시각 (밀리초)
    pub fn next_deadline(&self) -> Option<u64> {
        self.queue.next_deadline()
    }

    /// 예약된 태스크 수
    pub fn pending_tasks(&self) -> usize {
        self.queue.len()
    }

    /// 진행 중이거나 미뤄진 캡처가 있는지
    pub fn has_pending_capture(&self) -> bool {
        !self.drawing_state.is_idle() || self.deferred_captures > 0
    }

    // ============================================================
    // 입력
    // ============================================================

    /// launch 요청 처리
    pub fn handle_request(&mut self, now_ms: u64, request: AppRequest) -> LoopControl {
        self.now_ms = now_ms;
        info!("요청 수신: {}", request.operation);

        match request.kind() {
            Operation::Main => self.on_main(),
            Operation::Capture => self.on_capture(request),
            Operation::RemoteSettings => self.on_remote_settings(&request),
            Operation::Unknown(op) => {
                warn!("알 수 없는 operation: {op}");
                LoopControl::Continue
            }
        }
    }

    /// 시스템 신호 처리
    pub fn handle_signal(&mut self, now_ms: u64, signal: SystemSignal) -> LoopControl {
        self.now_ms = now_ms;
        debug!("신호 수신: {:?}", signal);

        match signal {
            SystemSignal::DisplayOn => {
                self.refresh_clock();
                self.view.show();
                self.present();
            }
            SystemSignal::PowerStateChanged(PowerState::Normal) => {
                if !self.view.is_shown() {
                    self.refresh_clock();
                    self.view.show();
                    self.present();
                }
                self.arm_minute_tick(PowerState::Normal);
            }
            SystemSignal::PowerStateChanged(state) => {
                debug!("처리하지 않는 전원 상태: {:?}", state);
            }
            SystemSignal::SettingFinished => {
                if self.selector.active_kind() == Some(SurfaceKind::OffscreenBuffer) {
                    info!("설정 종료 통지: 오프스크린 프로세스 종료");
                    return LoopControl::Exit;
                }
            }
            SystemSignal::TimeSettingsChanged => {
                if let Err(e) = self.ports.formatter.reload() {
                    warn!("포맷터 재설정 실패: {e}");
                }
                self.refresh_clock();
            }
            SystemSignal::ClockStyleChanged => {
                self.view.apply_style(style_from_store(self.ports.store.as_ref()));
                self.refresh_clock();
            }
        }
        LoopControl::Continue
    }

    /// `now_ms`까지 만료된 타이머와 유휴 콜백 실행
    pub fn run_pending(&mut self, now_ms: u64) -> LoopControl {
        self.now_ms = now_ms;
        while let Some(task) = self.queue.pop_ready(now_ms) {
            if self.dispatch(task) == LoopControl::Exit {
                return LoopControl::Exit;
            }
        }
        LoopControl::Continue
    }

    fn dispatch(&mut self, task: Task) -> LoopControl {
        match task {
            Task::DeferredCapture(request) => {
                debug!("미뤄진 캡처 요청 재확인");
                self.deferred_captures = self.deferred_captures.saturating_sub(1);
                self.on_capture(request)
            }
            Task::Drawing => {
                self.drawing_timer = None;
                self.on_drawing_timer()
            }
            Task::IdleCapture => {
                self.idle_capture = None;
                self.capture()
            }
            Task::SyncPoll => {
                self.sync_timer = None;
                self.on_sync_poll();
                LoopControl::Continue
            }
            Task::Close => {
                self.close_timer = None;
                info!("지연 종료 타이머 만료");
                LoopControl::Exit
            }
            Task::MinuteTick => {
                self.minute_timer = None;
                self.refresh_clock();
                LoopControl::Continue
            }
        }
    }

    // ============================================================
    // main
    // ============================================================

    fn on_main(&mut self) -> LoopControl {
        self.cancel_close_timer();

        if self.drawing_state.is_idle() {
            self.rebuild_main_view();
        } else {
            debug!("캡처 진행 중: 미니컨트롤 재생성 대기");
            self.arm_sync_poll();
        }
        LoopControl::Continue
    }

    fn arm_sync_poll(&mut self) {
        if let Some(id) = self.sync_timer.take() {
            self.queue.cancel(id);
        }
        self.sync_timer = Some(
            self.queue
                .add_timer(self.now_ms, self.capture.sync_poll(), Task::SyncPoll),
        );
    }

    fn on_sync_poll(&mut self) {
        if self.drawing_state.is_idle() {
            self.rebuild_main_view();
        } else {
            self.arm_sync_poll();
        }
    }

    /// 오프스크린 자원을 해제하고 미니컨트롤 창 확보 (살아있는 창은 재사용)
    fn rebuild_main_view(&mut self) {
        self.selector.release_offscreen();
        if let Err(e) = self.select_surface(SurfaceKind::MinicontrolWindow) {
            error!("미니컨트롤 창 생성 실패: {e}");
        }
    }

    // ============================================================
    // 캡처
    // ============================================================

    fn on_capture(&mut self, request: AppRequest) -> LoopControl {
        if !self.drawing_state.is_idle() {
            debug!(
                "캡처 진행 중 (state={}): {}ms 후 재확인",
                self.drawing_state.as_u8(),
                self.capture.sync_poll_ms
            );
            self.queue.add_timer(
                self.now_ms,
                self.capture.sync_poll(),
                Task::DeferredCapture(request),
            );
            self.deferred_captures += 1;
            return LoopControl::Continue;
        }
        self.begin_capture(request)
    }

    fn begin_capture(&mut self, request: AppRequest) -> LoopControl {
        self.cancel_close_timer();
        self.background = Some(load_background(
            self.ports.store.as_ref(),
            &self.wallpaper_dir,
        ));

        let kind = match self.select_surface(SurfaceKind::OffscreenBuffer) {
            Ok(kind) => kind,
            Err(e) => {
                error!("캡처 서피스 준비 실패: {e}");
                send_reply(
                    &request,
                    SurfaceKind::OffscreenBuffer,
                    &self.paths,
                    self.ports.reply.as_ref(),
                );
                return if self.selector.active_kind().is_none() {
                    LoopControl::Exit
                } else {
                    LoopControl::Continue
                };
            }
        };

        self.drawing_state = DrawingState::for_kind(kind);
        self.phase = Phase::ShowPending;
        self.session = Some(CaptureSession { request, kind });
        info!(
            "캡처 시작: {:?} (state={})",
            kind,
            self.drawing_state.as_u8()
        );

        self.cancel_drawing_timers();
        self.refresh_clock();
        if self.power_state().is_lcd_off() {
            self.view.show();
            self.present();
        }

        self.drawing_timer = Some(self.queue.add_timer(
            self.now_ms,
            self.capture.render_wait(),
            Task::Drawing,
        ));
        self.phase = Phase::RenderWait;
        LoopControl::Continue
    }

    fn on_drawing_timer(&mut self) -> LoopControl {
        if self.session.is_none() {
            warn!("세션 없이 드로잉 타이머 만료");
            return LoopControl::Continue;
        }

        if !self.view.is_shown() {
            self.view.show();
            self.present();
            self.idle_capture = Some(self.queue.add_idle(Task::IdleCapture));
            return LoopControl::Continue;
        }
        self.capture()
    }

    fn capture(&mut self) -> LoopControl {
        let Some(session) = self.session.take() else {
            warn!("세션 없이 캡처 호출");
            return LoopControl::Continue;
        };

        self.phase = Phase::Capturing;
        let path = self.paths.path_for(session.kind).to_path_buf();
        let footprint = self.selector.footprint();
        let windows = self.ports.windows.as_ref();

        let result = match self.selector.active_mut() {
            Some(Surface::Offscreen(canvas)) => {
                flush_to_file(canvas, &path, footprint.width, footprint.height)
            }
            Some(Surface::Window { handle, .. }) => {
                capture_window(windows, *handle, footprint, &path)
            }
            None => Err(CoreError::InvalidArgument("활성 서피스 없음".to_string())),
        };
        if let Err(e) = result {
            error!("캡처 실패 ({:?}): {e}", session.kind);
        }

        self.phase = Phase::Replying;
        send_reply(
            &session.request,
            session.kind,
            &self.paths,
            self.ports.reply.as_ref(),
        );

        if self.power_state().is_lcd_off() {
            self.view.hide();
            self.present();
        }

        self.drawing_state = DrawingState::Idle;
        self.drawing_timer = None;
        self.idle_capture = None;
        self.phase = Phase::Idle;

        if session.kind == SurfaceKind::OffscreenBuffer {
            info!("오프스크린 캡처 완료: 프로세스 종료");
            self.warn_dropped_captures();
            return LoopControl::Exit;
        }
        LoopControl::Continue
    }

    // ============================================================
    // remote_settings
    // ============================================================

    fn on_remote_settings(&mut self, request: &AppRequest) -> LoopControl {
        let Some(xml) = request.extra(EXTRA_RESULT_XML) else {
            warn!("설정 결과 XML 없음");
            return LoopControl::Continue;
        };

        let settings = match self.ports.settings.parse_settings(xml) {
            Ok(settings) => settings,
            Err(e) => {
                warn!("설정 결과 처리 실패: {e}");
                return LoopControl::Continue;
            }
        };

        if let Err(e) = persist_style(self.ports.store.as_ref(), &settings) {
            warn!("시계 설정 저장 실패: {e}");
        }
        self.view.apply_style(settings);
        self.refresh_clock();

        if self.selector.active_kind() == Some(SurfaceKind::MinicontrolWindow) {
            if let Err(e) = self.ports.display.request_normal() {
                warn!("디스플레이 깨우기 실패: {e}");
            }
        } else {
            info!("설정 적용 완료: {}ms 후 종료", self.capture.close_delay_ms);
            self.cancel_close_timer();
            self.close_timer = Some(self.queue.add_timer(
                self.now_ms,
                self.capture.close_delay(),
                Task::Close,
            ));
        }
        LoopControl::Continue
    }

    // ============================================================
    // 공통
    // ============================================================

    /// 서피스 선택/생성 (새로 만들었으면 저장소 스타일로 뷰 초기화)
    fn select_surface(&mut self, kind: SurfaceKind) -> Result<SurfaceKind, CoreError> {
        let created = self.selector.active_kind().is_none();
        let resolved = self
            .selector
            .select_or_create(kind, self.ports.windows.as_ref())?
            .kind();

        if created {
            self.view
                .apply_style(style_from_store(self.ports.store.as_ref()));
            self.refresh_clock();
        }
        Ok(resolved)
    }

    /// 텍스트 갱신 + 분 타이머 재설정 + 서피스 반영
    fn refresh_clock(&mut self) {
        let now = self.ports.clock.now_utc();
        self.view.refresh(self.ports.formatter.as_ref(), now);
        self.arm_minute_tick(self.power_state());
        self.present();
    }

    fn arm_minute_tick(&mut self, power: PowerState) {
        if let Some(id) = self.minute_timer.take() {
            self.queue.cancel(id);
        }
        if power.is_lcd_off() {
            return;
        }
        let delay = next_minute_delay(self.ports.clock.now_utc());
        self.minute_timer = Some(self.queue.add_timer(self.now_ms, delay, Task::MinuteTick));
    }

    fn present(&mut self) {
        let scene = self.view.scene(self.background.as_ref());
        if let Some(surface) = self.selector.active_mut() {
            surface.present(&scene, self.ports.windows.as_ref());
        }
    }

    fn power_state(&self) -> PowerState {
        self.ports.display.power_state().unwrap_or_else(|e| {
            warn!("전원 상태 조회 실패: {e}");
            PowerState::Normal
        })
    }

    /// 종료로 버려지는 미뤄진 캡처 요청 기록
    fn warn_dropped_captures(&self) {
        if self.deferred_captures == 0 {
            return;
        }
        let tokens = self.deferred_reply_tokens();
        warn!(
            "종료로 응답 없이 버려지는 캡처 요청 {}건: {:?}",
            self.deferred_captures, tokens
        );
    }

    /// 게이트를 기다리는 캡처 요청의 응답 토큰
    pub fn deferred_reply_tokens(&self) -> Vec<String> {
        self.queue
            .pending()
            .filter_map(|task| match task {
                Task::DeferredCapture(request) => Some(
                    request
                        .reply_to
                        .clone()
                        .unwrap_or_else(|| "<no reply_to>".to_string()),
                ),
                _ => None,
            })
            .collect()
    }

    fn cancel_close_timer(&mut self) {
        if let Some(id) = self.close_timer.take() {
            self.queue.cancel(id);
            debug!("지연 종료 취소");
        }
    }

    fn cancel_drawing_timers(&mut self) {
        if let Some(id) = self.drawing_timer.take() {
            self.queue.cancel(id);
        }
        if let Some(id) = self.idle_capture.take() {
            self.queue.cancel(id);
        }
    }
}

/// 창 버퍼 직접 읽기 캡처
///
/// 지오메트리가 풋프린트와 다르면 크기를 되돌린 뒤 다시 조회한다.
fn capture_window(
    windows: &dyn WindowSystem,
    handle: WindowHandle,
    footprint: Dims,
    path: &std::path::Path,
) -> Result<(), CoreError> {
    let mut geometry = windows.geometry(handle)?;
    debug!(
        "미니컨트롤 버퍼: x={}, y={}, w={}, h={}",
        geometry.x, geometry.y, geometry.width, geometry.height
    );

    if geometry.dims() != footprint {
        error!(
            "미니컨트롤 크기 변경 감지: {}x{} (기대 {}x{})",
            geometry.width, geometry.height, footprint.width, footprint.height
        );
        windows.resize(handle, footprint)?;
        geometry = windows.geometry(handle)?;
        error!(
            "미니컨트롤 크기 재조정 후: {}x{}",
            geometry.width, geometry.height
        );
    }

    let pixels = windows.pixels(handle)?;
    flush_pixels_to_file(&pixels, path, geometry.width, geometry.height)
}
