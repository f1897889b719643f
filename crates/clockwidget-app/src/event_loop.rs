//! 단일 스레드 이벤트 루프.
//!
//! 입력 줄, 다음 타이머 만료, 종료 신호를 `select!`로 기다리며
//! `CaptureManager`에 루프 시작 기준 단조 밀리초를 넘긴다.

use std::time::Duration;

use clockwidget_capture::{CaptureManager, LoopControl};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};
use tokio::sync::watch;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::inbound::{parse_line, InboundMessage};
use crate::lifecycle::ExitReason;

/// 예약된 타이머가 없을 때의 대기 상한
const IDLE_WAKE: Duration = Duration::from_secs(3600);

/// 캡처 매니저 구동기
pub struct EventLoop<R> {
    manager: CaptureManager,
    lines: Lines<R>,
    shutdown: watch::Receiver<bool>,
    start: Instant,
}

impl<R: AsyncBufRead + Unpin> EventLoop<R> {
    pub fn new(manager: CaptureManager, input: R, shutdown: watch::Receiver<bool>) -> Self {
        Self {
            manager,
            lines: input.lines(),
            shutdown,
            start: Instant::now(),
        }
    }

    pub fn manager(&self) -> &CaptureManager {
        &self.manager
    }

    fn now_ms(&self) -> u64 {
        u64::try_from(self.start.elapsed().as_millis()).unwrap_or(u64::MAX)
    }

    /// 종료 사유가 생길 때까지 실행
    ///
    /// 입력이 끝나면 진행 중/대기 중 캡처를 마친 뒤 종료한다.
    pub async fn run(&mut self) -> ExitReason {
        let mut input_open = true;

        loop {
            if self.manager.run_pending(self.now_ms()) == LoopControl::Exit {
                return ExitReason::Finished;
            }
            if !input_open && !self.manager.has_pending_capture() {
                return ExitReason::InputClosed;
            }

            let wake_at = self
                .manager
                .next_deadline()
                .map(|ms| self.start + Duration::from_millis(ms));
            let sleep_target = wake_at.unwrap_or_else(|| Instant::now() + IDLE_WAKE);

            tokio::select! {
                changed = self.shutdown.changed() => {
                    if changed.is_err() || *self.shutdown.borrow() {
                        info!("종료 신호 수신: 이벤트 루프 중단");
                        return ExitReason::Shutdown;
                    }
                }
                line = self.lines.next_line(), if input_open => match line {
                    Ok(Some(line)) => {
                        if self.dispatch(&line) == LoopControl::Exit {
                            return ExitReason::Finished;
                        }
                    }
                    Ok(None) => {
                        info!("입력 종료");
                        input_open = false;
                    }
                    Err(e) => {
                        warn!("입력 읽기 실패: {e}");
                        input_open = false;
                    }
                },
                _ = tokio::time::sleep_until(sleep_target), if wake_at.is_some() => {}
            }
        }
    }

    fn dispatch(&mut self, line: &str) -> LoopControl {
        let now = self.now_ms();
        match parse_line(line) {
            Ok(Some(InboundMessage::Launch(request))) => self.manager.handle_request(now, request),
            Ok(Some(InboundMessage::Signal(signal))) => self.manager.handle_signal(now, signal),
            Ok(None) => LoopControl::Continue,
            Err(e) => {
                warn!("잘못된 입력 줄 무시: {e}");
                debug!("입력: {line}");
                LoopControl::Continue
            }
        }
    }
}
