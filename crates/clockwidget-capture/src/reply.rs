//! 캡처 완료 응답.
//!
//! 서피스 종류별 고정 출력 경로를 `result` extra로 담아 원 요청자에게 돌려준다.
//! 응답 실패는 기록만 하고 완료된 캡처를 되돌리지 않는다.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use clockwidget_core::config::CaptureConfig;
use clockwidget_core::models::request::{AppRequest, LaunchReply, ReplyResult, EXTRA_RESULT};
use clockwidget_core::models::surface::SurfaceKind;
use clockwidget_core::ports::reply::ReplySender;
use tracing::{debug, error, warn};

/// 서피스 종류별 출력 파일 경로
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub offscreen: PathBuf,
    pub minicontrol: PathBuf,
}

impl OutputPaths {
    pub fn from_config(config: &CaptureConfig) -> Self {
        Self {
            offscreen: config.offscreen_path.clone(),
            minicontrol: config.minicontrol_path.clone(),
        }
    }

    /// 오프스크린이면 오프스크린 경로, 창 서피스면 미니컨트롤 경로
    pub fn path_for(&self, kind: SurfaceKind) -> &Path {
        match kind {
            SurfaceKind::OffscreenBuffer => &self.offscreen,
            SurfaceKind::MinicontrolWindow | SurfaceKind::OnscreenWindow => &self.minicontrol,
        }
    }
}

/// 절대 경로로 변환 (상대 경로는 현재 디렉토리 기준)
fn absolute(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    match std::env::current_dir() {
        Ok(cwd) => cwd.join(path),
        Err(e) => {
            warn!("현재 디렉토리 확인 실패: {e}");
            path.to_path_buf()
        }
    }
}

/// 응답 payload 생성 (응답 토큰이 없으면 None)
pub fn build_reply(
    request: &AppRequest,
    kind: SurfaceKind,
    paths: &OutputPaths,
) -> Option<LaunchReply> {
    let reply_to = request.reply_to.clone()?;
    let mut extra = BTreeMap::new();
    extra.insert(
        EXTRA_RESULT.to_string(),
        absolute(paths.path_for(kind)).to_string_lossy().into_owned(),
    );
    Some(LaunchReply {
        reply_to,
        operation: request.operation.clone(),
        result: ReplyResult::Succeeded,
        extra,
    })
}

/// 원 요청자에게 결과 경로 응답
pub fn send_reply(
    request: &AppRequest,
    kind: SurfaceKind,
    paths: &OutputPaths,
    sender: &dyn ReplySender,
) {
    let Some(reply) = build_reply(request, kind, paths) else {
        warn!("응답 토큰 없는 요청: {}", request.operation);
        return;
    };

    match sender.send(&reply) {
        Ok(()) => debug!(
            "응답 전송: {} → {:?}",
            reply.reply_to,
            reply.extra.get(EXTRA_RESULT)
        ),
        Err(e) => error!("응답 전송 실패 ({}): {e}", reply.reply_to),
    }
}
