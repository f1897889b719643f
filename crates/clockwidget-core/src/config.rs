//! 애플리케이션 설정 구조체.
//!
//! 캡처 출력 경로, 렌더 대기/폴링/종료 타이머, 위젯 크기, 배경화면 경로,
//! 환경설정 저장소 위치 등 런타임 설정을 정의한다.
//! `ConfigManager`가 `config` crate를 통해 파일/환경변수에서 로드.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::models::surface::Dims;

/// 최상위 애플리케이션 설정
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// 캡처 파이프라인 설정
    #[serde(default)]
    pub capture: CaptureConfig,
    /// 위젯 창 설정
    #[serde(default)]
    pub widget: WidgetConfig,
    /// 배경 설정
    #[serde(default)]
    pub background: BackgroundConfig,
    /// 환경설정 저장소 설정
    #[serde(default)]
    pub storage: StorageConfig,
}

// ============================================================
// 캡처 설정
// ============================================================

/// 캡처 설정: 출력 파일 경로와 스케줄러 타이밍
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// 오프스크린 캡처 결과 PNG 경로
    #[serde(default = "default_offscreen_path")]
    pub offscreen_path: PathBuf,
    /// 미니컨트롤(온스크린) 캡처 결과 PNG 경로
    #[serde(default = "default_minicontrol_path")]
    pub minicontrol_path: PathBuf,
    /// 첫 페인트까지 대기 시간 (밀리초)
    #[serde(default = "default_render_wait_ms")]
    pub render_wait_ms: u64,
    /// 캡처 진행 중 요청 재확인 주기 (밀리초)
    #[serde(default = "default_sync_poll_ms")]
    pub sync_poll_ms: u64,
    /// 원격 설정 적용 후 프로세스 종료 지연 (밀리초)
    #[serde(default = "default_close_delay_ms")]
    pub close_delay_ms: u64,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            offscreen_path: default_offscreen_path(),
            minicontrol_path: default_minicontrol_path(),
            render_wait_ms: default_render_wait_ms(),
            sync_poll_ms: default_sync_poll_ms(),
            close_delay_ms: default_close_delay_ms(),
        }
    }
}

impl CaptureConfig {
    /// 렌더 대기 시간을 Duration으로 반환
    pub fn render_wait(&self) -> Duration {
        Duration::from_millis(self.render_wait_ms)
    }

    /// 동기화 폴링 주기를 Duration으로 반환
    pub fn sync_poll(&self) -> Duration {
        Duration::from_millis(self.sync_poll_ms)
    }

    /// 종료 지연을 Duration으로 반환
    pub fn close_delay(&self) -> Duration {
        Duration::from_millis(self.close_delay_ms)
    }
}

// ============================================================
// 위젯 설정
// ============================================================

/// 위젯 창 설정: 고정 풋프린트
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WidgetConfig {
    /// 위젯 너비 (픽셀)
    #[serde(default = "default_widget_size")]
    pub width: u32,
    /// 위젯 높이 (픽셀)
    #[serde(default = "default_widget_size")]
    pub height: u32,
    /// 미니컨트롤 창 이름
    #[serde(default = "default_window_name")]
    pub window_name: String,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            width: default_widget_size(),
            height: default_widget_size(),
            window_name: default_window_name(),
        }
    }
}

impl WidgetConfig {
    /// 위젯 풋프린트
    pub fn dims(&self) -> Dims {
        Dims::new(self.width, self.height)
    }
}

// ============================================================
// 배경 설정
// ============================================================

/// 배경 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackgroundConfig {
    /// 배경화면 파일 디렉토리 (저장소에는 파일 이름만 기록됨)
    #[serde(default = "default_wallpaper_dir")]
    pub wallpaper_dir: PathBuf,
}

impl Default for BackgroundConfig {
    fn default() -> Self {
        Self {
            wallpaper_dir: default_wallpaper_dir(),
        }
    }
}

// ============================================================
// 저장소 설정
// ============================================================

/// 환경설정 저장소 설정
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// 키-값 저장소 파일 경로 (None이면 데이터 디렉토리 기본값)
    #[serde(default)]
    pub preferences_path: Option<PathBuf>,
}

impl AppConfig {
    /// 기본 설정 생성
    pub fn default_config() -> Self {
        Self::default()
    }
}

// ============================================================
// 기본값 함수
// ============================================================

/// 패키지 이름 (출력 파일 이름 접두사)
pub const PACKAGE_NAME: &str = "org.tizen.idle-clock-digital";

fn default_offscreen_path() -> PathBuf {
    PathBuf::from(format!("/tmp/{PACKAGE_NAME}-dump_offscreen.png"))
}
fn default_minicontrol_path() -> PathBuf {
    PathBuf::from(format!("/tmp/{PACKAGE_NAME}-dump_minicontrol.png"))
}
fn default_render_wait_ms() -> u64 {
    150
}
fn default_sync_poll_ms() -> u64 {
    100
}
fn default_close_delay_ms() -> u64 {
    3_000
}
fn default_widget_size() -> u32 {
    320
}
fn default_window_name() -> String {
    "idle-clock-digital".to_string()
}
fn default_wallpaper_dir() -> PathBuf {
    PathBuf::from("/opt/usr/share/settings/Wallpapers")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_widget_contract() {
        let config = AppConfig::default_config();
        assert_eq!(config.capture.render_wait(), Duration::from_millis(150));
        assert_eq!(config.capture.sync_poll(), Duration::from_millis(100));
        assert_eq!(config.capture.close_delay(), Duration::from_secs(3));
        assert_eq!(config.widget.dims(), Dims::new(320, 320));
        assert_ne!(config.capture.offscreen_path, config.capture.minicontrol_path);
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let json = r#"{ "capture": { "render_wait_ms": 200 } }"#;
        let config: AppConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.capture.render_wait_ms, 200);
        assert_eq!(config.capture.sync_poll_ms, 100);
        assert_eq!(config.widget.width, 320);
        assert!(config.storage.preferences_path.is_none());
    }
}
