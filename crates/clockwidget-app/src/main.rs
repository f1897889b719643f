//! # clockwidget-app
//!
//! 클록 위젯 바이너리 진입점.
//! 설정 로드, 포트 어댑터 와이어링, 단일 스레드 이벤트 루프 구동.
//!
//! 입력은 stdin JSON 줄(launch 요청/시스템 신호), 응답은 stdout JSON 줄,
//! 로그는 stderr로 나간다.

mod adapters;
mod event_loop;
mod inbound;
mod lifecycle;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use clockwidget_capture::{CaptureManager, Collaborators};
use clockwidget_core::config::AppConfig;
use clockwidget_core::config_manager::ConfigManager;
use clockwidget_core::ports::reply::ReplySender;
use directories::ProjectDirs;
use tokio::io::BufReader;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::adapters::clock::SystemClock;
use crate::adapters::display::StoreDisplayControl;
use crate::adapters::formatter::{ChronoFormatter, Zone};
use crate::adapters::reply::JsonLineReplySender;
use crate::adapters::settings_xml::XmlSettingsParser;
use crate::adapters::store::JsonFileStore;
use crate::adapters::window::HeadlessWindowSystem;
use crate::event_loop::EventLoop;
use crate::lifecycle::{ExitReason, LifecycleManager};

/// 환경설정 저장소 파일 이름
const STORE_FILE_NAME: &str = "preferences.json";

/// 런타임 종료 시 blocking stdin 읽기를 기다리는 상한
const RUNTIME_SHUTDOWN_TIMEOUT: Duration = Duration::from_millis(100);

/// 디지털 시계 위젯
///
/// 미니컨트롤/오프스크린 서피스에 시계를 그리고 요청 시 PNG로 내보낸다.
#[derive(Parser, Debug)]
#[command(name = "clockwidget")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// 설정 파일 경로 (기본: ~/.config/clockwidget/config.json)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// 로그 레벨 (trace, debug, info, warn, error)
    #[arg(long, short = 'l', default_value = "info")]
    log_level: String,

    /// 오프스크린 캡처 출력 경로
    #[arg(long)]
    offscreen_output: Option<PathBuf>,

    /// 미니컨트롤 캡처 출력 경로
    #[arg(long)]
    minicontrol_output: Option<PathBuf>,

    /// 환경설정 저장소 파일 경로
    #[arg(long)]
    store: Option<PathBuf>,

    /// 배경화면 디렉토리
    #[arg(long)]
    wallpaper_dir: Option<PathBuf>,
}

fn init_tracing(log_level: &str) {
    let log_filter = format!(
        "clockwidget={lvl},clockwidget_app={lvl},clockwidget_core={lvl},clockwidget_capture={lvl}",
        lvl = log_level
    );
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_filter)),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// 설정 파일 로드 + CLI 오버라이드
fn load_config(args: &Args) -> AppConfig {
    let manager = match &args.config {
        Some(path) => ConfigManager::with_path(path.clone()),
        None => ConfigManager::new(),
    };
    let mut config = match manager {
        Ok(manager) => {
            info!("설정 파일: {}", manager.config_path().display());
            manager.get()
        }
        Err(e) => {
            warn!("설정 로드 실패, 기본 설정 사용: {e}");
            AppConfig::default_config()
        }
    };

    if let Some(path) = &args.offscreen_output {
        config.capture.offscreen_path = path.clone();
    }
    if let Some(path) = &args.minicontrol_output {
        config.capture.minicontrol_path = path.clone();
    }
    if let Some(dir) = &args.wallpaper_dir {
        config.background.wallpaper_dir = dir.clone();
    }
    config
}

/// 저장소 경로 결정 (CLI → 설정 → 플랫폼 데이터 디렉토리)
///
/// - Linux: `~/.local/share/clockwidget/preferences.json`
/// - macOS: `~/Library/Application Support/org.tizen.clockwidget/preferences.json`
fn resolve_store_path(cli: Option<&Path>, config: &AppConfig) -> PathBuf {
    cli.map(Path::to_path_buf)
        .or_else(|| config.storage.preferences_path.clone())
        .or_else(|| {
            ProjectDirs::from("org", "tizen", "clockwidget")
                .map(|p| p.data_dir().join(STORE_FILE_NAME))
        })
        .unwrap_or_else(|| PathBuf::from(STORE_FILE_NAME))
}

/// 포트 어댑터 와이어링
pub(crate) fn build_manager(
    config: &AppConfig,
    store: JsonFileStore,
    reply: Box<dyn ReplySender>,
) -> CaptureManager {
    CaptureManager::new(
        config,
        Collaborators {
            formatter: Box::new(ChronoFormatter::new(store.clone(), Zone::Local)),
            settings: Box::new(XmlSettingsParser::new()),
            display: Box::new(StoreDisplayControl::new(store.clone())),
            store: Box::new(store),
            windows: Box::new(HeadlessWindowSystem::new()),
            reply,
            clock: Box::new(SystemClock),
        },
    )
}

async fn run(args: Args) -> Result<ExitReason> {
    let config = load_config(&args);

    let store_path = resolve_store_path(args.store.as_deref(), &config);
    let store = JsonFileStore::open(&store_path)
        .with_context(|| format!("저장소 열기 실패: {}", store_path.display()))?;
    info!("환경설정 저장소: {}", store.path().display());

    let manager = build_manager(&config, store, Box::new(JsonLineReplySender::stdout()));

    let lifecycle = Arc::new(LifecycleManager::new());
    let signal_lifecycle = lifecycle.clone();
    tokio::spawn(async move {
        signal_lifecycle.wait_for_signal().await;
    });

    let stdin = BufReader::new(tokio::io::stdin());
    let mut event_loop = EventLoop::new(manager, stdin, lifecycle.subscribe());
    info!("요청 대기 중 (stdin JSON 줄)");
    Ok(event_loop.run().await)
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_level);
    info!("클록 위젯 시작 (v{})", env!("CARGO_PKG_VERSION"));

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("tokio 런타임 생성 실패")?;
    let reason = runtime.block_on(run(args))?;
    runtime.shutdown_timeout(RUNTIME_SHUTDOWN_TIMEOUT);

    info!("클록 위젯 종료: {:?}", reason);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_overrides_output_paths() {
        let dir = tempfile::TempDir::new().unwrap();
        let args = Args::parse_from([
            "clockwidget",
            "--config",
            dir.path().join("config.json").to_str().unwrap(),
            "--offscreen-output",
            "/var/tmp/off.png",
            "--wallpaper-dir",
            "/srv/wallpapers",
        ]);
        let config = load_config(&args);
        assert_eq!(config.capture.offscreen_path, PathBuf::from("/var/tmp/off.png"));
        assert_eq!(
            config.capture.minicontrol_path,
            AppConfig::default_config().capture.minicontrol_path
        );
        assert_eq!(config.background.wallpaper_dir, PathBuf::from("/srv/wallpapers"));
    }

    #[test]
    fn store_path_precedence() {
        let mut config = AppConfig::default_config();
        assert!(resolve_store_path(None, &config).ends_with(STORE_FILE_NAME));

        config.storage.preferences_path = Some(PathBuf::from("/etc/clock/prefs.json"));
        assert_eq!(
            resolve_store_path(None, &config),
            PathBuf::from("/etc/clock/prefs.json")
        );
        assert_eq!(
            resolve_store_path(Some(Path::new("/tmp/cli.json")), &config),
            PathBuf::from("/tmp/cli.json")
        );
    }
}
