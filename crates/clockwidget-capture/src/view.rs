//! 시계 뷰.
//!
//! 포맷터 출력으로 시각/날짜/오전오후 텍스트를 만들고 표시 여부를 관리한다.
//! 서피스에는 [`ClockScene`] 스냅샷으로 전달된다.

use std::time::Duration;

use chrono::{DateTime, Timelike, Utc};
use clockwidget_core::error::CoreError;
use clockwidget_core::models::background::BackgroundInfo;
use clockwidget_core::models::clock::{
    ClockFont, ClockScene, ClockSettings, ClockText, ClockVisualState, FontColor,
    DEFAULT_FONT_COLOR_INDEX,
};
use clockwidget_core::ports::formatter::ClockFormatter;
use clockwidget_core::ports::store::{keys, KeyValueStore};
use tracing::{debug, warn};

/// 아랍어 로케일 + Dynamic 폰트에서 쓰는 콜론 (U+2236)
const RATIO_COLON: &str = "\u{2236}";

/// 저장소에서 시계 스타일 읽기
pub fn style_from_store(store: &dyn KeyValueStore) -> ClockSettings {
    ClockSettings {
        show_date: store.int_or(keys::SHOW_DATE, 0) != 0,
        font: ClockFont::from_index(store.int_or(keys::CLOCK_FONT, ClockFont::Default.index())),
        font_color: FontColor::from_index(
            store.int_or(keys::CLOCK_FONT_COLOR, DEFAULT_FONT_COLOR_INDEX),
        ),
    }
}

/// 시계 스타일을 저장소에 기록
pub fn persist_style(store: &dyn KeyValueStore, settings: &ClockSettings) -> Result<(), CoreError> {
    store.set_int(keys::SHOW_DATE, i32::from(settings.show_date))?;
    store.set_int(keys::CLOCK_FONT, settings.font.index())?;
    store.set_int(keys::CLOCK_FONT_COLOR, settings.font_color.index())?;
    Ok(())
}

/// 다음 분 경계까지 남은 시간
pub fn next_minute_delay(now: DateTime<Utc>) -> Duration {
    Duration::from_secs(60 - u64::from(now.second()))
}

/// 포맷터 출력 → 시계 텍스트
pub fn build_text(
    settings: &ClockSettings,
    formatter: &dyn ClockFormatter,
    now: DateTime<Utc>,
) -> Result<ClockText, CoreError> {
    let date = if settings.show_date {
        Some(formatter.format_date(now)?)
    } else {
        None
    };

    let hour24 = formatter.is_24_hour();
    let mut time = formatter.format_time(now, hour24)?;

    let ampm = if hour24 {
        None
    } else {
        let ampm = formatter.format_ampm(now)?;
        if ampm.chars().count() >= 3 {
            debug!("오전/오후 문자열이 너무 김: {ampm}");
            let fallback = if formatter.local_hour(now) < 12 { "AM" } else { "PM" };
            Some(fallback.to_string())
        } else {
            Some(ampm)
        }
    };

    if formatter.locale().starts_with("ar") && settings.font == ClockFont::Dynamic {
        time = time.replace(':', RATIO_COLON);
    }

    Ok(ClockText {
        time,
        date,
        ampm,
        ampm_leading: formatter.ampm_leading(),
    })
}

/// 시계 뷰 상태
#[derive(Debug, Clone, Default)]
pub struct ClockView {
    settings: ClockSettings,
    state: ClockVisualState,
}

impl ClockView {
    pub fn new(settings: ClockSettings) -> Self {
        Self {
            settings,
            state: ClockVisualState::default(),
        }
    }

    pub fn settings(&self) -> &ClockSettings {
        &self.settings
    }

    pub fn apply_style(&mut self, settings: ClockSettings) {
        debug!(
            "시계 스타일 적용: show_date={}, font={:?}, color={}",
            settings.show_date,
            settings.font,
            settings.font_color.hex()
        );
        self.settings = settings;
    }

    /// 현재 시각으로 텍스트 갱신 (실패 시 이전 텍스트 유지)
    pub fn refresh(&mut self, formatter: &dyn ClockFormatter, now: DateTime<Utc>) {
        match build_text(&self.settings, formatter, now) {
            Ok(text) => self.state.text = text,
            Err(e) => warn!("시계 텍스트 갱신 실패: {e}"),
        }
    }

    pub fn show(&mut self) {
        self.state.is_shown = true;
    }

    pub fn hide(&mut self) {
        self.state.is_shown = false;
    }

    pub fn is_shown(&self) -> bool {
        self.state.is_shown
    }

    pub fn state(&self) -> &ClockVisualState {
        &self.state
    }

    pub fn scene(&self, background: Option<&BackgroundInfo>) -> ClockScene {
        ClockScene {
            shown: self.state.is_shown,
            text: self.state.text.clone(),
            font: self.settings.font,
            color: self.settings.font_color,
            background: background.cloned(),
        }
    }
}
