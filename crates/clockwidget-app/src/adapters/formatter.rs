//! chrono 기반 시각/날짜 포맷터.
//!
//! 로케일과 12/24시간제는 저장소에서 읽고 `reload`로 다시 읽는다.
//! 로케일별 패턴은 몇 가지 예외(0 채움 24시간제)만 반영한다.

use chrono::{DateTime, FixedOffset, Local, TimeZone, Timelike, Utc};
use clockwidget_core::error::CoreError;
use clockwidget_core::ports::formatter::ClockFormatter;
use clockwidget_core::ports::store::{keys, KeyValueStore};
use parking_lot::RwLock;
use tracing::{debug, warn};

/// 기본 로케일
const FALLBACK_LOCALE: &str = "en_US";

/// 24시간제 저장값
const TIME_FORMAT_24: i32 = 2;

/// 24시간제에서 시를 0으로 채우는 로케일
const ZERO_PADDED_24H: [&str; 4] = ["pt_BR", "id_ID", "da_DK", "mr_IN"];

/// 오전/오후가 시각 앞에 오는 언어
const AMPM_LEADING_LANGS: [&str; 3] = ["ko", "ja", "zh"];

/// 시간대
#[derive(Debug, Clone, Copy)]
pub enum Zone {
    /// 시스템 로컬 시간대
    Local,
    /// 고정 오프셋
    Fixed(FixedOffset),
}

#[derive(Debug, Clone)]
struct FormatSettings {
    locale: String,
    hour24: bool,
}

/// chrono 포맷터
pub struct ChronoFormatter<S> {
    store: S,
    zone: Zone,
    settings: RwLock<FormatSettings>,
}

impl<S: KeyValueStore> ChronoFormatter<S> {
    pub fn new(store: S, zone: Zone) -> Self {
        let settings = read_settings(&store);
        debug!(
            "포맷터 설정: locale={}, 24h={}",
            settings.locale, settings.hour24
        );
        Self {
            store,
            zone,
            settings: RwLock::new(settings),
        }
    }

    fn local(&self, ts: DateTime<Utc>) -> DateTime<FixedOffset> {
        let offset = match self.zone {
            Zone::Local => Local.offset_from_utc_datetime(&ts.naive_utc()),
            Zone::Fixed(offset) => offset,
        };
        ts.with_timezone(&offset)
    }
}

fn read_settings(store: &dyn KeyValueStore) -> FormatSettings {
    let stored = store.get_str(keys::REGION_FORMAT).unwrap_or_else(|e| {
        warn!("지역 형식 조회 실패: {e}");
        None
    });
    let raw = stored
        .filter(|s| !s.is_empty())
        .or_else(|| std::env::var("LANG").ok().filter(|s| !s.is_empty()))
        .unwrap_or_else(|| FALLBACK_LOCALE.to_string());

    FormatSettings {
        locale: normalize_locale(&raw),
        hour24: store.int_or(keys::TIME_1224, 1) == TIME_FORMAT_24,
    }
}

/// "ko_KR.UTF-8" → "ko_KR" (다른 인코딩 접미사는 유지)
pub fn normalize_locale(raw: &str) -> String {
    let parts: Vec<&str> = raw.split('.').collect();
    match parts.as_slice() {
        [lang, "UTF-8"] => (*lang).to_string(),
        _ => raw.to_string(),
    }
}

impl<S: KeyValueStore> ClockFormatter for ChronoFormatter<S> {
    fn format_time(&self, ts: DateTime<Utc>, hour24: bool) -> Result<String, CoreError> {
        let local = self.local(ts);
        let pattern = if !hour24 {
            "%-I:%M"
        } else if ZERO_PADDED_24H
            .iter()
            .any(|prefix| self.settings.read().locale.starts_with(prefix))
        {
            "%H:%M"
        } else {
            "%-H:%M"
        };
        Ok(local.format(pattern).to_string())
    }

    fn format_date(&self, ts: DateTime<Utc>) -> Result<String, CoreError> {
        Ok(self.local(ts).format("%a %-d").to_string())
    }

    fn format_ampm(&self, ts: DateTime<Utc>) -> Result<String, CoreError> {
        Ok(self.local(ts).format("%p").to_string())
    }

    fn locale(&self) -> String {
        self.settings.read().locale.clone()
    }

    fn is_24_hour(&self) -> bool {
        self.settings.read().hour24
    }

    fn ampm_leading(&self) -> bool {
        let settings = self.settings.read();
        AMPM_LEADING_LANGS
            .iter()
            .any(|lang| settings.locale.starts_with(lang))
    }

    fn local_hour(&self, ts: DateTime<Utc>) -> u32 {
        self.local(ts).hour()
    }

    fn reload(&self) -> Result<(), CoreError> {
        let settings = read_settings(&self.store);
        debug!(
            "포맷터 재설정: locale={}, 24h={}",
            settings.locale, settings.hour24
        );
        *self.settings.write() = settings;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::store::JsonFileStore;
    use tempfile::TempDir;

    fn formatter(locale: &str, time1224: i32) -> (TempDir, JsonFileStore, ChronoFormatter<JsonFileStore>) {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::open(dir.path().join("s.json")).unwrap();
        store.set_str(keys::REGION_FORMAT, locale).unwrap();
        store.set_int(keys::TIME_1224, time1224).unwrap();
        let kst = FixedOffset::east_opt(9 * 3600).unwrap();
        let fmt = ChronoFormatter::new(store.clone(), Zone::Fixed(kst));
        (dir, store, fmt)
    }

    fn ts() -> DateTime<Utc> {
        // 2026-10-19 14:05 KST
        Utc.with_ymd_and_hms(2026, 10, 19, 5, 5, 0).unwrap()
    }

    #[test]
    fn locale_suffix_is_stripped() {
        assert_eq!(normalize_locale("ko_KR.UTF-8"), "ko_KR");
        assert_eq!(normalize_locale("en_US"), "en_US");
        assert_eq!(normalize_locale("de_DE.ISO-8859-1"), "de_DE.ISO-8859-1");
    }

    #[test]
    fn twelve_and_twenty_four_hour_patterns() {
        let (_dir, _store, fmt) = formatter("en_US.UTF-8", 1);
        assert!(!fmt.is_24_hour());
        assert_eq!(fmt.format_time(ts(), false).unwrap(), "2:05");
        assert_eq!(fmt.format_ampm(ts()).unwrap(), "PM");
        assert_eq!(fmt.format_time(ts(), true).unwrap(), "14:05");
        assert_eq!(fmt.local_hour(ts()), 14);
        assert_eq!(fmt.format_date(ts()).unwrap(), "Mon 19");
        assert!(!fmt.ampm_leading());
    }

    #[test]
    fn zero_padded_locales() {
        let (_dir, _store, fmt) = formatter("da_DK.UTF-8", 2);
        let early = Utc.with_ymd_and_hms(2026, 10, 19, 0, 7, 0).unwrap();
        assert_eq!(fmt.format_time(early, true).unwrap(), "09:07");
    }

    #[test]
    fn reload_picks_up_store_changes() {
        let (_dir, store, fmt) = formatter("en_US.UTF-8", 1);
        assert_eq!(fmt.locale(), "en_US");

        store.set_str(keys::REGION_FORMAT, "ko_KR.UTF-8").unwrap();
        store.set_int(keys::TIME_1224, 2).unwrap();
        assert_eq!(fmt.locale(), "en_US");

        fmt.reload().unwrap();
        assert_eq!(fmt.locale(), "ko_KR");
        assert!(fmt.is_24_hour());
        assert!(fmt.ampm_leading());
    }
}
