//! 영속 키-값 저장소 포트.
//!
//! 표시 설정, 배경, 전원 상태 등 플랫폼 환경설정 키를 읽고 쓴다.

use crate::error::CoreError;

/// 환경설정 키
pub mod keys {
    /// 날짜 표시 여부 (0/1)
    pub const SHOW_DATE: &str = "db/idle-clock/digital/showdate";
    /// 시계 폰트 (1..=3)
    pub const CLOCK_FONT: &str = "db/idle-clock/digital/clock_font";
    /// 글자색 팔레트 인덱스 (1..=12)
    pub const CLOCK_FONT_COLOR: &str = "db/idle-clock/digital/clock_font_color";
    /// 배경 모드 (0/1/2)
    pub const HOME_BG_MODE: &str = "db/wms/home_bg_mode";
    /// 배경화면 파일 이름
    pub const HOME_BG_WALLPAPER: &str = "db/wms/home_bg_wallpaper";
    /// 배경 팔레트 색상 (RRGGBB)
    pub const HOME_BG_PALETTE: &str = "db/wms/home_bg_palette";
    /// 사용자 지정 배경 이미지 경로
    pub const HOME_BG_SET_IMAGE: &str = "db/menu_widget/bgset";
    /// 시계 설정 앱 종료 통지
    pub const SETTING_FINISH: &str = "memory/wms/clock_package_setting_finish";
    /// 디스플레이 전원 상태 (1/2/3)
    pub const PM_STATE: &str = "memory/pm/state";
    /// 지역 형식 로케일 ("ko_KR.UTF-8" 등)
    pub const REGION_FORMAT: &str = "db/menu_widget/regionformat";
    /// 12/24시간제 (1 = 12시간, 2 = 24시간)
    pub const TIME_1224: &str = "db/menu_widget/regionformat_time1224";
}

/// 키-값 저장소
pub trait KeyValueStore {
    fn get_int(&self, key: &str) -> Result<Option<i32>, CoreError>;

    fn set_int(&self, key: &str, value: i32) -> Result<(), CoreError>;

    fn get_str(&self, key: &str) -> Result<Option<String>, CoreError>;

    fn set_str(&self, key: &str, value: &str) -> Result<(), CoreError>;

    /// 정수 키 읽기 (없거나 읽기 실패 시 기본값)
    fn int_or(&self, key: &str, default: i32) -> i32 {
        self.get_int(key).ok().flatten().unwrap_or(default)
    }
}
