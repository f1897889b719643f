//! 디스플레이 전원 제어 포트.
//!
//! 구현: `clockwidget-app` (키-값 저장소의 pm 상태 키)

use crate::error::CoreError;
use crate::models::power::PowerState;

/// 디스플레이 전원 상태 조회/변경
pub trait DisplayControl {
    /// 현재 전원 상태
    fn power_state(&self) -> Result<PowerState, CoreError>;

    /// 디스플레이를 Normal 상태로 깨우기 요청
    fn request_normal(&self) -> Result<(), CoreError>;
}
