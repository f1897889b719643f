//! 저장소 기반 디스플레이 전원 제어.

use clockwidget_core::error::CoreError;
use clockwidget_core::models::power::PowerState;
use clockwidget_core::ports::display::DisplayControl;
use clockwidget_core::ports::store::{keys, KeyValueStore};
use tracing::{debug, info};

/// `memory/pm/state` 키로 전원 상태를 읽고 쓴다
pub struct StoreDisplayControl<S> {
    store: S,
}

impl<S: KeyValueStore> StoreDisplayControl<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }
}

impl<S: KeyValueStore> DisplayControl for StoreDisplayControl<S> {
    fn power_state(&self) -> Result<PowerState, CoreError> {
        match self.store.get_int(keys::PM_STATE)? {
            None => Ok(PowerState::Normal),
            Some(raw) => PowerState::from_raw(raw)
                .ok_or_else(|| CoreError::Store(format!("알 수 없는 전원 상태: {raw}"))),
        }
    }

    fn request_normal(&self) -> Result<(), CoreError> {
        let current = self.power_state().unwrap_or_default();
        if current == PowerState::Normal {
            debug!("디스플레이 이미 켜짐");
            return Ok(());
        }
        info!("디스플레이 깨우기 요청 ({:?} → Normal)", current);
        self.store.set_int(keys::PM_STATE, PowerState::Normal.as_raw())
    }
}
