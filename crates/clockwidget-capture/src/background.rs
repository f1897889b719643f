//! 배경 정보 로드.

use std::path::Path;

use clockwidget_core::models::background::{BackgroundInfo, BackgroundMode};
use clockwidget_core::ports::store::{keys, KeyValueStore};
use tracing::{debug, warn};

/// 저장소에서 배경 정보 스냅샷을 읽는다
///
/// 읽기 실패한 키는 비어있는 것으로 취급한다.
pub fn load_background(store: &dyn KeyValueStore, wallpaper_dir: &Path) -> BackgroundInfo {
    let read_str = |key: &str| match store.get_str(key) {
        Ok(value) => value.filter(|v| !v.is_empty()),
        Err(e) => {
            warn!("배경 키 읽기 실패 ({key}): {e}");
            None
        }
    };

    let mode = BackgroundMode::from_index(store.int_or(keys::HOME_BG_MODE, 0));
    let info = BackgroundInfo {
        mode,
        palette: read_str(keys::HOME_BG_PALETTE),
        wallpaper: read_str(keys::HOME_BG_WALLPAPER).map(|name| wallpaper_dir.join(name)),
        set_image: read_str(keys::HOME_BG_SET_IMAGE).map(Into::into),
    };

    debug!(
        "배경 정보: mode={:?}, palette={:?}, wallpaper={:?}, set_image={:?}",
        info.mode, info.palette, info.wallpaper, info.set_image
    );
    info
}

#[cfg(test)]
mod tests {
    use super::*;
    use clockwidget_core::error::CoreError;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::path::PathBuf;

    #[derive(Default)]
    struct MapStore(RefCell<HashMap<String, String>>);

    impl KeyValueStore for MapStore {
        fn get_int(&self, key: &str) -> Result<Option<i32>, CoreError> {
            Ok(self.0.borrow().get(key).and_then(|v| v.parse().ok()))
        }
        fn set_int(&self, key: &str, value: i32) -> Result<(), CoreError> {
            self.0.borrow_mut().insert(key.to_string(), value.to_string());
            Ok(())
        }
        fn get_str(&self, key: &str) -> Result<Option<String>, CoreError> {
            Ok(self.0.borrow().get(key).cloned())
        }
        fn set_str(&self, key: &str, value: &str) -> Result<(), CoreError> {
            self.0.borrow_mut().insert(key.to_string(), value.to_string());
            Ok(())
        }
    }

    #[test]
    fn wallpaper_name_joins_directory() {
        let store = MapStore::default();
        store.set_int(keys::HOME_BG_MODE, 1).unwrap();
        store.set_str(keys::HOME_BG_WALLPAPER, "sky.png").unwrap();
        store.set_str(keys::HOME_BG_PALETTE, "102030").unwrap();

        let info = load_background(&store, Path::new("/opt/wall"));
        assert_eq!(info.mode, BackgroundMode::Wallpaper);
        assert_eq!(info.wallpaper, Some(PathBuf::from("/opt/wall/sky.png")));
        assert_eq!(info.palette.as_deref(), Some("102030"));
    }

    #[test]
    fn empty_store_is_palette_mode_without_values() {
        let info = load_background(&MapStore::default(), Path::new("/opt/wall"));
        assert_eq!(info, BackgroundInfo::default());
    }
}
