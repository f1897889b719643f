//! JSON 파일 기반 키-값 저장소.
//!
//! 키 → 정수/문자열 값을 하나의 JSON 객체로 저장한다. 외부 프로세스가
//! 파일을 고치는 경우를 위해 읽기 전에 수정 시각을 확인하고 다시 로드한다.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use clockwidget_core::error::CoreError;
use clockwidget_core::ports::store::KeyValueStore;
use parking_lot::RwLock;
use serde_json::Value;
use tracing::{debug, warn};

#[derive(Debug, Default)]
struct StoreState {
    values: BTreeMap<String, Value>,
    /// 마지막으로 읽은 파일 수정 시각
    loaded_at: Option<SystemTime>,
}

/// JSON 파일 저장소 (복제본은 같은 상태를 공유)
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    state: Arc<RwLock<StoreState>>,
}

impl JsonFileStore {
    /// 저장소 열기 (파일이 없으면 빈 저장소)
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, CoreError> {
        let store = Self {
            path: path.into(),
            state: Arc::new(RwLock::new(StoreState::default())),
        };
        store.reload_if_changed()?;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn modified(&self) -> Option<SystemTime> {
        fs::metadata(&self.path).and_then(|m| m.modified()).ok()
    }

    /// 파일이 바뀌었으면 다시 읽기
    fn reload_if_changed(&self) -> Result<(), CoreError> {
        let modified = self.modified();
        if modified.is_none() || modified == self.state.read().loaded_at {
            return Ok(());
        }

        let content = fs::read_to_string(&self.path)?;
        let values: BTreeMap<String, Value> = if content.trim().is_empty() {
            BTreeMap::new()
        } else {
            serde_json::from_str(&content)?
        };

        let mut state = self.state.write();
        state.values = values;
        state.loaded_at = modified;
        debug!("저장소 로드: {} ({}개 키)", self.path.display(), state.values.len());
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<Value>, CoreError> {
        if let Err(e) = self.reload_if_changed() {
            warn!("저장소 다시 읽기 실패, 캐시 사용: {e}");
        }
        Ok(self.state.read().values.get(key).cloned())
    }

    /// 파일 쓰기가 성공한 뒤에만 메모리 상태 반영
    fn set(&self, key: &str, value: Value) -> Result<(), CoreError> {
        let mut state = self.state.write();
        let mut values = state.values.clone();
        values.insert(key.to_string(), value);

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        let content = serde_json::to_string_pretty(&values)?;
        fs::write(&self.path, content)?;
        state.values = values;
        state.loaded_at = self.modified();
        debug!("저장소 키 저장: {key}");
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get_int(&self, key: &str) -> Result<Option<i32>, CoreError> {
        match self.get(key)? {
            None => Ok(None),
            Some(Value::Number(n)) => n
                .as_i64()
                .and_then(|v| i32::try_from(v).ok())
                .map(Some)
                .ok_or_else(|| CoreError::Store(format!("{key}: 정수 범위 밖의 값 {n}"))),
            Some(Value::Bool(b)) => Ok(Some(i32::from(b))),
            Some(other) => Err(CoreError::Store(format!("{key}: 정수가 아닌 값 {other}"))),
        }
    }

    fn set_int(&self, key: &str, value: i32) -> Result<(), CoreError> {
        self.set(key, Value::from(value))
    }

    fn get_str(&self, key: &str) -> Result<Option<String>, CoreError> {
        match self.get(key)? {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s)),
            Some(other) => Err(CoreError::Store(format!("{key}: 문자열이 아닌 값 {other}"))),
        }
    }

    fn set_str(&self, key: &str, value: &str) -> Result<(), CoreError> {
        self.set(key, Value::from(value))
    }
}
