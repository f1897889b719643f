//! 벽시계 포트.

use chrono::{DateTime, Utc};

/// 현재 UTC 시각 공급자
pub trait WallClock {
    fn now_utc(&self) -> DateTime<Utc>;
}
