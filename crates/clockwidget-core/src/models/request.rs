//! 앱 요청/응답 모델.
//!
//! 외부에서 들어오는 launch 요청(operation + extra 데이터)과
//! 캡처 완료 응답, 시스템 신호를 정의한다.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::power::PowerState;

/// 지원하는 operation URI
pub mod operation {
    /// 위젯 메인 화면 갱신/재생성
    pub const MAIN: &str = "http://tizen.org/appcontrol/operation/main";
    /// 시계 캡처
    pub const CLOCK_CAPTURE: &str = "http://tizen.org/appcontrol/operation/clock/capture";
    /// 원격 설정 결과 전달
    pub const REMOTE_SETTINGS: &str = "http://tizen.org/appcontrol/operation/remote_settings";
}

/// 원격 설정 XML이 담기는 extra 키
pub const EXTRA_RESULT_XML: &str = "http://tizen.org/appcontrol/data/result_xml";

/// 응답 payload의 결과 경로 키
pub const EXTRA_RESULT: &str = "result";

/// 요청 종류
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Main,
    Capture,
    RemoteSettings,
    /// 알 수 없는 operation (무시됨)
    Unknown(String),
}

impl Operation {
    pub fn parse(uri: &str) -> Self {
        match uri {
            operation::MAIN => Operation::Main,
            operation::CLOCK_CAPTURE => Operation::Capture,
            operation::REMOTE_SETTINGS => Operation::RemoteSettings,
            other => Operation::Unknown(other.to_string()),
        }
    }
}

/// launch 요청
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppRequest {
    /// operation URI
    pub operation: String,
    /// 추가 데이터 (키-값)
    #[serde(default)]
    pub extra: BTreeMap<String, String>,
    /// 응답 토큰 (None이면 응답을 기대하지 않는 요청)
    #[serde(default)]
    pub reply_to: Option<String>,
}

impl AppRequest {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            ..Default::default()
        }
    }

    /// 응답 토큰 지정
    pub fn with_reply_to(mut self, token: impl Into<String>) -> Self {
        self.reply_to = Some(token.into());
        self
    }

    /// extra 값 추가
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    pub fn kind(&self) -> Operation {
        Operation::parse(&self.operation)
    }

    pub fn extra(&self, key: &str) -> Option<&str> {
        self.extra.get(key).map(String::as_str)
    }
}

/// 응답 결과 코드
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplyResult {
    Succeeded,
    Failed,
}

/// 요청자에게 전달되는 응답
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchReply {
    /// 원 요청의 응답 토큰
    pub reply_to: String,
    /// 원 요청의 operation
    pub operation: String,
    pub result: ReplyResult,
    pub extra: BTreeMap<String, String>,
}

/// 시스템 신호 (신호 버스/키-값 저장소 변경 알림)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "signal", content = "state", rename_all = "snake_case")]
pub enum SystemSignal {
    /// LCD 켜짐
    DisplayOn,
    /// 전원 상태 변경
    PowerStateChanged(PowerState),
    /// 시계 설정 앱 종료 통지
    SettingFinished,
    /// 시간대/로케일/12-24시간제 변경
    TimeSettingsChanged,
    /// 폰트/날짜 표시/글자색 변경
    ClockStyleChanged,
}
