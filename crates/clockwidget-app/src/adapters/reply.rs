//! JSON 줄 단위 응답 전송.

use std::io::{self, Write};

use clockwidget_core::error::CoreError;
use clockwidget_core::models::request::LaunchReply;
use clockwidget_core::ports::reply::ReplySender;
use parking_lot::Mutex;
use serde::Serialize;

/// 출력 줄 형식
#[derive(Serialize)]
struct ReplyLine<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    #[serde(flatten)]
    reply: &'a LaunchReply,
}

/// 응답 한 건을 JSON 한 줄로 기록
pub struct JsonLineReplySender<W> {
    out: Mutex<W>,
}

impl JsonLineReplySender<io::Stdout> {
    /// 표준 출력 응답 채널 (로그는 stderr)
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> JsonLineReplySender<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }
}

impl<W: Write> ReplySender for JsonLineReplySender<W> {
    fn send(&self, reply: &LaunchReply) -> Result<(), CoreError> {
        let line = serde_json::to_string(&ReplyLine {
            kind: "reply",
            reply,
        })?;
        let mut out = self.out.lock();
        writeln!(out, "{line}")?;
        out.flush()?;
        Ok(())
    }
}
