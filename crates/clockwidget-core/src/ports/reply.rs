//! 응답 전송 포트.

use crate::error::CoreError;
use crate::models::request::LaunchReply;

/// launch 요청자에게 결과 전달
pub trait ReplySender {
    fn send(&self, reply: &LaunchReply) -> Result<(), CoreError>;
}
