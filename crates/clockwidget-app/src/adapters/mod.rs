//! 포트 구현체.
//!
//! 헤드리스 환경에서 캡처 파이프라인을 돌리기 위한 어댑터 모음.

pub mod clock;
pub mod display;
pub mod formatter;
pub mod reply;
pub mod settings_xml;
pub mod store;
pub mod window;
