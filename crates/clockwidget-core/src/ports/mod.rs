//! 포트 인터페이스 (trait).
//!
//! 캡처 파이프라인이 소비하는 외부 기능의 좁은 경계.
//! 구현은 `clockwidget-app`의 어댑터가 제공하고, `CaptureManager`가
//! `Box<dyn T>`로 소유한다.
//!
//! 파이프라인은 단일 스레드 협력형이므로 모든 trait은 동기 호출이며
//! `Send + Sync`를 요구하지 않는다.

pub mod clock;
pub mod display;
pub mod formatter;
pub mod reply;
pub mod settings;
pub mod store;
pub mod window;
