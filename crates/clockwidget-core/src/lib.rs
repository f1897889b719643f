//! # clockwidget-core
//!
//! 클록 위젯 도메인 모델, 포트(trait) 정의, 에러 타입, 설정.
//! 캡처 파이프라인과 앱 바이너리가 공유하는 핵심 타입과 인터페이스를 제공한다.
//!
//! ## 구조
//!
//! - [`models`]: 서피스/시계/배경/요청 데이터 구조체
//! - [`ports`]: 외부 기능 포트 인터페이스 (동기 trait)
//! - [`error`]: 핵심 에러 타입 (thiserror)
//! - [`config`]: 애플리케이션 설정 구조체
//! - [`config_manager`]: 설정 파일 관리 (로드/저장)

pub mod config;
pub mod config_manager;
pub mod error;
pub mod models;
pub mod ports;
