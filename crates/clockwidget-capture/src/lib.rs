//! # clockwidget-capture
//!
//! 클록 위젯 캡처/렌더 파이프라인.
//! 드로잉 서피스 수명 관리(창 vs 오프스크린 캔버스), 타이머 기반 렌더 대기,
//! 픽셀 버퍼의 PNG 플러시, 캡처 완료 응답을 담당한다.
//!
//! ## 구조
//!
//! - [`canvas`]: 가상 캔버스 생성/해제 (수동 렌더 모드)
//! - [`painter`]: 시계 장면을 픽셀 버퍼에 그리기
//! - [`flush`]: 픽셀 → PNG 파일 저장
//! - [`selector`]: 요청별 드로잉 대상 선택/생성
//! - [`background`]: 배경 정보 스냅샷 로드
//! - [`view`]: 시계 텍스트/표시 상태
//! - [`timer`]: 협력형 타이머/유휴 큐
//! - [`scheduler`]: 캡처 상태 머신 (`CaptureManager`)
//! - [`reply`]: 캡처 완료 응답

pub mod background;
pub mod canvas;
pub mod flush;
pub mod painter;
pub mod reply;
pub mod scheduler;
pub mod selector;
pub mod timer;
pub mod view;

pub use scheduler::{CaptureManager, Collaborators, LoopControl, Phase};
